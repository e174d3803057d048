use std::io;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use stackdriver::cliopt::CliOpt;
use stackdriver::connection::{AccessToken, HttpConnection};
use stackdriver::monitoring::Client;
use stackdriver::output::LineWriter;
use stackdriver::runner::Runner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = CliOpt::from_args();

    let filter = if opt.verbose {
        EnvFilter::new("stackdriver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let connection = HttpConnection::new(opt.endpoint, Box::new(AccessToken::new(opt.token)));
    let client = Client::new(opt.project, Box::new(connection));

    let mut runner = Runner::new(client, Box::new(LineWriter::new(io::stdout())));
    runner.run(opt.cmd)?;

    Ok(())
}
