use std::convert::TryFrom;

use chrono::prelude::*;
use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use structopt::StructOpt;

use crate::error::{Error, Result};
use crate::model::{LabelName, LabelValue, Timestamp, TypedValue};

#[derive(Debug, StructOpt)]
#[structopt(name = "stackdriver", about = "Stackdriver Monitoring command line client")]
pub struct CliOpt {
    #[structopt(long = "project", short = "p", env = "GOOGLE_CLOUD_PROJECT")]
    pub project: String,

    #[structopt(long = "token", env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub token: String,

    #[structopt(long = "endpoint", default_value = "https://monitoring.googleapis.com/v3")]
    pub endpoint: String,

    #[structopt(long = "verbose", short = "v")]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Writes a single point to a custom metric
    WritePoint {
        #[structopt(long = "metric", short = "m")]
        metric_type: String,

        #[structopt(long = "metric-label", parse(try_from_str = parse_label))]
        metric_labels: Vec<(LabelName, LabelValue)>,

        #[structopt(long = "resource", short = "r", default_value = "global")]
        resource_type: String,

        #[structopt(long = "resource-label", parse(try_from_str = parse_label))]
        resource_labels: Vec<(LabelName, LabelValue)>,

        #[structopt(long = "end", short = "e", parse(try_from_str = parse_iso_time))]
        end_time: Option<Timestamp>,

        #[structopt(long = "start", short = "s", parse(try_from_str = parse_iso_time))]
        start_time: Option<Timestamp>,

        /// JSON scalar; anything that isn't valid JSON is sent as a string
        #[structopt(parse(try_from_str = parse_value))]
        value: TypedValue,
    },

    /// Prints the series of a metric over a recent interval
    Query {
        metric_type: String,

        #[structopt(long = "end", short = "e", parse(try_from_str = parse_iso_time))]
        end_time: Option<Timestamp>,

        #[structopt(long = "duration", short = "d", default_value = "5m", parse(try_from_str = parse_duration))]
        duration: Duration,

        #[structopt(long = "filter", short = "f")]
        filter: Option<String>,
    },

    FetchMetricDescriptor {
        metric_type: String,
    },

    ListMetricDescriptors {
        #[structopt(long = "filter", short = "f")]
        filter: Option<String>,

        #[structopt(long = "prefix")]
        type_prefix: Option<String>,
    },

    FetchResourceDescriptor {
        resource_type: String,
    },

    ListResourceDescriptors {
        #[structopt(long = "filter", short = "f")]
        filter: Option<String>,
    },

    FetchGroup {
        group_id: String,
    },

    ListGroups,
}

fn parse_iso_time(s: &str) -> Result<Timestamp> {
    s.parse::<DateTime<Utc>>()
        .map_err(|e| ("timestamp parsing failed", e).into())
}

fn parse_label(s: &str) -> Result<(LabelName, LabelValue)> {
    match s.find('=') {
        Some(pos) if pos > 0 => Ok((s[..pos].to_string(), s[pos + 1..].to_string())),
        _ => Err(Error::invalid_argument(format!(
            "expected <name>=<value>, got '{}'",
            s
        ))),
    }
}

fn parse_value(s: &str) -> Result<TypedValue> {
    let value = serde_json::from_str::<Value>(s).unwrap_or_else(|_| Value::String(s.into()));
    TypedValue::try_from(value)
}

/// Parses durations like `90s`, `5m` or `1d12h`. Units go from longest to
/// shortest and the total must be positive.
pub fn parse_duration(s: &str) -> Result<Duration> {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"^(?:(\d+)d)?(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").unwrap();
    }

    let caps = RE
        .captures(s)
        .ok_or_else(|| Error::invalid_argument(format!("malformed duration '{}'", s)))?;

    let mut total = Duration::zero();
    for (i, unit) in [Duration::days(1), Duration::hours(1), Duration::minutes(1), Duration::seconds(1)]
        .iter()
        .enumerate()
    {
        if let Some(m) = caps.get(i + 1) {
            let n: i32 = m
                .as_str()
                .parse()
                .map_err(|e| ("duration is too large", e))?;
            total = total + *unit * n;
        }
    }

    if total <= Duration::zero() {
        return Err(Error::invalid_argument("duration must be greater than 0"));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_duration() {
        #[rustfmt::skip]
        let tests = [
            ("90s", Duration::seconds(90)),
            ("5m", Duration::minutes(5)),
            ("1h30m", Duration::minutes(90)),
            ("1d12h", Duration::hours(36)),
        ];

        for (input, expected) in &tests {
            assert_eq!(*expected, parse_duration(input).unwrap(), "{}", input);
        }

        for input in &["", "0s", "5", "m5", "5m1h"] {
            let err = parse_duration(input).unwrap_err();
            assert_eq!(ErrorKind::InvalidArgument, err.kind(), "{}", input);
        }
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            ("zone".to_string(), "us-central1-f".to_string()),
            parse_label("zone=us-central1-f").unwrap()
        );
        assert_eq!(("k".to_string(), "".to_string()), parse_label("k=").unwrap());
        assert!(parse_label("=v").is_err());
        assert!(parse_label("zone").is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(TypedValue::Int64(42), parse_value("42").unwrap());
        assert_eq!(TypedValue::Double(3.14), parse_value("3.14").unwrap());
        assert_eq!(TypedValue::Bool(true), parse_value("true").unwrap());
        assert_eq!(TypedValue::String("ok".into()), parse_value("ok").unwrap());
        assert!(parse_value("[1]").is_err());
    }

    #[test]
    fn test_write_point_args() {
        let opt = CliOpt::from_iter(&[
            "stackdriver",
            "--project",
            "my-project",
            "--token",
            "t",
            "write-point",
            "-m",
            "custom.googleapis.com/my_metric",
            "--metric-label",
            "status=successful",
            "--end",
            "2016-04-06T22:05:00Z",
            "3",
        ]);

        match opt.cmd {
            Command::WritePoint {
                metric_type,
                metric_labels,
                resource_type,
                end_time,
                value,
                ..
            } => {
                assert_eq!("custom.googleapis.com/my_metric", metric_type);
                assert_eq!(vec![("status".to_string(), "successful".to_string())], metric_labels);
                assert_eq!("global", resource_type);
                assert!(end_time.is_some());
                assert_eq!(TypedValue::Int64(3), value);
            }
            cmd => panic!("unexpected command {:?}", cmd),
        }
    }
}
