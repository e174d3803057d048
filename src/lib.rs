//! Client for the Stackdriver Monitoring (V3) and Error Reporting APIs.
//!
//! [`monitoring::Client`] builds metrics, resources and time series locally
//! and talks to the service through a [`connection::Connection`].
//! [`error_reporting::Client`] formats errors for the Error Reporting UI and
//! ships them through the Logging API.

pub mod cliopt;
pub mod connection;
pub mod error;
pub mod error_reporting;
pub mod logging;
pub mod model;
pub mod monitoring;
pub mod output;
pub mod runner;
