//! Client for the Stackdriver Monitoring API (V3).
//!
//! See https://cloud.google.com/monitoring/api/v3/

mod client;
mod clock;
mod query;

pub use client::*;
pub use clock::*;
pub use query::*;
