//! On-demand dashboard reports and scheduler action requests.
//!
//! Client side: [`time_range::resolve`] turns a host address into an absolute range,
//! [`params::build_report_request`] assembles the generateReport body and
//! [`dispatch::Dispatcher`] sends it and saves the result. Backend side: the
//! [`scheduler`] module decodes, validates and re-encodes action requests.

pub mod address;
pub mod cli;
pub mod commands;
pub mod datemath;
pub mod delivery;
pub mod dispatch;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod params;
pub mod scheduler;
pub mod time_range;
pub mod util;
