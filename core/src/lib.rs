//! Core of the 4DX executive dashboard: metric model, period scaling,
//! mock and live record generation, health aggregation and drill-down.

pub mod aggregate;
pub mod auth;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod drilldown;
pub mod error;
pub mod event;
pub mod generator;
pub mod metric;
pub mod period;
pub mod refresh;
pub mod rng;
pub mod session;
pub mod source;
pub mod store;
pub mod transform;
pub mod types;
