//! Fuel farm reporting: loads the dipping and equipment CSV logs, resolves
//! their loosely-named columns, and computes the tank KPIs and grouped
//! usage tables the site dashboard shows.
pub mod cache;
pub mod columns;
pub mod config;
pub mod errors;
pub mod kpi;
pub mod loader;
pub mod output;
pub mod periods;
pub mod pipeline;
pub mod reports;
pub mod types;
pub mod util;

pub use errors::{FuelError, Result};
