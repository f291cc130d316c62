//! Per-account storage rollup for makofind.
//!
//! Objects on a storage node live at `/manta/<account>/<object>` (or
//! `/manta/v2/<owner>/...` for the newer layout). This crate walks such a tree
//! with the same streaming walker as the manifest and sums logical bytes and
//! object counts per account, then renders them as Prometheus gauges.
//!
//! ```rust,no_run
//! use std::time::Instant;
//!
//! use makofind_rollup::{RollupConfig, RollupVisitor};
//! use makofind_walk::{Driver, Reporter, WalkConfig, Walker};
//!
//! let config = RollupConfig::default();
//! let start = Instant::now();
//! let mut visitor = RollupVisitor::new(&config);
//! let mut driver = Driver::new(Walker::new(WalkConfig::default()), Reporter::stderr("mako-rollup"));
//! driver.run(&[&config.base], &mut visitor);
//!
//! let report = visitor.into_report(start.elapsed(), chrono::Utc::now());
//! print!("{}", report.to_prometheus(&config.metric_prefix));
//! ```

mod account;
mod rollup;

pub use account::account_of;
pub use rollup::{
    AccountUsage, RollupConfig, RollupConfigBuilder, RollupReport, RollupVisitor, Usage,
};
