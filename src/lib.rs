//! Stat Explorer - CSV distribution charts & hypothesis tests
//!
//! Upload a CSV, impute missing numbers with column medians, chart two
//! selected columns and run a chi-square or two-sample t-test against a
//! chosen significance level.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod messages;
pub mod session;
pub mod stats;

pub use config::AppConfig;
pub use session::{AnalysisView, LoadedView, Session, SessionView};
