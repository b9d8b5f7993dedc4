pub mod cli;
pub mod config;
pub mod error;
pub mod k8s;
pub mod metrics;
pub mod server;

pub use error::{HarnessError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
