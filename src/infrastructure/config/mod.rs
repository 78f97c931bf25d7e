//! Configuration modules.

pub mod constraints;
pub mod logging;
pub mod service;
pub mod settings;

pub use constraints::ConstraintOverrideConfig;
pub use logging::LoggingConfig;
pub use service::{DepositConfig, FillTrackerConfig};
pub use settings::Config;
