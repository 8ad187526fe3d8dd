//! Command handlers: bridge CLI args -> core calls -> output formatting.

pub mod alarms;
pub mod config_cmd;
pub mod util;
