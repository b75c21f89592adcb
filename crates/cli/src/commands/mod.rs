pub mod ask;
pub mod init;
pub mod serve;
pub mod tasks;

use std::path::Path;
use taskpilot_config::AppConfig;

/// Load config for a command, turning the error into a readable message.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}").into())
}
