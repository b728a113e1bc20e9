//! Interactive setup wizard for first-time configuration
//!
//! Asks where the session database and extracted media should live, then
//! writes the configuration file.

use super::CuratrConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

fn prompt_path(prompt: &str, default: &std::path::Path) -> Result<PathBuf, ConfigError> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;
    Ok(PathBuf::from(answer))
}

/// Interactive first-time setup - prompts for the session and media locations
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
pub fn first_time_setup() -> Result<CuratrConfig, ConfigError> {
    println!("Welcome to curatr! Let's choose where your dataset lives.\n");

    let data_dir = CuratrConfig::data_dir()?;
    let session_path = prompt_path("Session location", &data_dir.join("session"))?;
    let media_dir = prompt_path("Extracted media location", &data_dir.join("media"))?;

    let config = CuratrConfig {
        session_path: Some(session_path),
        media_dir: Some(media_dir),
        ..CuratrConfig::default()
    };
    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
