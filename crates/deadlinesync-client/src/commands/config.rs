//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Checks the configuration without contacting Canvas.
///
/// Returns the lines to print on success.
pub fn check(config: &ClientConfig) -> ClientResult<Vec<String>> {
    let mut notes = Vec::new();

    if config.calendar.timezone.trim().is_empty() {
        return Err(ClientError::Config(
            "calendar.timezone must not be empty".to_string(),
        ));
    }

    match config.canvas {
        Some(ref canvas) => {
            let source = canvas.to_source_config()?;
            notes.push(format!("Canvas: {}", source.base_url));
        }
        None => notes.push("Canvas: not configured".to_string()),
    }

    notes.push(format!(
        "Calendar: {} ({})",
        config.calendar.ics_path_or_default().display(),
        config.calendar.timezone
    ));
    Ok(notes)
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    for line in check(config)? {
        println!("{}", line);
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path and the calendar output path.
pub fn path(config: &ClientConfig, config_path: &Path) -> ClientResult<()> {
    println!("config: {}", config_path.display());
    println!("calendar: {}", config.calendar.ics_path_or_default().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_without_canvas() {
        let notes = check(&ClientConfig::default()).unwrap();
        assert_eq!(notes[0], "Canvas: not configured");
        assert!(notes[1].contains("America/New_York"));
    }

    #[test]
    fn empty_timezone_is_rejected() {
        let mut config = ClientConfig::default();
        config.calendar.timezone = "  ".to_string();
        assert!(check(&config).is_err());
    }

    #[test]
    fn canvas_section_is_resolved() {
        let config = ClientConfig::parse(
            r#"
[canvas]
base_url = "https://school.instructure.com"
token = "plain-token"
"#,
        )
        .unwrap();
        let notes = check(&config).unwrap();
        assert_eq!(notes[0], "Canvas: https://school.instructure.com/");
    }

    #[test]
    fn canvas_section_without_token_fails() {
        let config = ClientConfig::parse(
            r#"
[canvas]
base_url = "https://school.instructure.com"
"#,
        )
        .unwrap();
        let err = check(&config).unwrap_err();
        assert!(err.to_string().contains("token is missing"));
    }
}
