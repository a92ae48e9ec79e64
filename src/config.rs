use crate::analyser::logic::types::{RenameRule, default_rename_rules};
use crate::error::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one cleaning run, usually read from a JSON file.
///
/// ```json
/// {
///   "rename_rules": [{ "source": "EXAMPLEID", "target": "example_id" }],
///   "plot_output_dir": "plots",
///   "report_path": "report.json"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScrubConfig {
    /// Header overrides; first matching rule wins
    pub rename_rules: Vec<RenameRule>,
    /// Where plot specifications go. No plots are saved when unset.
    pub plot_output_dir: Option<PathBuf>,
    /// Where the JSON report goes. The report is printed when unset.
    pub report_path: Option<PathBuf>,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            rename_rules: default_rename_rules(),
            plot_output_dir: None,
            report_path: None,
        }
    }
}

impl ScrubConfig {
    /// Appends command-line rules after the configured ones.
    pub fn with_extra_rules(mut self, rules: impl IntoIterator<Item = RenameRule>) -> Self {
        self.rename_rules.extend(rules);
        self
    }
}

/// Reads a config file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ScrubError::Config`] if the file exists but is not valid JSON
/// for [`ScrubConfig`].
pub fn load_config(path: &Path) -> Result<ScrubConfig> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ScrubConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        ScrubError::Config(format!("Invalid config file {}: {e}", path.display()))
    })
}

/// # Errors
///
/// Fails if the file cannot be written.
pub fn save_config(config: &ScrubConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_gives_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = load_config(&dir.path().join("absent.json"))?;
        assert_eq!(config, ScrubConfig::default());
        assert_eq!(
            config.rename_rules,
            vec![RenameRule::new("EXAMPLEID", "example_id")]
        );
        Ok(())
    }

    #[test]
    fn test_config_round_trip_and_partial_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("scrub.json");
        let config = ScrubConfig {
            rename_rules: vec![RenameRule::new("CUSTNO", "customer_number")],
            plot_output_dir: Some(PathBuf::from("plots")),
            report_path: None,
        };
        save_config(&config, &path)?;
        assert_eq!(load_config(&path)?, config);

        let partial = dir.path().join("partial.json");
        std::fs::write(&partial, r#"{ "report_path": "out.json" }"#)?;
        let loaded = load_config(&partial)?;
        assert_eq!(loaded.report_path, Some(PathBuf::from("out.json")));
        assert_eq!(loaded.rename_rules, default_rename_rules());
        Ok(())
    }

    #[test]
    fn test_malformed_config_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json")?;
        assert!(matches!(load_config(&path), Err(ScrubError::Config(_))));
        Ok(())
    }
}
