use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::pipeline::PipelineError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonthlyConfig {
    pub template: PathBuf,
    pub output: PathBuf,
    pub preserve_existing: bool,
}

impl Default for MonthlyConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("monthlyjune2025.xlsx"),
            output: PathBuf::from("filled_monthly_report.csv"),
            preserve_existing: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Prefix of the default statistics file name, `total_` -> `total_a1.csv`.
    pub output_prefix: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            output_prefix: "total_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub monthly: MonthlyConfig,
    pub stats: StatsConfig,
}

impl AppConfig {
    /// Read a TOML config file, or fall back to built-in defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let cfg: AppConfig = toml::from_str(&contents)
            .map_err(|e| PipelineError::Config(format!("invalid {}: {e}", path.display())))?;
        Ok(cfg)
    }

    /// Default statistics output for a device export: `<dir>/total_<stem>.csv`.
    pub fn default_stats_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        input.with_file_name(format!("{}{stem}.csv", self.stats.output_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.monthly.template, Path::new("monthlyjune2025.xlsx"));
        assert_eq!(cfg.monthly.output, Path::new("filled_monthly_report.csv"));
        assert!(cfg.monthly.preserve_existing);
        assert_eq!(cfg.stats.output_prefix, "total_");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdu-report.toml");
        fs::write(&path, "[monthly]\ntemplate = \"july.xlsx\"\npreserve_existing = false\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.monthly.template, Path::new("july.xlsx"));
        assert!(!cfg.monthly.preserve_existing);
        assert_eq!(cfg.monthly.output, Path::new("filled_monthly_report.csv"));
        assert_eq!(cfg.stats, StatsConfig::default());
    }

    #[test]
    fn bad_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[monthly\n").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(PipelineError::Config(_))));
        assert!(matches!(
            AppConfig::load(Some(&dir.path().join("absent.toml"))),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn stats_path_sits_next_to_input() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.default_stats_path(Path::new("exports/A1.xlsx")),
            Path::new("exports/total_a1.csv")
        );
        assert_eq!(cfg.default_stats_path(Path::new("B2.xlsx")), Path::new("total_b2.csv"));
    }
}
