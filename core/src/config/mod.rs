//! Configuration loading
//!
//! The markup contract ([`ContractConfig`]) and report layouts
//! ([`ReportLayout`]) are plain TOML. Missing contract keys fall back to the
//! stock report markup.

mod error;

pub use error::ConfigError;
pub use report_view_types::{ContractConfig, PaneMatch};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::layout::ReportLayout;

/// Parse a contract from TOML text
pub fn parse_contract(text: &str) -> Result<ContractConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Read a contract from a TOML file
pub fn load_contract(path: &Path) -> Result<ContractConfig, ConfigError> {
    let config: ContractConfig = load_toml(path)?;
    tracing::debug!(path = %path.display(), pane_match = ?config.pane_match, strict = config.strict, "loaded contract");
    Ok(config)
}

/// Parse a report layout from TOML text
pub fn parse_layout(text: &str) -> Result<ReportLayout, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Read a report layout from a TOML file
pub fn load_layout(path: &Path) -> Result<ReportLayout, ConfigError> {
    let layout: ReportLayout = load_toml(path)?;
    tracing::debug!(path = %path.display(), datasets = layout.datasets.len(), "loaded layout");
    Ok(layout)
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_contract_is_default() {
        assert_eq!(parse_contract("").unwrap(), ContractConfig::default());
    }

    #[test]
    fn test_contract_overrides() {
        let config = parse_contract(
            r#"
            pane_match = "substring"
            strict = true
            version_select_class = "protocol"
            "#,
        )
        .unwrap();

        assert_eq!(config.pane_match, PaneMatch::Substring);
        assert!(config.strict);
        assert_eq!(config.version_select_class, "protocol");
        assert_eq!(config.dataset_class, "dataset");
    }

    #[test]
    fn test_bad_pane_match_is_rejected() {
        let err = parse_contract(r#"pane_match = "fuzzy""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_layout() {
        let layout = parse_layout(
            r#"
            [[dataset]]
            title = "read"
            panes = ["info_0", "info_1"]
            views = ["averages", "rundata"]
            active_view = "rundata"

            [[dataset.graph]]
            variant = "v3"
            src = "graphs/v3.png"

            [[dataset.graph]]
            variant = "v4.1"
            src = "graphs/v41.png"

            [[dataset]]
            panes = ["info_2"]
            "#,
        )
        .unwrap();

        assert_eq!(layout.datasets.len(), 2);
        let first = &layout.datasets[0];
        assert_eq!(first.graphs.len(), 2);
        assert_eq!(first.graphs[1].src, "graphs/v41.png");
        assert_eq!(first.active_view.as_deref(), Some("rundata"));
        assert!(layout.datasets[1].graphs.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_layout(Path::new("/nonexistent/report-view/layout.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
