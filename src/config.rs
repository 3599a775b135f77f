use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::VizError;

/// Page wiring and runtime knobs.
///
/// In the browser this is read from the `data-neuroscope` attribute on
/// `<html>`; every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Element the canvas is appended to. Must exist.
    pub mount_id: String,
    pub fiber_toggle_id: String,
    pub overlay_toggle_id: String,
    pub overlay_id: String,
    pub surgical_toggle_id: String,
    /// Fixed seed for the fiber generator; random per session when absent.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            mount_id: "viewport-3d".to_string(),
            fiber_toggle_id: "toggle-tracts".to_string(),
            overlay_toggle_id: "toggle-mri".to_string(),
            overlay_id: "mri-container".to_string(),
            surgical_toggle_id: "start-surgical".to_string(),
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl VizConfig {
    pub fn from_json(text: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Unknown level names fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let cfg = VizConfig::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.mount_id, "viewport-3d");
        assert_eq!(cfg.overlay_id, "mri-container");
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = VizConfig::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, VizError::Config(_)));
    }

    #[test]
    fn level_filter_parses_or_defaults() {
        let mut cfg = VizConfig::default();
        cfg.log_level = "debug".into();
        assert_eq!(cfg.level_filter(), LevelFilter::DEBUG);
        cfg.log_level = "loud".into();
        assert_eq!(cfg.level_filter(), LevelFilter::INFO);
    }
}
