//! Configuration loading for search and WKT defaults.
//!
//! ```toml
//! [search]
//! default_radius_km = 50.0
//! default_limit = 20
//!
//! [wkt]
//! precision = 4
//! ```

use crate::proximity::DEFAULT_RADIUS_KM;
use crate::wkt::{DEFAULT_WKT_PRECISION, MAX_WKT_PRECISION};
use crate::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_CANDIDATES: [&str; 3] = [".bookax-geo.toml", "bookax-geo.toml", ".config/bookax-geo.toml"];

/// Root configuration schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub wkt: WktConfig,
}

/// Proximity search defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius used when a query does not give one
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Maximum results when a query does not give a limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            default_limit: default_limit(),
        }
    }
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_limit() -> usize {
    20
}

/// WKT output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WktConfig {
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for WktConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

fn default_precision() -> usize {
    DEFAULT_WKT_PRECISION
}

impl GeoConfig {
    /// Load configuration from a file path, a standard location, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(find_config_file) {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeoError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            GeoError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded geo config");
        Ok(config)
    }

    /// Rejects values no search could use.
    pub fn validate(&self) -> Result<()> {
        let radius = self.search.default_radius_km;
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeoError::Config(format!(
                "search.default_radius_km must be a non-negative number, got {}",
                radius
            )));
        }
        if self.wkt.precision > MAX_WKT_PRECISION {
            return Err(GeoError::Config(format!(
                "wkt.precision must be at most {}, got {}",
                MAX_WKT_PRECISION, self.wkt.precision
            )));
        }
        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_default() {
        let config = GeoConfig::default();
        assert_eq!(config.search.default_radius_km, 50.0);
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.wkt.precision, 4);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let file = write_config("[search]\ndefault_radius_km = 10.0\n");
        let config = GeoConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.search.default_radius_km, 10.0);
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.wkt.precision, 4);
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config("[search]\ndefault_radius_km = 5.5\ndefault_limit = 3\n\n[wkt]\nprecision = 6\n");
        let config = GeoConfig::from_file(file.path()).unwrap();
        assert_eq!(config.search.default_limit, 3);
        assert_eq!(config.wkt.precision, 6);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = GeoConfig::from_file(Path::new("/nonexistent/bookax-geo.toml")).unwrap_err();
        assert!(matches!(err, GeoError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = write_config("[search\n");
        assert!(matches!(GeoConfig::from_file(file.path()), Err(GeoError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_negative_radius() {
        let file = write_config("[search]\ndefault_radius_km = -1.0\n");
        assert!(matches!(GeoConfig::from_file(file.path()), Err(GeoError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_excess_precision() {
        let mut config = GeoConfig::default();
        config.wkt.precision = 30;
        assert!(config.validate().is_err());
    }
}
