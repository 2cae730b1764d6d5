use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::{Brightness, LightingError};

/// Falloff tuning. `diagonal_dropoff` defaults to `round(dropoff * 1.4)` so a
/// diagonal step costs roughly its euclidean length.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LightingConfig {
    #[serde(default = "default_dropoff")]
    pub dropoff: Brightness,
    #[serde(default)]
    diagonal_dropoff: Option<Brightness>,
    /// Experimental 3x smoothing pass.
    #[serde(default)]
    pub upscale: bool,
}

fn default_dropoff() -> Brightness {
    35
}

#[inline]
pub fn diagonal_for(dropoff: Brightness) -> Brightness {
    (dropoff as f64 * 1.4).round() as Brightness
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self { dropoff: default_dropoff(), diagonal_dropoff: None, upscale: false }
    }
}

impl LightingConfig {
    pub fn new(dropoff: Brightness) -> Self {
        Self { dropoff, ..Self::default() }
    }

    pub fn with_diagonal(mut self, diagonal_dropoff: Brightness) -> Self {
        self.diagonal_dropoff = Some(diagonal_dropoff);
        self
    }

    pub fn with_upscale(mut self, upscale: bool) -> Self {
        self.upscale = upscale;
        self
    }

    #[inline]
    pub fn diagonal_dropoff(&self) -> Brightness {
        self.diagonal_dropoff.unwrap_or_else(|| diagonal_for(self.dropoff))
    }

    pub fn validate(&self) -> Result<(), LightingError> {
        if self.dropoff <= 0 {
            return Err(LightingError::InvalidConfig(format!("dropoff must be positive, got {}", self.dropoff)));
        }
        let diag = self.diagonal_dropoff();
        if diag <= 0 {
            return Err(LightingError::InvalidConfig(format!("diagonal_dropoff must be positive, got {diag}")));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, LightingError> {
        let cfg: LightingConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LightingError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_tuning() {
        let cfg = LightingConfig::default();
        assert_eq!(cfg.dropoff, 35);
        assert_eq!(cfg.diagonal_dropoff(), 49);
        assert!(!cfg.upscale);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        assert_eq!(LightingConfig::from_toml_str("").unwrap(), LightingConfig::default());
    }

    #[test]
    fn diagonal_tracks_dropoff_unless_set() {
        let cfg = LightingConfig::from_toml_str("dropoff = 20").unwrap();
        assert_eq!(cfg.diagonal_dropoff(), 28);
        let cfg = LightingConfig::from_toml_str("dropoff = 20\ndiagonal_dropoff = 30\nupscale = true").unwrap();
        assert_eq!(cfg.diagonal_dropoff(), 30);
        assert!(cfg.upscale);
    }

    #[test]
    fn diagonal_rounds_to_nearest() {
        assert_eq!(diagonal_for(25), 35);
        assert_eq!(diagonal_for(3), 4);
        assert_eq!(diagonal_for(8), 11);
    }

    #[test]
    fn non_positive_dropoff_is_rejected() {
        assert!(matches!(LightingConfig::from_toml_str("dropoff = 0"), Err(LightingError::InvalidConfig(_))));
        assert!(matches!(
            LightingConfig::from_toml_str("dropoff = 10\ndiagonal_dropoff = -1"),
            Err(LightingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(LightingConfig::from_toml_str("dropof = 3"), Err(LightingError::Toml(_))));
    }
}
