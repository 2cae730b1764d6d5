//! Tile light propagation, per-frame brightness maps and the darkness overlay.
#![forbid(unsafe_code)]

use thiserror::Error;
use umbra_grid::GridError;

pub mod config;
pub mod engine;
pub mod propagate;
pub mod shadow;
pub mod upscale;

pub use config::LightingConfig;
pub use engine::LightingEngine;
pub use propagate::Propagator;
pub use shadow::{ShadowMap, overlay_alpha};
pub use umbra_grid::Grid;
pub use upscale::{UPSCALE, Upscaler, upscale};

/// Light level of a tile. Not clamped: overlapping sources may exceed [`FULL_BRIGHTNESS`].
pub type Brightness = i32;

/// Tiles at or above this level get no darkness overlay.
pub const FULL_BRIGHTNESS: Brightness = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LightSource {
    pub intensity: Brightness,
    pub col: usize,
    pub row: usize,
}

impl LightSource {
    #[inline]
    pub const fn new(intensity: Brightness, col: usize, row: usize) -> Self {
        Self { intensity, col, row }
    }
}

#[derive(Debug, Error)]
pub enum LightingError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("transparency map is {found_width}x{found_height}, level is {width}x{height}")]
    DimensionMismatch { width: usize, height: usize, found_width: usize, found_height: usize },
    #[error("light source at ({col}, {row}) is outside the {width}x{height} map")]
    SourceOutOfBounds { col: usize, row: usize, width: usize, height: usize },
    #[error("invalid lighting config: {0}")]
    InvalidConfig(String),
    #[error("reading lighting config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing lighting config: {0}")]
    Toml(#[from] toml::de::Error),
}
