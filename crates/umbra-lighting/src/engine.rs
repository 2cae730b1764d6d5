use umbra_grid::Grid;

use crate::{
    Brightness, LightSource, LightingConfig, LightingError, Propagator, ShadowMap, Upscaler,
};

/// Per-level lighting state: transparency, baked base light from static
/// sources, and the buffers reused by each frame.
#[derive(Debug)]
pub struct LightingEngine {
    config: LightingConfig,
    propagator: Propagator,
    transparency: Grid<bool>,
    base: Grid<Brightness>,
    static_sources: Vec<LightSource>,
    upscaler: Upscaler,
}

impl LightingEngine {
    /// Engine for a level; equivalent to `configure` on a fresh instance.
    pub fn new(
        config: LightingConfig,
        transparency: Grid<bool>,
        level_width: usize,
        level_height: usize,
        static_sources: &[LightSource],
    ) -> Result<Self, LightingError> {
        config.validate()?;
        let propagator = Propagator::new(config.dropoff, config.diagonal_dropoff());
        let base = Grid::filled(transparency.width(), transparency.height(), 0)?;
        let upscaler = Upscaler::new(transparency.width(), transparency.height())?;
        let mut engine = Self {
            config,
            propagator,
            transparency,
            base,
            static_sources: static_sources.to_vec(),
            upscaler,
        };
        engine.bake(level_width, level_height, static_sources)?;
        Ok(engine)
    }

    /// Replaces all level state and rebakes base lighting. Call on every level
    /// load or reload. On error the previous state is kept.
    pub fn configure(
        &mut self,
        transparency: Grid<bool>,
        level_width: usize,
        level_height: usize,
        static_sources: &[LightSource],
    ) -> Result<(), LightingError> {
        let fresh = Self::new(self.config.clone(), transparency, level_width, level_height, static_sources)?;
        *self = fresh;
        Ok(())
    }

    /// Retunes falloff for the current level and rebakes base lighting.
    pub fn set_config(&mut self, config: LightingConfig) -> Result<(), LightingError> {
        let (w, h) = self.transparency.dims();
        let fresh = Self::new(config, self.transparency.clone(), w, h, &self.static_sources)?;
        *self = fresh;
        Ok(())
    }

    fn bake(&mut self, level_width: usize, level_height: usize, static_sources: &[LightSource]) -> Result<(), LightingError> {
        let (tw, th) = self.transparency.dims();
        if (tw, th) != (level_width, level_height) {
            return Err(LightingError::DimensionMismatch {
                width: level_width,
                height: level_height,
                found_width: tw,
                found_height: th,
            });
        }
        self.propagator.flood_all(&mut self.base, &self.transparency, static_sources)?;
        log::debug!(
            "baked base lighting {}x{} from {} static source(s), dropoff={} diagonal={}",
            tw,
            th,
            static_sources.len(),
            self.propagator.dropoff(),
            self.propagator.diagonal_dropoff()
        );
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    #[inline]
    pub fn transparency(&self) -> &Grid<bool> {
        &self.transparency
    }

    #[inline]
    pub fn base(&self) -> &Grid<Brightness> {
        &self.base
    }

    pub fn static_sources(&self) -> &[LightSource] {
        &self.static_sources
    }

    pub fn dims(&self) -> (usize, usize) {
        self.base.dims()
    }

    /// Base lighting plus `dynamic_sources`. The base map is left untouched.
    pub fn generate_frame(&mut self, dynamic_sources: &[LightSource]) -> Result<Grid<Brightness>, LightingError> {
        let mut frame = self.base.clone();
        self.propagator.flood_all(&mut frame, &self.transparency, dynamic_sources)?;
        log::trace!("frame lit with {} dynamic source(s)", dynamic_sources.len());
        Ok(frame)
    }

    /// Upscales into the engine's reused buffer.
    pub fn upscale(&mut self, frame: &Grid<Brightness>) -> &Grid<Option<Brightness>> {
        self.upscaler.upscale(frame)
    }

    /// Frame ready for the renderer, upscaled when the config asks for it.
    pub fn shadow_map(&mut self, dynamic_sources: &[LightSource]) -> Result<ShadowMap, LightingError> {
        let frame = self.generate_frame(dynamic_sources)?;
        if self.config.upscale {
            Ok(ShadowMap::from_upscaled(self.upscale(&frame).clone()))
        } else {
            Ok(ShadowMap::from_frame(&frame))
        }
    }
}
