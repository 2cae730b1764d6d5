//! Level data for the lighting engine: tile palette, run-length tile strings,
//! and TOML level files.
#![forbid(unsafe_code)]

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use umbra_grid::{Grid, GridError};
use umbra_lighting::{Brightness, LightSource};

pub mod tile;

pub use tile::Tile;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("reading level: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing level: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("run-length tiles: {0}")]
    RunLength(String),
    #[error("unknown tile code {code:?} at index {index}")]
    UnknownTile { code: char, index: usize },
    #[error("level is {width}x{height} but has {found} tiles")]
    TileCount { width: usize, height: usize, found: usize },
    #[error("{what} at ({col}, {row}) is outside the {width}x{height} level")]
    OutOfBounds { what: &'static str, col: usize, row: usize, width: usize, height: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Expands `"3g2w"` into `"gggww"`. Counts may span several digits and
/// whitespace between runs is ignored.
pub fn decode_run_length(data: &str) -> Result<String, LevelError> {
    let mut out = String::with_capacity(data.len() * 4);
    let mut count: Option<usize> = None;
    for (i, ch) in data.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        if let Some(d) = ch.to_digit(10) {
            let n = count.unwrap_or(0);
            count = Some(
                n.checked_mul(10)
                    .and_then(|n| n.checked_add(d as usize))
                    .ok_or_else(|| LevelError::RunLength(format!("count overflows at index {i}")))?,
            );
            continue;
        }
        let n = count
            .take()
            .ok_or_else(|| LevelError::RunLength(format!("tile {ch:?} at index {i} has no count")))?;
        out.extend(std::iter::repeat_n(ch, n));
    }
    if let Some(n) = count {
        return Err(LevelError::RunLength(format!("trailing count {n} has no tile")));
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct LightSpec {
    pub col: usize,
    pub row: usize,
    pub light: Brightness,
}

impl LightSpec {
    #[inline]
    pub fn source(&self) -> LightSource {
        LightSource::new(self.light, self.col, self.row)
    }
}

fn default_player() -> LightSpec {
    LightSpec { col: 0, row: 0, light: 255 }
}

/// On-disk level description.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelFile {
    #[serde(default)]
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Run-length encoded tile codes, row-major.
    pub tiles: String,
    #[serde(default = "default_player")]
    pub player: LightSpec,
    /// Luminous entities.
    #[serde(default)]
    pub lights: Vec<LightSpec>,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub tiles: Grid<Tile>,
    pub player: LightSpec,
    pub lights: Vec<LightSpec>,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)?;
        let file: LevelFile = toml::from_str(&s)?;
        let level = Self::from_file(file)?;
        log::info!("loaded level {:?} ({}x{}) from {}", level.name, level.width(), level.height(), path.display());
        Ok(level)
    }

    pub fn from_file(file: LevelFile) -> Result<Self, LevelError> {
        let codes = decode_run_length(&file.tiles)?;
        let found = codes.chars().count();
        if found != file.width * file.height {
            return Err(LevelError::TileCount { width: file.width, height: file.height, found });
        }
        let tiles = codes
            .chars()
            .enumerate()
            .map(|(index, code)| Tile::from_code(code).ok_or(LevelError::UnknownTile { code, index }))
            .collect::<Result<Vec<_>, _>>()?;
        let tiles = Grid::from_vec(file.width, file.height, tiles)?;
        let level = Level { name: file.name, tiles, player: file.player, lights: file.lights };
        level.check_positions()?;
        Ok(level)
    }

    /// Plain tile rows, one code per tile. The player starts at (0, 0).
    pub fn from_rows(name: &str, rows: &[&str]) -> Result<Self, LevelError> {
        let mut parsed = Vec::with_capacity(rows.len());
        let mut index = 0;
        for r in rows {
            let mut row = Vec::with_capacity(r.len());
            for code in r.chars() {
                row.push(Tile::from_code(code).ok_or(LevelError::UnknownTile { code, index })?);
                index += 1;
            }
            parsed.push(row);
        }
        let tiles = Grid::from_rows(&parsed)?;
        Ok(Level { name: name.to_string(), tiles, player: default_player(), lights: Vec::new() })
    }

    fn check_positions(&self) -> Result<(), LevelError> {
        let (width, height) = self.tiles.dims();
        let specs = std::iter::once(("player", &self.player)).chain(self.lights.iter().map(|l| ("light", l)));
        for (what, l) in specs {
            if !self.tiles.in_bounds(l.col, l.row) {
                return Err(LevelError::OutOfBounds { what, col: l.col, row: l.row, width, height });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn transparency_map(&self) -> Grid<bool> {
        self.tiles.map(|t| t.is_transparent())
    }

    /// One source per luminous tile, at the tile's emission.
    pub fn static_lights(&self) -> Vec<LightSource> {
        self.tiles
            .iter()
            .filter(|(_, t)| t.is_luminous())
            .map(|((col, row), t)| LightSource::new(t.emission(), col, row))
            .collect()
    }

    /// Player first, then every luminous entity.
    pub fn dynamic_lights(&self) -> Vec<LightSource> {
        std::iter::once(&self.player).chain(self.lights.iter()).map(LightSpec::source).collect()
    }

    /// Moves the player; the position must be inside the level.
    pub fn place_player(&mut self, col: usize, row: usize) -> Result<(), LevelError> {
        if !self.tiles.in_bounds(col, row) {
            return Err(LevelError::OutOfBounds {
                what: "player",
                col,
                row,
                width: self.width(),
                height: self.height(),
            });
        }
        self.player.col = col;
        self.player.row = row;
        Ok(())
    }
}
