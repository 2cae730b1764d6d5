use umbra_lighting::Brightness;

/// Tile palette. Each tile has a one-letter code used in level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Open ground that glows.
    Grass,
    Void,
    Air,
    Wall,
    /// Looks like a wall but lets light through.
    Hidden,
    /// Indoor floor; grass that emits nothing.
    DarkGrass,
}

impl Tile {
    pub const ALL: [Tile; 6] = [Tile::Grass, Tile::Void, Tile::Air, Tile::Wall, Tile::Hidden, Tile::DarkGrass];

    pub fn from_code(code: char) -> Option<Tile> {
        Some(match code {
            'g' => Tile::Grass,
            'v' => Tile::Void,
            'a' => Tile::Air,
            'w' => Tile::Wall,
            'h' => Tile::Hidden,
            'i' => Tile::DarkGrass,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            Tile::Grass => 'g',
            Tile::Void => 'v',
            Tile::Air => 'a',
            Tile::Wall => 'w',
            Tile::Hidden => 'h',
            Tile::DarkGrass => 'i',
        }
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Light the tile emits on its own, zero for non-luminous tiles.
    #[inline]
    pub fn emission(self) -> Brightness {
        match self {
            Tile::Grass => 255,
            _ => 0,
        }
    }

    #[inline]
    pub fn is_luminous(self) -> bool {
        self.emission() > 0
    }

    /// Glyph for text rendering.
    pub fn glyph(self) -> char {
        match self {
            Tile::Grass => '"',
            Tile::Void => ' ',
            Tile::Air => '.',
            Tile::Wall | Tile::Hidden => '#',
            Tile::DarkGrass => ',',
        }
    }
}
