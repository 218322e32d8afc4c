/// Terrain types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so terrain semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terrain {
    Wall,
    Open,
}

impl Terrain {
    pub const WALL_CHAR: char = '*';
    pub const OPEN_CHAR: char = '.';

    /// Decode a layout character. Unknown characters are rejected so a
    /// typo in a map file never silently becomes floor.
    pub fn from_char(ch: char) -> Option<Terrain> {
        match ch {
            Self::WALL_CHAR => Some(Terrain::Wall),
            Self::OPEN_CHAR => Some(Terrain::Open),
            _ => None,
        }
    }

    /// Can an actor occupy this cell?
    pub fn is_walkable(self) -> bool {
        matches!(self, Terrain::Open)
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::Wall
    }
}
