/// Map loader.
///
/// ## Sources (priority order):
///   1. `general.map_file` from config.toml, if set and present
///   2. The built-in reference layout
///
/// ## Map file format (`.txt`):
///   Optional leading `# Map Name` lines (a `#` followed by text)
///   Lines: map rows, all the same width
///   Blank lines and trailing whitespace are ignored.
///
/// ## Terrain legend:
///   '*' = Wall    '.' = Open

use std::path::Path;

use tracing::{info, warn};

use crate::config::GameConfig;
use crate::domain::error::GameError;
use crate::domain::grid::GridMap;

/// Built-in 9 x 17 arena.
pub const REFERENCE_MAP: [&str; 9] = [
    "*****************",
    "*...*.....*.*...*",
    "*....*.......*..*",
    "*...*...*..*....*",
    "*.*....*....*...*",
    "*...*....*.*....*",
    "*...****.*...*..*",
    "*...*.....*.....*",
    "*****************",
];

pub const REFERENCE_NAME: &str = "Diamond Vault";

/// A loaded, validated map.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub map: GridMap,
}

/// Resolve the map for a new session.
///
/// A configured file that does not exist falls back to the built-in layout
/// with a warning. A file that exists but cannot be read or parsed is an
/// error: the player asked for that map.
pub fn load_level(config: &GameConfig) -> Result<LevelDef, GameError> {
    match &config.map_file {
        Some(path) if path.is_file() => {
            let def = load_level_file(path)?;
            info!(name = %def.name, path = %path.display(), "map loaded");
            Ok(def)
        }
        Some(path) => {
            warn!(path = %path.display(), "map file not found, using built-in map");
            reference_level()
        }
        None => reference_level(),
    }
}

pub fn reference_level() -> Result<LevelDef, GameError> {
    Ok(LevelDef {
        name: REFERENCE_NAME.to_string(),
        map: GridMap::parse(&REFERENCE_MAP)?,
    })
}

pub fn load_level_file(path: &Path) -> Result<LevelDef, GameError> {
    let content = std::fs::read_to_string(path).map_err(|source| GameError::MapIo {
        path: path.to_path_buf(),
        source,
    })?;
    let fallback_name = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    parse_level_text(&content, &fallback_name)
}

/// Parse map text. `fallback_name` is used when there is no `# Name` line.
pub fn parse_level_text(content: &str, fallback_name: &str) -> Result<LevelDef, GameError> {
    let mut name: Option<String> = None;
    let mut rows: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() { continue; }
        if rows.is_empty() && is_name_line(line) {
            if name.is_none() {
                name = Some(line[1..].trim().to_string());
            }
            continue;
        }
        rows.push(line);
    }

    Ok(LevelDef {
        name: name.unwrap_or_else(|| fallback_name.to_string()),
        map: GridMap::parse(&rows)?,
    })
}

/// `# Vault` is a name; a row of terrain never starts with `#`.
fn is_name_line(line: &str) -> bool {
    line.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;

    #[test]
    fn reference_map_is_9_by_17() {
        let def = reference_level().unwrap();
        assert_eq!(def.map.dimensions(), (9, 17));
        assert_eq!(def.name, REFERENCE_NAME);
        assert!(!def.map.is_walkable(Cell::new(0, 0)));
        assert!(def.map.is_walkable(Cell::new(1, 1)));
    }

    #[test]
    fn reference_map_border_is_wall() {
        let def = reference_level().unwrap();
        let (rows, cols) = def.map.dimensions();
        for c in 0..cols as i32 {
            assert!(!def.map.is_walkable(Cell::new(0, c)));
            assert!(!def.map.is_walkable(Cell::new(rows as i32 - 1, c)));
        }
        for r in 0..rows as i32 {
            assert!(!def.map.is_walkable(Cell::new(r, 0)));
            assert!(!def.map.is_walkable(Cell::new(r, cols as i32 - 1)));
        }
    }

    #[test]
    fn parse_with_name_and_blank_lines() {
        let text = "# Tiny Room\n\n*****\n*...*   \n*****\n\n";
        let def = parse_level_text(text, "fallback").unwrap();
        assert_eq!(def.name, "Tiny Room");
        assert_eq!(def.map.dimensions(), (3, 5));
    }

    #[test]
    fn parse_without_name_uses_fallback() {
        let def = parse_level_text("***\n*.*\n***\n", "room").unwrap();
        assert_eq!(def.name, "room");
    }

    #[test]
    fn ragged_file_is_invalid_map() {
        let err = parse_level_text("# Bad\n*****\n*..*\n*****\n", "bad").unwrap_err();
        assert!(err.is_invalid_map());
    }

    #[test]
    fn empty_file_is_invalid_map() {
        let err = parse_level_text("# Only a name\n\n", "empty").unwrap_err();
        assert!(matches!(err, GameError::EmptyMap));
    }

    #[test]
    fn missing_configured_file_falls_back() {
        let mut config = GameConfig::default();
        config.map_file = Some("/definitely/not/here/map.txt".into());
        let def = load_level(&config).unwrap();
        assert_eq!(def.name, REFERENCE_NAME);
    }

    #[test]
    fn configured_file_is_loaded() {
        let dir = std::env::temp_dir().join(format!("diamondchase-level-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("corridor.txt");
        std::fs::write(&path, "*******\n*.....*\n*******\n").unwrap();

        let mut config = GameConfig::default();
        config.map_file = Some(path.clone());
        let def = load_level(&config).unwrap();
        assert_eq!(def.name, "corridor");
        assert_eq!(def.map.dimensions(), (3, 7));

        std::fs::remove_dir_all(&dir).ok();
    }
}
