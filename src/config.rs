/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub spawn: SpawnConfig,
    pub gamepad: GamepadConfig,
    pub map_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    /// Problems met while loading; logged once tracing is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct SpawnConfig {
    pub seed: Option<u64>,   // fixed seed = same spawn every game
    pub max_attempts: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
    pub restart: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    spawn: TomlSpawn,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    map_file: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 100 }
fn default_max_attempts() -> u32 { 1000 }

fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn { seed: None, max_attempts: default_max_attempts() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            quit: default_quit(),
            restart: default_restart(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[], Vec::new())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home, (4) system data directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        GameConfig::from_toml(toml_cfg, &search_dirs, warnings)
    }

    /// Parse a config document directly (no file search, relative paths
    /// stay relative).
    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(toml_cfg, &[], Vec::new()))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf], warnings: Vec<String>) -> Self {
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            },
            spawn: SpawnConfig {
                seed: toml_cfg.spawn.seed,
                max_attempts: toml_cfg.spawn.max_attempts,
            },
            gamepad: GamepadConfig {
                quit: toml_cfg.gamepad.quit,
                restart: toml_cfg.gamepad.restart,
            },
            map_file: toml_cfg.general.map_file.map(|p| resolve_path(&p, search_dirs)),
            // Log files are created, not searched for.
            log_file: toml_cfg.general.log_file.map(PathBuf::from),
            warnings,
        }
    }
}

/// Absolute paths are used as-is. Relative paths are looked up in the
/// candidate dirs; if none has the file, the path stays relative to CWD.
fn resolve_path(path: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return p;
    }
    search_dirs.iter()
        .map(|d| d.join(path))
        .find(|candidate| candidate.exists())
        .unwrap_or(p)
}

/// Where `config.toml` and relative map paths are looked up, in order:
/// the executable's directory (symlinks resolved), CWD,
/// `~/.local/share/diamondchase`, `/usr/share/diamondchase`.
/// The two data dirs only count if they exist. Duplicates are dropped.
fn candidate_dirs() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|exe| exe.parent().map(PathBuf::from));
    let cwd = std::env::current_dir().ok();
    let data_dirs = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/diamondchase"))
        .into_iter()
        .chain([PathBuf::from("/usr/share/diamondchase")])
        .filter(|d| d.is_dir());

    let mut dirs: Vec<PathBuf> = Vec::new();
    for dir in exe_dir.into_iter().chain(cwd).chain(data_dirs) {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warnings.push(format!("{}: parse error, using defaults: {e}", path.display()));
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    TomlConfig::default()
}
