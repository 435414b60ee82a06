//! Simulation configuration – reads/writes `~/.quarry/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted simulation configuration.  Every field has a default, so an
/// empty file (or no file at all) yields the original pursuit setup: hunter
/// "pdias" on blue chasing "lalmeida" on red at 10 Hz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Control-loop tick rate in Hz.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,

    /// Pause after a failed registry lookup, in milliseconds.
    #[serde(default = "default_recovery_pause_ms")]
    pub recovery_pause_ms: u64,

    /// Registry propagation delay in milliseconds (0 = synchronous).
    #[serde(default)]
    pub propagation_delay_ms: u64,

    /// Frame name of the controlled hunter.
    #[serde(default = "default_hunter_frame")]
    pub hunter_frame: String,

    /// Team label for the hunter.
    #[serde(default = "default_hunter_team")]
    pub hunter_team: String,

    /// Frame names of the prey agents.
    #[serde(default = "default_prey_frames")]
    pub prey_frames: Vec<String>,

    /// Team label for the prey roster.
    #[serde(default = "default_prey_team")]
    pub prey_team: String,

    /// Hunter displacement request per tick (clamped by the motion model).
    #[serde(default = "default_step_displacement")]
    pub step_displacement: f64,

    /// Hunter turn request per tick in radians (clamped by the motion model).
    #[serde(default = "default_step_turn")]
    pub step_turn: f64,
}

fn default_tick_hz() -> u32 {
    10
}
fn default_recovery_pause_ms() -> u64 {
    100
}
fn default_hunter_frame() -> String {
    "pdias".to_string()
}
fn default_hunter_team() -> String {
    "blue".to_string()
}
fn default_prey_frames() -> Vec<String> {
    vec!["lalmeida".to_string()]
}
fn default_prey_team() -> String {
    "red".to_string()
}
fn default_step_displacement() -> f64 {
    0.1
}
fn default_step_turn() -> f64 {
    -std::f64::consts::FRAC_PI_6
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            recovery_pause_ms: default_recovery_pause_ms(),
            propagation_delay_ms: 0,
            hunter_frame: default_hunter_frame(),
            hunter_team: default_hunter_team(),
            prey_frames: default_prey_frames(),
            prey_team: default_prey_team(),
            step_displacement: default_step_displacement(),
            step_turn: default_step_turn(),
        }
    }
}

/// Return the config path: `QUARRY_CONFIG` when set, otherwise
/// `~/.quarry/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(explicit) = std::env::var("QUARRY_CONFIG") {
        return PathBuf::from(explicit);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".quarry").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<SimConfig>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<SimConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: SimConfig =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `QUARRY_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `QUARRY_TICK_HZ` | `tick_hz` |
/// | `QUARRY_RECOVERY_PAUSE_MS` | `recovery_pause_ms` |
/// | `QUARRY_HUNTER_FRAME` | `hunter_frame` |
pub fn apply_env_overrides(cfg: &mut SimConfig) {
    if let Ok(v) = std::env::var("QUARRY_TICK_HZ")
        && let Ok(hz) = v.parse::<u32>()
    {
        cfg.tick_hz = hz;
    }
    if let Ok(v) = std::env::var("QUARRY_RECOVERY_PAUSE_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.recovery_pause_ms = ms;
    }
    if let Ok(v) = std::env::var("QUARRY_HUNTER_FRAME") {
        cfg.hunter_frame = v;
    }
}

/// Save the config to disk, creating `~/.quarry/` if necessary.
pub fn save(cfg: &SimConfig) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &SimConfig, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_original_pursuit() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.tick_hz, 10);
        assert_eq!(cfg.hunter_frame, "pdias");
        assert_eq!(cfg.hunter_team, "blue");
        assert_eq!(cfg.prey_frames, vec!["lalmeida".to_string()]);
        assert_eq!(cfg.prey_team, "red");
        assert!((cfg.step_displacement - 0.1).abs() < 1e-12);
        assert!((cfg.step_turn + std::f64::consts::FRAC_PI_6).abs() < 1e-12);
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = SimConfig::default();
        save_to(&cfg, &path).expect("save");

        // Assert fields that no env override can touch, so this test cannot
        // race the override tests running in parallel.
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.prey_frames, cfg.prey_frames);
        assert_eq!(loaded.prey_team, "red");
        assert!((loaded.step_displacement - 0.1).abs() < 1e-12);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "prey_team = \"green\"\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.prey_team, "green");
        assert_eq!(loaded.prey_frames, vec!["lalmeida".to_string()], "unset fields take defaults");
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn config_path_points_to_quarry_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".quarry"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn apply_env_overrides_changes_tick_rate() {
        // SAFETY: no other test touches this env var.
        unsafe { std::env::set_var("QUARRY_TICK_HZ", "25") };
        let mut cfg = SimConfig::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.tick_hz, 25);
        unsafe { std::env::remove_var("QUARRY_TICK_HZ") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_pause() {
        // SAFETY: no other test touches this env var.
        unsafe { std::env::set_var("QUARRY_RECOVERY_PAUSE_MS", "soon") };
        let mut cfg = SimConfig::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.recovery_pause_ms, 100);
        unsafe { std::env::remove_var("QUARRY_RECOVERY_PAUSE_MS") };
    }

    #[test]
    fn apply_env_overrides_changes_hunter_frame() {
        // SAFETY: no other test touches this env var.
        unsafe { std::env::set_var("QUARRY_HUNTER_FRAME", "moliveira") };
        let mut cfg = SimConfig::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.hunter_frame, "moliveira");
        unsafe { std::env::remove_var("QUARRY_HUNTER_FRAME") };
    }
}
