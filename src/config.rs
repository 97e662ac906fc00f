use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use log::{debug, warn};

/// Execution settings shared by the `bf` subcommands.
///
/// Resolution order is flag -> environment -> `bf.toml` -> default. The
/// defaults impose no limits: a program that never halts runs until it is
/// interrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub max_steps: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub color: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_steps: None,
            timeout_ms: None,
            color: true,
        }
    }
}

impl RunSettings {
    /// Config file, then process environment.
    pub fn load() -> Self {
        let mut settings = load_from_toml().unwrap_or_default();
        settings.apply_env(|key| env::var(key).ok());
        settings
    }

    /// Parse the `[run]` section of a `bf.toml` document.
    ///
    /// Very small hand-rolled parser: `key = value` pairs, values optionally
    /// quoted, `#` comments. Unknown keys and unparsable values are ignored.
    pub fn from_toml(content: &str) -> Self {
        let mut in_run = false;
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                in_run = line[1..line.len() - 1].trim() == "run";
                continue;
            }
            if !in_run {
                continue;
            }
            if let Some((key, val_raw)) = line.split_once('=') {
                let val_raw = val_raw.trim();
                // Accept quoted or unquoted
                let val = val_raw
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(val_raw);
                map.insert(key.trim().to_string(), val.to_string());
            }
        }

        let mut cfg = Self::default();
        cfg.apply(|key| map.get(key).cloned(), &["max_steps", "timeout_ms", "color"]);
        cfg
    }

    /// Override from `BF_MAX_STEPS`, `BF_TIMEOUT_MS` and `BF_COLOR`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply(lookup, &["BF_MAX_STEPS", "BF_TIMEOUT_MS", "BF_COLOR"]);
    }

    /// Command-line flags win over everything else.
    pub fn with_flags(mut self, max_steps: Option<u64>, timeout_ms: Option<u64>) -> Self {
        self.max_steps = max_steps.or(self.max_steps);
        self.timeout_ms = timeout_ms.or(self.timeout_ms);
        self
    }

    fn apply<F>(&mut self, lookup: F, &[steps_key, timeout_key, color_key]: &[&str; 3])
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(steps_key).and_then(|s| parse_u64(steps_key, &s)) {
            self.max_steps = Some(v);
        }
        if let Some(v) = lookup(timeout_key).and_then(|s| parse_u64(timeout_key, &s)) {
            self.timeout_ms = Some(v);
        }
        if let Some(v) = lookup(color_key).and_then(|s| parse_bool(color_key, &s)) {
            self.color = v;
        }
    }
}

fn parse_u64(key: &str, value: &str) -> Option<u64> {
    let parsed = value.trim().replace('_', "").parse::<u64>().ok();
    if parsed.is_none() {
        warn!("ignoring {key}: {value:?} is not a non-negative integer");
    }
    parsed
}

fn parse_bool(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("ignoring {key}: {value:?} is not a boolean");
            None
        }
    }
}

/// `BF_CONFIG` if set, otherwise `bf.toml` in the XDG config home.
fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<RunSettings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!("loaded settings from {}", path.display());
    Some(RunSettings::from_toml(&content))
}
