//! Optional toml configuration file
//!
//! ```toml
//! device = "/dev/input/event1"
//! bindings = "signal_bindings.json"
//! debounce = 150
//! ```

use crate::{bindings::DEFAULT_BINDINGS, dedup::DEFAULT_DEBOUNCE, input::DEFAULT_DEVICE};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Input device of the infrared receiver
    pub device: PathBuf,
    /// Json file with the bindings
    pub bindings: PathBuf,
    /// Debounce window in milliseconds
    pub debounce: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: PathBuf::from(DEFAULT_DEVICE),
            bindings: PathBuf::from(DEFAULT_BINDINGS),
            debounce: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn parse(path: &Path) -> Result<Config, String> {
        let contents = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

        Config::parse_text(&contents, path)
    }

    pub fn parse_text(contents: &str, filename: &Path) -> Result<Config, String> {
        toml::from_str(contents).map_err(|e| format!("{}: {e}", filename.display()))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_text("", Path::new("empty.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.device, PathBuf::from("/dev/input/event1"));
        assert_eq!(config.bindings, PathBuf::from("signal_bindings.json"));
        assert_eq!(config.debounce(), Duration::from_millis(150));
    }

    #[test]
    fn parse() {
        let config = Config::parse_text(
            r#"
            # receiver on the gpio pin
            device = "/dev/input/event3"
            debounce = 200
            "#,
            Path::new("irbind.toml"),
        )
        .unwrap();

        assert_eq!(config.device, PathBuf::from("/dev/input/event3"));
        assert_eq!(config.bindings, PathBuf::from("signal_bindings.json"));
        assert_eq!(config.debounce(), Duration::from_millis(200));
    }

    #[test]
    fn bad() {
        let e = Config::parse_text("device = 3", Path::new("bad.toml")).unwrap_err();
        assert!(e.starts_with("bad.toml: "), "{e}");

        let e = Config::parse_text("protocol = \"nec\"", Path::new("bad.toml")).unwrap_err();
        assert!(e.contains("protocol"), "{e}");

        let e = Config::parse(Path::new("/does/not/exist.toml")).unwrap_err();
        assert!(e.starts_with("/does/not/exist.toml: "), "{e}");
    }
}
