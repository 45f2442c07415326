//! JSON configuration for a render run

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::BlockPosition;
use crate::error::{Error, Result};
use crate::render::{DecodePolicy, RenderOptions, Viewport, ViewportMode};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Config file as written by the user. Every key except the tuning ones at
/// the bottom is required.
#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    map_file: PathBuf,
    output: PathBuf,
    whole_map: bool,
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
    use_relative_coord: bool,
    spawn_abs_x: i32,
    spawn_abs_z: i32,
    #[serde(default)]
    threads: Option<usize>,
    #[serde(default)]
    skip_malformed: bool,
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub output_path: PathBuf,
    pub whole_map: bool,
    /// Bounds in absolute block coordinates, spawn offset already applied
    pub map_bounds: Viewport,
    pub threads: Option<usize>,
    pub skip_malformed: bool,
}

impl Config {
    /// Read and validate a config file, including that the map database exists
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Config(format!("config file not found: {}", path.display())));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        if !config.db_path.is_file() {
            return Err(Error::Config(format!(
                "worldmap database file not found: {}",
                config.db_path.display()
            )));
        }
        Ok(config)
    }

    /// Parse and validate config text. Does not touch the filesystem.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        raw.validate()?;

        let (dx, dz) = if raw.use_relative_coord {
            (raw.spawn_abs_x, raw.spawn_abs_z)
        } else {
            (0, 0)
        };
        let map_bounds = Viewport::new(
            BlockPosition::new(raw.min_x, raw.min_z).offset(dx, dz),
            BlockPosition::new(raw.max_x, raw.max_z).offset(dx, dz),
        )?;

        Ok(Self {
            db_path: raw.map_file,
            output_path: raw.output,
            whole_map: raw.whole_map,
            map_bounds,
            threads: raw.threads,
            skip_malformed: raw.skip_malformed,
        })
    }

    pub fn viewport_mode(&self) -> ViewportMode {
        if self.whole_map {
            ViewportMode::WholeMap
        } else {
            ViewportMode::Explicit(self.map_bounds)
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let policy = if self.skip_malformed {
            DecodePolicy::SkipMalformed
        } else {
            DecodePolicy::FailFast
        };
        RenderOptions { policy, threads: self.threads }
    }
}

impl RawConfig {
    fn validate(&self) -> Result<()> {
        if self.use_relative_coord {
            if self.spawn_abs_x < 0 || self.spawn_abs_z < 0 {
                return Err(Error::Config(
                    "spawn absolute coordinates must be non-negative".into(),
                ));
            }
        } else if [self.min_x, self.max_x, self.min_z, self.max_z].iter().any(|&c| c < 0) {
            return Err(Error::Config(
                "coordinates must be non-negative when using absolute coordinates".into(),
            ));
        }

        if self.min_x >= self.max_x || self.min_z >= self.max_z {
            return Err(Error::Config(
                "invalid map bounds: min_x < max_x and min_z < max_z required".into(),
            ));
        }

        if self.threads == Some(0) {
            return Err(Error::Config("threads must be at least 1".into()));
        }

        // Relative bounds are shifted by spawn; make sure that stays in i32
        let shifted = [
            (self.min_x, self.spawn_abs_x),
            (self.max_x, self.spawn_abs_x),
            (self.min_z, self.spawn_abs_z),
            (self.max_z, self.spawn_abs_z),
        ];
        if self.use_relative_coord && shifted.iter().any(|&(c, s)| c.checked_add(s).is_none()) {
            return Err(Error::Config("bounds overflow after adding spawn offset".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSOLUTE: &str = r#"{
        "map_file": "world.db",
        "output": "map.png",
        "whole_map": false,
        "min_x": 100, "max_x": 300,
        "min_z": 50, "max_z": 150,
        "use_relative_coord": false,
        "spawn_abs_x": 0, "spawn_abs_z": 0
    }"#;

    fn with(key: &str, value: &str) -> String {
        let mut v: serde_json::Value = serde_json::from_str(ABSOLUTE).unwrap();
        v[key] = serde_json::from_str(value).unwrap();
        v.to_string()
    }

    fn config_err(text: &str) -> String {
        match Config::from_json(text) {
            Err(Error::Config(msg)) => msg,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_absolute_bounds() {
        let config = Config::from_json(ABSOLUTE).unwrap();
        assert_eq!(config.db_path, PathBuf::from("world.db"));
        assert_eq!(config.output_path, PathBuf::from("map.png"));
        assert_eq!(config.map_bounds.top_left(), BlockPosition::new(100, 50));
        assert_eq!(config.map_bounds.bottom_right(), BlockPosition::new(300, 150));
        assert_eq!(config.viewport_mode(), ViewportMode::Explicit(config.map_bounds));
        assert_eq!(config.render_options().policy, DecodePolicy::FailFast);
    }

    #[test]
    fn test_relative_bounds() {
        let mut v: serde_json::Value = serde_json::from_str(ABSOLUTE).unwrap();
        v["use_relative_coord"] = true.into();
        v["spawn_abs_x"] = 512000.into();
        v["spawn_abs_z"] = 511000.into();
        v["min_x"] = (-200).into();
        v["min_z"] = (-100).into();
        let config = Config::from_json(&v.to_string()).unwrap();
        assert_eq!(config.map_bounds.top_left(), BlockPosition::new(511800, 510900));
        assert_eq!(config.map_bounds.bottom_right(), BlockPosition::new(512300, 511150));
    }

    #[test]
    fn test_whole_map_mode() {
        let config = Config::from_json(&with("whole_map", "true")).unwrap();
        assert_eq!(config.viewport_mode(), ViewportMode::WholeMap);
    }

    #[test]
    fn test_missing_key() {
        let mut v: serde_json::Value = serde_json::from_str(ABSOLUTE).unwrap();
        v.as_object_mut().unwrap().remove("spawn_abs_z");
        assert!(config_err(&v.to_string()).contains("spawn_abs_z"));
    }

    #[test]
    fn test_negative_absolute_rejected() {
        assert!(config_err(&with("min_x", "-1")).contains("non-negative"));
    }

    #[test]
    fn test_negative_spawn_rejected() {
        let mut v: serde_json::Value = serde_json::from_str(ABSOLUTE).unwrap();
        v["use_relative_coord"] = true.into();
        v["spawn_abs_x"] = (-5).into();
        assert!(config_err(&v.to_string()).contains("spawn"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(config_err(&with("max_z", "50")).contains("invalid map bounds"));
    }

    #[test]
    fn test_tuning_keys() {
        let text = with("threads", "4");
        let mut v: serde_json::Value = serde_json::from_str(&text).unwrap();
        v["skip_malformed"] = true.into();
        let options = Config::from_json(&v.to_string()).unwrap().render_options();
        assert_eq!(options.threads, Some(4));
        assert_eq!(options.policy, DecodePolicy::SkipMalformed);
        assert!(config_err(&with("threads", "0")).contains("threads"));
    }

    #[test]
    fn test_from_file_checks_paths() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Config::from_file(&missing), Err(Error::Config(_))));

        let path = dir.path().join("config.json");
        std::fs::write(&path, ABSOLUTE).unwrap();
        // world.db does not exist relative to the test's working dir
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("database"));

        let db = dir.path().join("world.db");
        std::fs::write(&db, b"").unwrap();
        let text = with("map_file", &serde_json::to_string(&db).unwrap());
        std::fs::write(&path, text).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().db_path, db);
    }
}
