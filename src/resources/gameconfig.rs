//! Game configuration.
//!
//! Settings loaded from an INI configuration file. Every value has a safe
//! default, so a missing file or key never prevents startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [canvas]
//! width = 960
//! height = 480
//!
//! [loop]
//! target_fps = 60
//! time_scale = 1.0
//!
//! [assets]
//! root = ./assets
//! catalog = ./assets/catalog.json
//! prefabs = ./assets/prefabs.json
//!
//! [debug]
//! hitboxes = false
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

/// Default safe values for startup
const DEFAULT_CANVAS_WIDTH: u32 = 960;
const DEFAULT_CANVAS_HEIGHT: u32 = 480;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_ASSET_ROOT: &str = "./assets";
const DEFAULT_CATALOG: &str = "./assets/catalog.json";
const DEFAULT_PREFABS: &str = "./assets/prefabs.json";
pub const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Target frames per second of the outer loop.
    pub target_fps: u32,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Directory texture sources are resolved against.
    pub asset_root: PathBuf,
    pub catalog_path: PathBuf,
    pub prefabs_path: PathBuf,
    /// Draw hitbox and hurtbox outlines.
    pub debug_hitboxes: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            time_scale: DEFAULT_TIME_SCALE,
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            catalog_path: PathBuf::from(DEFAULT_CATALOG),
            prefabs_path: PathBuf::from(DEFAULT_PREFABS),
            debug_hitboxes: false,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load from `config_path` if the file exists; otherwise keep defaults.
    pub fn load_or_default(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::with_path(path);
        if config.config_path.exists() {
            config.load_from_file()?;
        } else {
            info!("No config at {:?}, using defaults", config.config_path);
        }
        Ok(config)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> EngineResult<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to load config file: {}", e)))?;
        self.apply(&config);
        info!(
            "Loaded config: {}x{} canvas, fps={}, time_scale={}, hitboxes={}",
            self.canvas_width,
            self.canvas_height,
            self.target_fps,
            self.time_scale,
            self.debug_hitboxes
        );
        Ok(())
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> EngineResult<Self> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(EngineError::Config)?;
        let mut parsed = Self::new();
        parsed.apply(&config);
        Ok(parsed)
    }

    fn apply(&mut self, config: &Ini) {
        // [canvas] section
        if let Some(width) = config.getuint("canvas", "width").ok().flatten() {
            self.canvas_width = width as u32;
        }
        if let Some(height) = config.getuint("canvas", "height").ok().flatten() {
            self.canvas_height = height as u32;
        }

        // [loop] section
        if let Some(fps) = config.getuint("loop", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(scale) = config.getfloat("loop", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.asset_root = PathBuf::from(root);
        }
        if let Some(catalog) = config.get("assets", "catalog") {
            self.catalog_path = PathBuf::from(catalog);
        }
        if let Some(prefabs) = config.get("assets", "prefabs") {
            self.prefabs_path = PathBuf::from(prefabs);
        }

        // [debug] section
        if let Some(hitboxes) = config.getbool("debug", "hitboxes").ok().flatten() {
            self.debug_hitboxes = hitboxes;
        }
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> EngineResult<()> {
        let mut config = Ini::new();

        config.set("canvas", "width", Some(self.canvas_width.to_string()));
        config.set("canvas", "height", Some(self.canvas_height.to_string()));
        config.set("loop", "target_fps", Some(self.target_fps.to_string()));
        config.set("loop", "time_scale", Some(self.time_scale.to_string()));
        config.set("assets", "root", Some(path_string(&self.asset_root)));
        config.set("assets", "catalog", Some(path_string(&self.catalog_path)));
        config.set("assets", "prefabs", Some(path_string(&self.prefabs_path)));
        config.set("debug", "hitboxes", Some(self.debug_hitboxes.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Seconds per frame of the outer loop.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
