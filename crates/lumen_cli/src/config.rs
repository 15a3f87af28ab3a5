//! Render and camera configuration files.
//!
//! Both are plain `key = value` text files. Keys are case-insensitive,
//! `#` starts a comment and blank lines are skipped.
//!
//! ```text
//! aspect_ratio = 1.7778
//! image_width = 960
//! samples_per_pixel = 16
//! max_depth = 16
//! camera_configuration = camera.txt
//! scene_name = preloaded cornell_box
//! console_debug = 1
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lumen_math::{Point3, Vec3};
use lumen_renderer::{CameraSettings, ImageConfig, PresetName};
use thiserror::Error;

/// Errors that can occur while reading configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the world comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneSource {
    Preset(PresetName),
    File(PathBuf),
}

/// Everything read from the main configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub image: ImageConfig,
    pub scene: SceneSource,
    /// Camera file for scenes loaded from disk
    pub camera_file: Option<PathBuf>,
    pub console_debug: bool,
    /// Accepted for compatibility, there is no live preview window
    pub live_window_render: bool,
    /// Directory relative paths were resolved against
    pub base_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image: ImageConfig::default(),
            scene: SceneSource::Preset(PresetName::AllFeatures),
            camera_file: None,
            console_debug: false,
            live_window_render: false,
            base_dir: PathBuf::from("."),
        }
    }
}

impl RenderConfig {
    /// Read a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let base_dir = parent_dir(path);
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, &base_dir),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("Config file {} not found, using defaults", path.display());
                Ok(Self {
                    image: ImageConfig::default().with_output(base_dir.join("render.png")),
                    base_dir,
                    ..Self::default()
                })
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse configuration text, resolving file names against `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> ConfigResult<Self> {
        let mut config = Self {
            base_dir: base_dir.to_path_buf(),
            ..Self::default()
        };
        let mut aspect_ratio = config.image.aspect_ratio;
        let mut width = config.image.width;
        let mut output = PathBuf::from("render.png");

        for (line, key, value) in entries(text)? {
            match key.as_str() {
                "aspect_ratio" => aspect_ratio = parse_value(value, line)?,
                "image_width" => width = parse_value(value, line)?,
                "max_color" => {
                    // Output is always 8-bit
                    let _: u32 = parse_value(value, line)?;
                }
                "samples_per_pixel" => config.image.samples_per_pixel = parse_value(value, line)?,
                "max_depth" => config.image.max_depth = parse_value(value, line)?,
                "camera_configuration" => config.camera_file = Some(base_dir.join(value)),
                "scene_name" => config.scene = parse_scene_name(value, base_dir, line)?,
                "live_window_render" => config.live_window_render = parse_flag(value, line)?,
                "console_debug" => config.console_debug = parse_flag(value, line)?,
                "output" => output = PathBuf::from(value),
                _ => log::warn!("Ignoring unknown config key '{}' at line {}", key, line),
            }
        }

        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(ConfigError::Invalid {
                key: "aspect_ratio",
                message: format!("{} is not a positive number", aspect_ratio),
            });
        }
        if width == 0 {
            return Err(ConfigError::Invalid {
                key: "image_width",
                message: "must be at least 1".to_string(),
            });
        }

        config.image = config
            .image
            .with_aspect_ratio(aspect_ratio)
            .with_width(width)
            .with_output(base_dir.join(output));
        Ok(config)
    }
}

/// Camera used when a scene file comes without a readable camera file.
pub fn fallback_camera() -> CameraSettings {
    CameraSettings::default()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::new(0.0, 0.5, 0.0), Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
}

/// Read a camera file, falling back to [`fallback_camera`] when there is none.
pub fn load_camera(path: Option<&Path>) -> ConfigResult<CameraSettings> {
    let Some(path) = path else {
        log::warn!("No camera configuration given, using the default camera");
        return Ok(fallback_camera());
    };

    match std::fs::read_to_string(path) {
        Ok(text) => parse_camera(&text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::warn!("Camera file {} not found, using the default camera", path.display());
            Ok(fallback_camera())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse camera file text. Keys that are absent keep their defaults.
pub fn parse_camera(text: &str) -> ConfigResult<CameraSettings> {
    let mut camera = CameraSettings::default();

    for (line, key, value) in entries(text)? {
        match key.as_str() {
            "cam_position" => camera.look_from = parse_vec3(value, line)?,
            "objective_position" => camera.look_at = parse_vec3(value, line)?,
            "rotation" => camera.vup = parse_vec3(value, line)?,
            "vertical_angle" => camera.vfov = parse_value(value, line)?,
            "aperture" => camera.aperture = parse_value(value, line)?,
            "focus_distance" => camera.focus_distance = parse_value(value, line)?,
            "time_start" => camera.time_start = parse_value(value, line)?,
            "time_end" => camera.time_end = parse_value(value, line)?,
            _ => log::warn!("Ignoring unknown camera key '{}' at line {}", key, line),
        }
    }

    Ok(camera)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Split text into `(line number, lowercase key, value)` entries.
fn entries(text: &str) -> ConfigResult<Vec<(usize, String, &str)>> {
    let mut entries = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let Some((key, value)) = content.split_once('=') else {
            return Err(ConfigError::Parse {
                line,
                message: format!("expected 'key = value', got '{}'", content),
            });
        };
        entries.push((line, key.trim().to_ascii_lowercase(), value.trim()));
    }
    Ok(entries)
}

fn parse_value<T: FromStr>(value: &str, line: usize) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::Parse {
        line,
        message: format!("invalid value '{}'", value),
    })
}

fn parse_vec3(value: &str, line: usize) -> ConfigResult<Vec3> {
    let components = value
        .split_whitespace()
        .map(|token| parse_value::<f64>(token, line))
        .collect::<ConfigResult<Vec<_>>>()?;

    match components.as_slice() {
        &[x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(ConfigError::Parse {
            line,
            message: format!("expected three numbers, got '{}'", value),
        }),
    }
}

fn parse_flag(value: &str, line: usize) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Parse {
            line,
            message: format!("expected 0 or 1, got '{}'", value),
        }),
    }
}

/// `preloaded <name>` selects a built-in scene, anything else is a scene file.
fn parse_scene_name(value: &str, base_dir: &Path, line: usize) -> ConfigResult<SceneSource> {
    let mut tokens = value.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some("preloaded"), Some(name)) => name
            .parse()
            .map(SceneSource::Preset)
            .map_err(|err| ConfigError::Parse {
                line,
                message: err.to_string(),
            }),
        (Some("preloaded"), None) | (None, _) => Err(ConfigError::Parse {
            line,
            message: "missing scene name".to_string(),
        }),
        (Some(file), _) => Ok(SceneSource::File(base_dir.join(file))),
    }
}
