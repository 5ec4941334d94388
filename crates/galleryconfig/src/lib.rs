use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// File name looked up inside a config directory.
pub const CONFIG_FILE_NAME: &str = "gallery.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<GallerySection>,
    #[serde(default)]
    pub transition: TransitionSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GallerySection {
    #[serde(default)]
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionSection {
    #[serde(default = "default_friction")]
    pub friction: f64,
    #[serde(default = "default_pull")]
    pub pull: f64,
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(default)]
    pub wrap: WrapSetting,
}

impl Default for TransitionSection {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            pull: default_pull(),
            snap_tolerance: default_snap_tolerance(),
            sensitivity: default_sensitivity(),
            wrap: WrapSetting::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapSetting {
    #[default]
    Inherited,
    Modular,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySection {
    #[serde(default, deserialize_with = "deserialize_size_opt")]
    pub size: Option<SurfaceSize>,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default, deserialize_with = "deserialize_antialias_opt")]
    pub antialias: Option<AntialiasSetting>,
    #[serde(default)]
    pub color_space: Option<ColorSpaceSetting>,
    #[serde(default)]
    pub shader: Option<PathBuf>,
    #[serde(default)]
    pub acceleration: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpaceSetting {
    Auto,
    Gamma,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for SurfaceSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (w, h) = value
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|err| format!("invalid width '{w}': {err}"))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|err| format!("invalid height '{h}': {err}"))?;
        if width == 0 || height == 0 {
            return Err("surface dimensions must be greater than zero".into());
        }
        Ok(Self { width, height })
    }
}

/// One entry of the gallery, already resolved against the config location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Directory(PathBuf),
}

/// Accepts the same spellings as the `antialias` config key.
impl FromStr for AntialiasSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_antialias(raw)
    }
}

impl FromStr for ColorSpaceSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" | "default" => Ok(Self::Auto),
            "gamma" | "srgb" => Ok(Self::Gamma),
            "linear" => Ok(Self::Linear),
            other => Err(format!("invalid color space '{other}'")),
        }
    }
}

fn default_friction() -> f64 {
    0.7
}

fn default_pull() -> f64 {
    0.035
}

fn default_snap_tolerance() -> f64 {
    0.001
}

fn default_sensitivity() -> f64 {
    0.0003
}

fn deserialize_size_opt<'de, D>(deserializer: D) -> Result<Option<SurfaceSize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| value.parse().map_err(de::Error::custom))
        .transpose()
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<AntialiasSetting>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    let result = match helper {
        None => None,
        Some(Helper::Str(raw)) => Some(parse_antialias(&raw).map_err(de::Error::custom)?),
        Some(Helper::Num(value)) => {
            if value < 0 {
                return Err(de::Error::custom("antialias value must be non-negative"));
            }
            Some(parse_antialias(&value.to_string()).map_err(de::Error::custom)?)
        }
    };
    Ok(result)
}

fn parse_antialias(raw: &str) -> Result<AntialiasSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(AntialiasSetting::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(AntialiasSetting::Off),
        "2" => Ok(AntialiasSetting::Samples2),
        "4" => Ok(AntialiasSetting::Samples4),
        "8" => Ok(AntialiasSetting::Samples8),
        "16" => Ok(AntialiasSetting::Samples16),
        other => Err(format!("invalid antialias setting '{other}'")),
    }
}

impl GalleryConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: GalleryConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Gallery entries with relative paths joined onto `base`, explicit images
    /// first and the directory (if any) last.
    pub fn image_sources(&self, base: &Path) -> Vec<ImageSource> {
        let Some(gallery) = &self.gallery else {
            return Vec::new();
        };
        let mut sources: Vec<ImageSource> = gallery
            .images
            .iter()
            .map(|image| ImageSource::File(resolve(base, image)))
            .collect();
        if let Some(directory) = &gallery.directory {
            sources.push(ImageSource::Directory(resolve(base, directory)));
        }
        sources
    }

    pub fn shader_path(&self, base: &Path) -> Option<PathBuf> {
        self.display.shader.as_deref().map(|path| resolve(base, path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if let Some(gallery) = &self.gallery {
            if gallery.images.is_empty() && gallery.directory.is_none() {
                return Err(ConfigError::Invalid(
                    "[gallery] must list at least one image or a directory".into(),
                ));
            }
            if gallery
                .images
                .iter()
                .any(|image| image.as_os_str().is_empty())
            {
                return Err(ConfigError::Invalid(
                    "[gallery] contains an empty image path".into(),
                ));
            }
        }

        self.transition.validate()?;

        if let Some(acceleration) = self.display.acceleration {
            if acceleration.iter().any(|value| !value.is_finite()) {
                return Err(ConfigError::Invalid(
                    "display.acceleration values must be finite".into(),
                ));
            }
        }

        Ok(())
    }
}

impl TransitionSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid(format!(
                "transition.friction must be in [0, 1); got {}",
                self.friction
            )));
        }
        if !(0.0..=1.0).contains(&self.pull) {
            return Err(ConfigError::Invalid(format!(
                "transition.pull must be in [0, 1]; got {}",
                self.pull
            )));
        }
        if !(self.snap_tolerance > 0.0 && self.snap_tolerance.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "transition.snap_tolerance must be > 0; got {}",
                self.snap_tolerance
            )));
        }
        if !self.sensitivity.is_finite() {
            return Err(ConfigError::Invalid(
                "transition.sensitivity must be finite".into(),
            ));
        }
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
