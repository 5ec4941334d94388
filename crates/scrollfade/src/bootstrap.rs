use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use galleryconfig::{GalleryConfig, ImageSource, SurfaceSize};
use tracing::{debug, info};

use crate::paths::AppPaths;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Configuration as loaded from disk, plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GalleryConfig,
    /// `None` when no file was found and defaults are in effect.
    pub path: Option<PathBuf>,
    /// Directory relative config paths are resolved against.
    pub base: PathBuf,
}

/// Loads `explicit` if given (it must exist), otherwise the default
/// `gallery.toml` in the config directory when present, otherwise defaults.
pub fn load_config(explicit: Option<&Path>, paths: &AppPaths) -> Result<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            Some(path.to_path_buf())
        }
        None => {
            let default = paths.config_file();
            if default.is_file() {
                Some(default)
            } else {
                debug!(path = %default.display(), "no gallery config found; using defaults");
                None
            }
        }
    };

    match candidate {
        Some(path) => {
            let config = GalleryConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            info!(path = %path.display(), "loaded gallery config");
            Ok(LoadedConfig {
                config,
                path: Some(path),
                base,
            })
        }
        None => Ok(LoadedConfig {
            config: GalleryConfig {
                version: 1,
                ..GalleryConfig::default()
            },
            path: None,
            base: PathBuf::from("."),
        }),
    }
}

/// Turns command-line paths into image sources: directories are expanded,
/// everything else is taken as a single image.
pub fn cli_sources(paths: &[PathBuf]) -> Vec<ImageSource> {
    paths
        .iter()
        .map(|path| {
            if path.is_dir() {
                ImageSource::Directory(path.clone())
            } else {
                ImageSource::File(path.clone())
            }
        })
        .collect()
}

/// Flattens sources into the ordered list of gallery image files.
pub fn collect_images(sources: &[ImageSource]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for source in sources {
        match source {
            ImageSource::File(path) => images.push(path.clone()),
            ImageSource::Directory(dir) => images.extend(load_sorted_image_paths(dir)?),
        }
    }
    Ok(images)
}

/// Image files directly inside `dir`, sorted by file name.
pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read image directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        bail!("no image files found in directory {}", dir.display());
    }
    debug!(dir = %dir.display(), count = paths.len(), "expanded image directory");
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn parse_surface_size(raw: &str) -> Result<(u32, u32)> {
    let size: SurfaceSize = raw
        .parse()
        .map_err(|err| anyhow!("invalid surface size '{raw}': {err}"))?;
    Ok((size.width, size.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn directory_listing_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.JPG"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = load_sorted_image_paths(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.JPG", "b.png"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("readme.md"));
        assert!(load_sorted_image_paths(dir.path()).is_err());
    }

    #[test]
    fn sources_keep_file_order_before_directory_contents() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("2.png"));
        touch(&dir.path().join("1.png"));
        let sources = vec![
            ImageSource::File(PathBuf::from("cover.jpg")),
            ImageSource::Directory(dir.path().to_path_buf()),
        ];
        let images = collect_images(&sources).unwrap();
        assert_eq!(
            images,
            vec![
                PathBuf::from("cover.jpg"),
                dir.path().join("1.png"),
                dir.path().join("2.png"),
            ]
        );
    }

    #[test]
    fn missing_default_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::from_raw(dir.path().to_path_buf());
        let loaded = load_config(None, &paths).unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.config.version, 1);
        assert!(loaded.config.gallery.is_none());
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::from_raw(dir.path().to_path_buf());
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing), &paths).is_err());
    }

    #[test]
    fn config_paths_resolve_against_config_location() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("gallery.toml");
        fs::write(
            &config_path,
            "version = 1\n[gallery]\nimages = [\"images/1.jpg\"]\n",
        )
        .unwrap();
        let paths = AppPaths::from_raw(dir.path().to_path_buf());

        let loaded = load_config(None, &paths).unwrap();
        assert_eq!(loaded.path.as_deref(), Some(config_path.as_path()));
        assert_eq!(
            loaded.config.image_sources(&loaded.base),
            vec![ImageSource::File(dir.path().join("images/1.jpg"))]
        );
    }

    #[test]
    fn surface_size_parses() {
        assert_eq!(parse_surface_size("1920x1080").unwrap(), (1920, 1080));
        assert!(parse_surface_size("0x10").is_err());
        assert!(parse_surface_size("wide").is_err());
    }
}
