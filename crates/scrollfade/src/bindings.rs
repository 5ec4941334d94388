use anyhow::{Context, Result};
use galleryconfig::{AntialiasSetting, ColorSpaceSetting, TransitionSection, WrapSetting};
use renderer::{Antialiasing, ColorSpaceMode, RendererConfig, DEFAULT_ACCELERATION};
use transition::{TransitionParams, WrapMode};

use crate::bootstrap::{self, LoadedConfig};
use crate::cli::RunArgs;

pub fn map_wrap(setting: WrapSetting) -> WrapMode {
    match setting {
        WrapSetting::Inherited => WrapMode::Inherited,
        WrapSetting::Modular => WrapMode::Modular,
    }
}

pub fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting {
        AntialiasSetting::Auto => Antialiasing::Auto,
        AntialiasSetting::Off => Antialiasing::Off,
        AntialiasSetting::Samples2 => Antialiasing::Samples(2),
        AntialiasSetting::Samples4 => Antialiasing::Samples(4),
        AntialiasSetting::Samples8 => Antialiasing::Samples(8),
        AntialiasSetting::Samples16 => Antialiasing::Samples(16),
    }
}

pub fn map_color_space(setting: ColorSpaceSetting) -> ColorSpaceMode {
    match setting {
        ColorSpaceSetting::Auto => ColorSpaceMode::Auto,
        ColorSpaceSetting::Gamma => ColorSpaceMode::Gamma,
        ColorSpaceSetting::Linear => ColorSpaceMode::Linear,
    }
}

/// Engine tuning from the `[transition]` table with command-line overrides applied.
pub fn transition_params(
    section: &TransitionSection,
    sensitivity: Option<f64>,
    wrap: Option<WrapMode>,
) -> TransitionParams {
    TransitionParams {
        friction: section.friction,
        pull: section.pull,
        snap_tolerance: section.snap_tolerance,
        sensitivity: sensitivity.unwrap_or(section.sensitivity),
        wrap: wrap.unwrap_or_else(|| map_wrap(section.wrap)),
    }
}

/// Merges the loaded config and the command line into the renderer's
/// start-up configuration. Positional images replace the configured gallery.
pub fn renderer_config(loaded: &LoadedConfig, args: &RunArgs) -> Result<RendererConfig> {
    let config = &loaded.config;
    let display = &config.display;

    let sources = if args.images.is_empty() {
        config.image_sources(&loaded.base)
    } else {
        bootstrap::cli_sources(&args.images)
    };
    let images = bootstrap::collect_images(&sources).context("failed to resolve gallery images")?;

    let defaults = RendererConfig::default();
    let surface_size = match args.size.as_deref() {
        Some(raw) => bootstrap::parse_surface_size(raw)?,
        None => display
            .size
            .map(|size| (size.width, size.height))
            .unwrap_or(defaults.surface_size),
    };

    Ok(RendererConfig {
        surface_size,
        fullscreen: args.fullscreen || display.fullscreen,
        images,
        shader: args
            .shader
            .clone()
            .or_else(|| config.shader_path(&loaded.base)),
        antialiasing: args
            .antialias
            .or_else(|| display.antialias.map(map_antialias))
            .unwrap_or_default(),
        color_space: args
            .color_space
            .or_else(|| display.color_space.map(map_color_space))
            .unwrap_or_default(),
        transition: transition_params(&config.transition, args.sensitivity, args.wrap),
        acceleration: display.acceleration.unwrap_or(DEFAULT_ACCELERATION),
        title: defaults.title,
    })
}
