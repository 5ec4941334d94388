use std::io::Write;

use anyhow::{Context, Result};
use renderer::RendererConfig;

use crate::bootstrap::LoadedConfig;

/// Prints where the configuration came from and what a run would use.
pub fn report<W: Write>(
    out: &mut W,
    loaded: &LoadedConfig,
    config: &RendererConfig,
) -> Result<()> {
    match &loaded.path {
        Some(path) => writeln!(out, "config: {}", path.display())?,
        None => writeln!(out, "config: (none, using defaults)")?,
    }

    writeln!(out, "images: {}", config.images.len())?;
    for (index, image) in config.images.iter().enumerate() {
        writeln!(out, "  {index:>3}  {}", image.display())?;
    }

    let params = &config.transition;
    writeln!(out, "transition:")?;
    writeln!(out, "  friction       = {}", params.friction)?;
    writeln!(out, "  pull           = {}", params.pull)?;
    writeln!(out, "  snap_tolerance = {}", params.snap_tolerance)?;
    writeln!(out, "  sensitivity    = {}", params.sensitivity)?;
    writeln!(out, "  wrap           = {}", params.wrap)?;

    writeln!(out, "display:")?;
    writeln!(
        out,
        "  size           = {}x{}",
        config.surface_size.0, config.surface_size.1
    )?;
    writeln!(out, "  fullscreen     = {}", config.fullscreen)?;
    writeln!(out, "  antialias      = {:?}", config.antialiasing)?;
    writeln!(out, "  color_space    = {:?}", config.color_space)?;
    match &config.shader {
        Some(shader) => writeln!(out, "  shader         = {}", shader.display())?,
        None => writeln!(out, "  shader         = (built-in cross-fade)")?,
    }
    writeln!(
        out,
        "  acceleration   = [{}, {}]",
        config.acceleration[0], config.acceleration[1]
    )?;

    out.flush().context("failed to flush inspect output")
}
