use anyhow::{bail, Result};
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::bindings;
use crate::bootstrap;
use crate::cli::RunArgs;
use crate::paths::AppPaths;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let loaded = bootstrap::load_config(args.config.as_deref(), &paths)?;
    let config = bindings::renderer_config(&loaded, &args)?;

    if config.images.is_empty() {
        bail!(
            "no gallery images; pass image files or directories, or list them under [gallery] in {}",
            paths.config_file().display()
        );
    }

    tracing::info!(
        images = config.images.len(),
        width = config.surface_size.0,
        height = config.surface_size.1,
        "starting scrollfade"
    );

    let mut renderer = Renderer::new(config);
    renderer.run()
}
