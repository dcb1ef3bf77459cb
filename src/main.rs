use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sphere_tracer_lib::{config::RenderConfig, renderer::Renderer};

/// Reads the render config from the path given as the first argument, or from
/// stdin when no argument is given.
fn load_config() -> anyhow::Result<(RenderConfig, PathBuf)> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = RenderConfig::load(&path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            tracing::info!(path = %path.display(), "loaded config");
            Ok((config, base_dir))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read config from stdin")?;
            let config = RenderConfig::from_json(&raw)?;
            tracing::info!("loaded config from stdin");
            Ok((config, std::env::current_dir()?))
        }
    }
}

fn run() -> anyhow::Result<()> {
    let (config, base_dir) = load_config()?;

    let scene = config
        .build_scene(&base_dir)
        .context("failed to build scene")?;
    let renderer = Renderer::new(config.camera(), config.tracer());

    let img = renderer.render(&scene, config.width, config.height);
    img.save(&config.output_path)
        .with_context(|| format!("failed to save image to {}", config.output_path))?;

    tracing::info!(output = %config.output_path, "image saved");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        tracing::error!("{:?}", e);
        std::process::exit(1);
    }
}
