//! Ember - renders a built-in scene to a sequence of PNG frames.
//!
//! ```text
//! ember --scene cornell --shading phong --soft --frames 90 --parallel -o out/
//! ```

mod cli;
mod logger;
mod scenes;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ember_math::CameraState;
use ember_tracer::{render_frame, render_frame_parallel, ImageBuffer, RenderConfig};
use log::info;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RenderConfig {
            lights: vec![args.scene.default_light()],
            ..Default::default()
        },
    };
    args.apply(&mut config);
    config.validate()?;

    let mut scene = scenes::build(args.scene, args.floor_texture.as_deref())?;
    if let Some(dir) = &args.environment {
        let environment = scenes::load_environment(dir)
            .with_context(|| format!("loading environment from {}", dir.display()))?;
        scene = scene.with_environment(Arc::new(environment));
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    info!(
        "Rendering {} frame(s) of '{}' at {}x{} ({:?} shading, {} light(s))",
        args.frames,
        scene.name,
        config.width,
        config.height,
        config.shading,
        config.lights.len()
    );

    let mut camera = CameraState::default();
    let mut buffer = ImageBuffer::new(config.width, config.height);
    for frame in 0..args.frames {
        let stats = if args.parallel {
            render_frame_parallel(&scene, &mut camera, &config, args.bucket_size, &mut buffer)
        } else {
            render_frame(&scene, &mut camera, &config, &mut buffer)
        };

        let path = args.output.join(format!("frame_{frame:04}.png"));
        buffer
            .to_image()
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            "Frame {} -> {} ({}/{} pixels hit, {:.2?})",
            frame,
            path.display(),
            stats.pixels_hit,
            stats.pixels_written,
            stats.elapsed
        );
    }

    Ok(())
}
