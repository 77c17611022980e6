use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ember_tracer::{RenderConfig, ShadingModel, TirPolicy};
use log::LevelFilter;

/// Log levels selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shading {
    Flat,
    Gouraud,
    Phong,
}

impl From<Shading> for ShadingModel {
    fn from(shading: Shading) -> Self {
        match shading {
            Shading::Flat => ShadingModel::Flat,
            Shading::Gouraud => ShadingModel::Gouraud,
            Shading::Phong => ShadingModel::Phong,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Tir {
    Reflect,
    Absorb,
}

impl From<Tir> for TirPolicy {
    fn from(tir: Tir) -> Self {
        match tir {
            Tir::Reflect => TirPolicy::Reflect,
            Tir::Absorb => TirPolicy::Absorb,
        }
    }
}

/// Built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Cornell box with a mirror block and a glass block
    Cornell,
    /// A single smooth sphere, for comparing shading models
    Sphere,
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Whitted-style triangle ray tracer")]
pub struct Args {
    /// JSON render settings; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scene to render
    #[arg(long, value_enum, default_value = "cornell")]
    pub scene: SceneKind,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Shading model for directly lit surfaces
    #[arg(long, value_enum)]
    pub shading: Option<Shading>,

    /// Average six ceiling light points into soft shadows
    #[arg(long)]
    pub soft: bool,

    /// Total internal reflection handling
    #[arg(long, value_enum)]
    pub tir: Option<Tir>,

    /// Number of orbit frames to render
    #[arg(short, long, default_value = "1")]
    pub frames: u32,

    /// Render buckets in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Bucket size for parallel rendering
    #[arg(long, default_value = "32")]
    pub bucket_size: u32,

    /// Texture image for the Cornell box floor
    #[arg(long)]
    pub floor_texture: Option<PathBuf>,

    /// Directory with right, left, up, down, front and back cube map images
    #[arg(long)]
    pub environment: Option<PathBuf>,

    /// Directory that receives the PNG frames
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides on top of `config`.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(shading) = self.shading {
            config.shading = shading.into();
        }
        if let Some(tir) = self.tir {
            config.tir = tir.into();
        }
        if self.soft {
            let soft = RenderConfig::soft_shadows();
            config.lights = soft.lights;
            config.shadow_epsilon = soft.shadow_epsilon;
        }
    }
}
