//! `lumen` - render a scene described by a config file to an image.

mod config;
mod output;
mod scene_file;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use lumen_renderer::{
    render_with_progress, Camera, CameraSettings, HittableList, ImageConfig, Preset, RenderOptions,
    DEFAULT_BACKGROUND,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::{load_camera, RenderConfig, SceneSource};
use output::{save_image, BarProgress};
use scene_file::SceneFile;

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "CPU path tracer")]
struct Args {
    /// Configuration file; relative paths inside it resolve against its directory
    #[arg(default_value = "config.txt")]
    config: PathBuf,

    /// Worker threads (defaults to the number of cores minus one)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Seed for scene generation and sampling; the same seed gives the same image
    #[arg(short, long)]
    seed: Option<u64>,

    /// Trace against the flat object list instead of a BVH
    #[arg(long)]
    no_bvh: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Output image, overriding the config file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Everything needed to start a render.
struct Job {
    world: HittableList,
    camera: CameraSettings,
    image: ImageConfig,
}

fn load_job(config: &RenderConfig, rng: &mut StdRng) -> Result<Job> {
    match &config.scene {
        SceneSource::Preset(name) => {
            log::info!("Building preset scene {}", name);
            let preset = Preset::build(*name, &config.base_dir, rng)
                .with_context(|| format!("Failed to build preset scene {}", name))?;
            Ok(Job {
                world: preset.world,
                camera: preset.camera,
                image: preset.image.apply(config.image.clone()),
            })
        }
        SceneSource::File(path) => {
            log::info!("Loading scene file {}", path.display());
            let scene = SceneFile::load(path, rng)
                .with_context(|| format!("Failed to load scene file {}", path.display()))?;
            let camera = load_camera(config.camera_file.as_deref()).context("Failed to load camera")?;
            let image = config
                .image
                .clone()
                .with_background(scene.background.unwrap_or(DEFAULT_BACKGROUND));
            Ok(Job {
                world: scene.world,
                camera,
                image,
            })
        }
    }
}

/// Level used when `RUST_LOG` is unset.
fn log_level(verbose: bool, console_debug: bool) -> LevelFilter {
    if verbose || console_debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Start the logger. `RUST_LOG` wins when set; returns whether it was.
///
/// Without it the logger passes debug records and the global max level
/// decides, so the config file can still raise it.
fn init_logging(verbose: bool) -> bool {
    let from_env = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    let mut builder = env_logger::Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    if !from_env {
        log::set_max_level(log_level(verbose, false));
    }
    from_env
}

fn main() -> Result<()> {
    let args = Args::parse();

    let from_env = init_logging(args.verbose);

    let mut config = RenderConfig::load(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    if !from_env {
        log::set_max_level(log_level(args.verbose, config.console_debug));
    }
    if config.live_window_render {
        log::warn!("live_window_render is not supported, rendering to file only");
    }
    if let Some(output) = &args.output {
        config.image = config.image.with_output(output);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("Seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let job = load_job(&config, &mut rng)?;
    log::debug!(
        "Image {}x{}, {} spp, max depth {}, {} objects",
        job.image.width,
        job.image.height,
        job.image.samples_per_pixel,
        job.image.max_depth,
        job.world.len()
    );

    let camera = Camera::new(&job.camera, job.image.aspect_ratio);
    let options = RenderOptions {
        threads: args.threads,
        seed: Some(seed),
        use_bvh: !args.no_bvh,
    };

    let progress = BarProgress::new();
    let image = render_with_progress(&camera, &job.image, job.world, &options, &progress);
    progress.finish();

    save_image(image, &job.image.output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::PresetName;
    use std::path::Path;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["lumen"]).unwrap();
        assert_eq!(args.config, Path::new("config.txt"));
        assert_eq!(args.threads, None);
        assert_eq!(args.seed, None);
        assert!(!args.no_bvh);
        assert!(!args.verbose);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "lumen", "scene/config.txt", "--threads", "4", "--seed", "7", "--no-bvh", "-v", "-o", "out.png",
        ])
        .unwrap();
        assert_eq!(args.config, Path::new("scene/config.txt"));
        assert_eq!(args.threads, Some(4));
        assert_eq!(args.seed, Some(7));
        assert!(args.no_bvh);
        assert!(args.verbose);
        assert_eq!(args.output.as_deref(), Some(Path::new("out.png")));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(false, false), LevelFilter::Info);
        assert_eq!(log_level(true, false), LevelFilter::Debug);
        assert_eq!(log_level(false, true), LevelFilter::Debug);
    }

    #[test]
    fn test_preset_job_applies_overrides() {
        let config = RenderConfig {
            scene: SceneSource::Preset(PresetName::CornellBox),
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let job = load_job(&config, &mut rng).unwrap();

        assert_eq!((job.image.width, job.image.height), (512, 512));
        assert_eq!(job.image.output, config.image.output);
        assert_eq!(job.world.len(), 8);
    }

    #[test]
    fn test_missing_scene_file_is_an_error() {
        let config = RenderConfig {
            scene: SceneSource::File(PathBuf::from("no/such/scene.txt")),
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(load_job(&config, &mut rng).is_err());
    }
}
