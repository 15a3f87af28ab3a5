//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with bounded depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Row bands rendered in parallel on a dedicated thread pool

use std::path::PathBuf;
use std::time::Instant;

use crate::band::{clamp_worker_count, default_worker_count, partition_rows, Band, LogProgress, Progress, ProgressTracker};
use crate::bvh::BvhNode;
use crate::camera::Camera;
use crate::hittable::{Hittable, HittableList};
use crate::sampling::gen_f64;
use image::RgbImage;
use lumen_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Rays closer than this to their origin are ignored (shadow acne).
const T_MIN: f64 = 0.001;

/// Render-wide image settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    pub aspect_ratio: f64,
    pub width: u32,
    pub height: u32,
    /// Color returned for rays that escape the scene
    pub background: Color,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub output: PathBuf,
}

impl ImageConfig {
    /// Config with the given aspect ratio and width; height is derived.
    pub fn new(aspect_ratio: f64, width: u32) -> Self {
        Self {
            aspect_ratio,
            width,
            height: height_for(width, aspect_ratio),
            ..Self::default()
        }
    }

    /// Set the width, re-deriving the height from the aspect ratio.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self.height = height_for(width, self.aspect_ratio);
        self
    }

    /// Set the aspect ratio, re-deriving the height.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.height = height_for(self.width, aspect_ratio);
        self
    }

    /// Set resolution explicitly, keeping the aspect ratio in sync.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height.max(1);
        self.aspect_ratio = width as f64 / self.height as f64;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        let aspect_ratio = 16.0 / 9.0;
        let width = 960;
        Self {
            aspect_ratio,
            width,
            height: height_for(width, aspect_ratio),
            background: Color::ZERO,
            samples_per_pixel: 16,
            max_depth: 16,
            output: PathBuf::from("render.png"),
        }
    }
}

/// `round(width / aspect_ratio)`, at least one row.
pub fn height_for(width: u32, aspect_ratio: f64) -> u32 {
    ((width as f64 / aspect_ratio).round() as u32).max(1)
}

/// Per-invocation engine switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Worker thread override; `None` uses the hardware parallelism minus one
    pub threads: Option<usize>,
    /// Base RNG seed; `None` draws a random one
    pub seed: Option<u64>,
    /// Build a BVH over the scene before rendering
    pub use_bvh: bool,
}

impl RenderOptions {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_bvh(mut self, use_bvh: bool) -> Self {
        self.use_bvh = use_bvh;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            threads: None,
            seed: None,
            use_bvh: true,
        }
    }
}

/// Render output: 8-bit RGB, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// The pixel at (x, y), y counted from the top. `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        match self.data.get(i..i + 3)? {
            &[r, g, b] => Some([r, g, b]),
            _ => None,
        }
    }

    /// Convert into an `image` buffer for encoding.
    pub fn into_rgb_image(self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data)
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating emitted light.
pub fn ray_color(
    ray: &Ray,
    world: &Hittable,
    background: Color,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY), rng) else {
        return background;
    };

    let emitted = rec.material.emitted(&rec);

    match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => {
            emitted
                + scatter.attenuation
                    * ray_color(&scatter.scattered, world, background, depth - 1, rng)
        }
        None => emitted,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a sum of `samples` radiance samples to 8-bit RGB.
///
/// Averages, gamma-corrects, clamps to `[0, 0.999]` and scales by 256.
pub fn color_to_rgb(sum: Color, samples: u32) -> [u8; 3] {
    let scale = 1.0 / samples.max(1) as f64;
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f64| (256.0 * intensity.clamp(linear_to_gamma(c * scale))) as u8;
    [to_byte(sum.x), to_byte(sum.y), to_byte(sum.z)]
}

/// Sum of `samples_per_pixel` radiance samples for the pixel at `row`
/// (from the top) and `col`.
pub fn render_pixel(
    camera: &Camera,
    world: &Hittable,
    config: &ImageConfig,
    row: u32,
    col: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let s_scale = 1.0 / (config.width.saturating_sub(1).max(1)) as f64;
    let t_scale = 1.0 / (config.height.saturating_sub(1).max(1)) as f64;
    let flipped_row = config.height.saturating_sub(1 + row) as f64;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (col as f64 + gen_f64(rng)) * s_scale;
        let t = (flipped_row + gen_f64(rng)) * t_scale;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.background, config.max_depth, rng);
    }
    pixel_color
}

/// Seed for the generator of one image row.
#[inline]
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render every row of `band` into `pixels`, which holds exactly that
/// band's bytes.
fn render_band(
    band: Band,
    pixels: &mut [u8],
    camera: &Camera,
    world: &Hittable,
    config: &ImageConfig,
    seed: u64,
    tracker: &ProgressTracker<'_>,
) {
    let row_bytes = config.width as usize * 3;
    let rows = band.rows().max(1) as f64;

    for (offset, row_pixels) in pixels.chunks_exact_mut(row_bytes.max(1)).enumerate() {
        let row = band.start_row + offset as u32;
        let mut rng = StdRng::seed_from_u64(row_seed(seed, row));

        for (col, rgb) in row_pixels.chunks_exact_mut(3).enumerate() {
            let sum = render_pixel(camera, world, config, row, col as u32, &mut rng);
            rgb.copy_from_slice(&color_to_rgb(sum, config.samples_per_pixel));
        }

        tracker.report(band.index, (offset + 1) as f64 / rows);
    }

    log::debug!(
        "Band {} finished (rows {}..{})",
        band.index,
        band.start_row,
        band.end_row
    );
}

/// Render the scene, logging progress at `info`.
pub fn render(
    camera: &Camera,
    config: &ImageConfig,
    scene: HittableList,
    options: &RenderOptions,
) -> ImageBuffer {
    render_with_progress(camera, config, scene, options, &LogProgress::default())
}

/// Render the scene, reporting progress to `progress`.
///
/// The output is fully determined by the scene, camera, config and
/// `options.seed`; the worker count only affects speed.
pub fn render_with_progress(
    camera: &Camera,
    config: &ImageConfig,
    scene: HittableList,
    options: &RenderOptions,
    progress: &dyn Progress,
) -> ImageBuffer {
    let start = Instant::now();

    let world = build_world(scene, camera, options.use_bvh);

    let workers = clamp_worker_count(
        options.threads.unwrap_or_else(default_worker_count),
        config.height,
    );
    let seed = options.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} worker(s)",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        workers
    );

    let mut image = ImageBuffer::new(config.width, config.height);
    let bands = partition_rows(config.height, workers);
    let tracker = ProgressTracker::new(bands.len(), progress);

    // Split the buffer into one disjoint slice per band
    let row_bytes = config.width as usize * 3;
    let mut jobs = Vec::with_capacity(bands.len());
    let mut rest = image.data.as_mut_slice();
    for band in &bands {
        log::debug!("Band {}: rows {}..{}", band.index, band.start_row, band.end_row);
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.rows() as usize * row_bytes);
        jobs.push((*band, head));
        rest = tail;
    }

    let run = |band: Band, pixels: &mut [u8]| {
        render_band(band, pixels, camera, &world, config, seed, &tracker)
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("lumen-band-{i}"))
        .build()
    {
        Ok(pool) => {
            let run = &run;
            pool.scope(|s| {
                for (band, pixels) in jobs {
                    s.spawn(move |_| run(band, pixels));
                }
            });
        }
        Err(err) => {
            log::warn!("Failed to start render threads ({}), rendering on the calling thread", err);
            for (band, pixels) in jobs {
                run(band, pixels);
            }
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

/// Wrap the scene in a BVH (over the camera's shutter interval) if asked to.
fn build_world(scene: HittableList, camera: &Camera, use_bvh: bool) -> Hittable {
    if !use_bvh || scene.is_empty() {
        return Hittable::List(scene);
    }

    let start = Instant::now();
    let (time0, time1) = camera.shutter();
    match BvhNode::new(scene, time0, time1) {
        Some(bvh) => {
            log::info!(
                "Built BVH over {} objects in {:.2?}",
                bvh.object_count(),
                start.elapsed()
            );
            Hittable::Bvh(bvh)
        }
        None => Hittable::List(HittableList::new()),
    }
}
