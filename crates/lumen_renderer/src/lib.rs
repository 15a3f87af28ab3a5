//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer with textured materials, motion blur,
//! participating media and a BVH, rendered by a pool of row-band workers.

mod sampling;
mod perlin;
mod texture;
mod material;
mod hittable;
mod sphere;
mod rect;
mod cuboid;
mod instance;
mod medium;
mod bvh;
mod camera;
mod band;
mod renderer;
mod scenes;

pub use sampling::{gen_f64, gen_range, random_in_unit_disk, random_in_unit_sphere, random_unit_vector, random_vec};
pub use perlin::{Perlin, TURBULENCE_DEPTH};
pub use texture::{ImageTexture, NoiseTexture, Texture, TextureError, TextureResult};
pub use material::{Material, Scatter};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use sphere::{MovingSphere, Sphere};
pub use rect::{Plane, Rect};
pub use cuboid::Cuboid;
pub use instance::{RotateY, Translate};
pub use medium::ConstantMedium;
pub use bvh::BvhNode;
pub use camera::{Camera, CameraSettings};
pub use band::{
    clamp_worker_count, default_worker_count, partition_rows, Band, LogProgress, NoProgress, Progress,
    ProgressTracker,
};
pub use renderer::{
    color_to_rgb, height_for, linear_to_gamma, ray_color, render, render_pixel, render_with_progress,
    ImageBuffer, ImageConfig, RenderOptions,
};
pub use scenes::{
    ImageOverrides, Preset, PresetName, SceneError, SceneResult, DEFAULT_BACKGROUND, EARTH_TEXTURE,
};

/// Re-export the math vocabulary from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
