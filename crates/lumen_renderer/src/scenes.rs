//! Built-in demo scenes.
//!
//! Each preset bundles a world, the camera that frames it and any image
//! settings it needs (resolution, quality, background).

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::bvh::BvhNode;
use crate::camera::CameraSettings;
use crate::cuboid::Cuboid;
use crate::hittable::{Hittable, HittableList};
use crate::instance::{RotateY, Translate};
use crate::material::Material;
use crate::medium::ConstantMedium;
use crate::rect::Rect;
use crate::renderer::ImageConfig;
use crate::sampling::{gen_f64, gen_range, random_vec};
use crate::sphere::{MovingSphere, Sphere};
use crate::texture::{ImageTexture, NoiseTexture, Texture, TextureError};
use lumen_math::{Color, Interval, Point3, Vec3};
use rand::RngCore;
use thiserror::Error;

/// Background every preset starts from.
pub const DEFAULT_BACKGROUND: Color = Color::new(0.7, 0.8, 1.0);

/// Image texture used by the globe presets, looked up in the assets directory.
pub const EARTH_TEXTURE: &str = "earthmap.jpg";

/// Errors that can occur while building a preset scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Unknown preset scene '{0}'")]
    UnknownPreset(String),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Names of the built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetName {
    RandomScene,
    RandomSceneWithMovingSpheres,
    TwoSpheres,
    TwoPerlinSpheres,
    Earth,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    AllFeatures,
}

impl PresetName {
    pub const ALL: [PresetName; 9] = [
        PresetName::RandomScene,
        PresetName::RandomSceneWithMovingSpheres,
        PresetName::TwoSpheres,
        PresetName::TwoPerlinSpheres,
        PresetName::Earth,
        PresetName::SimpleLight,
        PresetName::CornellBox,
        PresetName::CornellSmoke,
        PresetName::AllFeatures,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::RandomScene => "random_scene",
            PresetName::RandomSceneWithMovingSpheres => "random_scene_with_moving_spheres",
            PresetName::TwoSpheres => "two_spheres",
            PresetName::TwoPerlinSpheres => "two_perlin_spheres",
            PresetName::Earth => "earth",
            PresetName::SimpleLight => "simple_light",
            PresetName::CornellBox => "cornell_box",
            PresetName::CornellSmoke => "cornell_smoke",
            PresetName::AllFeatures => "all_features_scene",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        // Older configs spell the moving-spheres scene in camel case
        if name == "random_scene_withMovingSpheres" {
            return Ok(PresetName::RandomSceneWithMovingSpheres);
        }
        PresetName::ALL
            .into_iter()
            .find(|preset| preset.as_str() == name)
            .ok_or_else(|| SceneError::UnknownPreset(name.to_string()))
    }
}

/// Image settings a preset imposes on top of the user's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverrides {
    pub background: Color,
    /// Width and height, with the aspect ratio following from them
    pub resolution: Option<(u32, u32)>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
}

impl Default for ImageOverrides {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            resolution: None,
            samples_per_pixel: None,
            max_depth: None,
        }
    }
}

impl ImageOverrides {
    pub fn apply(&self, mut config: ImageConfig) -> ImageConfig {
        config.background = self.background;
        if let Some((width, height)) = self.resolution {
            config = config.with_resolution(width, height);
        }
        if let Some(samples) = self.samples_per_pixel {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        config
    }
}

/// A ready-to-render scene.
#[derive(Debug, Clone)]
pub struct Preset {
    pub world: HittableList,
    pub camera: CameraSettings,
    pub image: ImageOverrides,
}

impl Preset {
    /// Build the named preset. Image textures are loaded from `assets_dir`.
    pub fn build(name: PresetName, assets_dir: &Path, rng: &mut dyn RngCore) -> SceneResult<Self> {
        let look_at_origin = CameraSettings::default()
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0);
        let perlin_camera = CameraSettings::default()
            .with_position(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0), Vec3::Y)
            .with_lens(20.0, 0.0, 10.0);
        let cornell_camera = CameraSettings::default()
            .with_position(Point3::new(278.0, 278.0, -800.0), Point3::new(278.0, 278.0, 0.0), Vec3::Y)
            .with_lens(40.0, 0.0, 10.0);
        let cornell_image = ImageOverrides {
            background: Color::ZERO,
            resolution: Some((512, 512)),
            samples_per_pixel: Some(256),
            max_depth: Some(512),
        };

        let preset = match name {
            PresetName::RandomScene => Preset {
                world: random_scene(rng, false),
                camera: look_at_origin
                    .with_position(Point3::new(13.0, 2.0, 3.0), Point3::new(0.0, 0.5, 0.0), Vec3::Y)
                    .with_lens(20.0, 0.1, 10.0),
                image: ImageOverrides::default(),
            },
            PresetName::RandomSceneWithMovingSpheres => Preset {
                world: random_scene(rng, true),
                camera: look_at_origin
                    .with_position(Point3::new(13.0, 2.0, 3.0), Point3::new(0.0, 0.5, 0.0), Vec3::Y)
                    .with_lens(20.0, 0.1, 10.0)
                    .with_shutter(0.0, 1.0),
                image: ImageOverrides::default(),
            },
            PresetName::TwoSpheres => Preset {
                world: two_spheres(),
                camera: look_at_origin,
                image: ImageOverrides::default(),
            },
            PresetName::TwoPerlinSpheres => Preset {
                world: two_perlin_spheres(rng),
                camera: perlin_camera,
                image: ImageOverrides::default(),
            },
            PresetName::Earth => Preset {
                world: earth(assets_dir)?,
                camera: look_at_origin,
                image: ImageOverrides::default(),
            },
            PresetName::SimpleLight => Preset {
                world: simple_light(rng),
                camera: perlin_camera,
                image: ImageOverrides {
                    background: Color::ZERO,
                    resolution: None,
                    samples_per_pixel: Some(512),
                    max_depth: Some(128),
                },
            },
            PresetName::CornellBox => Preset {
                world: cornell_box(),
                camera: cornell_camera,
                image: cornell_image,
            },
            PresetName::CornellSmoke => Preset {
                world: cornell_smoke(),
                camera: cornell_camera,
                image: ImageOverrides {
                    background: Color::splat(0.2),
                    ..cornell_image
                },
            },
            PresetName::AllFeatures => Preset {
                world: all_features_scene(assets_dir, rng)?,
                camera: cornell_camera
                    .with_position(Point3::new(478.0, 278.0, -600.0), Point3::new(278.0, 278.0, 0.0), Vec3::Y),
                image: ImageOverrides {
                    background: Color::ZERO,
                    resolution: Some((800, 800)),
                    samples_per_pixel: Some(10240),
                    max_depth: Some(512),
                },
            },
        };

        log::debug!("Preset {} has {} top-level objects", name, preset.world.len());
        Ok(preset)
    }
}

fn lambertian(color: Color) -> Arc<Material> {
    Arc::new(Material::lambertian(color))
}

/// BVH over `list`, or the list itself when it is empty.
fn bvh_or_list(list: HittableList, time0: f64, time1: f64) -> Hittable {
    if list.is_empty() {
        return Hittable::List(list);
    }
    match BvhNode::new(list, time0, time1) {
        Some(bvh) => Hittable::Bvh(bvh),
        None => Hittable::List(HittableList::new()),
    }
}

/// Checker ground, a grid of small random spheres and three large ones.
/// With `moving`, the diffuse spheres bounce upward during the shutter.
fn random_scene(rng: &mut dyn RngCore, moving: bool) -> HittableList {
    let mut world = HittableList::new();

    let ground = if moving {
        Material::lambertian(Color::splat(0.5))
    } else {
        Material::lambertian(Texture::checker(Color::new(0.4, 0.4, 0.5), Color::splat(0.9)))
    };
    world.add(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, Arc::new(ground)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse
                let albedo = random_vec(rng, 0.0, 1.0) * random_vec(rng, 0.0, 1.0);
                let material = lambertian(albedo);
                if moving {
                    let center2 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                    world.add(MovingSphere::new((center, center2), (0.0, 1.0), 0.2, material));
                } else {
                    world.add(Sphere::new(center, 0.2, material));
                }
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_vec(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                world.add(Sphere::new(center, 0.2, Arc::new(Material::metal(albedo, fuzz))));
            } else {
                // glass
                world.add(Sphere::new(center, 0.2, Arc::new(Material::dielectric(1.5))));
            }
        }
    }

    let tint = if moving { Color::ZERO } else { Color::splat(0.1) };
    world.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Material::dielectric(1.5))));
    world.add(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, Arc::new(Material::normals(tint))));
    world.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::splat(0.7), 0.0)),
    ));

    world
}

fn two_spheres() -> HittableList {
    let checker = Arc::new(Material::lambertian(Texture::checker(
        Color::new(0.2, 0.1, 0.05),
        Color::new(0.9, 0.8, 0.7),
    )));

    let mut objects = HittableList::new();
    objects.add(Sphere::new(Point3::new(0.0, -10.0, 0.0), 10.0, checker.clone()));
    objects.add(Sphere::new(Point3::new(0.0, 10.0, 0.0), 10.0, checker));
    objects
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> HittableList {
    let ground = Texture::Noise(NoiseTexture::new(Color::ONE, 1.0, 25.0, rng));
    let marble = Texture::Noise(NoiseTexture::new(Color::new(0.9, 0.8, 0.9), 1.0, 10.0, rng));

    let mut objects = HittableList::new();
    objects.add(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::lambertian(ground)),
    ));
    objects.add(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0, Arc::new(Material::lambertian(marble))));
    objects
}

fn earth_material(assets_dir: &Path) -> SceneResult<Arc<Material>> {
    let texture = ImageTexture::open(assets_dir.join(EARTH_TEXTURE))?;
    Ok(Arc::new(Material::lambertian(Texture::Image(texture))))
}

fn earth(assets_dir: &Path) -> SceneResult<HittableList> {
    let mut objects = HittableList::new();
    objects.add(Sphere::new(Point3::ZERO, 2.0, earth_material(assets_dir)?));
    Ok(objects)
}

fn simple_light(rng: &mut dyn RngCore) -> HittableList {
    let mut objects = two_perlin_spheres(rng);

    let light = Arc::new(Material::diffuse_light(Color::splat(4.0)));
    objects.add(Rect::xy(Interval::new(3.0, 5.0), Interval::new(1.0, 3.0), -2.0, light));
    objects
}

/// Walls of the 555-unit Cornell box, with a ceiling light of the given
/// footprint and strength.
fn cornell_walls(light_x: Interval, light_z: Interval, strength: f64) -> (HittableList, Arc<Material>) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light = Arc::new(Material::diffuse_light(Color::splat(strength)));

    let side = Interval::new(0.0, 555.0);
    let mut objects = HittableList::new();
    objects.add(Rect::yz(side, side, 555.0, green));
    objects.add(Rect::yz(side, side, 0.0, red));
    objects.add(Rect::xz(light_x, light_z, 554.0, light));
    objects.add(Rect::xz(side, side, 0.0, white.clone()));
    objects.add(Rect::xz(side, side, 555.0, white.clone()));
    objects.add(Rect::xy(side, side, 555.0, white.clone()));

    (objects, white)
}

/// The tall and short blocks, rotated and moved into place.
fn cornell_blocks(white: &Arc<Material>) -> (Translate, Translate) {
    let tall = Cuboid::new(Point3::ZERO, Point3::new(165.0, 330.0, 165.0), white.clone());
    let tall = Translate::new(RotateY::new(tall, 15.0), Vec3::new(265.0, 0.0, 295.0));

    let short = Cuboid::new(Point3::ZERO, Point3::splat(165.0), white.clone());
    let short = Translate::new(RotateY::new(short, -18.0), Vec3::new(130.0, 0.0, 65.0));

    (tall, short)
}

fn cornell_box() -> HittableList {
    let (mut objects, white) = cornell_walls(Interval::new(213.0, 343.0), Interval::new(227.0, 332.0), 15.0);
    let (tall, short) = cornell_blocks(&white);
    objects.add(tall);
    objects.add(short);
    objects
}

fn cornell_smoke() -> HittableList {
    let (mut objects, white) = cornell_walls(Interval::new(113.0, 443.0), Interval::new(127.0, 432.0), 7.0);
    let (tall, short) = cornell_blocks(&white);
    objects.add(ConstantMedium::new(tall, 0.01, Color::ZERO));
    objects.add(ConstantMedium::new(short, 0.01, Color::ONE));
    objects
}

fn all_features_scene(assets_dir: &Path, rng: &mut dyn RngCore) -> SceneResult<HittableList> {
    let ground = lambertian(Color::new(0.45, 0.8, 1.0));
    let mut boxes1 = HittableList::new();
    const BOXES_PER_SIDE: usize = 20;
    for i in 0..BOXES_PER_SIDE {
        for j in 0..BOXES_PER_SIDE {
            let w = 100.0;
            let x0 = -1000.0 + i as f64 * w;
            let z0 = -1000.0 + j as f64 * w;
            let y1 = gen_range(rng, 1.0, 101.0);
            boxes1.add(Cuboid::new(
                Point3::new(x0, 0.0, z0),
                Point3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }

    let mut objects = HittableList::new();
    objects.add(bvh_or_list(boxes1, 0.0, 1.0));

    let light = Arc::new(Material::diffuse_light(Color::splat(7.0)));
    objects.add(Rect::xz(Interval::new(123.0, 423.0), Interval::new(147.0, 412.0), 554.0, light));

    let center1 = Point3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    objects.add(MovingSphere::new(
        (center1, center2),
        (0.0, 1.0),
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    ));

    let glass = Arc::new(Material::dielectric(1.5));
    objects.add(Sphere::new(Point3::new(260.0, 150.0, 45.0), 50.0, glass.clone()));
    objects.add(Sphere::new(
        Point3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Material::metal(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    let boundary = Sphere::new(Point3::new(360.0, 150.0, 145.0), 70.0, glass.clone());
    objects.add(boundary.clone());
    objects.add(ConstantMedium::new(boundary, 0.2, Color::new(0.2, 0.4, 0.9)));
    let mist = Sphere::new(Point3::ZERO, 5000.0, glass);
    objects.add(ConstantMedium::new(mist, 0.0001, Color::ONE));

    objects.add(Sphere::new(Point3::new(400.0, 200.0, 400.0), 100.0, earth_material(assets_dir)?));
    let marble = Texture::Noise(NoiseTexture::new(Color::ONE, 0.1, 1.0, rng));
    objects.add(Sphere::new(
        Point3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Material::lambertian(marble)),
    ));

    let white = lambertian(Color::splat(0.73));
    let boxes2: HittableList = (0..1000)
        .map(|_| Hittable::from(Sphere::new(random_vec(rng, 0.0, 165.0), 10.0, white.clone())))
        .collect();
    objects.add(Translate::new(
        RotateY::new(bvh_or_list(boxes2, 0.0, 1.0), 15.0),
        Vec3::new(-100.0, 270.0, 395.0),
    ));

    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Ray;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn missing_assets() -> &'static Path {
        Path::new("no/such/assets/dir")
    }

    #[test]
    fn test_preset_names_round_trip() {
        for name in PresetName::ALL {
            assert_eq!(name.as_str().parse::<PresetName>().unwrap(), name);
        }
        assert_eq!(
            "random_scene_withMovingSpheres".parse::<PresetName>().unwrap(),
            PresetName::RandomSceneWithMovingSpheres
        );
        assert!(matches!(
            "teapot".parse::<PresetName>(),
            Err(SceneError::UnknownPreset(name)) if name == "teapot"
        ));
    }

    #[test]
    fn test_presets_without_textures_build() {
        let mut rng = StdRng::seed_from_u64(17);
        for name in PresetName::ALL {
            if matches!(name, PresetName::Earth | PresetName::AllFeatures) {
                continue;
            }
            let preset = Preset::build(name, missing_assets(), &mut rng).unwrap();
            assert!(!preset.world.is_empty(), "{name} is empty");
        }
    }

    #[test]
    fn test_texture_presets_report_missing_image() {
        let mut rng = StdRng::seed_from_u64(17);
        for name in [PresetName::Earth, PresetName::AllFeatures] {
            let result = Preset::build(name, missing_assets(), &mut rng);
            assert!(matches!(result, Err(SceneError::Texture(_))));
        }
    }

    #[test]
    fn test_random_scene_contents() {
        let mut rng = StdRng::seed_from_u64(1);
        let preset = Preset::build(PresetName::RandomScene, missing_assets(), &mut rng).unwrap();

        // Ground + up to 22x22 small spheres + three large ones
        let count = preset.world.len();
        assert!(count > 400 && count <= 1 + 22 * 22 + 3);
        assert_eq!(preset.camera.aperture, 0.1);
        assert_eq!(preset.image.background, DEFAULT_BACKGROUND);

        let moving = Preset::build(PresetName::RandomSceneWithMovingSpheres, missing_assets(), &mut rng).unwrap();
        assert_eq!((moving.camera.time_start, moving.camera.time_end), (0.0, 1.0));
        assert!(moving
            .world
            .objects()
            .iter()
            .any(|object| matches!(object, Hittable::MovingSphere(_))));
    }

    #[test]
    fn test_two_spheres_hit_from_camera() {
        let mut rng = StdRng::seed_from_u64(0);
        let preset = Preset::build(PresetName::TwoSpheres, missing_assets(), &mut rng).unwrap();
        let world = Hittable::List(preset.world);

        let from = preset.camera.look_from;
        let ray = Ray::new(from, Point3::new(0.0, 10.0, 0.0) - from, 0.0);
        let rec = world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert!(rec.t > 0.0);
        assert!(rec.front_face);
        assert!(rec.normal.dot(ray.direction) < 0.0);
    }

    #[test]
    fn test_cornell_overrides() {
        let mut rng = StdRng::seed_from_u64(0);
        let preset = Preset::build(PresetName::CornellSmoke, missing_assets(), &mut rng).unwrap();
        let config = preset.image.apply(ImageConfig::default());

        assert_eq!((config.width, config.height), (512, 512));
        assert_eq!(config.aspect_ratio, 1.0);
        assert_eq!(config.samples_per_pixel, 256);
        assert_eq!(config.max_depth, 512);
        assert_eq!(config.background, Color::splat(0.2));
        assert_eq!(preset.camera.vfov, 40.0);

        // Six walls plus two smoke blocks
        assert_eq!(preset.world.len(), 8);
    }

    #[test]
    fn test_overrides_leave_unset_fields() {
        let config = ImageOverrides::default().apply(ImageConfig::new(2.0, 100).with_quality(7, 3));
        assert_eq!((config.width, config.height), (100, 50));
        assert_eq!(config.samples_per_pixel, 7);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.background, DEFAULT_BACKGROUND);
    }
}
