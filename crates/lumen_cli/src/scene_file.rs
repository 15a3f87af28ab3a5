//! Scene description files.
//!
//! One object per line; lines starting with `/` and blank lines are
//! skipped. Only spheres are supported:
//!
//! ```text
//! // ground
//! sphere position 0 -1000 0 radius 1000 material lambertian_checkers 0.2 0.3 0.1 0.9 0.9 0.9
//! sphere position 0 1 0 radius 1 material dielectric 1.5
//! background_color 0.7 0.8 1.0
//! ```
//!
//! A `background_color r g b` token may appear on any line.

use std::io;
use std::path::{Path, PathBuf};
use std::str::{FromStr, SplitWhitespace};
use std::sync::Arc;

use lumen_math::{Color, Point3};
use lumen_renderer::{HittableList, ImageTexture, Material, NoiseTexture, Sphere, Texture, TextureError};
use rand::RngCore;
use thiserror::Error;

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("Failed to read scene {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown material '{name}' at line {line}")]
    UnknownMaterial { line: usize, name: String },

    #[error("Texture error at line {line}: {source}")]
    Texture { line: usize, source: TextureError },
}

pub type SceneFileResult<T> = Result<T, SceneFileError>;

/// Objects and settings read from a scene file.
#[derive(Debug, Clone, Default)]
pub struct SceneFile {
    pub world: HittableList,
    /// Last `background_color` in the file, if any
    pub background: Option<Color>,
}

impl SceneFile {
    /// Read a scene file. Image textures resolve against its directory.
    pub fn load(path: &Path, rng: &mut dyn RngCore) -> SceneFileResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path.parent().unwrap_or(Path::new(""));
        let scene = Self::parse(&text, dir, rng)?;
        log::debug!("Loaded {} objects from {}", scene.world.len(), path.display());
        Ok(scene)
    }

    /// Parse scene text.
    pub fn parse(text: &str, assets_dir: &Path, rng: &mut dyn RngCore) -> SceneFileResult<Self> {
        let mut scene = Self::default();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('/') {
                continue;
            }

            let mut parser = LineParser {
                tokens: content.split_whitespace(),
                line,
            };
            let mut sphere = SphereParts::default();
            let mut is_object = false;

            while let Some(token) = parser.tokens.next() {
                match token.to_ascii_lowercase().as_str() {
                    "sphere" => is_object = true,
                    "background_color" => scene.background = Some(parser.color()?),
                    "position" => sphere.position = Some(parser.color()?),
                    "radius" => sphere.radius = Some(parser.number()?),
                    "material" => sphere.material = Some(parser.material(assets_dir, rng)?),
                    other => {
                        return Err(SceneFileError::Parse {
                            line,
                            message: format!("unexpected token '{}'", other),
                        })
                    }
                }
            }

            if is_object {
                scene.world.add(sphere.build(line)?);
            } else if !sphere.is_empty() {
                return Err(SceneFileError::Parse {
                    line,
                    message: "object properties without an object type".to_string(),
                });
            }
        }

        Ok(scene)
    }
}

#[derive(Debug, Default)]
struct SphereParts {
    position: Option<Point3>,
    radius: Option<f64>,
    material: Option<Arc<Material>>,
}

impl SphereParts {
    fn is_empty(&self) -> bool {
        self.position.is_none() && self.radius.is_none() && self.material.is_none()
    }

    fn build(self, line: usize) -> SceneFileResult<Sphere> {
        let missing = |what: &str| SceneFileError::Parse {
            line,
            message: format!("sphere is missing its {}", what),
        };
        Ok(Sphere::new(
            self.position.ok_or_else(|| missing("position"))?,
            self.radius.ok_or_else(|| missing("radius"))?,
            self.material.ok_or_else(|| missing("material"))?,
        ))
    }
}

struct LineParser<'a> {
    tokens: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> LineParser<'a> {
    fn error(&self, message: impl Into<String>) -> SceneFileError {
        SceneFileError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn word(&mut self) -> SceneFileResult<&'a str> {
        self.tokens.next().ok_or_else(|| self.error("unexpected end of line"))
    }

    fn value<T: FromStr>(&mut self) -> SceneFileResult<T> {
        let line = self.line;
        let token = self.word()?;
        token.parse().map_err(|_| SceneFileError::Parse {
            line,
            message: format!("invalid number '{}'", token),
        })
    }

    fn number(&mut self) -> SceneFileResult<f64> {
        self.value()
    }

    fn color(&mut self) -> SceneFileResult<Color> {
        Ok(Color::new(self.number()?, self.number()?, self.number()?))
    }

    fn material(&mut self, assets_dir: &Path, rng: &mut dyn RngCore) -> SceneFileResult<Arc<Material>> {
        let kind = self.word()?.to_ascii_lowercase();
        let material = match kind.as_str() {
            "lambertian_color" => Material::lambertian(self.color()?),
            "lambertian_checkers" => Material::lambertian(Texture::checker(self.color()?, self.color()?)),
            "dielectric" => Material::dielectric(self.number()?),
            "metal" => Material::metal(self.color()?, self.number()?),
            "normal" => Material::normals(self.color()?),
            "noise_texture" => {
                let color = self.color()?;
                let scale = self.number()?;
                let phase = self.number()?;
                Material::lambertian(Texture::Noise(NoiseTexture::new(color, scale, phase, rng)))
            }
            "image_texture" => {
                let line = self.line;
                let file = self.word()?;
                let texture = ImageTexture::open(assets_dir.join(file))
                    .map_err(|source| SceneFileError::Texture { line, source })?;
                Material::lambertian(Texture::Image(texture))
            }
            "diffuse_light" => Material::diffuse_light(self.color()?),
            _ => {
                return Err(SceneFileError::UnknownMaterial {
                    line: self.line,
                    name: kind,
                })
            }
        };
        Ok(Arc::new(material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{Interval, Ray, Vec3};
    use lumen_renderer::Hittable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parse(text: &str) -> SceneFileResult<SceneFile> {
        let mut rng = StdRng::seed_from_u64(0);
        SceneFile::parse(text, Path::new("no/such/assets"), &mut rng)
    }

    #[test]
    fn test_parse_every_material() {
        let text = "\
// one sphere per material kind
sphere position 0 0 0 radius 1 material lambertian_color 0.5 0.5 0.5
sphere position 0 3 0 radius 1 material lambertian_checkers 0.2 0.3 0.1 0.9 0.9 0.9
sphere position 0 6 0 radius 1 material dielectric 1.5

sphere position 0 9 0 radius 1 material metal 0.7 0.6 0.5 0.1
sphere position 0 12 0 radius 1 material normal 0.1 0.1 0.1
sphere position 0 15 0 radius 1 material noise_texture 1 1 1 4 10
sphere position 0 18 0 radius 1 material Diffuse_Light 4 4 4
";
        let scene = parse(text).unwrap();
        assert_eq!(scene.world.len(), 7);
        assert_eq!(scene.background, None);
    }

    #[test]
    fn test_sphere_geometry_and_material() {
        let scene = parse("sphere radius 2 material diffuse_light 4 4 4 position 0 0 -5").unwrap();
        let world = Hittable::List(scene.world);

        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Point3::ZERO, -Vec3::Z, 0.0);
        let rec = world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-9);
        assert_eq!(rec.material.emitted(&rec), Color::splat(4.0));
    }

    #[test]
    fn test_background_color() {
        let scene = parse("background_color 0 0 0\nsphere position 0 0 0 radius 1 material dielectric 1.5").unwrap();
        assert_eq!(scene.background, Some(Color::ZERO));
        assert_eq!(scene.world.len(), 1);

        let scene = parse("sphere position 0 0 0 radius 1 material dielectric 1.5 background_color 0.2 0.2 0.2").unwrap();
        assert_eq!(scene.background, Some(Color::splat(0.2)));
        assert_eq!(scene.world.len(), 1);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse("// comment\nsphere position 0 0 radius 1 material dielectric 1.5").unwrap_err();
        assert!(matches!(err, SceneFileError::Parse { line: 2, .. }));

        let err = parse("sphere position 0 0 0 radius 1 material plastic 1").unwrap_err();
        assert!(matches!(err, SceneFileError::UnknownMaterial { line: 1, ref name } if name == "plastic"));

        let err = parse("sphere position 0 0 0 material dielectric 1.5").unwrap_err();
        assert_eq!(err.to_string(), "Parse error at line 1: sphere is missing its radius");

        let err = parse("\n\nsphere position 0 0 0 radius 1 material image_texture missing.jpg").unwrap_err();
        assert!(matches!(err, SceneFileError::Texture { line: 3, .. }));
    }

    #[test]
    fn test_missing_scene_file() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = SceneFile::load(Path::new("no/such/scene.txt"), &mut rng).unwrap_err();
        assert!(matches!(err, SceneFileError::Io { .. }));
    }
}
