//! Textures: color as a function of surface coordinates and position.

use std::path::{Path, PathBuf};

use crate::perlin::{Perlin, TURBULENCE_DEPTH};
use image::RgbImage;
use lumen_math::{Color, Point3};
use rand::RngCore;
use thiserror::Error;

/// Spatial frequency of the 3-D checker pattern.
const CHECKER_FREQUENCY: f64 = 10.0;

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load image texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image texture {0} has no pixels")]
    Empty(PathBuf),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Color lookup for materials.
///
/// Evaluation is pure, so one texture can be sampled from every render
/// thread at once.
#[derive(Debug, Clone)]
pub enum Texture {
    /// A constant color.
    Solid(Color),
    /// Alternating 3-D checker cells.
    Checker {
        even: Box<Texture>,
        odd: Box<Texture>,
    },
    /// Perlin marble.
    Noise(NoiseTexture),
    /// Decoded RGB8 image mapped by (u, v).
    Image(ImageTexture),
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    /// Checker pattern alternating between two solid colors.
    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker {
            even: Box::new(Texture::Solid(even)),
            odd: Box::new(Texture::Solid(odd)),
        }
    }

    /// Sample the texture at surface coordinates (u, v) and point `p`.
    pub fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { even, odd } => {
                let sines = (CHECKER_FREQUENCY * p.x).sin()
                    * (CHECKER_FREQUENCY * p.y).sin()
                    * (CHECKER_FREQUENCY * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

/// Marble-like bands along z, disturbed by turbulence.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    color: Color,
    scale: f64,
    /// Weight of the turbulence term inside the sine; shifts the band phase.
    phase: f64,
    noise: Perlin,
}

impl NoiseTexture {
    pub fn new(color: Color, scale: f64, phase: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            color,
            scale,
            phase,
            noise: Perlin::new(rng),
        }
    }

    fn value(&self, p: Point3) -> Color {
        let turbulence = self.noise.turb(p, TURBULENCE_DEPTH);
        self.color * 0.5 * (1.0 + (self.scale * p.z + self.phase * turbulence).sin())
    }
}

/// Nearest-texel lookup into a decoded image.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: RgbImage,
}

impl ImageTexture {
    /// Decode an image file (any format the `image` crate understands).
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TextureError::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        if image.width() == 0 || image.height() == 0 {
            return Err(TextureError::Empty(path.to_path_buf()));
        }

        log::debug!(
            "Loaded image texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    fn value(&self, u: f64, v: f64) -> Color {
        // No data: solid cyan as a debugging aid
        if self.image.width() == 0 || self.image.height() == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = u.clamp(0.0, 1.0);
        // Flip V to image coordinates
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.image.width() as f64) as u32).min(self.image.width() - 1);
        let j = ((v * self.image.height() as f64) as u32).min(self.image.height() - 1);

        let [r, g, b] = self.image.get_pixel(i, j).0;
        let scale = 1.0 / 255.0;
        Color::new(r as f64, g as f64, b as f64) * scale
    }
}
