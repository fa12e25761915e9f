//! Textures sampled by materials.
//!
//! A texture answers one question: what color is the surface at
//! `(u, v)` on the primitive and at world point `p`. Solid and checker
//! textures are cheap closed-form patterns, noise textures wrap a [`Perlin`]
//! lattice, and image textures hold decoded pixels loaded with the `image`
//! crate.

use std::path::Path;
use std::sync::Arc;

use ember_math::Vec3;
use rand::RngCore;
use thiserror::Error;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};

/// Color type alias (linear RGB, typically 0-1 but unbounded for emitters).
pub type Color = Vec3;

/// Spatial frequency of the 3D checker pattern.
const CHECKER_FREQUENCY: f32 = 10.0;

/// Color returned by an image texture that has no pixel data, so a missing
/// asset is obvious in the render.
const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// All texture variants the renderer understands.
#[derive(Clone)]
pub enum Texture {
    Solid(Color),
    Checker(CheckerTexture),
    Noise(NoiseTexture),
    Image(ImageTexture),
}

impl Texture {
    /// Sample the texture.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }

    pub fn solid(r: f32, g: f32, b: f32) -> Self {
        Texture::Solid(Color::new(r, g, b))
    }

    /// Checker of two solid colors.
    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker(CheckerTexture::new(
            Arc::new(Texture::Solid(even)),
            Arc::new(Texture::Solid(odd)),
        ))
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

/// 3D checker alternating between two sub-textures by the sign of
/// `sin(fx) sin(fy) sin(fz)`.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<Texture>,
    odd: Arc<Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<Texture>, odd: Arc<Texture>) -> Self {
        Self { even, odd }
    }

    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (CHECKER_FREQUENCY * p.x).sin()
            * (CHECKER_FREQUENCY * p.y).sin()
            * (CHECKER_FREQUENCY * p.z).sin();

        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like grey pattern: a sine along z phase-shifted by turbulence.
#[derive(Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }

    pub fn value(&self, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// An 8-bit RGB image addressed by clamped, v-flipped UV coordinates.
///
/// Pixels are converted to linear RGB at load time, since the renderer
/// gamma-encodes on output.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    /// Row-major, 3 bytes per pixel
    data: Vec<u8>,
}

impl ImageTexture {
    /// Wrap raw RGB8 pixel data. A zero-sized image, or data shorter than
    /// `width * height * 3`, is treated as missing.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Self {
        if width == 0 || height == 0 {
            log::warn!("Image texture is {width}x{height}, treating as missing");
            return Self::missing();
        }
        let expected = width as usize * height as usize * 3;
        if data.len() < expected {
            log::warn!(
                "Image texture data too short ({} bytes, expected {}), treating as missing",
                data.len(),
                expected
            );
            return Self::missing();
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// An image with no pixels. Samples as solid cyan.
    pub fn missing() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let img = image::load_from_memory(&bytes)?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            (width * height * 3) as f32 / 1024.0
        );

        Ok(Self::from_rgb8(width, height, rgb.into_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-pixel lookup.
    pub fn value(&self, u: f32, v: f32) -> Color {
        if self.data.is_empty() {
            return MISSING_IMAGE_COLOR;
        }

        let u = u.clamp(0.0, 1.0);
        // Flip V to image coordinates
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        let idx = (j as usize * self.width as usize + i as usize) * 3;
        Color::new(
            srgb_to_linear(self.data[idx]),
            srgb_to_linear(self.data[idx + 1]),
            srgb_to_linear(self.data[idx + 2]),
        )
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
