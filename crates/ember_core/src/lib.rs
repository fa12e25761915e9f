//! Ember Core - texture sources for the path tracer.
//!
//! This crate provides:
//!
//! - **Textures**: `Texture` with solid, checker, noise and image variants
//! - **Noise**: a `Perlin` gradient-noise lattice with turbulence
//! - **Image loading**: `ImageTexture::load` decodes files with the `image` crate
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{ImageTexture, Texture};
//!
//! let earth = Texture::Image(ImageTexture::load("earthmap.jpg")?);
//! let color = earth.value(0.25, 0.5, Vec3::ZERO);
//! ```

pub mod perlin;
pub mod texture;

// Re-export commonly used types
pub use perlin::Perlin;
pub use texture::{
    CheckerTexture, Color, ImageTexture, NoiseTexture, Texture, TextureError, TextureResult,
};
