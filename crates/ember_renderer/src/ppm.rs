//! Plain-text PPM (P3) output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::renderer::{color_to_rgb8, ImageBuffer};

/// Write `image` as P3: a `P3` / `width height` / `255` header, then one
/// `r g b` line per pixel, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut out: W) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width, image.height)?;
    writeln!(out, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(out, "{r} {g} {b}")?;
    }

    out.flush()
}

/// Write `image` to a file at `path`.
pub fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_ppm(image, BufWriter::new(file))?;

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
