//! Key image encoding.
//!
//! The panel expects BGR pixels, scanlines top-to-bottom, each scanline
//! mirrored horizontally relative to a decoded image.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::layout::Layout;
use crate::{Error, Result};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Decodes a PNG file into an RGB8 image, compositing any transparency
/// over black.
pub fn load_png<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let file = File::open(path).map_err(image::ImageError::IoError)?;
    let decoded = image::load(BufReader::new(file), ImageFormat::Png)?;
    let image = flatten_over_black(&decoded.to_rgba8());
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Encodes an image into the panel's native byte order, or a black canvas
/// when no image is given.
///
/// Scanlines are read from x = width down to x = 1. The first read falls
/// just outside the image and comes out black, and column 0 is never read.
/// Real panels have only been observed with this mapping.
pub fn encode_pixels(layout: &Layout, image: Option<&RgbImage>) -> Result<Vec<u8>> {
    let Some(image) = image else {
        return Ok(blank_canvas(layout));
    };

    let expected = (layout.canvas_width, layout.canvas_height);
    if image.dimensions() != expected {
        return Err(Error::ImageSize {
            expected,
            actual: image.dimensions(),
        });
    }

    let mut pixels = Vec::with_capacity(layout.image_len());
    for y in 0..image.height() {
        for x in (1..=image.width()).rev() {
            let Rgb([r, g, b]) = *image.get_pixel_checked(x, y).unwrap_or(&BLACK);
            pixels.extend_from_slice(&[b, g, r]);
        }
    }
    Ok(pixels)
}

/// Premultiplies every pixel by its alpha, so fully transparent pixels
/// come out black.
pub fn flatten_over_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let scale = |c: u8| (c as u16 * a as u16 / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

/// Black image for the layout's canvas.
pub fn blank_canvas(layout: &Layout) -> Vec<u8> {
    vec![0; layout.image_len()]
}
