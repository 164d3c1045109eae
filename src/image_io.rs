//! Loading microscope images as 8-bit RGB.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, RgbImage, Rgba};

use crate::format::FormatError;

/// Decode an image file into 8-bit RGB.
///
/// The format is guessed from the file contents. See [`to_rgb8`] for the
/// conversion rules.
pub fn load_rgb8(path: &Path) -> Result<RgbImage, FormatError> {
    let decoded = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    log::trace!(
        "Decoded {:?}: {}x{} {:?}",
        path,
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    Ok(to_rgb8(decoded))
}

/// Convert any decoded image to 8-bit RGB.
///
/// Gray is replicated to three channels and alpha is dropped. 16-bit data
/// whose maximum exceeds 255 is min-max normalised to the full 8-bit range;
/// a flat image normalises to black.
pub fn to_rgb8(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageLuma16(buf) => normalize16(&buf, |p: &Luma<u16>| [p[0]; 3]),
        DynamicImage::ImageLumaA16(buf) => normalize16(&buf, |p: &LumaA<u16>| [p[0]; 3]),
        DynamicImage::ImageRgb16(buf) => normalize16(&buf, |p: &Rgb<u16>| p.0),
        DynamicImage::ImageRgba16(buf) => {
            normalize16(&buf, |p: &Rgba<u16>| [p[0], p[1], p[2]])
        }
        other => other.to_rgb8(),
    }
}

fn normalize16<P, F>(buf: &ImageBuffer<P, Vec<u16>>, rgb: F) -> RgbImage
where
    P: image::Pixel<Subpixel = u16>,
    F: Fn(&P) -> [u16; 3],
{
    let (w, h) = buf.dimensions();
    let (min, max) = buf
        .pixels()
        .flat_map(|p| rgb(p))
        .fold((u16::MAX, u16::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max <= 255 {
        return RgbImage::from_fn(w, h, |x, y| {
            let [r, g, b] = rgb(buf.get_pixel(x, y));
            Rgb([r as u8, g as u8, b as u8])
        });
    }

    if max == min {
        return RgbImage::new(w, h);
    }

    let range = f64::from(max - min);
    log::debug!("Normalising 16-bit image from {min}..={max}");
    RgbImage::from_fn(w, h, |x, y| {
        let scaled = rgb(buf.get_pixel(x, y))
            .map(|v| (f64::from(v - min) / range * 255.0).round() as u8);
        Rgb(scaled)
    })
}
