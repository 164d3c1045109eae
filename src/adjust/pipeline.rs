//! Channel adjustment pipeline.
//!
//! Each channel runs brightness, then contrast, then noise reduction, and
//! never reads another channel's adjusted values. Neutral settings return
//! the channel untouched, so a neutral pipeline is byte-exact.

use image::RgbImage;
use ndarray::Array2;

use super::{Adjustments, Channel};
use crate::constants::adjust::{
    BRIGHTNESS_SCALE, CONTRAST_PIVOT, NEUTRAL_CONTRAST, NOISE_SIGMA_PER_STEP,
};

/// Whether this build can run the Gaussian noise filter.
pub const NOISE_REDUCTION_AVAILABLE: bool = cfg!(feature = "denoise");

/// Apply all adjustments to an RGB image, returning a new image.
pub fn apply_adjustments(image: &RgbImage, adjustments: &Adjustments) -> RgbImage {
    if adjustments.is_neutral() {
        return image.clone();
    }

    let mut output = image.clone();
    for channel in Channel::all() {
        let plane = extract_channel(image, channel);
        let plane = adjust_channel(
            plane,
            adjustments.brightness(channel),
            adjustments.contrast(channel),
            adjustments.noise_reduction(channel),
        );
        write_channel(&mut output, channel, &plane);
    }
    output
}

/// Run the fixed brightness -> contrast -> noise sequence on one channel.
pub fn adjust_channel(
    channel: Array2<u8>,
    brightness: i32,
    contrast: f64,
    noise_reduction: u8,
) -> Array2<u8> {
    let channel = apply_brightness(channel, brightness);
    let channel = apply_contrast(channel, contrast);
    apply_noise_reduction(channel, noise_reduction)
}

/// Shift intensities by `brightness * 2.55`, clipped to 0..=255 and truncated.
pub fn apply_brightness(channel: Array2<u8>, brightness: i32) -> Array2<u8> {
    if brightness == 0 {
        return channel;
    }
    let shift = (f64::from(brightness) * BRIGHTNESS_SCALE) as f32;
    channel.mapv_into(|v| (f32::from(v) + shift).clamp(0.0, 255.0) as u8)
}

/// Scale intensities around 128 by `contrast`, clipped and truncated.
pub fn apply_contrast(channel: Array2<u8>, contrast: f64) -> Array2<u8> {
    if contrast == NEUTRAL_CONTRAST {
        return channel;
    }
    let contrast = contrast as f32;
    channel.mapv_into(|v| {
        ((f32::from(v) - CONTRAST_PIVOT) * contrast + CONTRAST_PIVOT).clamp(0.0, 255.0) as u8
    })
}

/// Gaussian blur with sigma `strength * 0.2`.
///
/// Passes the channel through when `strength` is 0 or the filter is not
/// compiled in.
pub fn apply_noise_reduction(channel: Array2<u8>, strength: u8) -> Array2<u8> {
    if strength == 0 {
        return channel;
    }
    denoise(channel, f64::from(strength) * NOISE_SIGMA_PER_STEP)
}

#[cfg(feature = "denoise")]
fn denoise(channel: Array2<u8>, sigma: f64) -> Array2<u8> {
    super::gaussian::gaussian_blur(&channel, sigma)
}

#[cfg(not(feature = "denoise"))]
fn denoise(channel: Array2<u8>, sigma: f64) -> Array2<u8> {
    log::debug!("Noise reduction (sigma {sigma}) unavailable in this build, passing through");
    channel
}

/// Copy one channel of an image into a (height, width) array.
fn extract_channel(image: &RgbImage, channel: Channel) -> Array2<u8> {
    let (width, height) = image.dimensions();
    let idx = channel.index();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        image.get_pixel(x as u32, y as u32)[idx]
    })
}

fn write_channel(image: &mut RgbImage, channel: Channel, plane: &Array2<u8>) {
    let idx = channel.index();
    for ((y, x), value) in plane.indexed_iter() {
        image.get_pixel_mut(x as u32, y as u32)[idx] = *value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::array;

    /// Image where every (x, y, channel) combination gets a different value.
    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (x * 7 + y * 13) as u8;
            Rgb([v, v.wrapping_mul(3), v.wrapping_add(101)])
        })
    }

    #[test]
    fn test_neutral_pipeline_is_identity() {
        let image = gradient_image(37, 23);
        let out = apply_adjustments(&image, &Adjustments::default());
        assert_eq!(out.as_raw(), image.as_raw());
    }

    #[test]
    fn test_neutral_steps_are_identity_for_all_values() {
        let all: Array2<u8> = Array2::from_shape_fn((16, 16), |(y, x)| (y * 16 + x) as u8);
        assert_eq!(apply_brightness(all.clone(), 0), all);
        assert_eq!(apply_contrast(all.clone(), 1.0), all);
        assert_eq!(apply_noise_reduction(all.clone(), 0), all);
    }

    #[test]
    fn test_brightness_clips_and_truncates() {
        let ch = array![[0u8, 100, 250]];
        // 10 * 2.55 = 25.5 -> truncated
        assert_eq!(apply_brightness(ch.clone(), 10), array![[25u8, 125, 255]]);
        assert_eq!(apply_brightness(ch, -100), array![[0u8, 0, 0]]);
    }

    #[test]
    fn test_contrast_pivots_at_128() {
        let ch = array![[0u8, 128, 200, 255]];
        assert_eq!(apply_contrast(ch.clone(), 2.0), array![[0u8, 128, 255, 255]]);
        assert_eq!(apply_contrast(ch, 0.5), array![[64u8, 128, 164, 191]]);
    }

    #[test]
    fn test_channels_are_independent() {
        let image = gradient_image(8, 8);
        let mut adj = Adjustments::default();
        adj.set_brightness(Channel::Green, 50);
        let out = apply_adjustments(&image, &adj);
        for (src, dst) in image.pixels().zip(out.pixels()) {
            assert_eq!(src[0], dst[0]);
            assert_eq!(src[2], dst[2]);
            assert!(dst[1] >= src[1]);
        }
    }

    #[test]
    fn test_source_not_mutated_and_deterministic() {
        let image = gradient_image(20, 10);
        let before = image.clone();
        let mut adj = Adjustments::default();
        adj.set_brightness(Channel::Red, -30);
        adj.set_contrast(Channel::Blue, 1.7);
        adj.set_noise_reduction(Channel::Green, 4);

        let a = apply_adjustments(&image, &adj);
        let b = apply_adjustments(&image, &adj);
        assert_eq!(image, before);
        assert_eq!(a.as_raw(), b.as_raw());
        assert_eq!(a.dimensions(), image.dimensions());
    }

    #[test]
    fn test_order_brightness_before_contrast() {
        // 100 + 25 = 125 -> (125 - 128) * 2 + 128 = 122
        let out = adjust_channel(array![[100u8]], 10, 2.0, 0);
        assert_eq!(out, array![[122u8]]);
    }

    #[cfg(feature = "denoise")]
    #[test]
    fn test_noise_reduction_smooths_spike() {
        let mut ch = Array2::<u8>::zeros((9, 9));
        ch[[4, 4]] = 255;
        let out = apply_noise_reduction(ch, 5);
        assert!(out[[4, 4]] < 255);
        assert!(out[[4, 5]] > 0);
        assert_eq!(out[[4, 3]], out[[4, 5]]);
    }

    #[cfg(not(feature = "denoise"))]
    #[test]
    fn test_noise_reduction_passes_through_without_filter() {
        let ch = array![[1u8, 200], [3, 4]];
        assert_eq!(apply_noise_reduction(ch.clone(), 5), ch);
    }
}
