//! Per-channel image adjustments.
//!
//! [`Adjustments`] holds brightness, contrast and noise reduction for each of
//! the R, G and B channels. [`apply_adjustments`] turns a raw image plus an
//! adjustment record into a display image without touching the source.

mod channel_mode;
#[cfg(feature = "denoise")]
mod gaussian;
mod pipeline;

use serde::{Deserialize, Serialize};

use crate::constants::adjust::{
    BRIGHTNESS_MAX, BRIGHTNESS_MIN, CONTRAST_MAX, CONTRAST_MIN, NEUTRAL_CONTRAST, NOISE_MAX,
};

pub use channel_mode::{ChannelMask, ChannelMode, apply_channel_mask};
pub use pipeline::{
    NOISE_REDUCTION_AVAILABLE, adjust_channel, apply_adjustments, apply_brightness,
    apply_contrast, apply_noise_reduction,
};

/// One of the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Pixel component index.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn all() -> [Channel; 3] {
        [Channel::Red, Channel::Green, Channel::Blue]
    }

    /// Single-letter label used in channel summaries.
    pub fn letter(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
        }
    }
}

/// A value per color channel, serialized as `{ "r": .., "g": .., "b": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelValues<T> {
    pub r: T,
    pub g: T,
    pub b: T,
}

impl<T: Copy> ChannelValues<T> {
    /// Same value on every channel.
    pub fn splat(value: T) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
        }
    }

    pub fn get(&self, channel: Channel) -> T {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    pub fn set(&mut self, channel: Channel, value: T) {
        match channel {
            Channel::Red => self.r = value,
            Channel::Green => self.g = value,
            Channel::Blue => self.b = value,
        }
    }
}

/// Nine independent adjustment knobs, three per channel.
///
/// Values are only changed through setters, which clamp into range:
/// brightness `-100..=100`, contrast `0.1..=3.0`, noise reduction `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    brightness: ChannelValues<i32>,
    contrast: ChannelValues<f64>,
    noise_reduction: ChannelValues<u8>,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: ChannelValues::splat(0),
            contrast: ChannelValues::splat(NEUTRAL_CONTRAST),
            noise_reduction: ChannelValues::splat(0),
        }
    }
}

impl Adjustments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(&self, channel: Channel) -> i32 {
        self.brightness.get(channel)
    }

    pub fn contrast(&self, channel: Channel) -> f64 {
        self.contrast.get(channel)
    }

    pub fn noise_reduction(&self, channel: Channel) -> u8 {
        self.noise_reduction.get(channel)
    }

    pub fn brightness_values(&self) -> ChannelValues<i32> {
        self.brightness
    }

    pub fn contrast_values(&self) -> ChannelValues<f64> {
        self.contrast
    }

    pub fn noise_reduction_values(&self) -> ChannelValues<u8> {
        self.noise_reduction
    }

    /// Set brightness, clamped into range. Returns the stored value.
    pub fn set_brightness(&mut self, channel: Channel, value: i32) -> i32 {
        let value = value.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
        self.brightness.set(channel, value);
        value
    }

    /// Set contrast, clamped into range. NaN is treated as neutral.
    pub fn set_contrast(&mut self, channel: Channel, value: f64) -> f64 {
        let value = if value.is_nan() {
            NEUTRAL_CONTRAST
        } else {
            value.clamp(CONTRAST_MIN, CONTRAST_MAX)
        };
        self.contrast.set(channel, value);
        value
    }

    /// Set noise reduction strength, clamped into range.
    pub fn set_noise_reduction(&mut self, channel: Channel, value: i32) -> u8 {
        let value = value.clamp(0, i32::from(NOISE_MAX)) as u8;
        self.noise_reduction.set(channel, value);
        value
    }

    pub fn reset_brightness_channel(&mut self, channel: Channel) {
        self.brightness.set(channel, 0);
    }

    pub fn reset_brightness(&mut self) {
        self.brightness = ChannelValues::splat(0);
    }

    pub fn reset_contrast_channel(&mut self, channel: Channel) {
        self.contrast.set(channel, NEUTRAL_CONTRAST);
    }

    pub fn reset_contrast(&mut self) {
        self.contrast = ChannelValues::splat(NEUTRAL_CONTRAST);
    }

    pub fn reset_noise_channel(&mut self, channel: Channel) {
        self.noise_reduction.set(channel, 0);
    }

    pub fn reset_noise(&mut self) {
        self.noise_reduction = ChannelValues::splat(0);
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// True when every knob is at its neutral value.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_neutral() {
        let adj = Adjustments::new();
        assert!(adj.is_neutral());
        for c in Channel::all() {
            assert_eq!(adj.brightness(c), 0);
            assert_eq!(adj.contrast(c), 1.0);
            assert_eq!(adj.noise_reduction(c), 0);
        }
    }

    #[test]
    fn test_setters_clamp() {
        let mut adj = Adjustments::new();
        assert_eq!(adj.set_brightness(Channel::Red, 250), 100);
        assert_eq!(adj.set_brightness(Channel::Green, -250), -100);
        assert_eq!(adj.set_contrast(Channel::Blue, 0.0), 0.1);
        assert_eq!(adj.set_contrast(Channel::Blue, 9.0), 3.0);
        assert_eq!(adj.set_contrast(Channel::Red, f64::NAN), 1.0);
        assert_eq!(adj.set_noise_reduction(Channel::Red, 42), 10);
        assert_eq!(adj.set_noise_reduction(Channel::Red, -1), 0);
    }

    #[test]
    fn test_channel_resets_are_independent() {
        let mut adj = Adjustments::new();
        adj.set_brightness(Channel::Red, 10);
        adj.set_brightness(Channel::Green, 20);
        adj.set_contrast(Channel::Green, 2.0);
        adj.set_noise_reduction(Channel::Blue, 3);

        adj.reset_brightness_channel(Channel::Red);
        assert_eq!(adj.brightness(Channel::Red), 0);
        assert_eq!(adj.brightness(Channel::Green), 20);

        adj.reset_contrast();
        assert_eq!(adj.contrast(Channel::Green), 1.0);
        assert_eq!(adj.noise_reduction(Channel::Blue), 3);

        adj.reset_all();
        assert!(adj.is_neutral());
    }
}
