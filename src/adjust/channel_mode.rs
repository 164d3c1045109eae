//! Channel display modes.
//!
//! A display mask zeroes disabled channels after adjustment, so a single
//! fluorophore (or a pair of them) can be inspected on its own.

use image::RgbImage;

use super::{Channel, ChannelValues};

/// Which channels are shown.
pub type ChannelMask = ChannelValues<bool>;

impl ChannelMask {
    /// All channels visible.
    pub fn all_enabled() -> Self {
        Self::splat(true)
    }

    /// Flip one channel on or off.
    pub fn toggle(&mut self, channel: Channel) {
        let enabled = self.get(channel);
        self.set(channel, !enabled);
    }

    /// Active channel letters, e.g. "RG", or "None".
    pub fn label(&self) -> String {
        let letters: String = Channel::all()
            .into_iter()
            .filter(|c| self.get(*c))
            .map(Channel::letter)
            .collect();
        if letters.is_empty() {
            "None".to_string()
        } else {
            letters
        }
    }

    /// Parse a channel list such as "rgb", "g" or "RB".
    pub fn from_letters(s: &str) -> Option<Self> {
        let mut mask = Self::splat(false);
        for c in s.chars() {
            match c.to_ascii_lowercase() {
                'r' => mask.r = true,
                'g' => mask.g = true,
                'b' => mask.b = true,
                _ => return None,
            }
        }
        Some(mask)
    }
}

/// Named channel combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    #[default]
    Composite,
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
}

impl ChannelMode {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelMode::Composite => "Composite",
            ChannelMode::Red => "Red",
            ChannelMode::Green => "Green",
            ChannelMode::Blue => "Blue",
            ChannelMode::Cyan => "Cyan",
            ChannelMode::Magenta => "Magenta",
            ChannelMode::Yellow => "Yellow",
        }
    }

    pub fn all() -> &'static [ChannelMode] {
        &[
            ChannelMode::Composite,
            ChannelMode::Red,
            ChannelMode::Green,
            ChannelMode::Blue,
            ChannelMode::Cyan,
            ChannelMode::Magenta,
            ChannelMode::Yellow,
        ]
    }

    /// The channel mask this mode selects.
    pub fn mask(&self) -> ChannelMask {
        let (r, g, b) = match self {
            ChannelMode::Composite => (true, true, true),
            ChannelMode::Red => (true, false, false),
            ChannelMode::Green => (false, true, false),
            ChannelMode::Blue => (false, false, true),
            ChannelMode::Cyan => (false, true, true),
            ChannelMode::Magenta => (true, false, true),
            ChannelMode::Yellow => (true, true, false),
        };
        ChannelMask { r, g, b }
    }
}

/// Zero every disabled channel. Returns a new image.
pub fn apply_channel_mask(image: &RgbImage, mask: ChannelMask) -> RgbImage {
    let mut output = image.clone();
    if mask == ChannelMask::all_enabled() {
        return output;
    }
    for pixel in output.pixels_mut() {
        for channel in Channel::all() {
            if !mask.get(channel) {
                pixel[channel.index()] = 0;
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_mode_masks() {
        assert_eq!(ChannelMode::Composite.mask(), ChannelMask::all_enabled());
        assert_eq!(ChannelMode::Cyan.mask().label(), "GB");
        assert_eq!(ChannelMode::Magenta.mask().label(), "RB");
        assert_eq!(ChannelMode::Yellow.mask().label(), "RG");
    }

    #[test]
    fn test_toggle_and_label() {
        let mut mask = ChannelMask::all_enabled();
        mask.toggle(Channel::Red);
        mask.toggle(Channel::Green);
        mask.toggle(Channel::Blue);
        assert_eq!(mask.label(), "None");
    }

    #[test]
    fn test_from_letters() {
        assert_eq!(ChannelMask::from_letters("G"), Some(ChannelMode::Green.mask()));
        assert_eq!(ChannelMask::from_letters("rb"), Some(ChannelMode::Magenta.mask()));
        assert_eq!(ChannelMask::from_letters("rx"), None);
    }

    #[test]
    fn test_apply_mask_zeroes_disabled() {
        let image = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
        let out = apply_channel_mask(&image, ChannelMode::Green.mask());
        assert!(out.pixels().all(|p| p.0 == [0, 20, 0]));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30]);
    }
}
