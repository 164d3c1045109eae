//! Color utility functions shared across the engine.
//!
//! Colors are stored as `[u8; 3]` RGB triples and exchanged as `#rrggbb`
//! strings in coordinate documents and config files.

/// An RGB color.
pub type Rgb = [u8; 3];

/// Format a color as a lowercase `#rrggbb` string.
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Parse a `#rrggbb` or `#rgb` string (leading `#` optional).
///
/// Returns None for anything else.
pub fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        _ => None,
    }
}

/// Serde helpers for fields stored as hex strings.
pub mod hex_serde {
    use super::{Rgb, parse_hex, to_hex};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid color '{s}'")))
    }
}
