//! Robot display colours.

use std::fmt;
use std::str::FromStr;

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    pub const YELLOW: Self = Self::from_rgb(255, 255, 0);
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);
    pub const BLUE: Self = Self::from_rgb(0, 0, 255);

    /// The four classic robot colours, in the order of the default labels.
    pub const CLASSIC: [Self; 4] = [Self::RED, Self::YELLOW, Self::GREEN, Self::BLUE];

    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xFF_FFFF)
    }
}

/// Error returned for a colour token that is neither `#rrggbb` nor a known
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour \u{201c}{}\u{201d}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                if let Ok(v) = u32::from_str_radix(hex, 16) {
                    return Ok(Self(v));
                }
            }
            return Err(ParseColorError(s.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Self::RED),
            "yellow" => Ok(Self::YELLOW),
            "green" => Ok(Self::GREEN),
            "blue" => Ok(Self::BLUE),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components() {
        let c = Color::from_rgb(0xAB, 0xCD, 0xEF);
        assert_eq!(c, Color(0x00AB_CDEF));
        assert_eq!(c.to_string(), "#abcdef");
    }

    #[test]
    fn parse_hex_and_names() {
        assert_eq!("#00ff00".parse(), Ok(Color::GREEN));
        assert_eq!("Blue".parse(), Ok(Color::BLUE));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("mauve".parse::<Color>().is_err());
    }
}
