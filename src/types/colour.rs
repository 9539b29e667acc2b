//! Colours for tinting rendered masks.
//!
//! Region files use either hex strings (`#0f0`, `#00ff00cc`) or CSS/X11
//! colour names (`green`, `cyan`). Names resolve through `palette`.

use std::fmt;
use std::str::FromStr;

use crate::error::{RegionError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// ds9's default region colour.
    pub const DS9_GREEN: Self = Self::rgb(0, 255, 0);

    /// Parse a hex string or a named colour.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        match palette::named::from_str(&s.to_ascii_lowercase()) {
            Some(named) => Ok(Self::rgb(named.red, named.green, named.blue)),
            None => Self::from_hex(s).map_err(|_| RegionError::Parse {
                message: format!("Unknown colour: {}", s),
                help: Some("Use a colour name such as 'green' or a hex value like #00ff00".to_string()),
            }),
        }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let digits: Vec<u8> = hex
            .chars()
            .map(parse_hex_digit)
            .collect::<Result<_>>()?;

        match digits.as_slice() {
            [r, g, b] => Ok(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b)),
            [r, g, b, a] => Ok(Self::new(r << 4 | r, g << 4 | g, b << 4 | b, a << 4 | a)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
            [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::new(
                r1 << 4 | r0,
                g1 << 4 | g0,
                b1 << 4 | b0,
                a1 << 4 | a0,
            )),
            _ => Err(RegionError::Parse {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
            }),
        }
    }

    /// This colour with its alpha scaled by a coverage fraction.
    pub fn with_coverage(self, coverage: f64) -> Self {
        let alpha = (self.a as f64 * coverage.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Colour {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| RegionError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_forms() {
        assert_eq!(Colour::from_hex("#0F0").unwrap(), Colour::DS9_GREEN);
        assert_eq!(Colour::from_hex("#00ff00").unwrap(), Colour::DS9_GREEN);
        assert_eq!(Colour::from_hex("#F008").unwrap(), Colour::new(255, 0, 0, 136));
        assert_eq!(Colour::from_hex("FF000080").unwrap(), Colour::new(255, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGG").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Colour::parse("red").unwrap(), Colour::rgb(255, 0, 0));
        assert_eq!(Colour::parse("Cyan").unwrap(), Colour::rgb(0, 255, 255));
        // CSS green, not the ds9 flavour
        assert_eq!(Colour::parse("green").unwrap(), Colour::rgb(0, 128, 0));
        assert!(Colour::parse("notacolour").is_err());
    }

    #[test]
    fn test_with_coverage() {
        let c = Colour::WHITE.with_coverage(0.5);
        assert_eq!(c.a, 128);
        assert_eq!(Colour::WHITE.with_coverage(2.0).a, 255);
        assert_eq!(Colour::WHITE.with_coverage(-1.0).a, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Colour::DS9_GREEN.to_string(), "#00FF00");
        assert_eq!(Colour::new(255, 0, 0, 128).to_string(), "#FF000080");
    }
}
