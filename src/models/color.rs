use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::x11_colors::X11_COLORS;

/// A 24-bit colour value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb { red, green, blue }
    }

    /// Build a colour from a packed `0xRRGGBB` value. The top byte is ignored.
    pub const fn from_packed(value: u32) -> Self {
        Rgb {
            red: ((value >> 16) & 0xff) as u8,
            green: ((value >> 8) & 0xff) as u8,
            blue: (value & 0xff) as u8,
        }
    }

    pub const fn packed(&self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolves colour names to RGB values.
///
/// The directive handlers lower-case the name before asking, so
/// implementations only need to know lower-case spellings.
#[cfg_attr(test, mockall::automock)]
pub trait ColorTable {
    fn resolve(&self, name: &str) -> Option<Rgb>;
}

/// The X11 colour database compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct X11Colors;

impl X11Colors {
    pub fn len(&self) -> usize {
        X11_COLORS.len()
    }

    pub fn is_empty(&self) -> bool {
        X11_COLORS.is_empty()
    }

    /// All known names with their values, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Rgb)> {
        X11_COLORS
            .iter()
            .map(|&(name, value)| (name, Rgb::from_packed(value)))
    }
}

impl ColorTable for X11Colors {
    fn resolve(&self, name: &str) -> Option<Rgb> {
        let name = name.to_lowercase();
        X11_COLORS
            .binary_search_by(|(candidate, _)| (*candidate).cmp(name.as_str()))
            .ok()
            .map(|index| Rgb::from_packed(X11_COLORS[index].1))
    }
}

impl ColorTable for HashMap<String, Rgb> {
    fn resolve(&self, name: &str) -> Option<Rgb> {
        self.get(name).copied()
    }
}

impl<F> ColorTable for F
where
    F: Fn(&str) -> Option<Rgb>,
{
    fn resolve(&self, name: &str) -> Option<Rgb> {
        self(name)
    }
}
