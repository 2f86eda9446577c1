//! Color palette and paint constants for spot bindings.
//!
//! - Unavailable spots are tinted red and refuse the pointer.
//! - Available spots stay neutral slate so the map reads as the "paper".
//! - Selected spots are green.

use serde::{Serialize, Serializer};

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// CSS hex notation, e.g. `#4caf50`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// =============================================================================
// UNAVAILABLE - Red tint, hover only darkens in browse mode
// =============================================================================
pub const UNAVAILABLE_FILL: Rgb = Rgb::from_rgb(0xff, 0xcc, 0xcc);
pub const UNAVAILABLE_HOVER: Rgb = Rgb::from_rgb(0xcc, 0x66, 0x66);

// =============================================================================
// AVAILABLE - Neutral slate
// =============================================================================
pub const AVAILABLE_FILL: Rgb = Rgb::from_rgb(0xc4, 0xcc, 0xd6);
pub const AVAILABLE_HOVER: Rgb = Rgb::from_rgb(0x99, 0x99, 0x99);

// =============================================================================
// SELECTED - Green
// =============================================================================
pub const SELECTED_FILL: Rgb = Rgb::from_rgb(0x4c, 0xaf, 0x50);
pub const SELECTED_HOVER: Rgb = Rgb::from_rgb(0x38, 0x8e, 0x3c);

// =============================================================================
// HIGHLIGHT - Glow around the spot picked from search results
// =============================================================================
pub const HIGHLIGHT_GLOW: Rgb = Rgb::from_rgb(0xff, 0xd7, 0x00);
