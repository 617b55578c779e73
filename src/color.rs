//! RGB colour value type and the reference palette used by the generator.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WATER1: Color = Color::new(0, 0, 128);
    pub const WATER2: Color = Color::new(0, 0, 192);
    pub const LAND1: Color = Color::new(0, 150, 0);
    pub const LAND2: Color = Color::new(128, 255, 128);
    pub const TREE: Color = Color::new(50, 255, 255);
    pub const MOUNTAIN: Color = Color::new(255, 50, 255);
    pub const BUILDING: Color = Color::new(255, 50, 50);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Shift `from` toward `to` by `factor`, channel by channel.
    ///
    /// The fractional delta is truncated toward zero, so the result never
    /// overshoots `to`. `factor` must lie in `[0, 1]`.
    pub fn interpolate(from: Color, to: Color, factor: f64) -> Color {
        let channel = |a: u8, b: u8| -> u8 {
            let delta = ((b as f64 - a as f64) * factor).trunc();
            (a as f64 + delta) as u8
        };

        Color {
            r: channel(from.r, to.r),
            g: channel(from.g, to.g),
            b: channel(from.b, to.b),
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}
