//! Display color palettes.
//!
//! Two parallel palettes share the same indices. The *theoretical* palette
//! holds the nominal display-spec colors and is what gets written into
//! output buffers and files (the packed color codes only map cleanly from
//! these). The *measured* palette holds colorimetrically measured panel
//! output and is used purely as the distance target while dithering.
//!
//! Index 4 is reserved by the panel and is never selected as a match.

use serde::{Deserialize, Serialize};

/// Number of palette slots, including the reserved one.
pub const PALETTE_LEN: usize = 7;

/// Palette slot that must never be selected as a closest match.
pub const RESERVED_INDEX: usize = 4;

/// An sRGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance to another color in RGB space.
    pub fn distance_squared(&self, other: &Rgb) -> i32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        dr * dr + dg * dg + db * db
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(p: image::Rgb<u8>) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

/// An ordered set of panel colors: black, white, yellow, red, reserved,
/// blue, green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(pub [Rgb; PALETTE_LEN]);

/// Nominal display-spec colors. Output buffers always use these.
pub const THEORETICAL: Palette = Palette([
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(255, 255, 255), // White
    Rgb::new(255, 255, 0),   // Yellow
    Rgb::new(255, 0, 0),     // Red
    Rgb::new(0, 0, 0),       // Reserved
    Rgb::new(0, 0, 255),     // Blue
    Rgb::new(0, 255, 0),     // Green
]);

impl Palette {
    /// Factory-default measured panel colors, used until a calibration
    /// overrides them.
    pub const fn measured_defaults() -> Self {
        Palette([
            Rgb::new(2, 2, 2),       // Black
            Rgb::new(190, 190, 190), // White
            Rgb::new(205, 202, 0),   // Yellow
            Rgb::new(135, 19, 0),    // Red
            Rgb::new(0, 0, 0),       // Reserved
            Rgb::new(5, 64, 158),    // Blue
            Rgb::new(39, 102, 60),   // Green
        ])
    }

    pub fn get(&self, index: usize) -> Rgb {
        self.0[index]
    }

    /// Index of the closest non-reserved palette entry by squared RGB
    /// distance. Ties resolve to the lowest index.
    pub fn closest_index(&self, color: Rgb) -> usize {
        let mut min_dist = i32::MAX;
        let mut closest = 1;

        for (i, entry) in self.0.iter().enumerate() {
            if i == RESERVED_INDEX {
                continue;
            }
            let dist = color.distance_squared(entry);
            if dist < min_dist {
                min_dist = dist;
                closest = i;
            }
        }

        closest
    }

    /// Exact index of a color among the non-reserved entries, if present.
    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .find(|&(i, entry)| i != RESERVED_INDEX && *entry == color)
            .map(|(i, _)| i)
    }

    /// Whether a color is exactly one of the non-reserved entries.
    pub fn contains(&self, color: Rgb) -> bool {
        self.index_of(color).is_some()
    }
}

/// Which palette the dither stage measures distance against.
///
/// Output pixels are always written from the theoretical palette either way;
/// the mode only changes what the quantization error is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Dither against the nominal colors (legacy/stock firmware behavior).
    Stock,
    /// Dither against the measured panel colors.
    #[default]
    Measured,
}

/// The theoretical/measured palette pair, passed explicitly into each
/// conversion. The measured half is replaceable by calibration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalettePair {
    pub theoretical: Palette,
    pub measured: Palette,
}

impl Default for PalettePair {
    fn default() -> Self {
        Self {
            theoretical: THEORETICAL,
            measured: Palette::measured_defaults(),
        }
    }
}

impl PalettePair {
    /// Palette the dither stage should measure error against.
    pub fn dither_target(&self, mode: DitherMode) -> &Palette {
        match mode {
            DitherMode::Stock => &self.theoretical,
            DitherMode::Measured => &self.measured,
        }
    }
}
