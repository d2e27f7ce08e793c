use eframe::egui::Color32;
use tracing::warn;

/// d3 `category10`.
pub const CATEGORY10: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// d3 `category20`, used once an explicit palette runs out.
pub const CATEGORY20: [Color32; 20] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xae, 0xc7, 0xe8),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0xff, 0xbb, 0x78),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0x98, 0xdf, 0x8a),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0xff, 0x98, 0x96),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0xc5, 0xb0, 0xd5),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xc4, 0x9c, 0x94),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0xf7, 0xb6, 0xd2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xc7, 0xc7, 0xc7),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0xdb, 0xdb, 0x8d),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
    Color32::from_rgb(0x9e, 0xda, 0xe5),
];

/// Nine-step light-to-dark ramp for `colorcode: colored`.
pub const GRADIENT_COLORED: [Color32; 9] = [
    Color32::from_rgb(0xff, 0xff, 0xcc),
    Color32::from_rgb(0xff, 0xed, 0xa0),
    Color32::from_rgb(0xfe, 0xd9, 0x76),
    Color32::from_rgb(0xfe, 0xb2, 0x4c),
    Color32::from_rgb(0xfd, 0x8d, 0x3c),
    Color32::from_rgb(0xfc, 0x4e, 0x2a),
    Color32::from_rgb(0xe3, 0x1a, 0x1c),
    Color32::from_rgb(0xbd, 0x00, 0x26),
    Color32::from_rgb(0x80, 0x00, 0x26),
];

/// Nine-step grey ramp for `colorcode: black-white`.
pub const GRADIENT_GREYS: [Color32; 9] = [
    Color32::from_rgb(0xd9, 0xd9, 0xd9),
    Color32::from_rgb(0xbd, 0xbd, 0xbd),
    Color32::from_rgb(0xa3, 0xa3, 0xa3),
    Color32::from_rgb(0x89, 0x89, 0x89),
    Color32::from_rgb(0x73, 0x73, 0x73),
    Color32::from_rgb(0x5c, 0x5c, 0x5c),
    Color32::from_rgb(0x44, 0x44, 0x44),
    Color32::from_rgb(0x25, 0x25, 0x25),
    Color32::from_rgb(0x00, 0x00, 0x00),
];

pub const NEUTRAL_NODE: Color32 = Color32::from_rgb(0x59, 0x59, 0x59);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorCode {
    #[default]
    Colored,
    BlackWhite,
}

impl ColorCode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "colored" | "color" | "colour" | "coloured" => Some(Self::Colored),
            "black-white" | "blackwhite" | "black_white" | "bw" | "grey" | "gray" => {
                Some(Self::BlackWhite)
            }
            _ => None,
        }
    }

    pub fn gradient(self) -> &'static [Color32] {
        match self {
            Self::Colored => &GRADIENT_COLORED,
            Self::BlackWhite => &GRADIENT_GREYS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColorScheme {
    /// Colors taken in order; exhaustion continues into `category20` and wraps.
    Palette(Vec<Color32>),
    /// Evenly spaced hues over the node count, rotated by `seed` degrees.
    Hue { seed: f32 },
    /// A single color for every node.
    Uniform(Color32),
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::Palette(CATEGORY10.to_vec())
    }
}

/// Assigns one color per position of an ordered node sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorAssigner {
    scheme: ColorScheme,
}

impl ColorAssigner {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    pub fn palette(colors: Vec<Color32>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self::new(ColorScheme::Palette(colors))
    }

    pub fn color_at(&self, position: usize, count: usize) -> Color32 {
        match &self.scheme {
            ColorScheme::Palette(colors) => {
                if let Some(color) = colors.get(position) {
                    *color
                } else {
                    let overflow = position - colors.len();
                    CATEGORY20[overflow % CATEGORY20.len()]
                }
            }
            ColorScheme::Hue { seed } => {
                let count = count.max(1) as f32;
                let hue = (seed + (position as f32 * 360.0 / count)).rem_euclid(360.0);
                hsl_to_color(hue, 0.65, 0.5)
            }
            ColorScheme::Uniform(color) => *color,
        }
    }

    pub fn assign(&self, count: usize) -> Vec<Color32> {
        (0..count)
            .map(|position| self.color_at(position, count))
            .collect()
    }
}

/// Maps a weight linearly into a fixed-size palette between the observed
/// minimum and maximum. A collapsed range maps everything to the first color.
#[derive(Clone, Copy, Debug)]
pub struct GradientScale {
    palette: &'static [Color32],
    min: f64,
    max: f64,
}

impl GradientScale {
    pub fn new(palette: &'static [Color32], min: f64, max: f64) -> Self {
        Self { palette, min, max }
    }

    pub fn from_weights(palette: &'static [Color32], weights: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for weight in weights {
            min = min.min(weight);
            max = max.max(weight);
        }
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 0.0;
        }
        Self::new(palette, min, max)
    }

    pub fn index_for(&self, weight: f64) -> usize {
        let last = self.palette.len().saturating_sub(1);
        let span = self.max - self.min;
        if last == 0 || span.is_nan() || span <= f64::EPSILON || !weight.is_finite() {
            return 0;
        }
        let t = ((weight - self.min) / span).clamp(0.0, 1.0);
        ((t * last as f64).round() as usize).min(last)
    }

    pub fn color_for(&self, weight: f64) -> Color32 {
        self.palette
            .get(self.index_for(weight))
            .copied()
            .unwrap_or(NEUTRAL_NODE)
    }
}

pub fn hsl_to_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |value: f32| ((value + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

/// Parses `#rrggbb` or `#rgb`.
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_owned(),
        _ => return None,
    };
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&expanded[range], 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parses a configured palette, skipping entries that are not hex colors.
pub fn parse_palette(values: &[String]) -> Vec<Color32> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = parse_hex_color(value);
            if parsed.is_none() {
                warn!(color = value.as_str(), "ignoring unparsable palette color");
            }
            parsed
        })
        .collect()
}
