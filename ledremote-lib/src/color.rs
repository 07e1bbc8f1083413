//! RGB colors, named colors and brightness scaling.

use std::fmt;
use std::str::FromStr;

use palette::FromColor;
use palette::Hsv;
use palette::Srgb;

use crate::error::ColorError;

// =============================================================================
// Rgb
// =============================================================================

/// An 8-bit RGB triple.
///
/// The text form is three space-separated integers, e.g. `"255 10 0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `r g b` triple.
    ///
    /// Components outside `0..=255` are clamped. Anything other than three
    /// integer tokens is rejected.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(ColorError::arity(input, tokens.len()));
        }

        let mut components = [0u8; 3];
        for (slot, token) in components.iter_mut().zip(&tokens) {
            let value: i64 = token
                .parse()
                .map_err(|_| ColorError::component(input, *token))?;
            *slot = value.clamp(0, 255) as u8;
        }

        let [r, g, b] = components;
        Ok(Self::new(r, g, b))
    }

    /// Resolves a color name through the named table, falling back to
    /// parsing the text as a triple.
    pub fn resolve(input: &str) -> Result<Self, ColorError> {
        match named_color(input) {
            Some(rgb) => Ok(rgb),
            None => Self::parse(input),
        }
    }

    /// Returns `true` when all three components are equal.
    pub fn is_achromatic(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Named colors
// =============================================================================

const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("light blue", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("purple", Rgb::new(255, 0, 255)),
    ("orange", Rgb::new(255, 10, 0)),
    ("pink", Rgb::new(255, 0, 10)),
    ("white", Rgb::WHITE),
    ("black", Rgb::BLACK),
    ("off", Rgb::BLACK),
];

/// Looks up a case-sensitive color name.
pub fn named_color(name: &str) -> Option<Rgb> {
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, rgb)| *rgb)
}

/// Returns the triple text for a known color name, or the input unchanged.
pub fn resolve_color_name(input: &str) -> String {
    match named_color(input) {
        Some(rgb) => rgb.to_string(),
        None => input.to_string(),
    }
}

// =============================================================================
// Brightness
// =============================================================================

/// Requested brightness of a color change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Brightness {
    /// No brightness given; the color is used as-is.
    #[default]
    Unset,
    /// Target HSV value in percent, `0..=100`.
    Percent(u8),
}

impl Brightness {
    /// Parses a brightness parameter.
    ///
    /// Only the leading integer counts, so `"50.5"` and `"50%"` are both 50.
    /// Absent, non-numeric and negative values are `Unset`; values above 100
    /// clamp to 100.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Unset;
        };
        let value = value.trim_start();
        let (negative, rest) = match value.as_bytes().first() {
            Some(b'-') => (true, &value[1..]),
            Some(b'+') => (false, &value[1..]),
            _ => (false, value),
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Self::Unset;
        }

        let digits = &rest[..digits];
        if negative && digits.bytes().any(|d| d != b'0') {
            return Self::Unset;
        }
        // Too many digits to fit still means "above 100"
        let percent = digits.parse::<u64>().unwrap_or(u64::MAX);
        Self::Percent(percent.min(100) as u8)
    }

    /// Applies this brightness to a color. `Unset` returns the color unchanged.
    pub fn apply(self, rgb: Rgb) -> Rgb {
        match self {
            Self::Unset => rgb,
            Self::Percent(percent) => apply_brightness(rgb, percent),
        }
    }
}

/// Replaces the HSV value of `rgb` with `brightness` percent.
///
/// Hue and saturation are kept; gray inputs stay gray.
pub fn apply_brightness(rgb: Rgb, brightness: u8) -> Rgb {
    let brightness = brightness.min(100);
    let mut hsv = to_hsv(rgb);
    hsv.value = f32::from(brightness) / 100.0;
    from_hsv(hsv)
}

// =============================================================================
// Transitions
// =============================================================================

/// Hue distance, in degrees, below which `morph` blends hues directly.
const DIRECT_HUE_DISTANCE: f32 = 72.0;

/// Linear interpolation from `from` to `to`; `t = 0` is `from`.
pub fn interpolate(t: f32, from: f32, to: f32) -> f32 {
    from + (to - from) * t
}

/// Limits `value` to `min..=max`. Unlike `f32::clamp` this never panics.
pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// How far `value` has moved from the lower to the higher of `a` and `b`,
/// limited to `0.0..=1.0`.
pub fn progress(value: f32, a: f32, b: f32) -> f32 {
    let (low, high) = (a.min(b), a.max(b));
    if high == low {
        return if value >= high { 1.0 } else { 0.0 };
    }
    constrain((value - low) / (high - low), 0.0, 1.0)
}

fn to_hsv(rgb: Rgb) -> Hsv {
    let srgb: Srgb = Srgb::new(rgb.r, rgb.g, rgb.b).into_format();
    Hsv::from_color(srgb)
}

fn from_hsv(hsv: Hsv) -> Rgb {
    let srgb: Srgb = Srgb::from_color(hsv);
    let (r, g, b) = srgb.into_format::<u8>().into_components();
    Rgb::new(r, g, b)
}

/// HSV value of a color, `0.0..=1.0`.
pub fn brightness_of(rgb: Rgb) -> f32 {
    to_hsv(rgb).value
}

/// Color at `t` (`0.0..=1.0`) of a transition from `from` to `to`.
///
/// Close hues are blended directly. Distant hues dim and desaturate during
/// the first 40%, swap hue while dim, then brighten into `to` over the last
/// 40%, so the light never shows the muddy colors between them. A transition
/// to or from black keeps the hue of the lit end.
pub fn morph(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let t = constrain(t, 0.0, 1.0);
    let source = to_hsv(from);
    let target = to_hsv(to);
    let (fh, fs, fv) = (source.hue.into_positive_degrees(), source.saturation, source.value);
    let (th, ts, tv) = (target.hue.into_positive_degrees(), target.saturation, target.value);

    let (mut h, mut s, v) = if (fh - th).abs() < DIRECT_HUE_DISTANCE {
        (
            interpolate(t, fh, th),
            interpolate(t, fs, ts),
            interpolate(t, fv, tv),
        )
    } else {
        let fade_out = progress(t, 0.0, 0.4);
        let swap = progress(t, 0.4, 0.6);
        let fade_in = progress(t, 0.6, 1.0);
        let min_saturation = 0.9 * fs;
        let min_value = 0.05 * fv;

        if swap == 0.0 {
            (fh, interpolate(fade_out, fs, min_saturation), interpolate(fade_out, fv, min_value))
        } else if fade_in == 0.0 {
            (interpolate(swap, fh, th), min_saturation, min_value)
        } else {
            (th, interpolate(fade_in, min_saturation, ts), interpolate(fade_in, min_value, tv))
        }
    };

    if tv == 0.0 {
        h = fh;
        s = fs;
    } else if fv == 0.0 {
        h = th;
        s = ts;
    }

    from_hsv(Hsv::new(h, s, v))
}

/// Steps through a list of colors, wrapping at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCycle {
    colors: Vec<Rgb>,
    index: usize,
}

impl ColorCycle {
    /// Red, green, blue, yellow, cyan, magenta, white.
    pub const DEFAULT_COLORS: [Rgb; 7] = [
        Rgb::new(255, 0, 0),
        Rgb::new(0, 255, 0),
        Rgb::new(0, 0, 255),
        Rgb::new(255, 255, 0),
        Rgb::new(0, 255, 255),
        Rgb::new(255, 0, 255),
        Rgb::WHITE,
    ];

    /// A cycle over `colors`; an empty list falls back to the defaults.
    pub fn new(colors: Vec<Rgb>) -> Self {
        let colors = if colors.is_empty() {
            Self::DEFAULT_COLORS.to_vec()
        } else {
            colors
        };
        Self { colors, index: 0 }
    }

    /// A cycle over color names or `r g b` triples.
    pub fn from_names<I, S>(names: I) -> Result<Self, ColorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = names
            .into_iter()
            .map(|name| Rgb::resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(colors))
    }

    pub fn current(&self) -> Rgb {
        self.colors[self.index]
    }

    /// Moves to the next color and returns it.
    pub fn advance(&mut self) -> Rgb {
        self.index = (self.index + 1) % self.colors.len();
        self.current()
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
