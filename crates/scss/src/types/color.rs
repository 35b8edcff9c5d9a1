//! RGBA colour type with parsing, arithmetic and HSL manipulation.
//!
//! Colours reach the evaluator from three places:
//!
//! - hex literals (`#abc`, `#aabbcc`, `#aabbccdd`)
//! - CSS colour names (`red`, `rebeccapurple`, `transparent`)
//! - colour functions (`rgb()`, `hsl()`, `lighten()`, ...)
//!
//! Literal colours remember the text they were written as and print it back
//! unchanged. Computed colours print as `#rrggbb`, or `rgba(r, g, b, a)` when
//! they are not fully opaque.

use phf::phf_map;
use std::fmt;

/// Error returned when colour parsing fails.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorParseError {
    pub message: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ColorParseError {}

/// CSS named colours as `0xRRGGBB`.
static NAMED_COLORS: phf::Map<&'static str, u32> = phf_map! {
    "aliceblue" => 0xf0f8ff,
    "antiquewhite" => 0xfaebd7,
    "aqua" => 0x00ffff,
    "aquamarine" => 0x7fffd4,
    "azure" => 0xf0ffff,
    "beige" => 0xf5f5dc,
    "bisque" => 0xffe4c4,
    "black" => 0x000000,
    "blanchedalmond" => 0xffebcd,
    "blue" => 0x0000ff,
    "blueviolet" => 0x8a2be2,
    "brown" => 0xa52a2a,
    "burlywood" => 0xdeb887,
    "cadetblue" => 0x5f9ea0,
    "chartreuse" => 0x7fff00,
    "chocolate" => 0xd2691e,
    "coral" => 0xff7f50,
    "cornflowerblue" => 0x6495ed,
    "cornsilk" => 0xfff8dc,
    "crimson" => 0xdc143c,
    "cyan" => 0x00ffff,
    "darkblue" => 0x00008b,
    "darkcyan" => 0x008b8b,
    "darkgoldenrod" => 0xb8860b,
    "darkgray" => 0xa9a9a9,
    "darkgreen" => 0x006400,
    "darkgrey" => 0xa9a9a9,
    "darkkhaki" => 0xbdb76b,
    "darkmagenta" => 0x8b008b,
    "darkolivegreen" => 0x556b2f,
    "darkorange" => 0xff8c00,
    "darkorchid" => 0x9932cc,
    "darkred" => 0x8b0000,
    "darksalmon" => 0xe9967a,
    "darkseagreen" => 0x8fbc8f,
    "darkslateblue" => 0x483d8b,
    "darkslategray" => 0x2f4f4f,
    "darkslategrey" => 0x2f4f4f,
    "darkturquoise" => 0x00ced1,
    "darkviolet" => 0x9400d3,
    "deeppink" => 0xff1493,
    "deepskyblue" => 0x00bfff,
    "dimgray" => 0x696969,
    "dimgrey" => 0x696969,
    "dodgerblue" => 0x1e90ff,
    "firebrick" => 0xb22222,
    "floralwhite" => 0xfffaf0,
    "forestgreen" => 0x228b22,
    "fuchsia" => 0xff00ff,
    "gainsboro" => 0xdcdcdc,
    "ghostwhite" => 0xf8f8ff,
    "gold" => 0xffd700,
    "goldenrod" => 0xdaa520,
    "gray" => 0x808080,
    "green" => 0x008000,
    "greenyellow" => 0xadff2f,
    "grey" => 0x808080,
    "honeydew" => 0xf0fff0,
    "hotpink" => 0xff69b4,
    "indianred" => 0xcd5c5c,
    "indigo" => 0x4b0082,
    "ivory" => 0xfffff0,
    "khaki" => 0xf0e68c,
    "lavender" => 0xe6e6fa,
    "lavenderblush" => 0xfff0f5,
    "lawngreen" => 0x7cfc00,
    "lemonchiffon" => 0xfffacd,
    "lightblue" => 0xadd8e6,
    "lightcoral" => 0xf08080,
    "lightcyan" => 0xe0ffff,
    "lightgoldenrodyellow" => 0xfafad2,
    "lightgray" => 0xd3d3d3,
    "lightgreen" => 0x90ee90,
    "lightgrey" => 0xd3d3d3,
    "lightpink" => 0xffb6c1,
    "lightsalmon" => 0xffa07a,
    "lightseagreen" => 0x20b2aa,
    "lightskyblue" => 0x87cefa,
    "lightslategray" => 0x778899,
    "lightslategrey" => 0x778899,
    "lightsteelblue" => 0xb0c4de,
    "lightyellow" => 0xffffe0,
    "lime" => 0x00ff00,
    "limegreen" => 0x32cd32,
    "linen" => 0xfaf0e6,
    "magenta" => 0xff00ff,
    "maroon" => 0x800000,
    "mediumaquamarine" => 0x66cdaa,
    "mediumblue" => 0x0000cd,
    "mediumorchid" => 0xba55d3,
    "mediumpurple" => 0x9370db,
    "mediumseagreen" => 0x3cb371,
    "mediumslateblue" => 0x7b68ee,
    "mediumspringgreen" => 0x00fa9a,
    "mediumturquoise" => 0x48d1cc,
    "mediumvioletred" => 0xc71585,
    "midnightblue" => 0x191970,
    "mintcream" => 0xf5fffa,
    "mistyrose" => 0xffe4e1,
    "moccasin" => 0xffe4b5,
    "navajowhite" => 0xffdead,
    "navy" => 0x000080,
    "oldlace" => 0xfdf5e6,
    "olive" => 0x808000,
    "olivedrab" => 0x6b8e23,
    "orange" => 0xffa500,
    "orangered" => 0xff4500,
    "orchid" => 0xda70d6,
    "palegoldenrod" => 0xeee8aa,
    "palegreen" => 0x98fb98,
    "paleturquoise" => 0xafeeee,
    "palevioletred" => 0xdb7093,
    "papayawhip" => 0xffefd5,
    "peachpuff" => 0xffdab9,
    "peru" => 0xcd853f,
    "pink" => 0xffc0cb,
    "plum" => 0xdda0dd,
    "powderblue" => 0xb0e0e6,
    "purple" => 0x800080,
    "rebeccapurple" => 0x663399,
    "red" => 0xff0000,
    "rosybrown" => 0xbc8f8f,
    "royalblue" => 0x4169e1,
    "saddlebrown" => 0x8b4513,
    "salmon" => 0xfa8072,
    "sandybrown" => 0xf4a460,
    "seagreen" => 0x2e8b57,
    "seashell" => 0xfff5ee,
    "sienna" => 0xa0522d,
    "silver" => 0xc0c0c0,
    "skyblue" => 0x87ceeb,
    "slateblue" => 0x6a5acd,
    "slategray" => 0x708090,
    "slategrey" => 0x708090,
    "snow" => 0xfffafa,
    "springgreen" => 0x00ff7f,
    "steelblue" => 0x4682b4,
    "tan" => 0xd2b48c,
    "teal" => 0x008080,
    "thistle" => 0xd8bfd8,
    "tomato" => 0xff6347,
    "turquoise" => 0x40e0d0,
    "violet" => 0xee82ee,
    "wheat" => 0xf5deb3,
    "white" => 0xffffff,
    "whitesmoke" => 0xf5f5f5,
    "yellow" => 0xffff00,
    "yellowgreen" => 0x9acd32,
};

/// An RGBA colour.
///
/// Channels are kept as floats so that chained HSL adjustments do not
/// accumulate rounding error; they are rounded only when printed.
///
/// # Examples
///
/// ```
/// use scss::types::Color;
///
/// let c = Color::parse_hex("#336699").unwrap();
/// assert_eq!(c.to_string(), "#336699");
/// let c = Color::parse_hex("#ff0000").unwrap();
/// assert_eq!(c.to_string(), "red");
/// assert_eq!(c.darken(0.5).to_string(), "black");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Color {
    /// Red component (0-255).
    pub r: f64,
    /// Green component (0-255).
    pub g: f64,
    /// Blue component (0-255).
    pub b: f64,
    /// Alpha component (0.0 = transparent, 1.0 = opaque).
    pub a: f64,
    /// Source text of a literal colour, printed back verbatim.
    pub original: Option<String>,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Builds a colour, clamping every channel to its valid range.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, 255.0),
            g: g.clamp(0.0, 255.0),
            b: b.clamp(0.0, 255.0),
            a: a.clamp(0.0, 1.0),
            original: None,
        }
    }

    pub fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Looks up a CSS colour name (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "transparent" {
            return Some(Self::transparent());
        }
        NAMED_COLORS.get(lower.as_str()).map(|&packed| {
            Self::rgb(
                ((packed >> 16) & 0xff) as f64,
                ((packed >> 8) & 0xff) as f64,
                (packed & 0xff) as f64,
            )
        })
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    pub fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let values = digits
            .chars()
            .map(|c| {
                c.to_digit(16).map(|d| d as f64).ok_or_else(|| ColorParseError {
                    message: format!("invalid hex digit: {c}"),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match values.as_slice() {
            [r, g, b] => Ok(Self::rgb(r * 17.0, g * 17.0, b * 17.0)),
            [r, g, b, a] => Ok(Self::rgba(r * 17.0, g * 17.0, b * 17.0, a * 17.0 / 255.0)),
            [r1, r2, g1, g2, b1, b2] => Ok(Self::rgb(
                r1 * 16.0 + r2,
                g1 * 16.0 + g2,
                b1 * 16.0 + b2,
            )),
            [r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Self::rgba(
                r1 * 16.0 + r2,
                g1 * 16.0 + g2,
                b1 * 16.0 + b2,
                (a1 * 16.0 + a2) / 255.0,
            )),
            _ => Err(ColorParseError {
                message: format!("invalid hex color length: {}", values.len()),
            }),
        }
    }

    /// Keeps `text` as the printed form of this colour.
    pub fn with_original(mut self, text: impl Into<String>) -> Self {
        self.original = Some(text.into());
        self
    }

    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self::rgba(self.r, self.g, self.b, alpha)
    }

    /// Same channels, ignoring the printed form.
    pub fn same_as(&self, other: &Self) -> bool {
        self.r.round() == other.r.round()
            && self.g.round() == other.g.round()
            && self.b.round() == other.b.round()
            && (self.a - other.a).abs() < 1e-9
    }

    /// Applies `op` channel by channel, clamping the result. Alpha is kept.
    pub fn map_channels(&self, other: (f64, f64, f64), op: impl Fn(f64, f64) -> f64) -> Self {
        Self::rgba(
            op(self.r, other.0),
            op(self.g, other.1),
            op(self.b, other.2),
            self.a,
        )
    }

    /// Hue in degrees, saturation and lightness in `0.0..=1.0`.
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h * 60.0, s, l)
    }

    /// Creates a colour from HSL values. The hue wraps, `s` and `l` are clamped.
    pub fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            let gray = l * 255.0;
            return Self::rgba(gray, gray, gray, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgba(
            hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_rgb(p, q, h) * 255.0,
            hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
            a,
        )
    }

    /// Adjusts hue, saturation and lightness by the given deltas.
    pub fn adjust_hsl(&self, dh: f64, ds: f64, dl: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h + dh, s + ds, l + dl, self.a)
    }

    /// Increases lightness by `amount` (0.0 to 1.0).
    pub fn lighten(&self, amount: f64) -> Self {
        self.adjust_hsl(0.0, 0.0, amount)
    }

    pub fn darken(&self, amount: f64) -> Self {
        self.adjust_hsl(0.0, 0.0, -amount)
    }

    /// Mixes two colours. `weight` is the share of `self` (0.0 to 1.0).
    pub fn mix(&self, other: &Self, weight: f64) -> Self {
        let w = weight * 2.0 - 1.0;
        let a = self.a - other.a;
        let w1 = if w * a == -1.0 {
            w
        } else {
            (w + a) / (1.0 + w * a)
        };
        let w1 = (w1 + 1.0) / 2.0;
        let w2 = 1.0 - w1;
        Self::rgba(
            self.r * w1 + other.r * w2,
            self.g * w1 + other.g * w2,
            self.b * w1 + other.b * w2,
            self.a * weight + other.a * (1.0 - weight),
        )
    }

    pub fn invert(&self) -> Self {
        Self::rgba(255.0 - self.r, 255.0 - self.g, 255.0 - self.b, self.a)
    }

    /// Name of the CSS colour with exactly these channels, if any.
    fn name(&self) -> Option<&'static str> {
        if self.a < 1.0 {
            return (self.a == 0.0 && self.r == 0.0 && self.g == 0.0 && self.b == 0.0)
                .then_some("transparent");
        }
        let packed = ((self.r.round() as u32) << 16)
            | ((self.g.round() as u32) << 8)
            | self.b.round() as u32;
        // Prefer the first alphabetical alias ("aqua" over "cyan").
        let mut names: Vec<&'static str> = NAMED_COLORS
            .entries()
            .filter(|(_, v)| **v == packed)
            .map(|(k, _)| *k)
            .collect();
        names.sort_unstable();
        names.first().copied()
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(original) = &self.original {
            return f.write_str(original);
        }
        let (r, g, b) = (
            self.r.round() as u8,
            self.g.round() as u8,
            self.b.round() as u8,
        );
        if self.a < 1.0 {
            if let Some(name) = self.name() {
                return f.write_str(name);
            }
            let alpha = crate::types::number::format_number(self.a);
            return write!(f, "rgba({r}, {g}, {b}, {alpha})");
        }
        match self.name() {
            Some(name) if name.len() <= 7 => f.write_str(name),
            _ => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== PARSING ====================

    #[test]
    fn test_hex_3_digit() {
        let c = Color::parse_hex("#f0a").unwrap();
        assert_eq!((c.r, c.g, c.b), (255.0, 0.0, 170.0));
    }

    #[test]
    fn test_hex_6_digit() {
        let c = Color::parse_hex("#336699").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (51.0, 102.0, 153.0, 1.0));
    }

    #[test]
    fn test_hex_8_digit_alpha() {
        let c = Color::parse_hex("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::parse_hex("#12").is_err());
        assert!(Color::parse_hex("#ggg").is_err());
    }

    #[test]
    fn test_named_colors() {
        let c = Color::named("Coral").unwrap();
        assert_eq!((c.r, c.g, c.b), (255.0, 127.0, 80.0));
        assert!(Color::named("rebeccapurple").is_some());
        assert!(Color::named("transparent").is_some());
        assert!(Color::named("bold").is_none());
    }

    // ==================== OUTPUT ====================

    #[test]
    fn test_literal_prints_as_written() {
        let c = Color::parse_hex("#FFF").unwrap().with_original("#FFF");
        assert_eq!(c.to_string(), "#FFF");
    }

    #[test]
    fn test_computed_prints_hex_or_short_name() {
        assert_eq!(Color::rgb(51.0, 102.0, 153.0).to_string(), "#336699");
        assert_eq!(Color::rgb(255.0, 0.0, 0.0).to_string(), "red");
        assert_eq!(Color::rgb(0.0, 255.0, 255.0).to_string(), "aqua");
        // Long names fall back to hex.
        assert_eq!(Color::rgb(240.0, 248.0, 255.0).to_string(), "#f0f8ff");
    }

    #[test]
    fn test_translucent_prints_rgba() {
        let c = Color::rgba(255.0, 0.0, 0.0, 0.5);
        assert_eq!(c.to_string(), "rgba(255, 0, 0, 0.5)");
        assert_eq!(Color::transparent().to_string(), "transparent");
    }

    // ==================== MANIPULATION ====================

    #[test]
    fn test_channels_are_clamped() {
        let c = Color::rgb(300.0, -5.0, 128.0);
        assert_eq!((c.r, c.g, c.b), (255.0, 0.0, 128.0));
    }

    #[test]
    fn test_hsl_roundtrip() {
        let original = Color::rgb(51.0, 102.0, 153.0);
        let (h, s, l) = original.to_hsl();
        let back = Color::from_hsl(h, s, l, 1.0);
        assert!(original.same_as(&back));
    }

    #[test]
    fn test_lighten_darken() {
        let c = Color::rgb(128.0, 128.0, 128.0);
        assert!(c.lighten(0.1).r > c.r);
        assert!(c.darken(0.1).r < c.r);
        assert_eq!(c.lighten(1.0).to_string(), "white");
        assert_eq!(c.darken(1.0).to_string(), "black");
    }

    #[test]
    fn test_mix_even() {
        let red = Color::rgb(255.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 255.0);
        let mixed = red.mix(&blue, 0.5);
        assert_eq!(mixed.to_string(), "purple");
    }

    #[test]
    fn test_invert() {
        assert_eq!(Color::rgb(0.0, 0.0, 0.0).invert().to_string(), "white");
    }
}
