use super::ColorName;

/// One row of the HSV classification table.
///
/// Ranges are inclusive. A hue range with `min > max` wraps through 0/360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRule {
    pub name: ColorName,
    pub hue: (f32, f32),
    pub saturation: (f32, f32),
    pub value: (f32, f32),
}

impl ColorRule {
    const fn new(
        name: ColorName,
        hue: (f32, f32),
        saturation: (f32, f32),
        value: (f32, f32),
    ) -> Self {
        Self {
            name,
            hue,
            saturation,
            value,
        }
    }

    /// Returns `true` if the HSV triple falls inside all three ranges.
    pub fn matches(&self, h: f32, s: f32, v: f32) -> bool {
        let (hue_min, hue_max) = self.hue;
        let hue_ok = if hue_min > hue_max {
            h >= hue_min || h <= hue_max
        } else {
            (hue_min..=hue_max).contains(&h)
        };

        hue_ok
            && (self.saturation.0..=self.saturation.1).contains(&s)
            && (self.value.0..=self.value.1).contains(&v)
    }
}

/// HSV rules, evaluated in order; the first match wins.
pub const COLOR_RULES: &[ColorRule] = &[
    ColorRule::new(ColorName::Red, (340.0, 10.0), (50.0, 100.0), (50.0, 100.0)),
    ColorRule::new(ColorName::Green, (90.0, 150.0), (30.0, 100.0), (30.0, 100.0)),
    ColorRule::new(ColorName::Blue, (180.0, 260.0), (40.0, 100.0), (40.0, 100.0)),
    ColorRule::new(ColorName::Yellow, (40.0, 65.0), (50.0, 100.0), (80.0, 100.0)),
    ColorRule::new(ColorName::Purple, (270.0, 330.0), (30.0, 100.0), (30.0, 100.0)),
    ColorRule::new(ColorName::Pink, (300.0, 340.0), (20.0, 100.0), (80.0, 100.0)),
    ColorRule::new(ColorName::Orange, (20.0, 40.0), (50.0, 100.0), (80.0, 100.0)),
    ColorRule::new(ColorName::Brown, (10.0, 30.0), (30.0, 80.0), (20.0, 60.0)),
    ColorRule::new(ColorName::White, (0.0, 360.0), (0.0, 10.0), (90.0, 100.0)),
    ColorRule::new(ColorName::Black, (0.0, 360.0), (0.0, 30.0), (0.0, 20.0)),
    ColorRule::new(ColorName::Grey, (0.0, 360.0), (0.0, 20.0), (20.0, 80.0)),
    ColorRule::new(ColorName::NavyBlue, (220.0, 240.0), (50.0, 100.0), (20.0, 40.0)),
    ColorRule::new(ColorName::Beige, (30.0, 50.0), (10.0, 30.0), (80.0, 95.0)),
    ColorRule::new(ColorName::Maroon, (330.0, 360.0), (50.0, 100.0), (20.0, 40.0)),
    ColorRule::new(ColorName::Olive, (60.0, 90.0), (30.0, 60.0), (30.0, 60.0)),
    ColorRule::new(ColorName::Teal, (160.0, 180.0), (40.0, 100.0), (30.0, 60.0)),
];

/// Synonym table, matched case-insensitively. Every canonical name maps to itself.
pub const COLOR_SYNONYMS: &[(&str, ColorName)] = &[
    ("Red", ColorName::Red),
    ("Green", ColorName::Green),
    ("Blue", ColorName::Blue),
    ("Yellow", ColorName::Yellow),
    ("Purple", ColorName::Purple),
    ("Pink", ColorName::Pink),
    ("Orange", ColorName::Orange),
    ("Brown", ColorName::Brown),
    ("White", ColorName::White),
    ("Black", ColorName::Black),
    ("Grey", ColorName::Grey),
    ("Navy", ColorName::NavyBlue),
    ("Navy Blue", ColorName::NavyBlue),
    ("Beige", ColorName::Beige),
    ("Maroon", ColorName::Maroon),
    ("Olive", ColorName::Olive),
    ("Teal", ColorName::Teal),
    ("Light Blue", ColorName::Blue),
    ("Sky Blue", ColorName::Blue),
    ("Dark Blue", ColorName::NavyBlue),
    ("Light Green", ColorName::Green),
    ("Dark Green", ColorName::Green),
    ("Light Red", ColorName::Red),
    ("Dark Red", ColorName::Maroon),
    ("Light Yellow", ColorName::Yellow),
    ("Dark Yellow", ColorName::Yellow),
    ("Light Purple", ColorName::Purple),
    ("Dark Purple", ColorName::Purple),
    ("Light Pink", ColorName::Pink),
    ("Dark Pink", ColorName::Pink),
    ("Light Orange", ColorName::Orange),
    ("Dark Orange", ColorName::Orange),
    ("Light Brown", ColorName::Brown),
    ("Dark Brown", ColorName::Brown),
    ("Light Grey", ColorName::Grey),
    ("Dark Grey", ColorName::Grey),
    ("Cream", ColorName::Beige),
    ("Tan", ColorName::Brown),
    ("Burgundy", ColorName::Maroon),
    ("Khaki", ColorName::Beige),
    ("Gold", ColorName::Yellow),
    ("Silver", ColorName::Grey),
    ("Turquoise", ColorName::Teal),
    ("Lavender", ColorName::Purple),
    ("Peach", ColorName::Orange),
    ("Coral", ColorName::Orange),
    ("Mint", ColorName::Green),
    ("Cyan", ColorName::Teal),
    ("Magenta", ColorName::Pink),
    ("Indigo", ColorName::NavyBlue),
    ("Violet", ColorName::Purple),
    ("Mustard", ColorName::Yellow),
    ("Rust", ColorName::Orange),
    ("Amber", ColorName::Orange),
];

/// Classifies an HSV triple (hue in `[0, 360)`, saturation/value in `[0, 100]`).
///
/// Near-grayscale input (saturation below 10) always resolves to Black, White
/// or Grey. Otherwise the first matching [`COLOR_RULES`] row wins; no match
/// yields `None`.
pub fn identify_color(h: f32, s: f32, v: f32) -> Option<ColorName> {
    if s < 10.0 {
        return Some(if v < 20.0 {
            ColorName::Black
        } else if v > 90.0 {
            ColorName::White
        } else {
            ColorName::Grey
        });
    }

    COLOR_RULES
        .iter()
        .find(|rule| rule.matches(h, s, v))
        .map(|rule| rule.name)
}
