//! Intensity slider labels.

#[cfg(test)]
#[path = "intensity_test.rs"]
mod intensity_test;

/// Label for each slider position, lowest first.
pub const LEVELS: [&str; 10] = [
    "Muito leve",
    "Leve",
    "Tranquilo",
    "Moderado",
    "Perceptível",
    "Forte",
    "Muito forte",
    "Intenso",
    "Absurdo",
    "Extremo",
];

/// Values above this highlight the label.
pub const HIGHLIGHT_ABOVE: i64 = 4;

/// What the label element should show for a slider value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityLabel {
    pub text: &'static str,
    pub active: bool,
}

impl IntensityLabel {
    /// Label for the raw `value` of the range input. Values that do not parse
    /// or fall outside [`LEVELS`] yield an empty, inactive label.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match parse_leading_int(raw) {
            Some(value) => Self::for_value(value),
            None => Self { text: "", active: false },
        }
    }

    #[must_use]
    pub fn for_value(value: i64) -> Self {
        let text = usize::try_from(value).map_or("", |i| LEVELS.get(i).copied().unwrap_or_default());
        Self { text, active: value > HIGHLIGHT_ABOVE }
    }
}

/// Leading base-10 integer of `raw`, ignoring leading whitespace and any
/// trailing garbage (`"7.5"` is 7). `None` when no digits lead.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let mut magnitude: Option<i64> = None;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        let next = magnitude.unwrap_or(0).checked_mul(10)?.checked_add(i64::from(digit - b'0'))?;
        magnitude = Some(next);
    }
    magnitude.map(|n| sign * n)
}
