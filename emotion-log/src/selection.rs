//! Single-choice emotion buttons and the group grid padding.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

/// Emotion buttons per grid row.
pub const GRID_COLUMNS: usize = 4;

/// Which emotion button, if any, is active. Buttons are addressed by their
/// position in document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionSelection {
    active: Option<usize>,
}

impl EmotionSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection matching the page as loaded, where `active` is the button
    /// already marked active, if any.
    #[must_use]
    pub fn seeded(active: Option<usize>) -> Self {
        Self { active }
    }

    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Handle a click on button `index` and return the new active button.
    ///
    /// Clicking the active button clears the selection; any other click moves it.
    pub fn click(&mut self, index: usize) -> Option<usize> {
        self.active = if self.active == Some(index) { None } else { Some(index) };
        self.active
    }
}

/// Value reported for a button: its `data-value`, else its trimmed text.
#[must_use]
pub fn button_value(data_value: Option<&str>, text: &str) -> String {
    match data_value {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => text.trim().to_owned(),
    }
}

/// Placeholders needed to fill the last row of a group holding `count` buttons.
#[must_use]
pub fn placeholders_needed(count: usize) -> usize {
    match count % GRID_COLUMNS {
        0 => 0,
        rem => GRID_COLUMNS - rem,
    }
}
