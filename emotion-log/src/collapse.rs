//! Collapsible emotion groups and custom dropdowns.
//!
//! The collapse animation belongs to the host widget library; this side only
//! decides which way a header click should go and mirrors the library's
//! lifecycle events onto the header's `open` class.

#[cfg(test)]
#[path = "collapse_test.rs"]
mod collapse_test;

/// Class the library puts on an expanded section, and dropdowns use when shown.
pub const SHOWN_CLASS: &str = "show";
/// Class marking a header whose section is expanded.
pub const OPEN_CLASS: &str = "open";

/// Request sent to the collapse library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseCommand {
    Show,
    Hide,
}

impl CollapseCommand {
    /// What a header click does, given whether its section is currently shown.
    #[must_use]
    pub fn for_click(section_shown: bool) -> Self {
        if section_shown { Self::Hide } else { Self::Show }
    }
}

/// Collapse lifecycle event the form listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseEvent {
    Show,
    Hide,
}

impl CollapseEvent {
    pub const ALL: [Self; 2] = [Self::Show, Self::Hide];

    /// DOM event name fired by the library.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Show => "show.bs.collapse",
            Self::Hide => "hide.bs.collapse",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }

    /// Whether the header should carry [`OPEN_CLASS`] after this event.
    #[must_use]
    pub fn header_open(self) -> bool {
        matches!(self, Self::Show)
    }
}
