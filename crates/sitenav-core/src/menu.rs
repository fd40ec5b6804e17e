#![forbid(unsafe_code)]

//! Mobile menu state machine.
//!
//! ```text
//!            Toggle
//!   Closed ─────────▶ Open
//!     ▲                 │
//!     └─────────────────┘
//!   Toggle | OutsideClick | Escape | LinkActivated | Resize(width > breakpoint)
//! ```
//!
//! Nothing leaves `Closed` except `Toggle`.

/// Menu visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

/// Inputs to the menu state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEvent {
    /// Hamburger toggle clicked.
    Toggle,
    /// Click landed outside the menu and the toggle.
    OutsideClick,
    /// Escape key pressed.
    Escape,
    /// A navigation link was followed from inside the menu.
    LinkActivated,
    /// Viewport resized to `width` px.
    Resize { width: f64 },
}

impl MenuState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Next state after `event`, given the mobile `breakpoint` in px.
    #[must_use]
    pub fn on(self, event: MenuEvent, breakpoint: f64) -> Self {
        match (self, event) {
            (Self::Closed, MenuEvent::Toggle) => Self::Open,
            (Self::Open, MenuEvent::Toggle)
            | (Self::Open, MenuEvent::OutsideClick)
            | (Self::Open, MenuEvent::Escape)
            | (Self::Open, MenuEvent::LinkActivated) => Self::Closed,
            (Self::Open, MenuEvent::Resize { width }) if width > breakpoint => Self::Closed,
            (state, _) => state,
        }
    }
}
