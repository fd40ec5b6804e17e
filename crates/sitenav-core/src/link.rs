#![forbid(unsafe_code)]

//! Navigation links and their jump targets.

/// Attribute carrying an explicit jump target (section id).
pub const JUMP_TARGET_ATTR: &str = "data-target";

/// A navigation link as discovered in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLink {
    /// Value of the jump-target attribute, if present.
    pub target: Option<String>,
    /// Raw `href`, if present.
    pub href: Option<String>,
    /// Accessible label (usually the link text).
    pub label: String,
}

impl NavLink {
    /// Link jumping to section `id` via the jump-target attribute.
    pub fn to_target(id: impl Into<String>) -> Self {
        Self {
            target: Some(id.into()),
            ..Self::default()
        }
    }

    /// Link pointing at `href`.
    pub fn to_href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Section id this link jumps to.
    ///
    /// The jump-target attribute wins; otherwise the fragment of an in-page
    /// `#id` href. External and empty references resolve to `None`.
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        if let Some(target) = self.target.as_deref().map(str::trim)
            && !target.is_empty()
        {
            return Some(target.trim_start_matches('#'));
        }
        let fragment = self.href.as_deref()?.trim().strip_prefix('#')?;
        (!fragment.is_empty()).then_some(fragment)
    }
}
