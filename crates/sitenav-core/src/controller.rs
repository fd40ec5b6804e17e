#![forbid(unsafe_code)]

//! The navigation controller.
//!
//! [`NavController`] owns the three pieces of page state (scrolled flag,
//! menu state, active section) and reacts to host-delivered events by
//! mutating a [`NavDocument`]. It never schedules anything itself: handlers
//! that need a follow-up (debounce timer, animation frame) return what the
//! host should schedule.
//!
//! # Invariants
//!
//! 1. At most one link carries the active marker; every update clears all
//!    links before marking one.
//! 2. Style markers are written only when the underlying flag changes.
//! 3. After [`NavController::teardown`] every handler is a no-op.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::NavConfig;
use crate::debounce::Debouncer;
use crate::document::{NavDocument, NavElement};
use crate::error::NavError;
use crate::link::NavLink;
use crate::menu::{MenuEvent, MenuState};
use crate::scroll_animator::{AnimationTicket, ScrollAnimator, ScrollStart};
use crate::sections::{IntersectionSample, SectionOffset, initial_active, most_visible};

const NAVBAR_LABEL: &str = "Main navigation";
const TOGGLE_LABEL: &str = "Toggle navigation menu";

/// Keys that activate a focused navigation link.
#[must_use]
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

#[must_use]
pub fn is_escape_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

/// The fixed element structure discovered on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLayout {
    pub links: Vec<NavLink>,
    /// Section ids in document order.
    pub sections: Vec<String>,
    pub has_toggle: bool,
    /// Menu element id, referenced by the toggle's `aria-controls`.
    pub menu_id: Option<String>,
}

impl NavLayout {
    pub fn new(links: Vec<NavLink>, sections: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            links,
            sections: sections.into_iter().map(Into::into).collect(),
            has_toggle: false,
            menu_id: None,
        }
    }

    #[must_use]
    pub fn with_toggle(mut self, menu_id: Option<String>) -> Self {
        self.has_toggle = true;
        self.menu_id = menu_id;
        self
    }
}

#[derive(Debug)]
pub struct NavController<D: NavDocument> {
    config: NavConfig,
    document: D,
    layout: NavLayout,
    scrolled: bool,
    menu: MenuState,
    active_section: Option<String>,
    debouncer: Debouncer,
    animator: ScrollAnimator,
    torn_down: bool,
}

impl<D: NavDocument> NavController<D> {
    /// Build a controller. Nothing is written until [`NavController::init`].
    pub fn new(document: D, layout: NavLayout, config: NavConfig) -> Self {
        let config = config.validated();
        Self {
            debouncer: Debouncer::new(config.scroll_debounce()),
            animator: ScrollAnimator::new(config.scroll_duration(), config.min_scroll_distance),
            config,
            document,
            layout,
            scrolled: false,
            menu: MenuState::Closed,
            active_section: None,
            torn_down: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &NavLayout {
        &self.layout
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub const fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        self.menu.is_open()
    }

    #[must_use]
    pub const fn menu_state(&self) -> MenuState {
        self.menu
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Accessibility pass, initial scroll-state sync and initial active
    /// section scan.
    pub fn init(&mut self) -> Result<(), NavError> {
        if self.torn_down {
            return Err(NavError::TornDown);
        }
        self.apply_accessibility();
        self.update_scrolled();
        self.activate_from_scroll_position();
        debug!(
            links = self.layout.links.len(),
            sections = self.layout.sections.len(),
            toggle = self.layout.has_toggle,
            "navigation controller initialized"
        );
        Ok(())
    }

    fn apply_accessibility(&mut self) {
        self.set_attribute_if_missing(NavElement::Navbar, "role", "navigation");
        self.set_attribute_if_missing(NavElement::Navbar, "aria-label", NAVBAR_LABEL);

        if self.layout.has_toggle {
            self.set_attribute_if_missing(NavElement::Toggle, "aria-label", TOGGLE_LABEL);
            self.document
                .set_attribute(NavElement::Toggle, "aria-expanded", "false");
            if let Some(menu_id) = self.layout.menu_id.as_deref() {
                self.document
                    .set_attribute(NavElement::Toggle, "aria-controls", menu_id);
            }
        }

        for index in 0..self.layout.links.len() {
            let element = NavElement::Link(index);
            self.set_attribute_if_missing(element, "tabindex", "0");
            if self.layout.links[index].href.is_none() {
                self.set_attribute_if_missing(element, "role", "link");
            }
            let label = self.layout.links[index].label.trim().to_string();
            if !label.is_empty() {
                self.set_attribute_if_missing(element, "aria-label", &label);
            }
        }
    }

    fn set_attribute_if_missing(&mut self, element: NavElement, name: &str, value: &str) {
        if self.document.attribute(element, name).is_none() {
            self.document.set_attribute(element, name, value);
        }
    }

    /// Mark the link of the last section whose top is above the navbar.
    fn activate_from_scroll_position(&mut self) {
        let offsets: Vec<(String, f64)> = self
            .layout
            .sections
            .iter()
            .filter_map(|id| self.document.section_top(id).map(|top| (id.clone(), top)))
            .collect();
        let sections: Vec<SectionOffset<'_>> = offsets
            .iter()
            .map(|(id, top)| SectionOffset { id, top: *top })
            .collect();
        let offset = self.document.navbar_height() + self.config.scroll_gap;
        if let Some(id) = initial_active(&sections, self.document.scroll_y(), offset) {
            let id = id.to_string();
            debug!(section = %id, "initial active section");
            self.activate_section(id);
        }
    }

    // ------------------------------------------------------------------
    // Scroll monitor
    // ------------------------------------------------------------------

    /// Record a scroll event at host time `now`.
    ///
    /// Returns the delay after which the host should call
    /// [`NavController::poll_scroll`], or `None` once torn down.
    pub fn on_scroll(&mut self, now: Duration) -> Option<Duration> {
        if self.torn_down {
            return None;
        }
        Some(self.debouncer.trigger(now))
    }

    /// Run the debounced scroll update if its window has elapsed.
    pub fn poll_scroll(&mut self, now: Duration) -> bool {
        if self.torn_down || !self.debouncer.poll(now) {
            return false;
        }
        self.update_scrolled();
        true
    }

    /// Time until the debounced scroll update is due, if one is pending.
    ///
    /// Hosts whose timers can fire slightly early use this to re-arm.
    #[must_use]
    pub fn pending_scroll_delay(&self, now: Duration) -> Option<Duration> {
        if self.torn_down {
            return None;
        }
        self.debouncer.remaining(now)
    }

    /// Sync the scrolled marker with the current offset. Writes only when
    /// the flag crosses the threshold.
    pub fn update_scrolled(&mut self) {
        let scrolled = self.document.scroll_y() > self.config.scroll_threshold;
        if scrolled == self.scrolled {
            return;
        }
        self.scrolled = scrolled;
        let class = self.config.classes.scrolled.clone();
        if scrolled {
            self.document.add_class(NavElement::Navbar, &class);
        } else {
            self.document.remove_class(NavElement::Navbar, &class);
        }
        debug!(scrolled, "navbar scroll state changed");
    }

    // ------------------------------------------------------------------
    // Smooth scroll
    // ------------------------------------------------------------------

    /// Follow link `index`.
    ///
    /// Returns a ticket when an animation was started; the host must then
    /// drive [`NavController::on_animation_frame`] once per frame. A link
    /// whose target section is missing logs a warning and does nothing.
    pub fn on_link_click(&mut self, index: usize) -> Result<Option<AnimationTicket>, NavError> {
        if self.torn_down {
            return Err(NavError::TornDown);
        }
        let link = self
            .layout
            .links
            .get(index)
            .ok_or(NavError::UnknownLink(index))?;
        let Some(target) = link.target_id().map(str::to_string) else {
            warn!(link = index, "navigation link has no jump target");
            return Ok(None);
        };
        let Some(top) = self.document.section_top(&target) else {
            warn!(link = index, target = %target, "jump target not found");
            return Ok(None);
        };

        let destination = (top - self.document.navbar_height() - self.config.scroll_gap).max(0.0);
        let current = self.document.scroll_y();

        self.apply_menu_event(MenuEvent::LinkActivated);
        self.set_active_link(Some(index));
        self.active_section = Some(target);

        if self.config.respect_reduced_motion && self.document.prefers_reduced_motion() {
            self.animator.cancel();
            if (destination - current).abs() >= self.config.min_scroll_distance {
                self.document.scroll_to(destination);
            }
            return Ok(None);
        }

        match self.animator.start(current, destination) {
            ScrollStart::Skipped => Ok(None),
            ScrollStart::Started(ticket) => Ok(Some(ticket)),
        }
    }

    /// Keyboard activation of link `index`: Enter and Space act as a click,
    /// other keys are ignored.
    pub fn on_link_key(
        &mut self,
        index: usize,
        key: &str,
    ) -> Result<Option<AnimationTicket>, NavError> {
        if !is_activation_key(key) {
            return Ok(None);
        }
        self.on_link_click(index)
    }

    /// Advance the animation for `ticket` to frame time `now`.
    ///
    /// Returns `true` if the host should request another frame.
    pub fn on_animation_frame(&mut self, ticket: AnimationTicket, now: Duration) -> bool {
        if self.torn_down {
            return false;
        }
        let step = self.animator.frame(ticket, now);
        if let Some(position) = step.position() {
            self.document.scroll_to(position);
        }
        step.wants_next_frame()
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    // ------------------------------------------------------------------
    // Active-section tracking
    // ------------------------------------------------------------------

    /// Handle a batch of intersection changes. Returns `true` if the active
    /// link changed.
    pub fn on_intersections(&mut self, samples: &[IntersectionSample]) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(id) = most_visible(samples) else {
            return false;
        };
        if self.active_section.as_deref() == Some(id) {
            return false;
        }
        let id = id.to_string();
        debug!(section = %id, "active section changed");
        self.activate_section(id);
        true
    }

    fn activate_section(&mut self, id: String) {
        let link = self.link_for_section(&id);
        self.set_active_link(link);
        self.active_section = Some(id);
    }

    fn link_for_section(&self, id: &str) -> Option<usize> {
        self.layout
            .links
            .iter()
            .position(|link| link.target_id() == Some(id))
    }

    fn set_active_link(&mut self, index: Option<usize>) {
        let class = self.config.classes.active.clone();
        for i in 0..self.layout.links.len() {
            if Some(i) == index {
                continue;
            }
            self.document.remove_class(NavElement::Link(i), &class);
            self.document
                .remove_attribute(NavElement::Link(i), "aria-current");
        }
        if let Some(i) = index {
            self.document.add_class(NavElement::Link(i), &class);
            self.document
                .set_attribute(NavElement::Link(i), "aria-current", "true");
        }
    }

    // ------------------------------------------------------------------
    // Mobile menu
    // ------------------------------------------------------------------

    pub fn on_toggle_click(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.apply_menu_event(MenuEvent::Toggle)
    }

    /// Document-level click; `inside_nav` is whether the click landed inside
    /// the menu or on the toggle.
    pub fn on_document_click(&mut self, inside_nav: bool) -> bool {
        if self.torn_down || inside_nav {
            return false;
        }
        self.apply_menu_event(MenuEvent::OutsideClick)
    }

    /// Document-level keydown.
    pub fn on_key(&mut self, key: &str) -> bool {
        if self.torn_down || !is_escape_key(key) {
            return false;
        }
        self.apply_menu_event(MenuEvent::Escape)
    }

    pub fn on_resize(&mut self, width: f64) -> bool {
        if self.torn_down {
            return false;
        }
        self.apply_menu_event(MenuEvent::Resize { width })
    }

    fn apply_menu_event(&mut self, event: MenuEvent) -> bool {
        let next = self.menu.on(event, self.config.mobile_breakpoint);
        if next == self.menu {
            return false;
        }
        self.menu = next;
        self.write_menu_state();
        debug!(?event, open = next.is_open(), "menu state changed");
        true
    }

    fn write_menu_state(&mut self) {
        let open = self.menu.is_open();
        let class = self.config.classes.open.clone();
        let expanded = if open { "true" } else { "false" };

        let mut targets = vec![NavElement::Menu];
        if self.layout.has_toggle {
            targets.push(NavElement::Toggle);
            self.document
                .set_attribute(NavElement::Toggle, "aria-expanded", expanded);
        }
        for element in targets {
            if open {
                self.document.add_class(element, &class);
            } else {
                self.document.remove_class(element, &class);
            }
        }

        if open {
            self.document
                .set_style(NavElement::Body, "overflow", "hidden");
        } else {
            self.document.remove_style(NavElement::Body, "overflow");
        }
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Stop all pending work and make every handler inert.
    ///
    /// An open menu is closed so body scrolling is not left disabled.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.animator.cancel();
        self.debouncer.cancel();
        if self.menu.is_open() {
            self.menu = MenuState::Closed;
            self.write_menu_state();
        }
        self.torn_down = true;
        debug!("navigation controller torn down");
    }
}
