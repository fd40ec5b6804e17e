#![forbid(unsafe_code)]

//! The DOM surface the controller reads and mutates.
//!
//! [`NavDocument`] is implemented over `web-sys` by the web frontend and by
//! [`RecordingDocument`] for native hosts and tests. The controller never
//! touches elements other than the ones named by [`NavElement`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Elements the controller writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NavElement {
    Navbar,
    Menu,
    Toggle,
    Body,
    /// Navigation link by discovery index.
    Link(usize),
}

/// Page operations needed by [`NavController`](crate::NavController).
pub trait NavDocument {
    fn add_class(&mut self, element: NavElement, class: &str);
    fn remove_class(&mut self, element: NavElement, class: &str);

    fn set_attribute(&mut self, element: NavElement, name: &str, value: &str);
    fn remove_attribute(&mut self, element: NavElement, name: &str);
    fn attribute(&self, element: NavElement, name: &str) -> Option<String>;

    fn set_style(&mut self, element: NavElement, property: &str, value: &str);
    fn remove_style(&mut self, element: NavElement, property: &str);

    /// Current vertical scroll offset in px.
    fn scroll_y(&self) -> f64;
    /// Set the vertical scroll offset.
    fn scroll_to(&mut self, y: f64);

    fn navbar_height(&self) -> f64;
    fn viewport_width(&self) -> f64;

    /// Document-relative top offset of section `id`, if it exists.
    fn section_top(&self, id: &str) -> Option<f64>;

    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

/// In-memory [`NavDocument`] that records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingDocument {
    classes: HashMap<NavElement, BTreeSet<String>>,
    attributes: HashMap<NavElement, BTreeMap<String, String>>,
    styles: HashMap<NavElement, BTreeMap<String, String>>,
    sections: Vec<(String, f64)>,
    scroll_y: f64,
    navbar_height: f64,
    viewport_width: f64,
    reduced_motion: bool,
    scroll_writes: Vec<f64>,
    class_writes: usize,
}

impl RecordingDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            navbar_height: 80.0,
            viewport_width: 1280.0,
            ..Self::default()
        }
    }

    /// Add a section at document offset `top`. Sections keep insertion order.
    #[must_use]
    pub fn with_section(mut self, id: impl Into<String>, top: f64) -> Self {
        self.sections.push((id.into(), top));
        self
    }

    #[must_use]
    pub fn with_navbar_height(mut self, px: f64) -> Self {
        self.navbar_height = px;
        self
    }

    #[must_use]
    pub fn with_viewport_width(mut self, px: f64) -> Self {
        self.viewport_width = px;
        self
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Move the scroll position without recording a write (user scrolling).
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn set_viewport_width(&mut self, px: f64) {
        self.viewport_width = px;
    }

    /// Section ids in document order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn has_class(&self, element: NavElement, class: &str) -> bool {
        self.classes
            .get(&element)
            .is_some_and(|set| set.contains(class))
    }

    #[must_use]
    pub fn style(&self, element: NavElement, property: &str) -> Option<&str> {
        self.styles
            .get(&element)
            .and_then(|map| map.get(property))
            .map(String::as_str)
    }

    /// Every position written through [`NavDocument::scroll_to`].
    #[must_use]
    pub fn scroll_writes(&self) -> &[f64] {
        &self.scroll_writes
    }

    /// Number of class additions/removals that changed state.
    #[must_use]
    pub const fn class_writes(&self) -> usize {
        self.class_writes
    }

    /// Links currently carrying `class`.
    #[must_use]
    pub fn links_with_class(&self, class: &str) -> Vec<usize> {
        let mut links: Vec<usize> = self
            .classes
            .iter()
            .filter_map(|(element, set)| match element {
                NavElement::Link(idx) if set.contains(class) => Some(*idx),
                _ => None,
            })
            .collect();
        links.sort_unstable();
        links
    }
}

impl NavDocument for RecordingDocument {
    fn add_class(&mut self, element: NavElement, class: &str) {
        if self
            .classes
            .entry(element)
            .or_default()
            .insert(class.to_string())
        {
            self.class_writes += 1;
        }
    }

    fn remove_class(&mut self, element: NavElement, class: &str) {
        if self
            .classes
            .get_mut(&element)
            .is_some_and(|set| set.remove(class))
        {
            self.class_writes += 1;
        }
    }

    fn set_attribute(&mut self, element: NavElement, name: &str, value: &str) {
        self.attributes
            .entry(element)
            .or_default()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, element: NavElement, name: &str) {
        if let Some(map) = self.attributes.get_mut(&element) {
            map.remove(name);
        }
    }

    fn attribute(&self, element: NavElement, name: &str) -> Option<String> {
        self.attributes
            .get(&element)
            .and_then(|map| map.get(name))
            .cloned()
    }

    fn set_style(&mut self, element: NavElement, property: &str, value: &str) {
        self.styles
            .entry(element)
            .or_default()
            .insert(property.to_string(), value.to_string());
    }

    fn remove_style(&mut self, element: NavElement, property: &str) {
        if let Some(map) = self.styles.get_mut(&element) {
            map.remove(property);
        }
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
        self.scroll_writes.push(y);
    }

    fn navbar_height(&self) -> f64 {
        self.navbar_height
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn section_top(&self, id: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|(section, _)| section == id)
            .map(|(_, top)| *top)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
