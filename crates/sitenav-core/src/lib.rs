#![forbid(unsafe_code)]

//! `sitenav-core`: host-driven navigation-bar behavior for single-page sites.
//!
//! # Role in sitenav
//! This crate owns every decision the navigation bar makes: when the navbar
//! counts as scrolled, where a link scrolls to and how the scroll is paced,
//! which section is active, and whether the mobile menu is open. It has no
//! browser dependency; `sitenav-web` binds it to the live DOM.
//!
//! Design goals:
//! - **Host-driven time**: every handler takes the host's monotonic time; the
//!   crate never reads a clock or schedules callbacks.
//! - **Narrow DOM surface**: all effects go through [`NavDocument`], so the
//!   controller runs unchanged against [`RecordingDocument`] in tests.
//! - **Superseding animations**: a new scroll request invalidates any
//!   in-flight one through [`AnimationTicket`] generations.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod document;
pub mod easing;
pub mod error;
pub mod link;
pub mod menu;
pub mod scroll_animator;
pub mod sections;
pub mod subscriptions;

pub use config::{NavClasses, NavConfig};
pub use controller::{NavController, NavLayout, is_activation_key, is_escape_key};
pub use debounce::Debouncer;
pub use document::{NavDocument, NavElement, RecordingDocument};
pub use easing::ease_in_out_quart;
pub use error::NavError;
pub use link::{JUMP_TARGET_ATTR, NavLink};
pub use menu::{MenuEvent, MenuState};
pub use scroll_animator::{AnimationTicket, FrameStep, ScrollAnimator, ScrollStart};
pub use sections::{IntersectionSample, SectionOffset, initial_active, most_visible};
pub use subscriptions::{Subscriptions, Unsubscribe};
