#![forbid(unsafe_code)]

//! WASM frontend for sitenav.
//!
//! This crate provides [`SiteNav`], a `wasm-bindgen`-exported handle that
//! discovers the page's navigation structure, binds a
//! [`sitenav_core::NavController`] to it, and owns every browser listener,
//! observer and timer until `destroy()` is called.
//!
//! Option parsing and logging helpers are platform-independent so they can
//! be tested natively; the DOM binding itself only compiles on `wasm32`.

pub mod error;
pub mod logging;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{SiteNav, WebDocument, init_logging_js};

pub use error::WebError;
pub use options::{MountOptions, NavSelectors};
