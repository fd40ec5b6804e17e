#![forbid(unsafe_code)]

//! `wasm-bindgen` exports: binds [`NavController`] to the live page.
//!
//! Only compiled on `wasm32` targets. All browser scheduling (debounce
//! timeout, animation frames) lives here; the controller only reports what
//! needs scheduling.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::Array;
use sitenav_core::{
    AnimationTicket, IntersectionSample, JUMP_TARGET_ATTR, NavController, NavDocument, NavElement,
    NavError, NavLayout, NavLink, Subscriptions, Unsubscribe, is_activation_key,
};
use tracing::{debug, info, trace, warn};
use web_time::Instant;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    MediaQueryList, Node, ScrollBehavior, ScrollToOptions, Window,
};

use crate::error::WebError;
use crate::logging::{init_logging, install_panic_hook, parse_level};
use crate::options::{MountOptions, NavSelectors};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
/// Re-arm delay when a debounce timer fires a hair before its deadline.
const MIN_TIMER_DELAY: Duration = Duration::from_millis(1);

type Controller = NavController<WebDocument>;

fn js_error(op: &'static str, err: &JsValue) -> WebError {
    WebError::js(op, err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn log_dom_result<T>(op: &'static str, result: Result<T, JsValue>) {
    if let Err(err) = result {
        warn!(op, error = ?err, "dom write failed");
    }
}

fn ms_to_duration(ms: f64) -> Duration {
    Duration::from_secs_f64((ms / 1000.0).max(0.0))
}

fn query_one(document: &Document, selector: &str) -> Result<Option<HtmlElement>, WebError> {
    let Some(element) = document
        .query_selector(selector)
        .map_err(|err| js_error("querySelector", &err))?
    else {
        return Ok(None);
    };
    element
        .dyn_into::<HtmlElement>()
        .map(Some)
        .map_err(|_| WebError::js("querySelector", format!("{selector} is not an HTML element")))
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, WebError> {
    let list = document
        .query_selector_all(selector)
        .map_err(|err| js_error("querySelectorAll", &err))?;
    Ok((0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

// ---------------------------------------------------------------------------
// DOM-backed document
// ---------------------------------------------------------------------------

/// [`NavDocument`] over the elements discovered at mount time.
pub struct WebDocument {
    window: Window,
    navbar: HtmlElement,
    menu: HtmlElement,
    toggle: Option<HtmlElement>,
    body: HtmlElement,
    links: Vec<HtmlElement>,
    sections: Vec<HtmlElement>,
    reduced_motion: Option<MediaQueryList>,
}

impl WebDocument {
    /// Locate the navigation structure. Navbar and menu are required; the
    /// toggle is optional.
    fn discover(window: &Window, selectors: &NavSelectors) -> Result<(Self, NavLayout), WebError> {
        let document = window
            .document()
            .ok_or(NavError::MissingElement("document"))?;
        let body = document.body().ok_or(NavError::MissingElement("body"))?;
        let navbar =
            query_one(&document, &selectors.navbar)?.ok_or(NavError::MissingElement("navbar"))?;
        let menu = query_one(&document, &selectors.menu)?.ok_or(NavError::MissingElement("menu"))?;
        let toggle = query_one(&document, &selectors.toggle)?;
        let links = query_all(&document, &selectors.links)?;
        let sections: Vec<HtmlElement> = query_all(&document, &selectors.sections)?
            .into_iter()
            .filter(|section| !section.id().is_empty())
            .collect();

        let nav_links = links
            .iter()
            .map(|link| NavLink {
                target: link.get_attribute(JUMP_TARGET_ATTR),
                href: link.get_attribute("href"),
                label: link.text_content().unwrap_or_default().trim().to_string(),
            })
            .collect();
        let mut layout = NavLayout::new(nav_links, sections.iter().map(|section| section.id()));
        if toggle.is_some() {
            let menu_id = Some(menu.id()).filter(|id| !id.is_empty());
            layout = layout.with_toggle(menu_id);
        }

        let reduced_motion = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();

        debug!(
            links = links.len(),
            sections = sections.len(),
            toggle = toggle.is_some(),
            "navigation structure discovered"
        );

        Ok((
            Self {
                window: window.clone(),
                navbar,
                menu,
                toggle,
                body,
                links,
                sections,
                reduced_motion,
            },
            layout,
        ))
    }

    fn element(&self, element: NavElement) -> Option<&HtmlElement> {
        match element {
            NavElement::Navbar => Some(&self.navbar),
            NavElement::Menu => Some(&self.menu),
            NavElement::Toggle => self.toggle.as_ref(),
            NavElement::Body => Some(&self.body),
            NavElement::Link(idx) => self.links.get(idx),
        }
    }

    /// Whether `node` is inside the menu or the toggle.
    fn contains_nav(&self, node: &Node) -> bool {
        self.menu.contains(Some(node))
            || self
                .toggle
                .as_ref()
                .is_some_and(|toggle| toggle.contains(Some(node)))
    }
}

impl NavDocument for WebDocument {
    fn add_class(&mut self, element: NavElement, class: &str) {
        if let Some(el) = self.element(element) {
            log_dom_result("classList.add", el.class_list().add_1(class));
        }
    }

    fn remove_class(&mut self, element: NavElement, class: &str) {
        if let Some(el) = self.element(element) {
            log_dom_result("classList.remove", el.class_list().remove_1(class));
        }
    }

    fn set_attribute(&mut self, element: NavElement, name: &str, value: &str) {
        if let Some(el) = self.element(element) {
            log_dom_result("setAttribute", el.set_attribute(name, value));
        }
    }

    fn remove_attribute(&mut self, element: NavElement, name: &str) {
        if let Some(el) = self.element(element) {
            log_dom_result("removeAttribute", el.remove_attribute(name));
        }
    }

    fn attribute(&self, element: NavElement, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn set_style(&mut self, element: NavElement, property: &str, value: &str) {
        if let Some(el) = self.element(element) {
            log_dom_result("style.setProperty", el.style().set_property(property, value));
        }
    }

    fn remove_style(&mut self, element: NavElement, property: &str) {
        if let Some(el) = self.element(element) {
            log_dom_result("style.removeProperty", el.style().remove_property(property));
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, y: f64) {
        // Instant, so a page-level `scroll-behavior: smooth` does not fight
        // the frame-by-frame animation.
        let options = ScrollToOptions::new();
        options.set_top(y);
        options.set_behavior(ScrollBehavior::Instant);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn navbar_height(&self) -> f64 {
        f64::from(self.navbar.offset_height())
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn section_top(&self, id: &str) -> Option<f64> {
        let section = self.sections.iter().find(|section| section.id() == id)?;
        Some(section.get_bounding_client_rect().top() + self.scroll_y())
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
            .as_ref()
            .is_some_and(MediaQueryList::matches)
    }
}

// ---------------------------------------------------------------------------
// Listener registrations
// ---------------------------------------------------------------------------

/// One subscribe/unsubscribe pair.
enum Registration {
    Listener {
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    },
    Observer {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
    },
}

impl Unsubscribe for Registration {
    fn unsubscribe(self) {
        match self {
            Self::Listener {
                target,
                kind,
                callback,
            } => log_dom_result(
                "removeEventListener",
                target.remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()),
            ),
            Self::Observer { observer, .. } => observer.disconnect(),
        }
    }
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<Registration, WebError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    let result = if passive {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )
    } else {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
    };
    result.map_err(|err| js_error("addEventListener", &err))?;
    trace!(kind, "listener attached");
    Ok(Registration::Listener {
        target: target.clone(),
        kind,
        callback,
    })
}

fn observe_sections(
    runtime: &Rc<Runtime>,
    sections: &[Element],
    root_margin: &str,
    thresholds: &[f64],
) -> Result<Registration, WebError> {
    let weak = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            let Some(rt) = weak.upgrade() else {
                return;
            };
            let samples: Vec<IntersectionSample> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| {
                    IntersectionSample::new(
                        entry.target().id(),
                        entry.intersection_ratio(),
                        entry.is_intersecting(),
                    )
                })
                .collect();
            rt.with_nav(|nav| nav.on_intersections(&samples));
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_root_margin(root_margin);
    let threshold_list = Array::new();
    for threshold in thresholds {
        threshold_list.push(&JsValue::from_f64(*threshold));
    }
    init.set_threshold(&threshold_list);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|err| js_error("IntersectionObserver", &err))?;
    for section in sections {
        observer.observe(section);
    }
    debug!(root_margin, sections = sections.len(), "sections observed");
    Ok(Registration::Observer {
        observer,
        _callback: callback,
    })
}

// ---------------------------------------------------------------------------
// Runtime: controller + browser scheduling
// ---------------------------------------------------------------------------

struct Runtime {
    window: Window,
    /// Origin of the debounce clock.
    epoch: Instant,
    nav: RefCell<Controller>,
    ticket: Cell<Option<AnimationTicket>>,
    frame_id: Cell<Option<i32>>,
    timeout_id: Cell<Option<i32>>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    timeout_cb: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Runtime {
    fn new(window: Window, nav: Controller) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let frame_weak = weak.clone();
            let frame_cb = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
                if let Some(rt) = frame_weak.upgrade() {
                    rt.on_frame(timestamp);
                }
            });
            let timeout_weak = weak.clone();
            let timeout_cb = Closure::<dyn FnMut()>::new(move || {
                if let Some(rt) = timeout_weak.upgrade() {
                    rt.on_timeout();
                }
            });
            Self {
                window,
                epoch: Instant::now(),
                nav: RefCell::new(nav),
                ticket: Cell::new(None),
                frame_id: Cell::new(None),
                timeout_id: Cell::new(None),
                frame_cb: RefCell::new(Some(frame_cb)),
                timeout_cb: RefCell::new(Some(timeout_cb)),
            }
        })
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Run `f` against the controller unless a handler is already running.
    fn with_nav<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
        match self.nav.try_borrow_mut() {
            Ok(mut nav) => Some(f(&mut nav)),
            Err(_) => {
                trace!("controller busy, event dropped");
                None
            }
        }
    }

    fn peek<R>(&self, f: impl FnOnce(&Controller) -> R) -> Option<R> {
        self.nav.try_borrow().ok().map(|nav| f(&nav))
    }

    fn on_scroll(&self) {
        let now = self.now();
        if let Some(Some(delay)) = self.with_nav(|nav| nav.on_scroll(now)) {
            self.schedule_scroll_poll(delay);
        }
    }

    fn schedule_scroll_poll(&self, delay: Duration) {
        if let Some(id) = self.timeout_id.take() {
            self.window.clear_timeout_with_handle(id);
        }
        let cb = self.timeout_cb.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms)
        {
            Ok(id) => self.timeout_id.set(Some(id)),
            Err(err) => warn!(error = ?err, "setTimeout failed"),
        }
    }

    fn on_timeout(&self) {
        self.timeout_id.set(None);
        let now = self.now();
        let rearm = self.with_nav(|nav| {
            if nav.poll_scroll(now) {
                None
            } else {
                nav.pending_scroll_delay(now)
            }
        });
        if let Some(Some(remaining)) = rearm {
            self.schedule_scroll_poll(remaining.max(MIN_TIMER_DELAY));
        }
    }

    fn follow_link(&self, index: usize, key: Option<&str>) {
        let result = self.with_nav(|nav| match key {
            Some(key) => nav.on_link_key(index, key),
            None => nav.on_link_click(index),
        });
        match result {
            Some(Ok(Some(ticket))) => {
                self.ticket.set(Some(ticket));
                self.request_frame();
            }
            Some(Err(err)) => warn!(link = index, %err, "link activation failed"),
            _ => {}
        }
    }

    fn request_frame(&self) {
        if self.frame_id.get().is_some() {
            // The pending frame picks up the newest ticket.
            return;
        }
        let cb = self.frame_cb.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.frame_id.set(Some(id)),
            Err(err) => warn!(error = ?err, "requestAnimationFrame failed"),
        }
    }

    fn on_frame(&self, timestamp: f64) {
        self.frame_id.set(None);
        let Some(ticket) = self.ticket.get() else {
            return;
        };
        let more = self
            .with_nav(|nav| nav.on_animation_frame(ticket, ms_to_duration(timestamp)))
            .unwrap_or(false);
        if more {
            self.request_frame();
        } else {
            self.ticket.set(None);
        }
    }

    /// Cancel pending browser work, tear the controller down and release
    /// the scheduling closures.
    fn stop(&self) {
        if let Some(id) = self.frame_id.take() {
            log_dom_result("cancelAnimationFrame", self.window.cancel_animation_frame(id));
        }
        if let Some(id) = self.timeout_id.take() {
            self.window.clear_timeout_with_handle(id);
        }
        self.ticket.set(None);
        self.with_nav(Controller::teardown);
        self.frame_cb.borrow_mut().take();
        self.timeout_cb.borrow_mut().take();
    }
}

/// Build a listener body that upgrades the runtime before running.
fn on_event(
    runtime: &Rc<Runtime>,
    handler: impl Fn(&Runtime, Event) + 'static,
) -> impl FnMut(Event) + 'static {
    let weak = Rc::downgrade(runtime);
    move |event: Event| {
        if let Some(rt) = weak.upgrade() {
            handler(&rt, event);
        }
    }
}

fn event_key(event: &Event) -> Option<String> {
    event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key)
}

// ---------------------------------------------------------------------------
// JS-facing handle
// ---------------------------------------------------------------------------

/// Navigation behavior mounted on the current page.
///
/// ```js
/// const nav = new SiteNav(JSON.stringify({ log_level: "info" }));
/// // ...
/// nav.destroy();
/// ```
#[wasm_bindgen]
pub struct SiteNav {
    runtime: Rc<Runtime>,
    subscriptions: Subscriptions<Registration>,
    destroyed: bool,
}

#[wasm_bindgen]
impl SiteNav {
    /// Discover the navigation structure and wire every behavior.
    ///
    /// `options_json` is an optional JSON object; see `MountOptions`.
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<SiteNav, JsValue> {
        Self::mount(options_json.as_deref()).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Remove every listener, disconnect the observer and stop any
    /// in-flight animation. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let removed = self.subscriptions.teardown();
        self.runtime.stop();
        info!(removed, "site navigation destroyed");
    }

    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.runtime
            .peek(Controller::is_menu_open)
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = isScrolled)]
    pub fn is_scrolled(&self) -> bool {
        self.runtime.peek(Controller::is_scrolled).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.runtime
            .peek(|nav| nav.active_section().map(str::to_string))
            .flatten()
    }
}

impl SiteNav {
    fn mount(options_json: Option<&str>) -> Result<Self, WebError> {
        install_panic_hook();
        let options = MountOptions::from_json(options_json)?;
        if let Some(level) = options.log_level.as_deref().and_then(parse_level) {
            init_logging(level);
        }

        let window = web_sys::window().ok_or(NavError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(NavError::MissingElement("document"))?;
        let (web_doc, layout) = WebDocument::discover(&window, &options.selectors)?;

        let link_targets: Vec<EventTarget> = web_doc
            .links
            .iter()
            .map(|link| link.clone().unchecked_into())
            .collect();
        let toggle_target: Option<EventTarget> =
            web_doc.toggle.as_ref().map(|t| t.clone().unchecked_into());
        let sections: Vec<Element> = web_doc
            .sections
            .iter()
            .map(|s| s.clone().unchecked_into())
            .collect();

        let mut nav = NavController::new(web_doc, layout, options.config);
        nav.init()?;
        let root_margin = nav.config().root_margin(nav.document().navbar_height());
        let thresholds = nav.config().observer_thresholds.clone();
        let in_page: Vec<bool> = nav
            .layout()
            .links
            .iter()
            .map(|link| link.target_id().is_some())
            .collect();
        let runtime = Runtime::new(window.clone(), nav);
        let mut subscriptions = Subscriptions::new();

        let window_target: &EventTarget = window.as_ref();
        let document_target: &EventTarget = document.as_ref();

        subscriptions.push(listen(
            window_target,
            "scroll",
            true,
            on_event(&runtime, |rt, _| rt.on_scroll()),
        )?);

        for (index, target) in link_targets.iter().enumerate() {
            let jumps = in_page[index];
            subscriptions.push(listen(
                target,
                "click",
                false,
                on_event(&runtime, move |rt, event| {
                    if jumps {
                        event.prevent_default();
                    }
                    rt.follow_link(index, None);
                }),
            )?);
            subscriptions.push(listen(
                target,
                "keydown",
                false,
                on_event(&runtime, move |rt, event| {
                    let Some(key) = event_key(&event) else {
                        return;
                    };
                    if !is_activation_key(&key) {
                        return;
                    }
                    if jumps {
                        event.prevent_default();
                    }
                    rt.follow_link(index, Some(&key));
                }),
            )?);
        }

        if let Some(toggle) = toggle_target.as_ref() {
            subscriptions.push(listen(
                toggle,
                "click",
                false,
                on_event(&runtime, |rt, _| {
                    rt.with_nav(Controller::on_toggle_click);
                }),
            )?);
        }

        subscriptions.push(listen(
            document_target,
            "click",
            false,
            on_event(&runtime, |rt, event| {
                let Some(node) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
                    return;
                };
                rt.with_nav(|nav| {
                    let inside = nav.document().contains_nav(&node);
                    nav.on_document_click(inside)
                });
            }),
        )?);

        subscriptions.push(listen(
            document_target,
            "keydown",
            false,
            on_event(&runtime, |rt, event| {
                if let Some(key) = event_key(&event) {
                    rt.with_nav(|nav| nav.on_key(&key));
                }
            }),
        )?);

        subscriptions.push(listen(
            window_target,
            "resize",
            true,
            on_event(&runtime, |rt, _| {
                rt.with_nav(|nav| {
                    let width = nav.document().viewport_width();
                    nav.on_resize(width)
                });
            }),
        )?);

        subscriptions.push(observe_sections(&runtime, &sections, &root_margin, &thresholds)?);

        info!(
            listeners = subscriptions.len(),
            links = link_targets.len(),
            sections = sections.len(),
            "site navigation mounted"
        );

        Ok(Self {
            runtime,
            subscriptions,
            destroyed: false,
        })
    }
}

impl Drop for SiteNav {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Install console logging at `level` (`"trace"` … `"error"`).
///
/// Returns `false` for an unknown level name.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(level: &str) -> bool {
    match parse_level(level) {
        Some(level) => {
            init_logging(level);
            true
        }
        None => false,
    }
}
