#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use pretty_assertions::assert_eq;
use sitenav_web::SiteNav;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, Event, EventInit, HtmlElement, Window};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
<nav class="navbar">
  <button class="nav-toggle">Menu</button>
  <ul class="nav-menu" id="primary-menu">
    <li><a class="nav-link" href="#home">Home</a></li>
    <li><a class="nav-link" data-target="about">About</a></li>
    <li><a class="nav-link" href="https://example.com/">Blog</a></li>
    <li><span class="menu-note">Follow us</span></li>
  </ul>
</nav>
<section id="home" style="height: 1200px">Home</section>
<section id="about" style="height: 1200px">About</section>
"##;

fn window() -> Window {
    web_sys::window().expect("test runs in a browser")
}

fn document() -> Document {
    window().document().expect("window has a document")
}

fn mount_page() -> Document {
    let doc = document();
    doc.body().expect("body").set_inner_html(PAGE);
    window().scroll_to_with_x_and_y(0.0, 0.0);
    doc
}

/// Dispatch a bubbling, cancelable click. A plain `Event` never runs link
/// activation, so the test page is not navigated away.
fn cancelable_click(target: &HtmlElement) -> bool {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict("click", &init).unwrap();
    target.dispatch_event(&event).unwrap()
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn element(doc: &Document, selector: &str) -> HtmlElement {
    doc.query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("missing {selector}"))
        .dyn_into::<HtmlElement>()
        .unwrap()
}

#[wasm_bindgen_test]
fn mount_sets_accessibility_attributes() {
    let doc = mount_page();
    let mut nav = SiteNav::new(None).expect("mount");
    let toggle = element(&doc, ".nav-toggle");
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("false"));
    assert_eq!(toggle.get_attribute("aria-controls").as_deref(), Some("primary-menu"));
    assert_eq!(
        element(&doc, ".navbar").get_attribute("role").as_deref(),
        Some("navigation")
    );
    nav.destroy();
}

#[wasm_bindgen_test]
fn toggle_click_opens_and_escape_closes() {
    let doc = mount_page();
    let mut nav = SiteNav::new(None).expect("mount");
    element(&doc, ".nav-toggle").click();
    assert!(nav.is_menu_open());
    assert!(element(&doc, ".nav-menu").class_list().contains("open"));

    let init = web_sys::KeyboardEventInit::new();
    init.set_key("Escape");
    let event = web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    doc.dispatch_event(&event).unwrap();
    assert!(!nav.is_menu_open());
    nav.destroy();
}

#[wasm_bindgen_test]
fn destroy_detaches_listeners() {
    let doc = mount_page();
    let mut nav = SiteNav::new(None).expect("mount");
    nav.destroy();
    element(&doc, ".nav-toggle").click();
    assert!(!nav.is_menu_open());
    assert!(!element(&doc, ".nav-menu").class_list().contains("open"));
}

#[wasm_bindgen_test]
fn missing_navbar_fails_mount() {
    let doc = document();
    doc.body().expect("body").set_inner_html("<main></main>");
    assert!(SiteNav::new(None).is_err());
}

#[wasm_bindgen_test]
fn outside_click_closes_menu_but_inside_click_does_not() {
    let doc = mount_page();
    let nav = SiteNav::new(None).expect("mount");
    element(&doc, ".nav-toggle").click();
    assert!(nav.is_menu_open(), "toggle click must not count as outside");

    element(&doc, ".menu-note").click();
    assert!(nav.is_menu_open());

    element(&doc, "#home").click();
    assert!(!nav.is_menu_open());
    assert!(!element(&doc, ".nav-menu").class_list().contains("open"));
}

#[wasm_bindgen_test]
fn only_in_page_links_cancel_the_default_action() {
    let doc = mount_page();
    let nav = SiteNav::new(None).expect("mount");
    assert!(!cancelable_click(&element(&doc, r##"a[href="#home"]"##)));
    assert!(cancelable_click(&element(&doc, r#"a[href="https://example.com/"]"#)));
    drop(nav);
}

#[wasm_bindgen_test]
fn resize_past_breakpoint_closes_menu() {
    let doc = mount_page();
    let nav = SiteNav::new(Some(r#"{"config": {"mobile_breakpoint": 0}}"#.to_string()))
        .expect("mount");
    element(&doc, ".nav-toggle").click();
    assert!(nav.is_menu_open());

    window().dispatch_event(&Event::new("resize").unwrap()).unwrap();
    assert!(!nav.is_menu_open());
    assert_eq!(document().body().unwrap().style().get_property_value("overflow").unwrap(), "");
}

#[wasm_bindgen_test]
async fn link_click_animates_to_section() {
    let doc = mount_page();
    let nav = SiteNav::new(None).expect("mount");
    element(&doc, "a[data-target=about]").click();
    assert_eq!(nav.active_section().as_deref(), Some("about"));

    sleep(1_200).await;
    assert!(window().scroll_y().unwrap() > 0.0, "frames never scrolled the page");
    assert!(element(&doc, "a[data-target=about]").class_list().contains("active"));
}

#[wasm_bindgen_test]
async fn observer_tracks_sections_until_destroyed() {
    let doc = mount_page();
    let mut nav = SiteNav::new(None).expect("mount");
    let about_top = f64::from(element(&doc, "#about").offset_top());

    window().scroll_to_with_x_and_y(0.0, about_top);
    sleep(300).await;
    assert_eq!(nav.active_section().as_deref(), Some("about"));

    nav.destroy();
    window().scroll_to_with_x_and_y(0.0, 0.0);
    sleep(300).await;
    assert_eq!(nav.active_section().as_deref(), Some("about"));
    assert!(!element(&doc, r##"a[href="#home"]"##).class_list().contains("active"));
}
