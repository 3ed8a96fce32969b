//! Browser bindings of the page effects.
//!
//! Listeners only forward events into the state machines; everything that
//! changes over time is written back from one `requestAnimationFrame` loop.

use std::{cell::RefCell, rc::Rc};

use rand::{rngs::SmallRng, SeedableRng};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlFormElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, NodeList, Window,
};

use crate::{
    input::SharedInput,
    page::{
        contact::{ButtonView, ContactForm},
        counter::{parse_target, Counter, COUNTER_OPTIONS, COUNTER_SELECTOR},
        cursor::{Cursor, RingStyle, INTERACTIVE_SELECTOR},
        loader::{Loader, LoaderConfig},
        nav::{Nav, ACTIVE_CLASS, OPEN_CLASS, SCROLLED_CLASS},
        reveal::{ObserverOptions, Reveal, REVEALED_CLASS, REVEAL_OPTIONS, REVEAL_SELECTOR},
        showcase::{self, parallax, Showcase, ShowcaseChange},
        sparks::sparks,
        timers::Millis,
    },
};

fn now(window: &Window) -> Millis {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn window_size(window: &Window) -> (f32, f32) {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (read(window.inner_width()), read(window.inner_height()))
}

fn scroll_y(window: &Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn html(element: Element) -> Option<HtmlElement> {
    element.dyn_into().ok()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::debug!("cannot set {}: {:?}", property, e);
    }
}

fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, on) {
        log::debug!("cannot toggle .{}: {:?}", class, e);
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // listeners live as long as the page
    closure.forget();
    Ok(())
}

fn observe(
    options: ObserverOptions,
    mut on_entry: impl FnMut(&IntersectionObserverEntry, &IntersectionObserver) + 'static,
) -> Result<IntersectionObserver, JsValue> {
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                on_entry(&entry, &observer);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(options.root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    Ok(observer)
}

struct CursorFx {
    cursor: Cursor,
    dot: HtmlElement,
    ring: HtmlElement,
}

impl CursorFx {
    fn apply_ring_style(&self, style: RingStyle) {
        let size = format!("{}px", style.size_px);
        set_style(&self.ring, "width", &size);
        set_style(&self.ring, "height", &size);
        set_style(&self.ring, "border-color", style.border_colour);
    }
}

struct LoaderFx {
    loader: Loader,
    overlay: Element,
    fill: Element,
    text: Element,
}

impl LoaderFx {
    fn write(&self) {
        let view = self.loader.view();
        // the gauge is an SVG stroke, not an HTML element
        if let Err(e) = self
            .fill
            .set_attribute("style", &format!("stroke-dashoffset: {}", view.dash_offset))
        {
            log::debug!("cannot update gauge: {:?}", e);
        }
        self.text.set_text_content(Some(&view.readout));
        set_class(&self.overlay, "hidden", view.hidden);
    }
}

struct CounterFx {
    element: Element,
    counter: Counter,
    finished: bool,
}

struct ShowcaseFx {
    showcase: Showcase,
    cars: Vec<Element>,
}

struct ContactFx {
    contact: ContactForm,
    form: HtmlFormElement,
    button: Option<HtmlElement>,
}

impl ContactFx {
    fn show(&self, view: &ButtonView) {
        if let Some(button) = &self.button {
            button.set_text_content(Some(view.label));
            set_style(button, "background", view.background);
        }
    }
}

#[derive(Default)]
struct PageState {
    cursor: Option<CursorFx>,
    loader: Option<LoaderFx>,
    nav: Nav,
    counters: Vec<CounterFx>,
    showcase: Option<ShowcaseFx>,
    contact: Option<ContactFx>,
}

impl PageState {
    fn frame(&mut self, now: Millis, pointer: (f32, f32)) {
        if let Some(fx) = self.cursor.as_mut() {
            fx.cursor.step(pointer);
            set_style(&fx.dot, "transform", &fx.cursor.dot_transform());
            set_style(&fx.ring, "transform", &fx.cursor.ring_transform());
        }

        if let Some(fx) = self.loader.as_mut() {
            if fx.loader.tick(now) {
                fx.write();
            }
        }

        for fx in self.counters.iter_mut().filter(|c| c.counter.is_started() && !c.finished) {
            fx.element.set_text_content(Some(&fx.counter.text_at(now)));
            fx.finished = fx.counter.is_done(now);
        }

        if let Some(fx) = self.showcase.as_mut() {
            for change in fx.showcase.tick(now) {
                match change {
                    ShowcaseChange::Advanced { previous, current } => {
                        set_class(&fx.cars[previous], showcase::ACTIVE_CLASS, false);
                        set_class(&fx.cars[previous], showcase::EXITING_CLASS, true);
                        set_class(&fx.cars[current], showcase::ACTIVE_CLASS, true);
                    }
                    ShowcaseChange::ExitDone(i) => {
                        set_class(&fx.cars[i], showcase::EXITING_CLASS, false);
                    }
                }
            }
        }

        if let Some(fx) = self.contact.as_mut() {
            if fx.contact.tick(now) {
                fx.show(&fx.contact.button());
                fx.form.reset();
            }
        }
    }
}

type Shared = Rc<RefCell<PageState>>;

fn track_input(window: &Window, document: &Document, input: &SharedInput) -> Result<(), JsValue> {
    {
        let (width, height) = window_size(window);
        let mut input = input.borrow_mut();
        input.window_resized(width, height);
        input.scrolled(scroll_y(window));
    }

    let pointer = input.clone();
    listen(document, "mousemove", move |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            pointer
                .borrow_mut()
                .pointer_moved(event.client_x() as f32, event.client_y() as f32);
        }
    })?;

    let (scroll, win) = (input.clone(), window.clone());
    listen(window, "scroll", move |_| scroll.borrow_mut().scrolled(scroll_y(&win)))?;

    let (resize, win) = (input.clone(), window.clone());
    listen(window, "resize", move |_| {
        let (width, height) = window_size(&win);
        resize.borrow_mut().window_resized(width, height);
    })
}

fn mount_cursor(document: &Document, state: &Shared) -> Result<(), JsValue> {
    let dot = document.get_element_by_id("cursor").and_then(html);
    let ring = document.get_element_by_id("cursorFollower").and_then(html);
    let (Some(dot), Some(ring)) = (dot, ring) else {
        log::debug!("no custom cursor on this page");
        return Ok(());
    };
    state.borrow_mut().cursor = Some(CursorFx {
        cursor: Cursor::default(),
        dot,
        ring,
    });

    for element in elements(document.query_selector_all(INTERACTIVE_SELECTOR)) {
        for (event, hovering) in [("mouseenter", true), ("mouseleave", false)] {
            let state = state.clone();
            listen(&element, event, move |_| {
                if let Some(fx) = state.borrow_mut().cursor.as_mut() {
                    let style = fx.cursor.set_hovering(hovering);
                    fx.apply_ring_style(style);
                }
            })?;
        }
    }
    Ok(())
}

fn mount_loader(window: &Window, document: &Document, state: &Shared) -> Result<(), JsValue> {
    let overlay = document.get_element_by_id("loader");
    let fill = document.query_selector(".rpm-fill").ok().flatten();
    let text = document.query_selector(".rpm-text").ok().flatten();
    let (Some(overlay), Some(fill), Some(text)) = (overlay, fill, text) else {
        log::debug!("no loader on this page");
        return Ok(());
    };

    let mut loader = Loader::start(LoaderConfig::default(), now(window));
    if document.ready_state() == "complete" {
        loader.on_load(now(window));
    } else {
        let (state, win) = (state.clone(), window.clone());
        listen(window, "load", move |_| {
            if let Some(fx) = state.borrow_mut().loader.as_mut() {
                fx.loader.on_load(now(&win));
            }
        })?;
    }
    let fx = LoaderFx {
        loader,
        overlay,
        fill,
        text,
    };
    fx.write();
    state.borrow_mut().loader = Some(fx);
    Ok(())
}

fn mount_nav(window: &Window, document: &Document, state: &Shared) -> Result<(), JsValue> {
    if let Some(nav) = document.get_element_by_id("nav") {
        let (state, win) = (state.clone(), window.clone());
        let mut page = state.borrow_mut();
        if page.nav.on_scroll(scroll_y(window)) {
            set_class(&nav, SCROLLED_CLASS, page.nav.is_scrolled());
        }
        drop(page);
        listen(window, "scroll", move |_| {
            let mut page = state.borrow_mut();
            if page.nav.on_scroll(scroll_y(&win)) {
                set_class(&nav, SCROLLED_CLASS, page.nav.is_scrolled());
            }
        })?;
    }

    let toggle = document.get_element_by_id("navToggle");
    let links = document.get_element_by_id("navLinks");
    let (Some(toggle), Some(links)) = (toggle, links) else {
        return Ok(());
    };

    {
        let (state, t, l) = (state.clone(), toggle.clone(), links.clone());
        listen(&toggle, "click", move |_| {
            let open = state.borrow_mut().nav.toggle_menu();
            set_class(&t, ACTIVE_CLASS, open);
            set_class(&l, OPEN_CLASS, open);
        })?;
    }
    for link in elements(links.query_selector_all("a")) {
        let (state, t, l) = (state.clone(), toggle.clone(), links.clone());
        listen(&link, "click", move |_| {
            state.borrow_mut().nav.close_menu();
            set_class(&t, ACTIVE_CLASS, false);
            set_class(&l, OPEN_CLASS, false);
        })?;
    }
    Ok(())
}

fn mount_reveal(document: &Document) -> Result<(), JsValue> {
    let targets = elements(document.query_selector_all(REVEAL_SELECTOR));
    if targets.is_empty() {
        return Ok(());
    }
    let mut reveal = Reveal::new(targets.len());
    let observed = targets.clone();
    let observer = observe(REVEAL_OPTIONS, move |entry, observer| {
        let target = entry.target();
        let Some(index) = observed.iter().position(|el| *el == target) else {
            return;
        };
        if reveal.on_intersect(index, entry.is_intersecting()) {
            set_class(&target, REVEALED_CLASS, true);
            observer.unobserve(&target);
        }
    })?;
    targets.iter().for_each(|el| observer.observe(el));
    log::debug!("observing {} reveal targets", targets.len());
    Ok(())
}

fn mount_counters(window: &Window, document: &Document, state: &Shared) -> Result<(), JsValue> {
    let mut counters = Vec::new();
    for element in elements(document.query_selector_all(COUNTER_SELECTOR)) {
        match element.get_attribute("data-target").as_deref().and_then(parse_target) {
            Some(target) => counters.push(CounterFx {
                element,
                counter: Counter::new(target),
                finished: false,
            }),
            None => log::warn!("counter without a numeric data-target, skipped"),
        }
    }
    if counters.is_empty() {
        return Ok(());
    }
    let observed: Vec<Element> = counters.iter().map(|c| c.element.clone()).collect();
    state.borrow_mut().counters = counters;

    let (state, win) = (state.clone(), window.clone());
    let observer = observe(COUNTER_OPTIONS, move |entry, observer| {
        if !entry.is_intersecting() {
            return;
        }
        let target = entry.target();
        if let Some(fx) = state
            .borrow_mut()
            .counters
            .iter_mut()
            .find(|c| c.element == target)
        {
            fx.counter.start(now(&win));
        }
        observer.unobserve(&target);
    })?;
    observed.iter().for_each(|el| observer.observe(el));
    Ok(())
}

fn mount_showcase(window: &Window, document: &Document, state: &Shared) -> Result<(), JsValue> {
    let Some(container) = document.get_element_by_id("carShowcase") else {
        return Ok(());
    };
    let cars = elements(container.query_selector_all(".hero-car"));
    let Some(showcase) = Showcase::start(cars.len(), now(window)) else {
        return Ok(());
    };
    set_class(&cars[showcase.current()], showcase::ACTIVE_CLASS, true);
    state.borrow_mut().showcase = Some(ShowcaseFx { showcase, cars });

    let (state, win) = (state.clone(), window.clone());
    listen(document, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let page = state.borrow();
        let Some(fx) = page.showcase.as_ref() else {
            return;
        };
        let Some(active) = fx
            .cars
            .get(fx.showcase.current())
            .and_then(|el| el.dyn_ref::<HtmlElement>())
        else {
            return;
        };
        let (width, height) = window_size(&win);
        let transform = parallax(event.client_x() as f32, event.client_y() as f32, width, height);
        set_style(active, "transform", &transform);
    })
}

fn mount_sparks(document: &Document) -> Result<(), JsValue> {
    let Some(container) = document.get_element_by_id("heroParticles") else {
        return Ok(());
    };
    let mut rng = SmallRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64);
    for spark in sparks(&mut rng) {
        let particle = document.create_element("div")?;
        particle.set_class_name("particle");
        particle.set_attribute("style", &spark.css_text())?;
        container.append_child(&particle)?;
    }
    Ok(())
}

fn mount_contact(window: &Window, document: &Document, state: &Shared) -> Result<(), JsValue> {
    let Some(form) = document
        .get_element_by_id("contactForm")
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(());
    };
    let button = form
        .query_selector("button[type=\"submit\"]")
        .ok()
        .flatten()
        .and_then(html);
    state.borrow_mut().contact = Some(ContactFx {
        contact: ContactForm::default(),
        form: form.clone(),
        button,
    });

    let (state, win) = (state.clone(), window.clone());
    listen(&form, "submit", move |event| {
        event.prevent_default();
        if let Some(fx) = state.borrow_mut().contact.as_mut() {
            let view = fx.contact.submit(now(&win));
            fx.show(&view);
        }
    })
}

fn start_frame_loop(window: &Window, state: Shared, input: SharedInput) -> Result<(), JsValue> {
    // The callback re-requests itself, so it has to be reachable from inside.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let win = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let pointer = input.borrow().pointer;
        state.borrow_mut().frame(now(&win), (pointer.x, pointer.y));
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = win.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("page effects stopped: {:?}", e);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Looks up every effect's elements, installs the listeners and starts the
/// page's animation loop. Pointer, scroll and window size are written to
/// `input` for the 3D scenes.
pub fn mount(input: SharedInput) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let state: Shared = Rc::new(RefCell::new(PageState::default()));

    track_input(&window, &document, &input)?;
    mount_cursor(&document, &state)?;
    mount_loader(&window, &document, &state)?;
    mount_nav(&window, &document, &state)?;
    mount_reveal(&document)?;
    mount_counters(&window, &document, &state)?;
    mount_showcase(&window, &document, &state)?;
    mount_sparks(&document)?;
    mount_contact(&window, &document, &state)?;
    start_frame_loop(&window, state, input)?;

    log::info!("page effects mounted");
    Ok(())
}
