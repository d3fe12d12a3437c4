//! Browser size observation through `web_sys::ResizeObserver`.

use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Element, ResizeObserverBoxOptions, ResizeObserverEntry, ResizeObserverOptions,
    ResizeObserverSize,
};

use crate::error::{ResizeError, ResizeResult};
use crate::observer::{BoxSize, ContentRect, ObservedBox, ResizeEntry, ResizeHandler, ResizeObserver};

type EntryCallback = Closure<dyn FnMut(Array)>;

/// Size observer backed by the browser's `ResizeObserver`
pub struct WebResizeObserver {
    observer: web_sys::ResizeObserver,
    _callback: EntryCallback,
}

impl ResizeObserver for WebResizeObserver {
    type Target = Element;

    fn connect(handler: ResizeHandler<Element>) -> ResizeResult<Self> {
        let callback: EntryCallback = Closure::new(move |entries: Array| {
            let entries: Vec<ResizeEntry<Element>> = entries
                .iter()
                .map(|entry| convert_entry(entry.unchecked_into::<ResizeObserverEntry>()))
                .collect();
            handler(&entries);
        });

        let observer = web_sys::ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|err| ResizeError::Unsupported(describe_js_error(&err)))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    fn observe(&self, target: &Element, observed_box: ObservedBox) {
        let options = ResizeObserverOptions::new();
        options.set_box(match observed_box {
            ObservedBox::BorderBox => ResizeObserverBoxOptions::BorderBox,
            ObservedBox::ContentBox => ResizeObserverBoxOptions::ContentBox,
        });
        self.observer.observe_with_options(target, &options);
    }

    fn unobserve(&self, target: &Element) {
        self.observer.unobserve(target);
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for WebResizeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn convert_entry(entry: ResizeObserverEntry) -> ResizeEntry<Element> {
    let rect = entry.content_rect();
    ResizeEntry {
        target: entry.target(),
        border_box_size: box_size(&entry, "borderBoxSize"),
        content_box_size: box_size(&entry, "contentBoxSize"),
        content_rect: ContentRect {
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
        },
    }
}

// Older engines omit the box size fields or expose a single size object
// instead of a sequence of fragments.
fn box_size(entry: &ResizeObserverEntry, field: &str) -> Option<BoxSize> {
    let value = Reflect::get(entry, &JsValue::from_str(field)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }

    let size = if Array::is_array(&value) {
        let fragments: Array = value.unchecked_into();
        if fragments.length() == 0 {
            return None;
        }
        fragments.get(0)
    } else {
        value
    };

    let size: ResizeObserverSize = size.unchecked_into();
    Some(BoxSize::new(size.inline_size(), size.block_size()))
}

fn describe_js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
