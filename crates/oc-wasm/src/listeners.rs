//! DOM event subscriptions with scoped lifetime.
//!
//! A [`Listener`] removes itself from its target when dropped, so the
//! browser never calls into a freed closure.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

pub struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Register `handler` for `event_type` on `target`.
    ///
    /// `passive: Some(false)` is required for handlers that call
    /// `preventDefault` on wheel events; browsers default wheel listeners
    /// on the document to passive.
    pub fn new(
        target: &EventTarget,
        event_type: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    event_type,
                    callback.as_ref().unchecked_ref(),
                    &options,
                )?;
            }
            None => {
                target.add_event_listener_with_callback(
                    event_type,
                    callback.as_ref().unchecked_ref(),
                )?;
            }
        }
        log::debug!("listening for {event_type}");
        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
        log::debug!("stopped listening for {}", self.event_type);
    }
}

/// Every listener a canvas registered, released together.
#[derive(Default)]
pub struct Subscriptions {
    listeners: Vec<Listener>,
}

impl Subscriptions {
    pub fn push(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Unregister everything.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
