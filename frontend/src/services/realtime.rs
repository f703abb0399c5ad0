//! Pusher binding for conversation events.
//!
//! The Pusher JS client is loaded by `index.html`; if it is missing or no
//! key was configured at build time, subscriptions fail and chat falls back
//! to refreshing on the student's own sends.

use brain_bridge_core::domain::chat::{EventHandler, RealtimeChannel, RealtimeError};
use log::{debug, info};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    type Pusher;

    #[wasm_bindgen(constructor, catch)]
    fn new(key: &str, options: &JsValue) -> Result<Pusher, JsValue>;

    #[wasm_bindgen(method)]
    fn subscribe(this: &Pusher, channel: &str) -> PusherChannel;

    #[wasm_bindgen(method)]
    fn unsubscribe(this: &Pusher, channel: &str);

    type PusherChannel;

    #[wasm_bindgen(method)]
    fn bind(this: &PusherChannel, event: &str, callback: &Closure<dyn FnMut(JsValue)>);
}

/// Connection settings baked in at build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PusherSettings {
    pub key: String,
    pub cluster: String,
}

impl PusherSettings {
    pub fn from_build_env() -> Option<Self> {
        let key = option_env!("NEXT_PUBLIC_PUSHER_KEY")?.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            cluster: option_env!("NEXT_PUBLIC_PUSHER_CLUSTER").unwrap_or("mt1").to_string(),
        })
    }
}

pub struct PusherRealtime {
    client: Result<Pusher, String>,
    // Closures must outlive the JS callbacks bound to them
    bindings: RefCell<HashMap<String, Vec<Closure<dyn FnMut(JsValue)>>>>,
}

impl PusherRealtime {
    pub fn connect(settings: Option<PusherSettings>) -> Self {
        let client = match settings {
            Some(settings) => {
                let options = js_sys::Object::new();
                let _ = js_sys::Reflect::set(&options, &"cluster".into(), &settings.cluster.into());
                Pusher::new(&settings.key, &options).map_err(|e| {
                    e.as_string()
                        .unwrap_or_else(|| "Pusher client is not loaded".to_string())
                })
            }
            None => Err("no Pusher key configured".to_string()),
        };

        match &client {
            Ok(_) => info!("Connected to real-time service"),
            Err(reason) => info!("Real-time updates unavailable: {}", reason),
        }

        Self {
            client,
            bindings: RefCell::new(HashMap::new()),
        }
    }
}

/// Event payloads arrive as JS objects; round-trip through JSON text
fn payload_to_json(payload: &JsValue) -> Value {
    js_sys::JSON::stringify(payload)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null)
}

impl RealtimeChannel for PusherRealtime {
    fn subscribe(
        &self,
        channel: &str,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), RealtimeError> {
        let client = self
            .client
            .as_ref()
            .map_err(|reason| RealtimeError::Unavailable(reason.clone()))?;

        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            handler(&payload_to_json(&payload));
        });
        client.subscribe(channel).bind(event, &callback);
        debug!("Bound {} on {}", event, channel);

        self.bindings
            .borrow_mut()
            .entry(channel.to_string())
            .or_default()
            .push(callback);
        Ok(())
    }

    fn unsubscribe(&self, channel: &str) {
        if let Ok(client) = &self.client {
            client.unsubscribe(channel);
        }
        self.bindings.borrow_mut().remove(channel);
        debug!("Unsubscribed from {}", channel);
    }
}
