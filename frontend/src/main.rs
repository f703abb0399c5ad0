mod components;
mod context;
mod hooks;
mod services;

use brain_bridge_core::config::{
    ClientConfig, API_BASE_URL_VAR, MEDIA_BASE_URL_VAR, PAYMENT_PATH_VAR, STORAGE_BASE_URL_VAR,
};
use brain_bridge_core::initialize_client;
use log::{error, info, LevelFilter};
use std::rc::Rc;
use std::sync::Arc;
use url::form_urlencoded;
use yew::prelude::*;

use components::booking_page::BookingPage;
use context::ClientContext;
use services::api::ApiClient;
use services::logging::Logger;
use services::realtime::{PusherRealtime, PusherSettings};
use services::storage::BrowserStore;

/// Values baked in by the build (`NEXT_PUBLIC_MAIN_BASE_URL=... trunk build`)
fn build_env(key: &str) -> Option<String> {
    let value = match key {
        API_BASE_URL_VAR => option_env!("NEXT_PUBLIC_MAIN_BASE_URL"),
        MEDIA_BASE_URL_VAR => option_env!("NEXT_PUBLIC_MEDIA_BASE_URL"),
        STORAGE_BASE_URL_VAR => option_env!("NEXT_PUBLIC_MAIN_STORAGE_URL"),
        PAYMENT_PATH_VAR => option_env!("BRAIN_BRIDGE_PAYMENT_PATH"),
        _ => None,
    };
    value.map(str::to_string)
}

fn setup_client() -> Result<ClientContext, String> {
    let config = ClientConfig::from_lookup(build_env).map_err(|e| e.to_string())?;

    let store = Arc::new(BrowserStore::new());
    let api = Arc::new(ApiClient::new(config.api_base_url.clone(), store.clone()));
    let realtime = Rc::new(PusherRealtime::connect(PusherSettings::from_build_env()));

    let state = initialize_client(config, api, store.clone(), store, realtime);
    Ok(ClientContext(Rc::new(state)))
}

/// Slot id from `?slot=<id>`
fn slot_from_query(search: &str) -> Option<i64> {
    form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "slot")
        .and_then(|(_, value)| value.trim().parse().ok())
}

#[derive(Properties, PartialEq)]
struct AppProps {
    client: Result<ClientContext, String>,
    slot_id: Option<i64>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let client = match &props.client {
        Ok(client) => client.clone(),
        Err(error) => {
            return html! {
                <main class="main">
                    <div class="form-message error">
                        <div class="error-title">{"Client is not configured"}</div>
                        <div>{error}</div>
                    </div>
                </main>
            };
        }
    };

    html! {
        <ContextProvider<ClientContext> context={client}>
            <header class="header">
                <div class="container">
                    <h1>{"Brain Bridge"}</h1>
                </div>
            </header>
            <main class="main">
                <div class="container">
                    {match props.slot_id {
                        Some(slot_id) => html! { <BookingPage {slot_id} /> },
                        None => html! {
                            <div class="form-message info">{"Choose a session to book from the course page."}</div>
                        },
                    }}
                </div>
            </main>
        </ContextProvider<ClientContext>>
    }
}

fn main() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Logger::init(level);

    let client = setup_client();
    if let Err(e) = &client {
        error!("Failed to configure client: {}", e);
    }

    let search = gloo::utils::window().location().search().unwrap_or_default();
    let slot_id = slot_from_query(&search);
    info!("Starting Brain Bridge client (slot {:?})", slot_id);

    yew::Renderer::<App>::with_props(AppProps { client, slot_id }).render();
}
