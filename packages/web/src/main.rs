use dioxus::prelude::*;

use store::AdminConfig;
use ui::DirectoryProvider;
use views::{Dashboard, Login};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/login")]
    Login {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Build-time configuration, with `API_BASE_URL` taking precedence over the
/// embedded file.
fn load_config() -> AdminConfig {
    let config = match AdminConfig::from_toml(include_str!("../admin.toml")) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid {}: {}", AdminConfig::filename(), e);
            AdminConfig::default()
        }
    };
    match option_env!("API_BASE_URL") {
        Some(url) if !url.is_empty() => config.with_base_url(url),
        _ => config,
    }
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::ADMIN_CSS }

        DirectoryProvider {
            config,
            Router::<Route> {}
        }
    }
}
