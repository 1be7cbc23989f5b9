//! Host capabilities for the directory controller, picked per platform.
//!
//! - **Web** (WASM + `web` feature): `localStorage`, `window.confirm`,
//!   `setTimeout` via gloo-timers
//! - **Native**: in-memory storage, prompts that decline, tokio timers

use std::time::Duration;

use api::HttpApi;
use directory::{Confirm, Directory, Timer};
use store::AdminConfig;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStorageStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStore = store::MemoryStore;

/// The controller type the UI components work with.
pub type AppDirectory = Directory<HttpApi, PlatformStore, BrowserConfirm>;

/// Build the controller for this platform from `config`.
pub fn make_directory(config: &AdminConfig) -> AppDirectory {
    Directory::new(
        HttpApi::new(config.api.base_url.clone()),
        PlatformStore::new(),
        BrowserConfirm,
        config,
    )
}

/// `window.confirm`, or a refusal where there is no browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    async fn confirm(&self, message: &str) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return false;
            };
            window.confirm_with_message(message).unwrap_or(false)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!(prompt = message, "no confirmation prompt available, declining");
            false
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformTimer;

impl Timer for PlatformTimer {
    async fn sleep(&self, duration: Duration) {
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::sleep(duration).await;
        #[cfg(not(target_arch = "wasm32"))]
        tokio::time::sleep(duration).await;
    }
}
