//! Login page view.

use dioxus::prelude::*;
use ui::{use_directory_ready, use_directory_view, LoginForm, NotificationToast};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let view = use_directory_view();
    let ready = use_directory_ready();
    let nav = use_navigator();

    // If already logged in, go to the dashboard
    use_effect(move || {
        if ready() && view().authenticated {
            nav.replace(Route::Dashboard {});
        }
    });

    rsx! {
        NotificationToast {}

        div {
            class: "login-container",
            div {
                class: "login-card",
                h1 { "User Directory" }
                p { class: "login-subtitle", "Sign in with your account" }
                LoginForm {}
            }
        }
    }
}
