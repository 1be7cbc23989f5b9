use dioxus::prelude::*;

use crate::icons::FaRightFromBracket;
use crate::provider::{use_directory, use_directory_view};
use crate::Icon;

/// Top bar with the signed-in identity and a logout button.
#[component]
pub fn Navbar(#[props(default = "User Directory".to_string())] title: String) -> Element {
    let directory = use_directory();
    let view = use_directory_view();
    let identity = view().identity;
    let name = identity
        .as_ref()
        .map(|i| i.display_name().to_string())
        .unwrap_or_default();

    rsx! {
        header {
            class: "navbar",
            span { class: "navbar-title", "{title}" }
            if let Some(identity) = identity {
                div {
                    class: "navbar-user",
                    span { class: "navbar-name", "{name}" }
                    span { class: "badge badge--{identity.role}", "{identity.role}" }
                    LogoutButton { on_logout: move |_| directory.logout() }
                }
            }
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    on_logout: EventHandler<()>,
) -> Element {
    rsx! {
        button {
            class: "btn btn--outline",
            onclick: move |_| on_logout.call(()),
            Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            " {label}"
        }
    }
}
