use dioxus::prelude::*;

#[component]
pub fn LoadingSpinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div {
            class: "spinner",
            role: "status",
            span { class: "spinner-ring" }
            span { class: "spinner-label", "{label}" }
        }
    }
}
