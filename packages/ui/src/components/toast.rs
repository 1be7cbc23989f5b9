use directory::Severity;
use dioxus::prelude::*;

use crate::platform::PlatformTimer;
use crate::provider::{use_directory, use_directory_view};

const TOAST_CSS: Asset = asset!("/assets/styling/toast.css");

/// Shows the controller's single notification and clears it after the
/// configured lifetime.
#[component]
pub fn NotificationToast() -> Element {
    let directory = use_directory();
    let view = use_directory_view();

    // One timer per notification id; stale timers are ignored by the controller
    let current_id = use_memo(move || view().notification.map(|n| n.id));
    let timer_directory = directory.clone();
    use_effect(move || {
        if let Some(id) = current_id() {
            let directory = timer_directory.clone();
            spawn(async move {
                directory.run_notification_timer(id, &PlatformTimer).await;
            });
        }
    });

    let current = view().notification;
    let Some(notification) = current else {
        return rsx! {};
    };

    let class = match notification.severity {
        Severity::Error => "toast toast--error",
        Severity::Success => "toast toast--success",
        Severity::Info => "toast toast--info",
    };

    rsx! {
        document::Stylesheet { href: TOAST_CSS }

        div {
            class: "{class}",
            role: "status",
            span { class: "toast-message", "{notification.message}" }
            button {
                class: "toast-close",
                title: "Dismiss",
                onclick: move |_| directory.dismiss_notification(),
                "×"
            }
        }
    }
}
