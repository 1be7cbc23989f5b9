use directory::{page_window, PageItem};
use dioxus::prelude::*;

/// Previous / numbered / next page buttons.
#[component]
pub fn PaginationBar(
    current: u32,
    total: u32,
    #[props(default = false)] disabled: bool,
    on_select: EventHandler<u32>,
) -> Element {
    if total <= 1 {
        return rsx! {};
    }

    let items = page_window(current, total);

    rsx! {
        nav {
            class: "pagination",
            button {
                class: "page-btn",
                disabled: disabled || current <= 1,
                onclick: move |_| on_select.call(current.saturating_sub(1).max(1)),
                "Previous"
            }
            for (i, item) in items.into_iter().enumerate() {
                {match item {
                    PageItem::Page(page) => rsx! {
                        button {
                            key: "page-{page}",
                            class: if page == current { "page-btn page-btn--current" } else { "page-btn" },
                            disabled: disabled || page == current,
                            onclick: move |_| on_select.call(page),
                            "{page}"
                        }
                    },
                    PageItem::Gap => rsx! {
                        span { key: "gap-{i}", class: "page-gap", "…" }
                    },
                }}
            }
            button {
                class: "page-btn",
                disabled: disabled || current >= total,
                onclick: move |_| on_select.call(current + 1),
                "Next"
            }
        }
    }
}
