use dioxus::prelude::*;

use crate::icons::FaMagnifyingGlass;
use crate::Icon;

/// Search box. Submits on Enter or the button; the caller restarts paging.
#[component]
pub fn SearchBar(
    #[props(default = String::new())] initial: String,
    on_search: EventHandler<String>,
) -> Element {
    let mut term = use_signal(move || initial);

    rsx! {
        form {
            class: "search-bar",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_search.call(term().trim().to_string());
            },
            input {
                r#type: "search",
                placeholder: "Search by name or email",
                value: term(),
                oninput: move |evt: FormEvent| term.set(evt.value()),
            }
            button {
                class: "btn btn--outline",
                r#type: "submit",
                title: "Search",
                Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
            }
        }
    }
}
