//! Account list with search, paging and the admin create/edit/delete flow.

use api::{UserDraft, UserRecord};
use directory::{ClientError, ValidationErrors};
use dioxus::prelude::*;
use ui::{
    use_directory, use_directory_ready, use_directory_view, LoadingSpinner, Navbar,
    NotificationToast, PaginationBar, SearchBar, UserForm, UserTable,
};

use crate::Route;

#[derive(Clone, Debug, PartialEq)]
enum FormMode {
    Closed,
    Create,
    Edit(UserRecord),
}

#[component]
pub fn Dashboard() -> Element {
    let directory = use_directory();
    let view = use_directory_view();
    let ready = use_directory_ready();
    let nav = use_navigator();

    let mut mode = use_signal(|| FormMode::Closed);
    let mut form_errors = use_signal(ValidationErrors::new);

    // Bounce to the login page once we know there is no session
    use_effect(move || {
        if ready() && !view().authenticated {
            nav.replace(Route::Login {});
        }
    });

    if !ready() {
        return rsx! {
            LoadingSpinner {}
        };
    }

    let snapshot = view();
    let is_admin = snapshot.is_admin();
    let page = snapshot.page.clone();

    let search_directory = directory.clone();
    let on_search = move |term: String| {
        let directory = search_directory.clone();
        spawn(async move {
            let _ = directory.search(&term).await;
        });
    };

    let page_directory = directory.clone();
    let on_page = move |page: u32| {
        let directory = page_directory.clone();
        spawn(async move {
            let _ = directory.go_to_page(page).await;
        });
    };

    let submit_directory = directory.clone();
    let on_submit = move |draft: UserDraft| {
        let directory = submit_directory.clone();
        let current = mode();
        spawn(async move {
            let result = match &current {
                FormMode::Edit(record) => directory
                    .update_record(&record.id, &draft)
                    .await
                    .map(|_| ()),
                FormMode::Create => directory.create_record(&draft).await.map(|_| ()),
                FormMode::Closed => return,
            };
            match result {
                Ok(()) => {
                    form_errors.set(ValidationErrors::new());
                    mode.set(FormMode::Closed);
                }
                Err(ClientError::Validation(errors)) => form_errors.set(errors),
                Err(e) => tracing::debug!("save failed: {}", e),
            }
        });
    };

    let delete_directory = directory.clone();
    let on_delete = move |id: String| {
        let directory = delete_directory.clone();
        spawn(async move {
            let _ = directory.delete_record(&id).await;
        });
    };

    let form_key = match mode() {
        FormMode::Edit(record) => record.id,
        _ => "new".to_string(),
    };
    let editing = match mode() {
        FormMode::Edit(record) => Some(record),
        _ => None,
    };

    rsx! {
        Navbar {}
        NotificationToast {}

        main {
            class: "dashboard",
            div {
                class: "dashboard-header",
                h1 { "Users" }
                span { class: "dashboard-count", "{page.total_count} total" }
                if is_admin && mode() == FormMode::Closed {
                    button {
                        class: "btn btn--primary",
                        onclick: move |_| {
                            form_errors.set(ValidationErrors::new());
                            mode.set(FormMode::Create);
                        },
                        "Add User"
                    }
                }
            }

            if is_admin && mode() != FormMode::Closed {
                div {
                    class: "dashboard-form",
                    UserForm {
                        key: "{form_key}",
                        editing,
                        errors: form_errors(),
                        busy: snapshot.mutating,
                        on_submit,
                        on_cancel: move |_| {
                            form_errors.set(ValidationErrors::new());
                            mode.set(FormMode::Closed);
                        },
                    }
                }
            }

            SearchBar { initial: snapshot.query.search.clone(), on_search }

            if snapshot.loading {
                LoadingSpinner {}
            }

            UserTable {
                records: page.records.clone(),
                show_actions: is_admin,
                disabled: snapshot.mutating,
                on_edit: move |record: UserRecord| {
                    form_errors.set(ValidationErrors::new());
                    mode.set(FormMode::Edit(record));
                },
                on_delete,
            }

            PaginationBar {
                current: page.current_page,
                total: page.total_pages,
                disabled: snapshot.loading,
                on_select: on_page,
            }
        }
    }
}
