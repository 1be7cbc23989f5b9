use api::UserRecord;
use dioxus::prelude::*;

use crate::icons::{FaPen, FaTrash};
use crate::Icon;

/// The current page of accounts.
///
/// Edit and delete buttons are rendered only when `show_actions` is set.
/// That is cosmetic: the controller rejects mutations from non-admins anyway.
#[component]
pub fn UserTable(
    records: Vec<UserRecord>,
    show_actions: bool,
    #[props(default = false)] disabled: bool,
    on_edit: EventHandler<UserRecord>,
    on_delete: EventHandler<String>,
) -> Element {
    if records.is_empty() {
        return rsx! {
            p { class: "user-table-empty", "No users found." }
        };
    }

    rsx! {
        table {
            class: "user-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Email" }
                    th { "Phone" }
                    th { "Role" }
                    th { "Status" }
                    if show_actions {
                        th { class: "user-table-actions", "Actions" }
                    }
                }
            }
            tbody {
                for record in records {
                    UserRow {
                        key: "{record.id}",
                        record: record.clone(),
                        show_actions,
                        disabled,
                        on_edit,
                        on_delete,
                    }
                }
            }
        }
    }
}

#[component]
fn UserRow(
    record: UserRecord,
    show_actions: bool,
    disabled: bool,
    on_edit: EventHandler<UserRecord>,
    on_delete: EventHandler<String>,
) -> Element {
    let status = if record.is_active { "Active" } else { "Inactive" };
    let edit_record = record.clone();
    let delete_id = record.id.clone();

    rsx! {
        tr {
            td { "{record.name}" }
            td {
                "{record.email}"
                if record.email_verified {
                    span { class: "badge badge--verified", title: "Email verified", "✓" }
                }
            }
            td { "{record.phone}" }
            td {
                span { class: "badge badge--{record.role}", "{record.role}" }
            }
            td { "{status}" }
            if show_actions {
                td {
                    class: "user-table-actions",
                    button {
                        class: "icon-btn",
                        title: "Edit",
                        disabled,
                        onclick: move |_| on_edit.call(edit_record.clone()),
                        Icon { icon: FaPen, width: 14, height: 14 }
                    }
                    button {
                        class: "icon-btn icon-btn--danger",
                        title: "Delete",
                        disabled,
                        onclick: move |_| on_delete.call(delete_id.clone()),
                        Icon { icon: FaTrash, width: 14, height: 14 }
                    }
                }
            }
        }
    }
}
