use api::{Role, UserDraft, UserRecord};
use directory::{Field, ValidationErrors};
use dioxus::prelude::*;

/// Create/edit form for one account.
///
/// With `editing` set the fields are prefilled from that record and the
/// password may be left blank to keep the current one. Field errors come
/// from the controller's validation and are shown under each input.
#[component]
pub fn UserForm(
    #[props(!optional)] editing: Option<UserRecord>,
    #[props(default)] errors: ValidationErrors,
    #[props(default = false)] busy: bool,
    on_submit: EventHandler<UserDraft>,
    on_cancel: EventHandler<()>,
) -> Element {
    let is_edit = editing.is_some();
    let initial = editing
        .as_ref()
        .map(UserDraft::from_record)
        .unwrap_or_default();

    let mut name = use_signal(|| initial.name.clone());
    let mut email = use_signal(|| initial.email.clone());
    let mut phone = use_signal(|| initial.phone.clone());
    let mut password = use_signal(String::new);
    let mut role = use_signal(|| initial.role.unwrap_or_default());

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let mut draft = UserDraft::new(name(), email(), phone()).with_role(role());
        if !password().is_empty() {
            draft = draft.with_password(password());
        }
        on_submit.call(draft);
    };

    let title = if is_edit { "Edit User" } else { "Add User" };
    let submit_label = match (is_edit, busy) {
        (_, true) => "Saving...",
        (true, false) => "Update",
        (false, false) => "Create",
    };
    let password_placeholder = if is_edit {
        "Leave blank to keep the current password"
    } else {
        ""
    };

    rsx! {
        form {
            class: "user-form",
            onsubmit: handle_submit,
            h2 { "{title}" }

            FormField {
                id: "user-name",
                label: "Name",
                error: errors.reason(Field::Name).map(str::to_string),
                input {
                    id: "user-name",
                    r#type: "text",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
            }

            FormField {
                id: "user-email",
                label: "Email",
                error: errors.reason(Field::Email).map(str::to_string),
                input {
                    id: "user-email",
                    r#type: "email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }

            FormField {
                id: "user-phone",
                label: "Phone",
                error: errors.reason(Field::Phone).map(str::to_string),
                input {
                    id: "user-phone",
                    r#type: "tel",
                    placeholder: "+12025550123",
                    value: phone(),
                    oninput: move |evt: FormEvent| phone.set(evt.value()),
                }
            }

            FormField {
                id: "user-password",
                label: "Password",
                error: errors.reason(Field::Password).map(str::to_string),
                input {
                    id: "user-password",
                    r#type: "password",
                    placeholder: password_placeholder,
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "user-role", "Role" }
                select {
                    id: "user-role",
                    value: role().as_str(),
                    onchange: move |evt| {
                        role.set(if evt.value() == "admin" { Role::Admin } else { Role::User })
                    },
                    option { value: "user", "User" }
                    option { value: "admin", "Admin" }
                }
            }

            div {
                class: "form-actions",
                button {
                    class: "btn btn--primary",
                    r#type: "submit",
                    disabled: busy,
                    "{submit_label}"
                }
                button {
                    class: "btn btn--outline",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}

#[component]
fn FormField(
    id: String,
    label: String,
    #[props(!optional)] error: Option<String>,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: if error.is_some() { "form-field form-field--invalid" } else { "form-field" },
            label { r#for: "{id}", "{label}" }
            {children}
            if let Some(ref error) = error {
                span { class: "form-error", "{label} {error}" }
            }
        }
    }
}
