use directory::{ClientError, Field, ValidationErrors};
use dioxus::prelude::*;

use crate::provider::{use_directory, use_directory_view};

/// Email/password login form wired to the controller.
#[component]
pub fn LoginForm() -> Element {
    let directory = use_directory();
    let view = use_directory_view();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(ValidationErrors::new);
    let mut submitting = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let directory = directory.clone();
        async move {
            submitting.set(true);
            match directory.login(&email(), &password()).await {
                Ok(identity) => {
                    tracing::info!("signed in as {}", identity.display_name());
                    errors.set(ValidationErrors::new());
                    password.set(String::new());
                }
                Err(ClientError::Validation(found)) => errors.set(found),
                Err(_) => errors.set(ValidationErrors::new()),
            }
            submitting.set(false);
        }
    };

    let busy = submitting() || view().loading;

    rsx! {
        form {
            class: "login-form",
            onsubmit: handle_submit,

            div {
                class: "form-field",
                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    autocomplete: "username",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                if errors().has(Field::Email) {
                    span { class: "form-error", "Email is required" }
                }
            }

            div {
                class: "form-field",
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                if errors().has(Field::Password) {
                    span { class: "form-error", "Password is required" }
                }
            }

            button {
                class: "btn btn--primary login-btn",
                r#type: "submit",
                disabled: busy,
                if busy { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
