use crate::auth::{self, LoginForm};
use crate::types::UserRole;
use crate::ui::{AppServices, AppTab};
use dioxus::prelude::*;

#[component]
pub fn RolePicker(role: Signal<UserRole>) -> Element {
    let mut role = role;
    rsx! {
        label { class: "label", "Role" }
        div { class: "composer",
            for option_role in [UserRole::Farmer, UserRole::Expert] {
                label {
                    input {
                        r#type: "radio",
                        name: "role",
                        checked: role() == option_role,
                        onchange: move |_| role.set(option_role),
                    }
                    " {option_role.label()}"
                }
            }
        }
    }
}

#[component]
pub fn LoginView(active_tab: Signal<AppTab>) -> Element {
    let mut active_tab = active_tab;
    let services = use_context::<AppServices>();
    let role = use_signal(UserRole::default);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut show_password = use_signal(|| false);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        error.set(None);
        loading.set(true);
        let form = LoginForm {
            role: role(),
            email: email(),
            password: password(),
        };
        let services = services.clone();
        spawn(async move {
            match auth::login(&services.client, &services.auth, &form).await {
                Ok(_) => active_tab.set(AppTab::Profile),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    rsx! {
        div { class: "page",
            form { class: "card", onsubmit: on_submit,
                h2 { class: "page-title", "Sign in" }
                RolePicker { role }
                label { class: "label", "Email" }
                input {
                    class: "input",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |ev| email.set(ev.value()),
                }
                label { class: "label", "Password" }
                div { class: "composer",
                    input {
                        class: "input",
                        r#type: if show_password() { "text" } else { "password" },
                        value: "{password}",
                        oninput: move |ev| password.set(ev.value()),
                    }
                    button {
                        class: "btn",
                        r#type: "button",
                        title: if show_password() { "Hide password" } else { "Show password" },
                        onclick: move |_| show_password.set(!show_password()),
                        if show_password() { "🙈" } else { "👁️" }
                    }
                }
                if let Some(message) = error() {
                    div { class: "error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
                p { class: "text-muted",
                    "New here? "
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| active_tab.set(AppTab::Register),
                        "Create account"
                    }
                }
            }
        }
    }
}
