use crate::auth::{self, RegisterForm};
use crate::types::UserRole;
use crate::ui::{AppServices, AppTab};
use crate::views::login::RolePicker;
use dioxus::prelude::*;

#[component]
fn TextField(label: &'static str, value: Signal<String>, placeholder: Option<&'static str>) -> Element {
    let mut value = value;
    rsx! {
        div {
            label { class: "label", "{label}" }
            input {
                class: "input",
                value: "{value}",
                placeholder: placeholder.unwrap_or_default(),
                oninput: move |ev| value.set(ev.value()),
            }
        }
    }
}

#[component]
pub fn RegisterView(active_tab: Signal<AppTab>) -> Element {
    let mut active_tab = active_tab;
    let services = use_context::<AppServices>();
    let role = use_signal(UserRole::default);
    let name = use_signal(String::new);
    let email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let phone = use_signal(String::new);
    let soil_type = use_signal(String::new);
    let pincode = use_signal(String::new);
    let state = use_signal(String::new);
    let district = use_signal(String::new);
    let city = use_signal(String::new);
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
        let form = RegisterForm {
            role: role(),
            name: name(),
            email: email(),
            password: password(),
            phone: phone(),
            soil_type: soil_type(),
            pincode: pincode(),
            state: state(),
            district: district(),
            city: city(),
        };
        let services = services.clone();
        spawn(async move {
            match auth::register(&services.client, &services.auth, &form).await {
                Ok(_) => active_tab.set(AppTab::Profile),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    rsx! {
        div { class: "page",
            form { class: "card", onsubmit: on_submit,
                h2 { class: "page-title", "Create account" }
                RolePicker { role }
                TextField { label: "Full name", value: name }
                TextField { label: "Email", value: email }
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
                        onclick: move |_| show_password.set(!show_password()),
                        if show_password() { "🙈" } else { "👁️" }
                    }
                }
                TextField { label: "Phone number", value: phone }
                if role() == UserRole::Farmer {
                    TextField {
                        label: "Soil / Land Type",
                        value: soil_type,
                        placeholder: "e.g. Red loam, Sandy",
                    }
                }
                h4 { "Address" }
                div { class: "stats-row",
                    TextField { label: "Pincode", value: pincode }
                    TextField { label: "State", value: state }
                    TextField { label: "District", value: district }
                    TextField { label: "City", value: city }
                }
                if let Some(message) = error() {
                    div { class: "error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating..." } else { "Create account" }
                }
                p { class: "text-muted",
                    "Already have an account? "
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| active_tab.set(AppTab::Login),
                        "Sign in"
                    }
                }
            }
        }
    }
}
