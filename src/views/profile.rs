use crate::auth::load_profile;
use crate::types::UserProfile;
use crate::ui::{AppServices, AppTab};
use dioxus::prelude::*;

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

#[component]
pub fn ProfileView(active_tab: Signal<AppTab>) -> Element {
    let mut active_tab = active_tab;
    let services = use_context::<AppServices>();
    let auth = services.auth.clone();
    let profile = use_resource(move || {
        let services = services.clone();
        async move { load_profile(&services.client, &services.auth).await }
    });

    let body = match &*profile.read() {
        None => rsx! { div { class: "card", "Loading..." } },
        Some(None) => rsx! {
            div { class: "card",
                h3 { "Not signed in" }
                p { "Please sign in to view your profile." }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| active_tab.set(AppTab::Login),
                    "Sign in"
                }
            }
        },
        Some(Some(user)) => rsx! {
            ProfileSummary { user: user.clone() }
            button {
                class: "btn",
                onclick: move |_| {
                    if let Err(err) = auth.sign_out() {
                        tracing::warn!(error = %err, "could not clear session");
                    }
                    active_tab.set(AppTab::Login);
                },
                "Sign out"
            }
        },
    };

    rsx! {
        div { class: "page",
            h2 { class: "page-title", "Profile" }
            {body}
        }
    }
}

#[component]
fn Field(label: &'static str, value: String) -> Element {
    rsx! {
        label { class: "label", "{label}" }
        div { class: "field-value", "{value}" }
    }
}

#[component]
fn ProfileSummary(user: UserProfile) -> Element {
    let address = user.address.clone().unwrap_or_default();
    let soil_type = user.soil_type.clone().filter(|_| user.is_farmer());
    rsx! {
        div { class: "card",
            h3 { "Profile summary" }
            Field { label: "Name", value: or_dash(user.name.as_deref()) }
            Field { label: "Email", value: or_dash(user.email.as_deref()) }
            Field { label: "Mobile number", value: or_dash(user.phone.as_deref()) }
            Field { label: "Role", value: user.display_role().to_string() }
            if let Some(soil) = soil_type {
                Field { label: "Soil / Land Type", value: soil }
            }
            h4 { "Address" }
            Field { label: "Pincode", value: or_dash(address.pincode.as_deref()) }
            Field { label: "State", value: or_dash(address.state.as_deref()) }
            Field { label: "District", value: or_dash(address.district.as_deref()) }
            Field { label: "City", value: or_dash(address.city.as_deref()) }
        }
    }
}
