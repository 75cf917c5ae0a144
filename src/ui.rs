use crate::api::ApiClient;
use crate::auth::AuthStore;
use crate::config::AppConfig;
use crate::theme::theme_definition;
use crate::views::{
    AnalysisView, ChatView, HomeView, LoginView, ProfileView, RegisterView, SchemesView,
    WeatherView,
};
use crate::voice::{NullSpeechPlatform, SpeechPlatform};
use dioxus::prelude::*;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppTab {
    Home,
    Chat,
    Analysis,
    Weather,
    Schemes,
    Profile,
    Login,
    Register,
}

/// Everything a page needs to reach the outside world, built once in [`App`].
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub client: ApiClient,
    pub auth: AuthStore,
    pub speech: Arc<dyn SpeechPlatform>,
}

impl AppServices {
    pub fn new(config: AppConfig) -> Self {
        let client = ApiClient::new(&config);
        Self {
            config,
            client,
            auth: AuthStore::default(),
            speech: Arc::new(NullSpeechPlatform),
        }
    }
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| AppServices::new(AppConfig::from_env()));
    let active_tab = use_signal(|| AppTab::Home);

    rsx! {
        ThemeStyles {}
        div { class: "app-shell",
            TabPanel { active_tab }
            if !matches!(active_tab(), AppTab::Login | AppTab::Register) {
                BottomNav { active_tab }
            }
        }
    }
}

#[component]
fn ThemeStyles() -> Element {
    let definition = theme_definition();
    rsx! {
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>) -> Element {
    match active_tab() {
        AppTab::Home => rsx! { HomeView { active_tab } },
        AppTab::Chat => rsx! { ChatView {} },
        AppTab::Analysis => rsx! { AnalysisView {} },
        AppTab::Weather => rsx! { WeatherView {} },
        AppTab::Schemes => rsx! { SchemesView {} },
        AppTab::Profile => rsx! { ProfileView { active_tab } },
        AppTab::Login => rsx! { LoginView { active_tab } },
        AppTab::Register => rsx! { RegisterView { active_tab } },
    }
}

#[component]
fn BottomNav(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        nav { class: "bottom-nav",
            NavButton { active_tab, tab: AppTab::Home, label: "Home" }
            NavButton { active_tab, tab: AppTab::Chat, label: "Chat" }
            button {
                class: "nav-center",
                title: "Analysis",
                onclick: move |_| active_tab.set(AppTab::Analysis),
                "✦"
            }
            NavButton { active_tab, tab: AppTab::Weather, label: "Weather" }
            NavButton { active_tab, tab: AppTab::Profile, label: "Profile" }
        }
    }
}

#[component]
fn NavButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "nav-btn active"
    } else {
        "nav-btn"
    };
    rsx! {
        button {
            class: class,
            onclick: move |_| active_tab.set(tab),
            span { "{label}" }
        }
    }
}
