use crate::catalog::{FEATURE_CARDS, Shortcut, WEATHER};
use crate::ui::AppTab;
use crate::views::shared::WeatherHeadline;
use dioxus::prelude::*;

fn shortcut_tab(target: Shortcut) -> AppTab {
    match target {
        Shortcut::Chat => AppTab::Chat,
        Shortcut::Analysis => AppTab::Analysis,
        Shortcut::Schemes => AppTab::Schemes,
        // Past conversations live in the chat history panel.
        Shortcut::Activities => AppTab::Chat,
    }
}

#[component]
pub fn HomeView(active_tab: Signal<AppTab>) -> Element {
    let mut active_tab = active_tab;
    rsx! {
        div { class: "page",
            div { class: "chat-header",
                div {
                    div { class: "text-muted", "Good Morning 👋" }
                    h2 { class: "page-title", "FreshAir" }
                }
                button { class: "btn", onclick: move |_| active_tab.set(AppTab::Login), "Sign in" }
            }
            WeatherHeadline { weather: WEATHER }
            div { class: "features",
                for card in FEATURE_CARDS.iter() {
                    div {
                        key: "{card.title}",
                        class: "card feature-card",
                        onclick: move |_| active_tab.set(shortcut_tab(card.target)),
                        div {
                            class: "feature-icon",
                            style: "background: {card.background}; color: {card.color};",
                            "↗"
                        }
                        strong { "{card.title}" }
                        p { class: "text-muted", "{card.description}" }
                    }
                }
            }
        }
    }
}
