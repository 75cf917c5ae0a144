use crate::catalog::WeatherSnapshot;
use dioxus::prelude::*;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const CLOCK_FORMAT: &[FormatItem<'static>] = format_description!(
    "[day] [month repr:short] [year] | [hour repr:12 padding:zero]:[minute padding:zero] [period case:lower]"
);

/// Local date and time as shown on the weather cards.
pub fn clock_label() -> String {
    let mut now = OffsetDateTime::now_utc();
    if let Ok(offset) = UtcOffset::current_local_offset() {
        now = now.to_offset(offset);
    }
    now.format(CLOCK_FORMAT).unwrap_or_default()
}

#[component]
pub fn WeatherHeadline(weather: WeatherSnapshot) -> Element {
    rsx! {
        div { class: "card",
            span { class: "pill pill-green", "📍 {weather.location}" }
            h1 { "{weather.temperature_c}° C" }
            div { class: "text-muted", "{clock_label()}" }
            span { class: "pill pill-blue", "☀ {weather.condition}" }
        }
        div { class: "stats-row",
            div { class: "card",
                div { class: "label", "Precipitation" }
                strong { "{weather.precipitation}" }
            }
            div { class: "card",
                div { class: "label", "Wind" }
                strong { "{weather.wind}" }
            }
        }
    }
}
