use crate::catalog::WEATHER;
use crate::views::shared::WeatherHeadline;
use dioxus::prelude::*;

#[component]
pub fn WeatherView() -> Element {
    let weather = WEATHER;
    let days = 1..=weather.forecast_days;
    rsx! {
        div { class: "page",
            h2 { class: "page-title", "Weather Reports" }
            WeatherHeadline { weather }
            div { class: "day-pills",
                for day in days {
                    div {
                        key: "{day}",
                        class: format_args!("day-pill {}", if day == 1 { "active" } else { "" }),
                        "{day}"
                    }
                }
            }
            div { class: "card",
                h3 { "{weather.day_title}" }
                p { "{weather.day_summary}" }
            }
            div { class: "card",
                span { class: "pill pill-green", "Recommendations" }
                p {
                    strong { "Crop: " }
                    span { "{weather.crop}" }
                }
                p {
                    strong { "Current weather: " }
                    span { "{weather.headline()}" }
                }
                p { "{weather.advice}" }
            }
        }
    }
}
