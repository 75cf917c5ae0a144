use crate::catalog::SCHEME_GROUPS;
use dioxus::prelude::*;

#[component]
pub fn SchemesView() -> Element {
    rsx! {
        div { class: "page",
            h2 { class: "page-title", "Schemes" }
            for group in SCHEME_GROUPS.iter() {
                section { key: "{group.label}",
                    span { class: format_args!("pill {}", group.accent), "{group.label}" }
                    for (idx, scheme) in group.schemes.iter().enumerate() {
                        div { key: "{group.label}-{idx}", class: "card",
                            h3 { "{scheme.title}" }
                            p { class: "text-muted", "{scheme.description}" }
                        }
                    }
                }
            }
        }
    }
}
