use crate::session::SessionManager;
use crate::types::{Language, Message, SessionId, SessionSummary};
use crate::ui::AppServices;
use crate::voice::{self, Toggle, TranscriptSink, UNSUPPORTED_MESSAGE, VoiceAdapter};
use dioxus::document;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tokio::sync::mpsc;

const ESCAPE_LISTENER: &str = r#"
    window.addEventListener("keydown", (event) => {
        if (event.key === "Escape") {
            dioxus.send(true);
        }
    });
"#;

const HISTORY_TIME_FORMAT: &[FormatItem<'static>] = format_description!(
    "[day padding:none] [month repr:short], [hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]"
);

fn format_updated_at(updated_at: Option<u64>) -> Option<String> {
    let nanos = i128::from(updated_at?) * 1_000_000;
    let mut datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(HISTORY_TIME_FORMAT).ok()
}

fn sender_class(message: &Message) -> &'static str {
    if message.is_user() { "user" } else { "bot" }
}

#[component]
pub fn ChatView() -> Element {
    let services = use_context::<AppServices>();
    let mut revision = use_signal(|| 0u64);
    let mut input = use_signal(String::new);
    let mut language = use_signal(|| services.config.default_language);

    let manager = use_hook({
        let services = services.clone();
        move || {
            let platform = services.speech.clone();
            SessionManager::new(
                Arc::new(services.client.clone()),
                services.config.default_language,
            )
            .with_reply_sink(Arc::new(move |reply: &str, language: Language| {
                voice::speak(platform.as_ref(), reply, language);
            }))
        }
    });

    use_hook({
        let manager = manager.clone();
        move || {
            let mut changes = manager.subscribe();
            spawn(async move {
                while changes.changed().await.is_ok() {
                    let latest = *changes.borrow_and_update();
                    revision.set(latest);
                }
            });
            spawn(manager.refresh_history());
        }
    });

    // Voice transcripts arrive on the recognizer's thread and are sent from here.
    let transcripts = use_hook({
        let manager = manager.clone();
        move || {
            let (tx, mut rx) = mpsc::unbounded_channel::<String>();
            spawn(async move {
                while let Some(text) = rx.recv().await {
                    if let Some(request) = manager.send(&text) {
                        spawn(request);
                    }
                }
            });
            tx
        }
    });

    let mut voice_adapter = use_signal({
        let platform = services.speech.clone();
        let initial = services.config.default_language;
        move || {
            let sink: TranscriptSink = Arc::new(move |text: String| {
                if transcripts.send(text).is_err() {
                    tracing::debug!("chat view gone, dropping transcript");
                }
            });
            VoiceAdapter::new(platform, initial, sink)
        }
    });

    let mut listening = use_signal(|| false);
    let mut notice = use_signal(|| Option::<&'static str>::None);

    use_hook(move || {
        let mut changes = voice_adapter.read().subscribe();
        spawn(async move {
            while changes.changed().await.is_ok() {
                let latest = *changes.borrow_and_update();
                listening.set(latest);
            }
        });
    });

    // Escape closes the overlay wherever focus is.
    use_future(move || async move {
        let mut keys = document::eval(ESCAPE_LISTENER);
        while keys.recv::<bool>().await.is_ok() {
            if voice_adapter.peek().is_open() {
                voice_adapter.write().close();
                notice.set(None);
            }
        }
    });

    let send_typed = {
        let manager = manager.clone();
        move || {
            let text = input();
            if let Some(request) = manager.send(&text) {
                input.set(String::new());
                spawn(request);
            }
        }
    };

    let on_language = {
        let manager = manager.clone();
        move |evt: FormEvent| {
            let Some(next) = Language::from_code(&evt.value()) else {
                return;
            };
            manager.set_language(next);
            voice_adapter.write().set_language(next);
            language.set(next);
        }
    };

    let on_new_chat = {
        let manager = manager.clone();
        move |_: MouseEvent| {
            manager.start_new_session();
        }
    };

    let _ = revision();
    let messages = manager.messages();
    let history = manager.list_sessions();
    let current = manager.current_session();
    let voice_open = voice_adapter.read().is_open();

    rsx! {
        div { class: "page chat-layout",
            div { class: "card",
                div { class: "chat-header",
                    h2 { class: "page-title", "FreshAir Bot" }
                    select {
                        value: language().code(),
                        onchange: on_language,
                        for option_lang in Language::ALL {
                            option { value: option_lang.code(), "{option_lang.label()}" }
                        }
                    }
                }
                div { class: "messages",
                    for message in messages.iter() {
                        div { key: "{message.id}", class: format_args!("message-row {}", sender_class(message)),
                            div { class: format_args!("bubble {}", sender_class(message)), "{message.text}" }
                        }
                    }
                }
                div { class: "composer",
                    input {
                        class: "input",
                        placeholder: "Ask about crops, soil or weather…",
                        value: "{input}",
                        oninput: move |ev| input.set(ev.value()),
                        onkeydown: {
                            let mut send_typed = send_typed.clone();
                            move |ev: KeyboardEvent| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    send_typed();
                                }
                            }
                        },
                    }
                    button {
                        class: "btn",
                        r#type: "button",
                        title: "Voice",
                        onclick: move |_| voice_adapter.write().open(),
                        "🎤"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: input().trim().is_empty(),
                        onclick: {
                            let mut send_typed = send_typed.clone();
                            move |_| send_typed()
                        },
                        "Send"
                    }
                }
            }
            HistoryPanel {
                history,
                current,
                on_new_chat,
                on_select: {
                    let manager = manager.clone();
                    move |id: SessionId| {
                        spawn(manager.switch_session(id));
                    }
                },
            }
            if voice_open {
                VoiceOverlay { voice_adapter, listening: listening(), notice }
            }
        }
    }
}

#[component]
fn HistoryPanel(
    history: Vec<SessionSummary>,
    current: SessionId,
    on_new_chat: EventHandler<MouseEvent>,
    on_select: EventHandler<SessionId>,
) -> Element {
    rsx! {
        aside { class: "card history-panel",
            div { class: "chat-header",
                h3 { "History" }
                button { class: "btn", onclick: move |evt| on_new_chat.call(evt), "New chat" }
            }
            if history.is_empty() {
                p { class: "text-muted", "No conversations yet." }
            }
            for summary in history.into_iter() {
                button {
                    key: "{summary.session_id}",
                    class: format_args!(
                        "history-item {}",
                        if summary.session_id == current { "active" } else { "" }
                    ),
                    onclick: {
                        let id = summary.session_id.clone();
                        move |_| on_select.call(id.clone())
                    },
                    div { "{summary.display_title()}" }
                    if let Some(stamp) = format_updated_at(summary.updated_at) {
                        div { class: "history-meta", "{stamp}" }
                    }
                }
            }
        }
    }
}

#[component]
fn VoiceOverlay(
    voice_adapter: Signal<VoiceAdapter>,
    listening: bool,
    notice: Signal<Option<&'static str>>,
) -> Element {
    let mut voice_adapter = voice_adapter;
    let mut notice = notice;
    rsx! {
        div { class: "voice-overlay",
            div { class: "voice-inner",
                div { class: format_args!("voice-sphere {}", if listening { "listening" } else { "" }) }
                p { if listening { "Listening…" } else { "Tap the mic and speak" } }
                div { class: "composer",
                    button {
                        class: "btn btn-primary",
                        disabled: notice().is_some(),
                        onclick: move |_| {
                            if voice_adapter.write().toggle_listening() == Toggle::Unsupported {
                                notice.set(Some(UNSUPPORTED_MESSAGE));
                            }
                        },
                        if listening { "Stop" } else { "Start" }
                    }
                    button {
                        class: "btn",
                        disabled: notice().is_some(),
                        onclick: move |_| voice_adapter.write().close(),
                        "Close"
                    }
                }
            }
            if let Some(message) = notice() {
                div { class: "modal-backdrop",
                    div { class: "modal card", role: "alertdialog", aria_modal: "true",
                        p { "{message}" }
                        button {
                            class: "btn btn-primary",
                            autofocus: true,
                            onclick: move |_| notice.set(None),
                            "OK"
                        }
                    }
                }
            }
        }
    }
}
