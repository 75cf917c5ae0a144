use crate::ui::AppServices;
use crate::upload::{
    FileSource, MAX_FILES, MAX_SIZE_MB, SelectedFile, UploadBatch, UploadError, read_screened,
};
use async_trait::async_trait;
use dioxus::html::FileEngine;
use dioxus::prelude::*;
use std::sync::Arc;

struct PickedFiles(Arc<dyn FileEngine>);

#[async_trait(?Send)]
impl FileSource for PickedFiles {
    fn names(&self) -> Vec<String> {
        self.0.files()
    }

    async fn size(&self, name: &str) -> Option<u64> {
        self.0.file_size(name).await
    }

    async fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.0.read_file(name).await
    }
}

async fn add_picked(
    engine: Arc<dyn FileEngine>,
    mut batch: Signal<UploadBatch>,
    mut error: Signal<Option<String>>,
    mut result: Signal<Option<String>>,
) {
    error.set(None);
    result.set(None);
    let existing = batch.read().len();
    let outcome: Result<Vec<SelectedFile>, UploadError> =
        read_screened(&PickedFiles(engine), existing).await;
    let added = outcome.and_then(|incoming| batch.write().add(incoming));
    if let Err(err) = added {
        error.set(Some(err.to_string()));
    }
}

#[component]
pub fn AnalysisView() -> Element {
    let services = use_context::<AppServices>();
    let mut batch = use_signal(UploadBatch::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut result = use_signal(|| Option::<String>::None);
    let mut processing = use_signal(|| false);
    let mut progress = use_signal(|| 0u8);
    let mut drag_active = use_signal(|| false);

    let start_analysis = move |_: MouseEvent| {
        let target = batch.read().analysis_target().map(|candidate| candidate.file.clone());
        let file = match target {
            Ok(file) => file,
            Err(err) => {
                error.set(Some(err.to_string()));
                return;
            }
        };
        error.set(None);
        result.set(None);
        processing.set(true);
        progress.set(10);
        let client = services.client.clone();
        spawn(async move {
            match client.analyze_image(&file).await {
                Ok(message) => {
                    progress.set(100);
                    result.set(Some(message));
                }
                Err(err) => error.set(Some(format!("Error analyzing image: {err}"))),
            }
            processing.set(false);
        });
    };

    let files = batch.read().files().to_vec();
    let file_count = if files.is_empty() {
        "No file chosen".to_string()
    } else {
        format!("{} file(s)", files.len())
    };

    rsx! {
        div { class: "page",
            h2 { class: "page-title", "Analysis using AI" }
            p { class: "text-muted", "Disease and weed detection" }
            div { class: "card",
                div {
                    class: format_args!("dropzone {}", if drag_active() { "active" } else { "" }),
                    ondragover: move |evt: DragEvent| {
                        evt.prevent_default();
                        drag_active.set(true);
                    },
                    ondragleave: move |_| drag_active.set(false),
                    ondrop: move |evt: DragEvent| async move {
                        evt.prevent_default();
                        drag_active.set(false);
                        if let Some(engine) = evt.files() {
                            add_picked(engine, batch, error, result).await;
                        }
                    },
                    p { "Upload a leaf image to detect possible diseases." }
                    p { class: "text-muted",
                        "Supported: JPG, PNG. Max {MAX_FILES} files, {MAX_SIZE_MB}MB each."
                    }
                    label { class: "btn",
                        "Choose image(s)"
                        input {
                            r#type: "file",
                            accept: "image/*",
                            multiple: true,
                            style: "display: none;",
                            onchange: move |evt: FormEvent| async move {
                                if let Some(engine) = evt.files() {
                                    add_picked(engine, batch, error, result).await;
                                }
                            },
                        }
                    }
                    span { class: "text-muted", " {file_count}" }
                }

                div { class: "preview-row",
                    if files.is_empty() {
                        p { class: "text-muted", "No files selected" }
                    }
                    for candidate in files.iter() {
                        div { key: "{candidate.id}", class: "thumb",
                            img { src: "{candidate.preview.url()}", alt: "{candidate.file.name}" }
                            div { class: "thumb-meta",
                                span { title: "{candidate.file.name}", "{candidate.file.name}" }
                                button {
                                    class: "btn",
                                    aria_label: "Remove {candidate.file.name}",
                                    onclick: {
                                        let id = candidate.id.clone();
                                        move |_| {
                                            batch.write().remove(&id);
                                        }
                                    },
                                    "✕"
                                }
                            }
                        }
                    }
                }

                if let Some(message) = error() {
                    div { class: "error", "{message}" }
                }

                button {
                    class: "btn btn-primary",
                    disabled: processing(),
                    onclick: start_analysis,
                    if processing() { "Analysing..." } else { "Start analytic with AI ✦" }
                }

                if processing() {
                    div { class: "progress-bar",
                        div { class: "progress-fill", style: "width: {progress}%;" }
                    }
                    p { class: "text-muted", "Processing {progress}%" }
                }

                if let Some(message) = result() {
                    div { class: "result card",
                        span { class: "pill pill-green", "✓" }
                        div {
                            strong { "Disease Analysis Result" }
                            p { "{message}" }
                        }
                    }
                }
            }
        }
    }
}
