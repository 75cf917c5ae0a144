/// Stylesheet injected once at the root of the app.
pub struct ThemeDefinition {
    pub css: &'static str,
}

pub fn theme_definition() -> ThemeDefinition {
    ThemeDefinition {
        css: FIELD_THEME,
    }
}

const FIELD_THEME: &str = r#"
:root {
    --color-bg-primary: #f4f8f1;
    --color-bg-card: #ffffff;
    --color-text-primary: #14210f;
    --color-text-muted: #5d6b57;
    --color-accent: #2f8f3a;
    --color-accent-soft: #d9ffdd;
    --color-danger: #c0392b;
    --color-border: #dfe7da;
    --color-chat-user-bg: #2f8f3a;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #ffffff;
    --color-chat-bot-text: #14210f;
    --color-pill-blue: #113dfe;
    --color-pill-purple: #2b127d;
    --nav-height: 76px;
}
* { box-sizing: border-box; }
body {
    margin: 0;
    background: var(--color-bg-primary);
    color: var(--color-text-primary);
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
}
.page { padding: 1rem 1rem calc(var(--nav-height) + 1.5rem); max-width: 960px; margin: 0 auto; }
.page-title { margin: 0.5rem 0 1rem; }
.card {
    background: var(--color-bg-card);
    border: 1px solid var(--color-border);
    border-radius: 16px;
    padding: 1rem;
    margin-bottom: 1rem;
}
.btn {
    border: 1px solid var(--color-border);
    background: transparent;
    border-radius: 10px;
    padding: 0.6rem 1rem;
    cursor: pointer;
    font-weight: 600;
}
.btn-primary { background: var(--color-accent); color: #ffffff; border-color: var(--color-accent); }
.btn:disabled { opacity: 0.5; cursor: default; }
.input, select, textarea {
    width: 100%;
    padding: 0.6rem;
    border-radius: 10px;
    border: 1px solid var(--color-border);
    background: var(--color-bg-card);
    color: var(--color-text-primary);
}
.label { display: block; margin: 0.75rem 0 0.25rem; font-size: 0.85rem; color: var(--color-text-muted); }
.error { color: var(--color-danger); margin: 0.75rem 0; }
.text-muted { color: var(--color-text-muted); }

.bottom-nav {
    position: fixed; left: 0; right: 0; bottom: 0; height: var(--nav-height);
    display: flex; justify-content: space-around; align-items: center;
    background: var(--color-bg-card); border-top: 1px solid var(--color-border);
}
.nav-btn { background: none; border: none; display: flex; flex-direction: column; align-items: center; gap: 0.2rem; cursor: pointer; color: var(--color-text-muted); }
.nav-btn.active { color: var(--color-accent); }
.nav-center { width: 56px; height: 56px; border-radius: 50%; background: var(--color-accent); color: #ffffff; border: none; font-size: 1.4rem; cursor: pointer; }

.chat-layout { display: grid; grid-template-columns: 1fr 280px; gap: 1rem; }
@media (max-width: 720px) { .chat-layout { grid-template-columns: 1fr; } .history-panel { display: none; } }
.chat-header { display: flex; justify-content: space-between; align-items: center; }
.messages { display: flex; flex-direction: column; gap: 0.5rem; max-height: 60vh; overflow-y: auto; padding: 0.5rem 0; }
.message-row { display: flex; }
.message-row.user { justify-content: flex-end; }
.bubble { max-width: 75%; padding: 0.6rem 0.9rem; border-radius: 14px; white-space: pre-wrap; }
.bubble.user { background: var(--color-chat-user-bg); color: var(--color-chat-user-text); }
.bubble.bot { background: var(--color-chat-bot-bg); color: var(--color-chat-bot-text); border: 1px solid var(--color-border); }
.composer { display: flex; gap: 0.5rem; margin-top: 0.75rem; }
.history-item { display: block; width: 100%; text-align: left; padding: 0.6rem; border: none; border-bottom: 1px solid var(--color-border); background: none; cursor: pointer; }
.history-item.active { background: var(--color-accent-soft); }
.history-meta { font-size: 0.75rem; color: var(--color-text-muted); }

.voice-overlay { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.7); display: flex; align-items: center; justify-content: center; }
.voice-inner { display: flex; flex-direction: column; align-items: center; gap: 1rem; color: #ffffff; }
.voice-sphere { width: 140px; height: 140px; border-radius: 50%; background: radial-gradient(circle, #8fe39a, #2f8f3a); }
.voice-sphere.listening { animation: pulse 1.2s ease-in-out infinite; }
@keyframes pulse { 50% { transform: scale(1.08); } }
.modal-backdrop { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.5); display: flex; align-items: center; justify-content: center; }
.modal { max-width: 320px; text-align: center; color: var(--color-text-primary); }

.dropzone { border: 2px dashed var(--color-border); border-radius: 16px; padding: 1.5rem; text-align: center; }
.dropzone.active { border-color: var(--color-accent); background: var(--color-accent-soft); }
.preview-row { display: flex; gap: 0.75rem; flex-wrap: wrap; margin: 1rem 0; }
.thumb { width: 120px; }
.thumb img { width: 120px; height: 90px; object-fit: cover; border-radius: 10px; }
.thumb-meta { display: flex; justify-content: space-between; font-size: 0.75rem; }
.progress-bar { height: 6px; background: var(--color-border); border-radius: 3px; overflow: hidden; }
.progress-fill { height: 100%; background: var(--color-accent); }
.result { display: flex; gap: 0.75rem; }

.stats-row, .features { display: grid; grid-template-columns: repeat(2, 1fr); gap: 0.75rem; }
.feature-card { cursor: pointer; }
.feature-icon { width: 36px; height: 36px; border-radius: 10px; display: flex; align-items: center; justify-content: center; }
.pill { display: inline-block; padding: 0.25rem 0.75rem; border-radius: 999px; color: #ffffff; font-size: 0.8rem; }
.pill-blue { background: var(--color-pill-blue); }
.pill-purple { background: var(--color-pill-purple); }
.pill-green { background: var(--color-accent); }
.day-pills { display: flex; gap: 0.5rem; margin: 1rem 0; }
.day-pill { width: 36px; height: 36px; border-radius: 50%; display: flex; align-items: center; justify-content: center; border: 1px solid var(--color-border); }
.day-pill.active { background: var(--color-accent); color: #ffffff; }
.field-value { padding: 0.6rem; border-radius: 10px; background: var(--color-bg-primary); }
"#;
