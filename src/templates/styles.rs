//! CSS styles for the STUDYSync page.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --red: #dc322f;
    --violet: #6c71c4;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --heading: var(--base01);
    --muted: var(--base1);
    --border: var(--base2);
    --card-bg: #fffdf7;
    --primary: var(--blue);
    --primary-hover: var(--cyan);
    --secondary: var(--violet);
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.app-wrapper {
    min-height: 100vh;
    padding: 2rem 1rem;
}

.container {
    max-width: 720px;
    margin: 0 auto;
    display: flex;
    flex-direction: column;
    gap: 1.25rem;
}

/* Header */
.header { text-align: center; margin-bottom: 0.5rem; }

.logo-wrapper {
    display: inline-flex;
    align-items: center;
    gap: 0.6rem;
}

.logo-icon { width: 2.25rem; height: 2.25rem; color: var(--primary); }
.title { font-size: 2rem; font-weight: 700; color: var(--heading); letter-spacing: 0.02em; }
.subtitle { color: var(--muted); font-size: 0.95rem; }

/* Cards */
.card {
    background: var(--card-bg);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 1.25rem 1.5rem;
}

.card-header {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    margin-bottom: 1rem;
}

.section-icon { width: 1.25rem; height: 1.25rem; color: var(--primary); }
.card-title { font-size: 1.1rem; font-weight: 600; color: var(--heading); }

/* Upload */
.upload-wrapper {
    display: flex;
    gap: 0.75rem;
    align-items: stretch;
    flex-wrap: wrap;
}

.file-input-label {
    flex: 1;
    min-width: 200px;
    display: flex;
    align-items: center;
    padding: 0.55rem 0.9rem;
    border: 1px dashed var(--muted);
    border-radius: 6px;
    cursor: pointer;
    overflow: hidden;
}

.file-input-label:hover { border-color: var(--primary); }
.file-input { display: none; }
.file-input-text { font-size: 0.9rem; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }

.success-message {
    margin-top: 0.9rem;
    padding: 0.5rem 0.75rem;
    border-left: 3px solid var(--green);
    background: var(--border);
    font-size: 0.85rem;
    word-break: break-all;
}

.hidden { display: none; }

/* Question */
.question-input {
    width: 100%;
    padding: 0.6rem 0.9rem;
    border: 1px solid var(--border);
    border-radius: 6px;
    background: var(--bg);
    color: var(--fg);
    font-size: 0.95rem;
    margin-bottom: 0.9rem;
}

.question-input:focus { outline: none; border-color: var(--primary); }

.button-group { display: flex; gap: 0.75rem; flex-wrap: wrap; }

/* Buttons */
.btn {
    display: inline-flex;
    align-items: center;
    justify-content: center;
    gap: 0.4rem;
    min-width: 9rem;
    padding: 0.55rem 1rem;
    border: none;
    border-radius: 6px;
    color: #fff;
    font-size: 0.9rem;
    font-family: inherit;
    cursor: pointer;
}

.btn-primary { background: var(--primary); }
.btn-primary:hover:not(:disabled) { background: var(--primary-hover); }
.btn-secondary { background: var(--secondary); }
.btn-secondary:hover:not(:disabled) { opacity: 0.9; }
.btn:disabled { opacity: 0.55; cursor: not-allowed; }

.btn-icon { width: 1rem; height: 1rem; }

.btn .spinner { display: none; }
.btn.loading .spinner { display: inline-block; }
.btn.loading .btn-label { display: none; }

.spinner {
    width: 1rem;
    height: 1rem;
    border: 2px solid rgba(255, 255, 255, 0.4);
    border-top-color: #fff;
    border-radius: 50%;
    animation: spin 0.8s linear infinite;
}

@keyframes spin { to { transform: rotate(360deg); } }

.btn-label { display: inline-flex; align-items: center; gap: 0.4rem; }

/* Answer */
.answer-content { min-height: 4rem; }
.answer-text { white-space: pre-wrap; color: var(--heading); }
.answer-placeholder { color: var(--muted); font-style: italic; }
"#;
