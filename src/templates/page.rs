//! The STUDYSync single page.
//!
//! The markup is rendered from a `SessionView`, so a page always reflects the
//! session it was minted with. The script keeps its own copy of the busy
//! flags and the document id and talks to the `/api/*` routes.

use crate::models::SessionView;

use super::components::{base_html, html_escape, script_json};

const ANSWER_PLACEHOLDER: &str = "Your answer will appear here once you ask a question.";

// ============================================================================
// Icons
// ============================================================================

const LOGO_ICON: &str = r#"<svg class="logo-icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
    <path d="M2 3h6a4 4 0 0 1 4 4v14a3 3 0 0 0-3-3H2z" />
    <path d="M22 3h-6a4 4 0 0 0-4 4v14a3 3 0 0 1 3-3h7z" />
</svg>"#;

const UPLOAD_ICON_PATHS: &str = r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4" />
    <polyline points="17 8 12 3 7 8" />
    <line x1="12" y1="3" x2="12" y2="15" />"#;

const QUESTION_ICON_PATHS: &str = r#"<circle cx="12" cy="12" r="10" />
    <path d="M9.09 9a3 3 0 0 1 5.83 1c0 2-3 3-3 3" />
    <line x1="12" y1="17" x2="12.01" y2="17" />"#;

const SUBMIT_ICON_PATHS: &str = r#"<polyline points="9 11 12 14 22 4" />
    <path d="M21 12v7a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h11" />"#;

const DOWNLOAD_ICON_PATHS: &str = r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4" />
    <polyline points="7 10 12 15 17 10" />
    <line x1="12" y1="15" x2="12" y2="3" />"#;

const ANSWER_ICON_PATHS: &str = r#"<path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z" />
    <polyline points="14 2 14 8 20 8" />
    <line x1="16" y1="13" x2="8" y2="13" />
    <line x1="16" y1="17" x2="8" y2="17" />
    <polyline points="10 9 9 9 8 9" />"#;

fn icon(class: &str, paths: &str) -> String {
    format!(
        r#"<svg class="{}" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">{}</svg>"#,
        class, paths
    )
}

/// A button with a label that swaps to a spinner while `.loading` is set.
fn action_button(id: &str, class: &str, label: &str, paths: &str, busy: bool, disabled: bool) -> String {
    format!(
        r#"<button id="{id}" class="btn {class}{loading}"{disabled}>
            <span class="spinner"></span>
            <span class="btn-label">{icon}{label}</span>
        </button>"#,
        id = id,
        class = class,
        loading = if busy { " loading" } else { "" },
        disabled = if busy || disabled { " disabled" } else { "" },
        icon = icon("btn-icon", paths),
        label = label,
    )
}

// ============================================================================
// Page
// ============================================================================

pub fn render_page(view: &SessionView) -> String {
    let has_doc = view.doc_id.is_some();

    let file_label = match &view.file_name {
        Some(name) => html_escape(name),
        None => "Choose a .txt file".to_string(),
    };

    let doc_banner = match &view.doc_id {
        Some(doc_id) => format!(
            r#"<div id="doc-banner" class="success-message">Document uploaded! ID: <span id="doc-id">{}</span></div>"#,
            html_escape(doc_id)
        ),
        None => r#"<div id="doc-banner" class="success-message hidden">Document uploaded! ID: <span id="doc-id"></span></div>"#
            .to_string(),
    };

    let answer_html = if view.answer.is_empty() {
        format!(r#"<p class="answer-placeholder">{}</p>"#, ANSWER_PLACEHOLDER)
    } else {
        format!(r#"<p class="answer-text">{}</p>"#, html_escape(&view.answer))
    };

    let content = format!(
        r#"<div class="app-wrapper">
    <div class="container">
        <div class="header">
            <div class="logo-wrapper">
                {logo}
                <h1 class="title">STUDYSync</h1>
            </div>
            <p class="subtitle">AI-Powered Document Q&amp;A Assistant</p>
        </div>

        <div class="card upload-card">
            <div class="card-header">
                {upload_icon}
                <h2 class="card-title">Upload Document</h2>
            </div>
            <div class="upload-wrapper">
                <label class="file-input-label">
                    <input id="file-input" type="file" accept=".txt" class="file-input">
                    <span id="file-name" class="file-input-text">{file_label}</span>
                </label>
                {upload_button}
            </div>
            {doc_banner}
        </div>

        <div class="card question-card">
            <div class="card-header">
                {question_icon}
                <h2 class="card-title">Ask a Question</h2>
            </div>
            <input id="question" type="text" class="question-input"
                   placeholder="Type your question here..." value="{question}">
            <div class="button-group">
                {submit_button}
                {download_button}
            </div>
        </div>

        <div class="card answer-card">
            <div class="card-header">
                {answer_icon}
                <h2 class="card-title">Answer</h2>
            </div>
            <div id="answer" class="answer-content">{answer_html}</div>
        </div>
    </div>
</div>"#,
        logo = LOGO_ICON,
        upload_icon = icon("section-icon", UPLOAD_ICON_PATHS),
        file_label = file_label,
        upload_button = action_button(
            "upload-btn",
            "btn-primary",
            "Upload",
            UPLOAD_ICON_PATHS,
            view.uploading,
            false
        ),
        doc_banner = doc_banner,
        question_icon = icon("section-icon", QUESTION_ICON_PATHS),
        question = html_escape(&view.question),
        submit_button = action_button(
            "submit-btn",
            "btn-primary",
            "Submit Question",
            SUBMIT_ICON_PATHS,
            view.submitting,
            !has_doc
        ),
        download_button = action_button(
            "download-btn",
            "btn-secondary",
            "Download Summary",
            DOWNLOAD_ICON_PATHS,
            view.downloading,
            !has_doc
        ),
        answer_icon = icon("section-icon", ANSWER_ICON_PATHS),
        answer_html = answer_html,
    );

    let script = format!(
        "const INITIAL_SESSION = {};\nconst ANSWER_PLACEHOLDER = {};\n{}",
        script_json(view),
        script_json(&ANSWER_PLACEHOLDER),
        APP_SCRIPT
    );

    base_html("STUDYSync", &content, &script)
}

// ============================================================================
// Page Script
// ============================================================================

const APP_SCRIPT: &str = r#"
const SESSION_ID = INITIAL_SESSION.session_id;
let docId = INITIAL_SESSION.doc_id || '';
const busy = {
    upload: INITIAL_SESSION.uploading,
    submit: INITIAL_SESSION.submitting,
    download: INITIAL_SESSION.downloading,
};

const els = {
    file: document.getElementById('file-input'),
    fileName: document.getElementById('file-name'),
    upload: document.getElementById('upload-btn'),
    question: document.getElementById('question'),
    submit: document.getElementById('submit-btn'),
    download: document.getElementById('download-btn'),
    docBanner: document.getElementById('doc-banner'),
    docId: document.getElementById('doc-id'),
    answer: document.getElementById('answer'),
};

// Ask and download stay disabled until a document id exists
function refreshControls() {
    els.upload.disabled = busy.upload;
    els.submit.disabled = busy.submit || !docId;
    els.download.disabled = busy.download || !docId;
    for (const key of Object.keys(busy)) {
        els[key].classList.toggle('loading', busy[key]);
    }
}

function showDocId() {
    els.docId.textContent = docId;
    els.docBanner.classList.toggle('hidden', !docId);
}

function showAnswer(answer) {
    const p = document.createElement('p');
    if (answer) {
        p.className = 'answer-text';
        p.textContent = answer;
    } else {
        p.className = 'answer-placeholder';
        p.textContent = ANSWER_PLACEHOLDER;
    }
    els.answer.replaceChildren(p);
}

async function failureMessage(response, fallback) {
    console.error('Response status:', response.status);
    try {
        const body = await response.json();
        return body.error || fallback;
    } catch (_) {
        return fallback;
    }
}

els.file.addEventListener('change', () => {
    const file = els.file.files[0];
    els.fileName.textContent = file ? file.name : 'Choose a .txt file';
});

async function handleUpload() {
    const file = els.file.files[0];
    if (!file) {
        alert('Please select a file first.');
        return;
    }
    busy.upload = true;
    refreshControls();

    const formData = new FormData();
    formData.append('file', file);

    try {
        const response = await fetch('/api/upload?session=' + encodeURIComponent(SESSION_ID), {
            method: 'POST',
            body: formData,
        });
        if (!response.ok) {
            alert(await failureMessage(response, 'Error uploading document. Please try again.'));
            return;
        }
        const result = await response.json();
        docId = result.doc_id;
        showDocId();
        alert(result.message);
    } catch (error) {
        console.error('Error uploading document:', error);
        alert('Error uploading document. Please try again.');
    } finally {
        busy.upload = false;
        refreshControls();
    }
}

async function handleQuestionSubmit() {
    const question = els.question.value;
    if (!docId || !question.trim()) {
        alert('Please upload a document and enter a question.');
        return;
    }
    busy.submit = true;
    refreshControls();

    try {
        const response = await fetch('/api/ask', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ session: SESSION_ID, question: question }),
        });
        if (!response.ok) {
            alert(await failureMessage(response, 'Error getting answer. Please try again.'));
            return;
        }
        const result = await response.json();
        showAnswer(result.answer);
    } catch (error) {
        console.error('Error getting answer:', error);
        alert('Error getting answer. Please try again.');
    } finally {
        busy.submit = false;
        refreshControls();
    }
}

async function handleSummaryDownload() {
    if (!docId) {
        alert('Please upload a document first.');
        return;
    }
    busy.download = true;
    refreshControls();

    try {
        const response = await fetch('/api/download_summary', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ session: SESSION_ID }),
        });
        if (!response.ok) {
            alert(await failureMessage(response, 'Error downloading summary. Please try again.'));
            return;
        }
        const blob = await response.blob();
        const url = window.URL.createObjectURL(blob);
        const a = document.createElement('a');
        a.href = url;
        a.download = 'summary.pdf';
        document.body.appendChild(a);
        a.click();
        a.remove();
        window.URL.revokeObjectURL(url);
    } catch (error) {
        console.error('Error downloading summary:', error);
        alert('Error downloading summary. Please try again.');
    } finally {
        busy.download = false;
        refreshControls();
    }
}

els.upload.addEventListener('click', handleUpload);
els.submit.addEventListener('click', handleQuestionSubmit);
els.download.addEventListener('click', handleSummaryDownload);
els.question.addEventListener('keydown', (event) => {
    if (event.key === 'Enter') handleQuestionSubmit();
});

refreshControls();
"#;
