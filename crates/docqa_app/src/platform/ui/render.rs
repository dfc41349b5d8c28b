use docqa_core::{AppViewModel, QueryAnswer, Status};

use super::constants::*;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let status_label = match view.status {
        Status::Loading => "Connecting to server...",
        Status::Ready => "Ready: ask a question about the document",
        Status::NeedsUpload => "No document indexed: upload a PDF to begin",
        Status::Error => "Server unavailable",
    };

    let mut lines = vec![RULE.to_string(), format!("{TITLE} | {status_label}")];

    if let Some(name) = &view.file_name {
        lines.push(format!("Document: {name}"));
    }

    if view.processing || view.upload_progress > 0 || view.processing_progress > 0 {
        lines.push(format!(
            "Extraction {}",
            progress_bar(view.upload_progress)
        ));
        let stage = if view.processing_stage.is_empty() {
            String::new()
        } else {
            format!("  {}", view.processing_stage)
        };
        lines.push(format!(
            "Processing {}{}",
            progress_bar(view.processing_progress),
            stage
        ));
    }

    if let Some(preview) = &view.text_preview {
        lines.push("Extracted text:".to_string());
        lines.extend(preview.lines().map(|line| format!("  {line}")));
    }

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }

    if view.querying {
        lines.push("Searching the document...".to_string());
    }

    if let Some(result) = &view.result {
        lines.extend(render_answer(result));
    }

    lines.push(hint(view).to_string());
    lines
}

fn render_answer(result: &QueryAnswer) -> Vec<String> {
    let mut lines = vec![format!("Q: {}", result.query)];
    lines.push("Answer:".to_string());
    lines.extend(result.response.lines().map(|line| format!("  {line}")));
    if !result.relevant_sections.is_empty() {
        lines.push("Sources:".to_string());
        for (idx, section) in result.relevant_sections.iter().enumerate() {
            lines.push(format!(
                "  {}. {} ({}, {:.0}% match)",
                idx + 1,
                section.article_section,
                section.chunk_type,
                section.similarity * 100.0
            ));
            lines.extend(section.text.lines().map(|line| format!("     {line}")));
        }
    }
    lines
}

fn hint(view: &AppViewModel) -> &'static str {
    match view.status {
        Status::Loading => "Waiting for the server...",
        Status::Error => "Restart the client once the server is reachable. /quit to exit.",
        Status::NeedsUpload => "Use /upload <path.pdf> to index a document. /help for commands.",
        Status::Ready if view.querying => "Waiting for the answer...",
        Status::Ready => {
            "Type a question and press Enter (end a line with \\ for a newline). /upload to replace the document."
        }
    }
}

pub fn help() -> Vec<String> {
    vec![
        format!("{CMD_UPLOAD} <path>  select a PDF and send its text to the server"),
        format!("{CMD_HELP}           show this help"),
        format!("{CMD_QUIT}           leave"),
        "Any other line is a question. End a line with \\ to continue on the next one.".to_string(),
    ]
}

fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}
