use std::path::{Path, PathBuf};

use docqa_core::{Key, Msg, SelectedFile};
use docqa_engine::declared_mime_type;

use super::ui::constants::{CMD_EXIT, CMD_HELP, CMD_QUIT, CMD_UPLOAD, LINE_CONTINUATION};

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Msgs(Vec<Msg>),
    Help,
    Quit,
}

/// Turns terminal lines into the key presses the query box would see.
///
/// A fresh line replaces the query text. A line ending in `\` inserts a
/// newline (Shift+Enter), and the next line is appended instead.
#[derive(Debug, Default)]
pub struct LineInput {
    continuing: bool,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, line: &str) -> InputAction {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        if !self.continuing {
            if trimmed == CMD_QUIT || trimmed == CMD_EXIT {
                return InputAction::Quit;
            }
            if trimmed == CMD_HELP {
                return InputAction::Help;
            }
            if let Some(rest) = trimmed.strip_prefix(CMD_UPLOAD) {
                let raw_path = rest.trim().trim_matches(['"', '\'']);
                if raw_path.is_empty() || !rest.starts_with(char::is_whitespace) {
                    return InputAction::Help;
                }
                return InputAction::Msgs(vec![Msg::FileSelected(selected_file(Path::new(
                    raw_path,
                )))]);
            }
        }

        let (text, shift) = match line.strip_suffix(LINE_CONTINUATION) {
            Some(text) => (text, true),
            None => (line, false),
        };

        let mut msgs = Vec::new();
        if self.continuing {
            msgs.extend(text.chars().map(|ch| Msg::QueryKey {
                key: Key::Char(ch),
                shift: false,
            }));
        } else {
            msgs.push(Msg::QueryChanged(text.to_string()));
        }
        msgs.push(Msg::QueryKey {
            key: Key::Enter,
            shift,
        });
        self.continuing = shift;
        InputAction::Msgs(msgs)
    }
}

pub fn selected_file(path: &Path) -> SelectedFile {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    SelectedFile {
        name,
        declared_type: declared_mime_type(path).to_string(),
        path: PathBuf::from(path),
    }
}
