pub const TITLE: &str = "DocQA";
pub const PROGRESS_WIDTH: usize = 24;
pub const RULE: &str = "------------------------------------------------------------";

pub const CMD_UPLOAD: &str = "/upload";
pub const CMD_HELP: &str = "/help";
pub const CMD_QUIT: &str = "/quit";
pub const CMD_EXIT: &str = "/exit";

/// A trailing backslash stands in for Shift+Enter.
pub const LINE_CONTINUATION: char = '\\';
