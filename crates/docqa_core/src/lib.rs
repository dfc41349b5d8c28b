//! DocQA core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Key, Msg};
pub use state::{
    percent_from, AppState, QueryAnswer, RelevantSection, SelectedFile, Status, PDF_MIME_TYPE,
};
pub use update::{
    update, CONNECT_FAILED_MESSAGE, EXTRACTION_FAILED_PREFIX, NOT_A_PDF_MESSAGE,
    QUERY_FAILED_MESSAGE, STAGE_COMPLETE, STAGE_EXTRACTING, STAGE_FAILED, STAGE_SENDING,
};
pub use view_model::{AppViewModel, PREVIEW_CHARS};
