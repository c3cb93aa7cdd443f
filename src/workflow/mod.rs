//! The three letter workflows: drafting, browsing the log, and reviewing.
//! Each is plain state with no I/O; the page handlers load data, drive the
//! state, and call the external services.

pub mod create;
pub mod log;
pub mod review;

pub use create::{
    ArchiveRecord, CreateBlocked, CreateStage, CreateWorkflow, LetterForm, LetterRequest, Template,
};
pub use log::{LogFilter, LogView};
pub use review::{ReviewBlocked, ReviewDraft, ReviewOutcome, ReviewSession};
