pub mod draft_store;
pub mod report_writer;
pub mod validator;

pub use draft_store::DraftStore;
pub use report_writer::ReportWriter;
pub use validator::{diagnose, validate, Cause, ErrorLocation, Issue, ValidationReport};
