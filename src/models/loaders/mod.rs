pub mod draft_loader;

pub use draft_loader::{
    is_draft_file, load_all_draft_files, load_draft_file, parse_draft, DraftFile, LoadFailure, LoadedDrafts,
};
