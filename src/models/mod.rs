pub mod draft;
pub mod loaders;
pub mod part;

pub use draft::{FullTestDraft, GroupData, PartData, QuestionData};
pub use loaders::{load_all_draft_files, load_draft_file, DraftFile, LoadFailure, LoadedDrafts};
pub use part::{Part, PART7_QUESTION_TOTAL};
