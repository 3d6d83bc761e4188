pub mod draft_ctx;
pub mod draft_flow;

pub use draft_ctx::DraftCtx;
pub use draft_flow::{CheckOutcome, DraftFlow};
