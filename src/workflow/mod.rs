pub mod phase;
pub mod session;
pub mod submission_ctx;

pub use phase::Phase;
pub use session::{SubmitOutcome, TutorSession};
pub use submission_ctx::SubmissionCtx;
