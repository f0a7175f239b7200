pub mod history;
pub mod line_hint;
pub mod loaders;
pub mod submission;
pub mod subject;
pub mod theme;

pub use history::{HistoryItem, ImageAttachment, HISTORY_CAP};
pub use line_hint::{LineHint, LocatorResult};
pub use loaders::{load_all_toml_files, load_image_attachments, load_toml_to_submission};
pub use submission::Submission;
pub use subject::SubjectMode;
pub use theme::Theme;
