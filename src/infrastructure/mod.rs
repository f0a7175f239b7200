pub mod state_store;

pub use state_store::{LocalStateStore, MemoryStateStore, StateStore, HISTORY_KEY, THEME_KEY};
