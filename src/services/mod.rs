pub mod gateway;
pub mod history_log;
pub mod llm_gateway;
pub mod locator_parser;
pub mod remote_gateway;

pub use gateway::{Gateway, TutorGateway};
pub use history_log::HistoryLog;
pub use llm_gateway::DirectLlmGateway;
pub use locator_parser::parse_locator_reply;
pub use remote_gateway::RemoteGateway;
