pub mod handlers;
pub mod handles;
pub mod navigation;
pub mod session;
pub mod session_state;
pub mod utils;

pub use session::SessionOrchestrator;
pub use session_state::*;
