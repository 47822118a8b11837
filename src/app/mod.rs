pub mod bootstrap;
pub mod session;

pub use bootstrap::start;
pub use session::{Command, Outcome, Session};
