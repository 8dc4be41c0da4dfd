pub mod history;
pub mod prompt;
pub mod session;

pub use history::{HistoryWriter, RoundRecord};
pub use session::{Judgment, Outcome, Session, SessionConfig};
