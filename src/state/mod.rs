pub mod app_state;
pub mod change_list;

pub use app_state::AppState;
pub use change_list::{ApplyOutcome, ChangeList, DiffOptions};
