pub mod goal;
pub mod task;
pub mod user;

pub use goal::{Goal, GoalDraft, GoalPatch};
pub use task::{Task, TaskDraft, TaskPatch};
pub use user::User;
