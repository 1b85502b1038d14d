pub mod goals;
pub mod tasks;
pub mod users;
