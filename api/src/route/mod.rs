pub mod admin;
pub mod court;
pub mod health;
pub mod queue;
pub mod user;
pub mod v1;
