pub mod auth;
pub mod court;
pub mod health;
pub mod queue;
pub mod reservation;
pub mod user;
