pub mod court;
pub mod id;
pub mod queue;
pub mod reservation;
pub mod user;
