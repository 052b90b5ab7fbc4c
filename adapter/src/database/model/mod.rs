pub mod court;
pub mod queue;
pub mod reservation;
pub mod user;
