//! REST route definitions

pub mod health;
pub mod message;
pub mod room;
