//! Domain models and API data transfer types

pub mod book;
pub mod borrow;
pub mod user;
