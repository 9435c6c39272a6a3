//! Accounts domain module: registered API users.

pub mod user;

pub use user::{Registration, User};
