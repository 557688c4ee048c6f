//! Data models for the lending ledger

pub mod book;
pub mod borrow;
pub mod client;
pub mod settings;
pub mod user;
