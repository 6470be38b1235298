//! Request handlers

pub mod health;
pub mod records;
pub mod search;
pub mod tagging;
