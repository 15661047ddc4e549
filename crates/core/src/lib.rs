//! Domain helpers shared by the dispatch engine and the API host.
//!
//! This crate has no internal dependencies so both the events crate and any
//! host binary can use it.

pub mod address;
pub mod error;
pub mod keys;
pub mod listing;
pub mod markup;
pub mod types;
