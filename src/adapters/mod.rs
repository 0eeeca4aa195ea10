//! Adapters: concrete implementations of the domain ports.

pub mod judge;
pub mod sqlite;
