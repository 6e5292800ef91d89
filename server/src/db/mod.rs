//! Database module for PostgreSQL persistence.

mod counter;

pub use counter::*;
