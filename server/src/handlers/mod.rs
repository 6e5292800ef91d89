//! Request handlers for counter operations.

mod counter;

pub use counter::*;
