//! Pure data structures passed into and returned from the dispatcher.

pub mod order;
pub mod outcome;

pub use order::*;
pub use outcome::*;
