//! Request validation ahead of store writes.

mod validation;
pub use validation::*;
