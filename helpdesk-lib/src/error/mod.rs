//! Error types

mod bridge;
mod form;
mod table;
mod validation;

pub use bridge::*;
pub use form::*;
pub use table::*;
pub use validation::*;
