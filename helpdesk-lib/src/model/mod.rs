//! Data model shared by tables and forms

mod kinds;
mod lookup;
mod row;
mod row_serde;
mod value;

pub use kinds::*;
pub use lookup::*;
pub use row::*;
pub use value::*;
