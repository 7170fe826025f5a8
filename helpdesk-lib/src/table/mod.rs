//! Client-side table: search, per-column filters, sort, pagination,
//! selection, column visibility and export over an in-memory row set.

mod column;
mod config;
pub mod export;
pub mod filter;
pub mod page;
mod selection;
pub mod sort;
mod state;
mod view;

pub use column::*;
pub use config::*;
pub use export::{ExportFile, ExportFormat};
pub use selection::Selection;
pub use sort::{Direction, SortMode, SortState};
pub use state::*;
pub use view::*;
