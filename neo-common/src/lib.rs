pub mod types;

pub use types::{DateRange, FilterMode, SortKey};
