pub mod board;
pub mod sort;

pub use board::{Board, Column};
pub use sort::{sort_tasks, SortColumn, SortConfig, SortDirection};
