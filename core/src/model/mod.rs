pub mod filter;
pub mod tags;
pub mod task;
