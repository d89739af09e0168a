pub mod date_ops;
pub mod filter_ops;
pub mod gesture;
pub mod placement;
pub mod search;
pub mod store_ops;
