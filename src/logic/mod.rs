pub mod classifier;
pub mod config;
pub mod explain;
pub mod history;
pub mod scan;
