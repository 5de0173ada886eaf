pub mod activity;
pub mod config;

pub use activity::*;
pub use config::*;
