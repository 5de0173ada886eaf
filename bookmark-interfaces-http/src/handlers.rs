pub mod entry_handlers;
pub mod ops_handlers;

pub use entry_handlers::*;
pub use ops_handlers::*;
