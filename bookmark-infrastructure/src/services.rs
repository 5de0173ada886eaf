pub mod platform_client;

pub use platform_client::*;
