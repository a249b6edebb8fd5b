//! Command implementations

pub mod handlers;
pub mod keys;
pub mod rewrite;

pub use handlers::list_handlers;
pub use keys::list_keys;
pub use rewrite::{check_units, rewrite_units, Destination};
