//! Annotation-driven rewrite engine.
//!
//! A pass walks one compilation unit, dispatching every registered
//! [`AstVisitor`](registry::AstVisitor) in priority order. Handlers locate
//! their marker annotation, consult the configured flag-usage policy, consume
//! the marker and mutate the tree through the arena's mutate-then-resync
//! contract.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod marker;
pub mod policy;
pub mod registry;
pub mod walker;

pub use config::{ConfigKey, Configuration, FlagUsage};
pub use handlers::all_args_final::{AllArgsFinalHandler, RewriteOutcome, RewriteStats};
pub use marker::{MarkerDescriptor, MarkerUse, NameMatch};
pub use policy::GateOutcome;
pub use registry::{AstVisitor, PassContext, Registry};
pub use walker::{PassReport, Walker};
