//! Lowering from S-expressions into the arena.

mod build;
mod helpers;

pub use build::AstBuilder;
