//! Built-in marker handlers.

pub mod all_args_final;

pub use all_args_final::AllArgsFinalHandler;
