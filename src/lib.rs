//! Bookshelf Application Library
//!
//! Feature modules of the bookshelf service, ready to be registered with a
//! [`bookshelf_kernel::ModuleRegistry`].

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
