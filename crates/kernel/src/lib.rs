//! Module lifecycle, registry, and layered settings shared by every bookshelf crate.

pub mod module;
pub mod registry;
pub mod settings;

pub use bookshelf_db::{DbPool, Migration};
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
