pub mod books;

use std::sync::Arc;

use bookshelf_kernel::{DbPool, ModuleRegistry};

use books::store::SqlBookStore;

/// Register every application module, wiring each to its dependencies
pub fn register_all(registry: &mut ModuleRegistry, pool: &DbPool) {
    let book_store = Arc::new(SqlBookStore::new(pool.clone()));
    registry.register(books::create_module(book_store));
}
