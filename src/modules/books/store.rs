//! Persistence client for books.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_db::DbPool;
use bookshelf_http::AppError;
use thiserror::Error;

use super::models::{Book, BookInput};

const BOOK_COLUMNS: &str = "id, title, author";

#[derive(Debug, Error)]
pub enum StoreError {
    /// `update`/`delete` matched no row.
    #[error("no book with id {id} to {operation}")]
    RecordNotFound { operation: &'static str, id: i64 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Store failures are not recovered by handlers; they surface as 500s.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::internal(err)
    }
}

/// Data-access operations the books routes depend on.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book and return it with its assigned id.
    async fn create(&self, input: &BookInput) -> Result<Book, StoreError>;

    /// Every book, ascending by id.
    async fn find_many(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_unique(&self, id: i64) -> Result<Option<Book>, StoreError>;

    /// Overwrite title and author. Fails with [`StoreError::RecordNotFound`]
    /// when no book has `id`.
    async fn update(&self, id: i64, input: &BookInput) -> Result<Book, StoreError>;

    /// Fails with [`StoreError::RecordNotFound`] when no book has `id`.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

pub type SharedBookStore = Arc<dyn BookStore>;

/// [`BookStore`] over the `books` table.
#[derive(Clone)]
pub struct SqlBookStore {
    pool: DbPool,
}

impl SqlBookStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqlBookStore {
    async fn create(&self, input: &BookInput) -> Result<Book, StoreError> {
        let query =
            format!("INSERT INTO books (title, author) VALUES (?, ?) RETURNING {BOOK_COLUMNS}");
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .fetch_one(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_many(&self) -> Result<Vec<Book>, StoreError> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id ASC");
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_unique(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?");
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn update(&self, id: i64, input: &BookInput) -> Result<Book, StoreError> {
        let query = format!(
            "UPDATE books SET title = ?, author = ? WHERE id = ? RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::RecordNotFound {
                operation: "update",
                id,
            })
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound {
                operation: "delete",
                id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::BOOKS_MIGRATIONS;

    async fn store() -> SqlBookStore {
        let pool = bookshelf_db::create_memory_pool().await.unwrap();
        let migrations: Vec<(String, _)> = BOOKS_MIGRATIONS
            .iter()
            .cloned()
            .map(|migration| ("books".to_string(), migration))
            .collect();
        bookshelf_db::run_migrations(&pool, &migrations).await.unwrap();
        SqlBookStore::new(pool)
    }

    fn input(title: &str, author: &str) -> BookInput {
        BookInput {
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = store().await;
        let first = store.create(&input("Dune", "Frank Herbert")).await.unwrap();
        let second = store.create(&input("Emma", "Jane Austen")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.title, "Dune");
        assert_eq!(first.author, "Frank Herbert");
    }

    #[tokio::test]
    async fn find_many_orders_by_id() {
        let store = store().await;
        for title in ["c", "a", "b"] {
            store.create(&input(title, "x")).await.unwrap();
        }

        let ids: Vec<i64> = store
            .find_many()
            .await
            .unwrap()
            .iter()
            .map(|book| book.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = store().await;

        let err = store.update(41, &input("a", "b")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::RecordNotFound {
                operation: "update",
                id: 41
            }
        ));

        let err = store.delete(41).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::RecordNotFound {
                operation: "delete",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = store().await;
        let book = store.create(&input("a", "b")).await.unwrap();
        store.delete(book.id).await.unwrap();

        let next = store.create(&input("c", "d")).await.unwrap();
        assert!(next.id > book.id);
        assert!(store.find_unique(book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_fields_violate_table_constraint() {
        let store = store().await;
        let err = store.create(&input("", "b")).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
