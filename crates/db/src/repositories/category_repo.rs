//! Repository for the `categories` table.

use pdm_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryPosition, CreateCategory, CreateOutcome};

/// Column list for the `categories` table.
const COLUMNS: &str = "id, name, type, parent_id, position, created_at, updated_at";

/// Provides the taxonomy operations over categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List categories, optionally restricted to one type.
    ///
    /// Ordered by type, then sibling position, so [`crate::models::category::nest`]
    /// yields roots and children in display order.
    pub async fn list(
        pool: &PgPool,
        category_type: Option<&str>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE ($1::TEXT IS NULL OR type = $1)
             ORDER BY type, position, id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(category_type)
            .fetch_all(pool)
            .await
    }

    /// Distinct category types in alphabetical order.
    pub async fn list_types(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT type FROM categories ORDER BY type")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Root categories of one type.
    pub async fn list_roots(
        pool: &PgPool,
        category_type: &str,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE type = $1 AND parent_id IS NULL
             ORDER BY position, id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(category_type)
            .fetch_all(pool)
            .await
    }

    /// Direct children of `parent_id` within one type.
    pub async fn list_children(
        pool: &PgPool,
        category_type: &str,
        parent_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE type = $1 AND parent_id = $2
             ORDER BY position, id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(category_type)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Create a category.
    ///
    /// Roots are create-or-fetch on `(name, type)`: an existing root is
    /// returned with `created = false`. Subcategories are always inserted.
    /// The new row is placed after its last sibling. Concurrent creates within
    /// the same type are serialized by a transaction-scoped advisory lock.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
    ) -> Result<CreateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&input.category_type)
            .execute(&mut *tx)
            .await?;

        if input.parent_id.is_none() {
            let existing_query = format!(
                "SELECT {COLUMNS} FROM categories
                 WHERE name = $1 AND type = $2 AND parent_id IS NULL
                 ORDER BY id
                 LIMIT 1"
            );
            let existing = sqlx::query_as::<_, Category>(&existing_query)
                .bind(&input.name)
                .bind(&input.category_type)
                .fetch_optional(&mut *tx)
                .await?;
            if let Some(category) = existing {
                tx.commit().await?;
                return Ok(CreateOutcome {
                    category,
                    created: false,
                });
            }
        }

        let insert_query = format!(
            "INSERT INTO categories (name, type, parent_id, position)
             SELECT $1, $2, $3, COALESCE(MAX(position), 0) + 1
             FROM categories
             WHERE type = $2 AND parent_id IS NOT DISTINCT FROM $3
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&insert_query)
            .bind(&input.name)
            .bind(&input.category_type)
            .bind(input.parent_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CreateOutcome {
            category,
            created: true,
        })
    }

    /// Rename a category in place. Returns `None` if it does not exist.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category and its direct children.
    ///
    /// Returns the number of removed rows; `0` means the category did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 OR parent_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Apply a batch of position updates atomically.
    ///
    /// Returns the first id that matched no row, in which case nothing is
    /// applied.
    pub async fn reorder(
        pool: &PgPool,
        positions: &[CategoryPosition],
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for entry in positions {
            let result = sqlx::query("UPDATE categories SET position = $2 WHERE id = $1")
                .bind(entry.id)
                .bind(entry.position)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(Some(entry.id));
            }
        }

        tx.commit().await?;
        Ok(None)
    }

    /// Re-tag every row of `old_type` as `new_type`. Renaming onto an existing
    /// type merges the two forests. Returns the number of rows changed.
    pub async fn rename_type(
        pool: &PgPool,
        old_type: &str,
        new_type: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE categories SET type = $2 WHERE type = $1")
            .bind(old_type)
            .bind(new_type)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete exactly the row with `id`; its children follow through the
    /// foreign-key cascade. Returns `true` if the row existed.
    pub async fn delete_type(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
