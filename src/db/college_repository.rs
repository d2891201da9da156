// src/db/college_repository.rs
// DOCUMENTATION: Database access for college_table
// PURPOSE: CRUD, lookups and paginated search for colleges

use crate::db::pagination::{fetch_page, PageRequest, TableDef};
use crate::errors::DbError;
use crate::models::{College, CollegeFields, Page};
use sqlx::PgPool;

pub const COLLEGE_TABLE: TableDef = TableDef {
    table: "college_table",
    columns: "id, college_code, college_name",
    sortable: &["id", "college_code", "college_name"],
    default_sort: "id",
    searchable: &["college_code", "college_name"],
    filterable: &[],
};

/// Constraint names from migrations/0001_init.sql
pub const COLLEGE_CODE_KEY: &str = "college_table_college_code_key";
pub const COLLEGE_NAME_KEY: &str = "college_table_college_name_key";

pub struct CollegeRepository;

impl CollegeRepository {
    /// All colleges in storage order
    pub async fn list(pool: &PgPool) -> Result<Vec<College>, DbError> {
        sqlx::query_as::<_, College>("SELECT id, college_code, college_name FROM college_table")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list colleges: {}", e);
                DbError::from(e)
            })
    }

    pub async fn list_paged(pool: &PgPool, req: &PageRequest) -> Result<Page<College>, DbError> {
        fetch_page(pool, &COLLEGE_TABLE, req).await
    }

    pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Option<College>, DbError> {
        let college = sqlx::query_as::<_, College>(
            "SELECT id, college_code, college_name FROM college_table WHERE college_code = $1",
        )
        .bind(code)
        .fetch_optional(pool)
        .await?;

        if college.is_none() {
            log::debug!("College not found: {}", code);
        }
        Ok(college)
    }

    /// Case-insensitive, whitespace-trimmed name match
    pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Option<College>, DbError> {
        let college = sqlx::query_as::<_, College>(
            r#"
            SELECT id, college_code, college_name
            FROM college_table
            WHERE LOWER(TRIM(college_name)) = LOWER(TRIM($1))
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(college)
    }

    pub async fn insert(pool: &PgPool, fields: &CollegeFields) -> Result<College, DbError> {
        let mut tx = pool.begin().await?;

        let college = sqlx::query_as::<_, College>(
            r#"
            INSERT INTO college_table (college_code, college_name)
            VALUES ($1, $2)
            RETURNING id, college_code, college_name
            "#,
        )
        .bind(&fields.college_code)
        .bind(&fields.college_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create college {}: {}", fields.college_code, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        log::info!("Created college: {}", college.college_code);
        Ok(college)
    }

    /// Returns None when `original_code` no longer matches a row
    pub async fn update(
        pool: &PgPool,
        original_code: &str,
        fields: &CollegeFields,
    ) -> Result<Option<College>, DbError> {
        let mut tx = pool.begin().await?;

        let college = sqlx::query_as::<_, College>(
            r#"
            UPDATE college_table
            SET college_code = $1,
                college_name = $2
            WHERE college_code = $3
            RETURNING id, college_code, college_name
            "#,
        )
        .bind(&fields.college_code)
        .bind(&fields.college_name)
        .bind(original_code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Update failed for college {}: {}", original_code, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        if let Some(c) = &college {
            log::info!("Updated college: {} -> {}", original_code, c.college_code);
        }
        Ok(college)
    }

    /// True iff a row was removed; dependents surface as ForeignKeyViolation
    pub async fn delete(pool: &PgPool, code: &str) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        let rows = sqlx::query("DELETE FROM college_table WHERE college_code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::warn!("Delete failed for college {}: {}", code, e);
                DbError::from(e)
            })?
            .rows_affected();

        tx.commit().await?;

        if rows > 0 {
            log::info!("Deleted college: {}", code);
        }
        Ok(rows > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM college_table")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
