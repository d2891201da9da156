// src/db/program_repository.rs
// DOCUMENTATION: Database access for program_table
// PURPOSE: CRUD, lookups and paginated search for programs

use crate::db::pagination::{fetch_page, PageRequest, TableDef};
use crate::errors::DbError;
use crate::models::{Page, Program, ProgramFields};
use sqlx::PgPool;

pub const PROGRAM_TABLE: TableDef = TableDef {
    table: "program_table",
    columns: "id, program_code, program_name, college_code",
    sortable: &["id", "program_code", "program_name", "college_code"],
    default_sort: "id",
    searchable: &["program_code", "program_name", "college_code"],
    filterable: &["college_code"],
};

pub const PROGRAM_CODE_KEY: &str = "program_table_program_code_key";
pub const PROGRAM_NAME_KEY: &str = "program_table_program_name_key";

pub struct ProgramRepository;

impl ProgramRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<Program>, DbError> {
        sqlx::query_as::<_, Program>(
            "SELECT id, program_code, program_name, college_code FROM program_table",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list programs: {}", e);
            DbError::from(e)
        })
    }

    pub async fn list_paged(pool: &PgPool, req: &PageRequest) -> Result<Page<Program>, DbError> {
        fetch_page(pool, &PROGRAM_TABLE, req).await
    }

    pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Option<Program>, DbError> {
        let program = sqlx::query_as::<_, Program>(
            r#"
            SELECT id, program_code, program_name, college_code
            FROM program_table
            WHERE program_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(pool)
        .await?;

        Ok(program)
    }

    /// Case-insensitive, whitespace-trimmed name match
    pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Option<Program>, DbError> {
        let program = sqlx::query_as::<_, Program>(
            r#"
            SELECT id, program_code, program_name, college_code
            FROM program_table
            WHERE LOWER(TRIM(program_name)) = LOWER(TRIM($1))
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(program)
    }

    pub async fn insert(pool: &PgPool, fields: &ProgramFields) -> Result<Program, DbError> {
        let mut tx = pool.begin().await?;

        let program = sqlx::query_as::<_, Program>(
            r#"
            INSERT INTO program_table (program_code, program_name, college_code)
            VALUES ($1, $2, $3)
            RETURNING id, program_code, program_name, college_code
            "#,
        )
        .bind(&fields.program_code)
        .bind(&fields.program_name)
        .bind(&fields.college_code)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create program {}: {}", fields.program_code, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        log::info!("Created program: {}", program.program_code);
        Ok(program)
    }

    pub async fn update(
        pool: &PgPool,
        original_code: &str,
        fields: &ProgramFields,
    ) -> Result<Option<Program>, DbError> {
        let mut tx = pool.begin().await?;

        let program = sqlx::query_as::<_, Program>(
            r#"
            UPDATE program_table
            SET program_code = $1,
                program_name = $2,
                college_code = $3
            WHERE program_code = $4
            RETURNING id, program_code, program_name, college_code
            "#,
        )
        .bind(&fields.program_code)
        .bind(&fields.program_name)
        .bind(&fields.college_code)
        .bind(original_code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Update failed for program {}: {}", original_code, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        if let Some(p) = &program {
            log::info!("Updated program: {} -> {}", original_code, p.program_code);
        }
        Ok(program)
    }

    pub async fn delete(pool: &PgPool, code: &str) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        let rows = sqlx::query("DELETE FROM program_table WHERE program_code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::warn!("Delete failed for program {}: {}", code, e);
                DbError::from(e)
            })?
            .rows_affected();

        tx.commit().await?;

        if rows > 0 {
            log::info!("Deleted program: {}", code);
        }
        Ok(rows > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM program_table")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
