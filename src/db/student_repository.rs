// src/db/student_repository.rs
// DOCUMENTATION: Database access for student_table
// PURPOSE: CRUD and filtered, paginated search for students

use crate::db::pagination::{fetch_page, PageRequest, TableDef};
use crate::errors::DbError;
use crate::models::{Page, Student, StudentFields};
use sqlx::PgPool;

pub const STUDENT_TABLE: TableDef = TableDef {
    table: "student_table",
    columns: "id, student_id, firstname, lastname, program_code, year, gender, avatar_url",
    sortable: &[
        "id",
        "student_id",
        "firstname",
        "lastname",
        "program_code",
        "year",
        "gender",
    ],
    default_sort: "id",
    searchable: &["student_id", "firstname", "lastname", "program_code"],
    filterable: &["program_code", "year", "gender"],
};

pub const STUDENT_ID_KEY: &str = "student_table_student_id_key";

pub struct StudentRepository;

impl StudentRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<Student>, DbError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, firstname, lastname, program_code, year, gender, avatar_url
            FROM student_table
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list students: {}", e);
            DbError::from(e)
        })
    }

    pub async fn list_paged(pool: &PgPool, req: &PageRequest) -> Result<Page<Student>, DbError> {
        fetch_page(pool, &STUDENT_TABLE, req).await
    }

    pub async fn get_by_student_id(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Option<Student>, DbError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, firstname, lastname, program_code, year, gender, avatar_url
            FROM student_table
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(pool)
        .await?;

        Ok(student)
    }

    pub async fn insert(pool: &PgPool, fields: &StudentFields) -> Result<Student, DbError> {
        let mut tx = pool.begin().await?;

        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO student_table (
                student_id, firstname, lastname, program_code, year, gender, avatar_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, student_id, firstname, lastname, program_code, year, gender, avatar_url
            "#,
        )
        .bind(&fields.student_id) // $1
        .bind(&fields.firstname) // $2
        .bind(&fields.lastname) // $3
        .bind(&fields.program_code) // $4
        .bind(fields.year) // $5
        .bind(&fields.gender) // $6
        .bind(&fields.avatar_url) // $7
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create student {}: {}", fields.student_id, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        log::info!("Created student: {}", student.student_id);
        Ok(student)
    }

    pub async fn update(
        pool: &PgPool,
        original_student_id: &str,
        fields: &StudentFields,
    ) -> Result<Option<Student>, DbError> {
        let mut tx = pool.begin().await?;

        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE student_table
            SET student_id = $1,
                firstname = $2,
                lastname = $3,
                program_code = $4,
                year = $5,
                gender = $6,
                avatar_url = $7
            WHERE student_id = $8
            RETURNING id, student_id, firstname, lastname, program_code, year, gender, avatar_url
            "#,
        )
        .bind(&fields.student_id)
        .bind(&fields.firstname)
        .bind(&fields.lastname)
        .bind(&fields.program_code)
        .bind(fields.year)
        .bind(&fields.gender)
        .bind(&fields.avatar_url)
        .bind(original_student_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Update failed for student {}: {}", original_student_id, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        if let Some(s) = &student {
            log::info!("Updated student: {} -> {}", original_student_id, s.student_id);
        }
        Ok(student)
    }

    pub async fn delete(pool: &PgPool, student_id: &str) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        let rows = sqlx::query("DELETE FROM student_table WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Delete failed for student {}: {}", student_id, e);
                DbError::from(e)
            })?
            .rows_affected();

        tx.commit().await?;

        if rows > 0 {
            log::info!("Deleted student: {}", student_id);
        }
        Ok(rows > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM student_table")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
