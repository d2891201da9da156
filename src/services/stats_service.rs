// src/services/stats_service.rs
// DOCUMENTATION: Dashboard aggregates
// PURPOSE: Row counts across the three academic tables

use crate::db::{CollegeRepository, ProgramRepository, StudentRepository};
use crate::errors::ApiError;
use crate::models::DashboardStats;
use sqlx::PgPool;

pub struct StatsService;

impl StatsService {
    pub async fn dashboard(pool: &PgPool) -> Result<DashboardStats, ApiError> {
        let (total_students, total_colleges, total_programs) = tokio::try_join!(
            StudentRepository::count(pool),
            CollegeRepository::count(pool),
            ProgramRepository::count(pool),
        )?;

        Ok(DashboardStats {
            total_students,
            total_colleges,
            total_programs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a disposable Postgres in DATABASE_URL"]
    async fn test_counts_each_table(pool: PgPool) {
        sqlx::query(
            "INSERT INTO college_table (college_code, college_name) VALUES \
             ('CCS', 'College of Computer Studies'), ('COE', 'College of Engineering')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO program_table (program_code, program_name, college_code) \
             VALUES ('BSCS', 'BS Computer Science', 'CCS')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let stats = StatsService::dashboard(&pool).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_students: 0,
                total_colleges: 2,
                total_programs: 1,
            }
        );
    }
}
