// src/services/program_service.rs
// DOCUMENTATION: Business rules for programs
// PURPOSE: Uniqueness and parent-college checks around ProgramRepository

use crate::db::{CollegeRepository, ProgramRepository, PROGRAM_NAME_KEY};
use crate::errors::{ApiError, DbError};
use crate::models::{
    split_csv, CreateProgramRequest, ListQuery, Listing, Program, ProgramFields,
    ProgramFilterQuery, UpdateProgramRequest,
};
use crate::services::fields::{check, merge, page_request, present};
use sqlx::PgPool;

pub struct ProgramService;

impl ProgramService {
    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
        filters: &ProgramFilterQuery,
    ) -> Result<Listing<Program>, ApiError> {
        match query.window() {
            Some((page, limit)) => {
                let filters = vec![("college_code", split_csv(filters.college.as_deref()))];
                let req = page_request(page, limit, query, filters);
                Ok(Listing::Paged(ProgramRepository::list_paged(pool, &req).await?))
            }
            None => Ok(Listing::All(ProgramRepository::list(pool).await?)),
        }
    }

    pub async fn get(pool: &PgPool, code: &str) -> Result<Program, ApiError> {
        ProgramRepository::get_by_code(pool, code)
            .await?
            .ok_or_else(|| ApiError::NotFound("Program not found".to_string()))
    }

    pub async fn create(pool: &PgPool, req: CreateProgramRequest) -> Result<Program, ApiError> {
        let (Some(program_code), Some(program_name), Some(college_code)) = (
            present(req.program_code),
            present(req.program_name),
            present(req.college_code),
        ) else {
            return Err(ApiError::Validation(
                "Missing required fields: program_code, program_name, or college_code".to_string(),
            ));
        };

        let fields = ProgramFields {
            program_code,
            program_name,
            college_code,
        };
        check(&fields)?;

        if CollegeRepository::get_by_code(pool, &fields.college_code)
            .await?
            .is_none()
        {
            return Err(ApiError::ForeignKey("College code does not exist".to_string()));
        }

        let code_taken = ProgramRepository::get_by_code(pool, &fields.program_code)
            .await?
            .is_some();
        let name_taken = ProgramRepository::get_by_name(pool, &fields.program_name)
            .await?
            .is_some();

        match (code_taken, name_taken) {
            (true, true) => {
                return Err(ApiError::Conflict(
                    "Program code and name already exist".to_string(),
                ))
            }
            (true, false) => {
                return Err(ApiError::Conflict("Program code already exists".to_string()))
            }
            (false, true) => {
                return Err(ApiError::Conflict("Program name already exists".to_string()))
            }
            (false, false) => {}
        }

        ProgramRepository::insert(pool, &fields)
            .await
            .map_err(|e| Self::map_write_error(e, "College code does not exist"))
    }

    pub async fn update(
        pool: &PgPool,
        code: &str,
        req: UpdateProgramRequest,
    ) -> Result<Program, ApiError> {
        if req.program_code.is_none() && req.program_name.is_none() && req.college_code.is_none() {
            return Err(ApiError::Validation("No data provided".to_string()));
        }

        let current = Self::get(pool, code).await?;

        let fields = ProgramFields {
            program_code: merge(req.program_code, &current.program_code, "program_code")?,
            program_name: merge(req.program_name, &current.program_name, "program_name")?,
            college_code: merge(req.college_code, &current.college_code, "college_code")?,
        };
        check(&fields)?;

        if fields.program_code != current.program_code
            && ProgramRepository::get_by_code(pool, &fields.program_code)
                .await?
                .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "Program code '{}' already exists",
                fields.program_code
            )));
        }

        if fields.program_name != current.program_name {
            if let Some(other) = ProgramRepository::get_by_name(pool, &fields.program_name).await? {
                if other.id != current.id {
                    return Err(ApiError::Conflict(format!(
                        "Program name '{}' already exists",
                        fields.program_name
                    )));
                }
            }
        }

        if fields.college_code != current.college_code
            && CollegeRepository::get_by_code(pool, &fields.college_code)
                .await?
                .is_none()
        {
            return Err(ApiError::ForeignKey(
                "New college code does not exist".to_string(),
            ));
        }

        ProgramRepository::update(pool, code, &fields)
            .await
            .map_err(|e| Self::map_write_error(e, "New college code does not exist"))?
            .ok_or_else(|| ApiError::NotFound("Program not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, code: &str) -> Result<(), ApiError> {
        match ProgramRepository::delete(pool, code).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ApiError::NotFound("Program not found".to_string())),
            Err(DbError::ForeignKeyViolation { .. }) => Err(ApiError::ForeignKey(
                "Cannot delete this program because it has enrolled students. \
                 Please delete the students first."
                    .to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn map_write_error(err: DbError, missing_college: &str) -> ApiError {
        match &err {
            DbError::DuplicateKey { .. } if err.constraint() == Some(PROGRAM_NAME_KEY) => {
                ApiError::Conflict("Program name already exists".to_string())
            }
            DbError::DuplicateKey { .. } => {
                ApiError::Conflict("Program code already exists".to_string())
            }
            DbError::ForeignKeyViolation { .. } => ApiError::ForeignKey(missing_college.to_string()),
            _ => err.into(),
        }
    }
}
