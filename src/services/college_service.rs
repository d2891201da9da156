// src/services/college_service.rs
// DOCUMENTATION: Business rules for colleges
// PURPOSE: Validation and uniqueness checks between handlers and repository

use crate::db::{CollegeRepository, COLLEGE_NAME_KEY};
use crate::errors::{ApiError, DbError};
use crate::models::{
    College, CollegeFields, CreateCollegeRequest, ListQuery, Listing, UpdateCollegeRequest,
};
use crate::services::fields::{check, merge, page_request, present};
use sqlx::PgPool;

pub struct CollegeService;

impl CollegeService {
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Listing<College>, ApiError> {
        match query.window() {
            Some((page, limit)) => {
                let req = page_request(page, limit, query, Vec::new());
                Ok(Listing::Paged(CollegeRepository::list_paged(pool, &req).await?))
            }
            None => Ok(Listing::All(CollegeRepository::list(pool).await?)),
        }
    }

    pub async fn get(pool: &PgPool, code: &str) -> Result<College, ApiError> {
        CollegeRepository::get_by_code(pool, code)
            .await?
            .ok_or_else(|| ApiError::NotFound("College not found".to_string()))
    }

    pub async fn create(pool: &PgPool, req: CreateCollegeRequest) -> Result<College, ApiError> {
        let (Some(college_code), Some(college_name)) =
            (present(req.college_code), present(req.college_name))
        else {
            return Err(ApiError::Validation(
                "Missing college_code or college_name".to_string(),
            ));
        };

        let fields = CollegeFields {
            college_code,
            college_name,
        };
        check(&fields)?;

        let code_taken = CollegeRepository::get_by_code(pool, &fields.college_code)
            .await?
            .is_some();
        let name_taken = CollegeRepository::get_by_name(pool, &fields.college_name)
            .await?
            .is_some();

        match (code_taken, name_taken) {
            (true, true) => {
                return Err(ApiError::Conflict(
                    "College code and name already exist".to_string(),
                ))
            }
            (true, false) => {
                return Err(ApiError::Conflict("College code already exists".to_string()))
            }
            (false, true) => {
                return Err(ApiError::Conflict("College name already exists".to_string()))
            }
            (false, false) => {}
        }

        CollegeRepository::insert(pool, &fields)
            .await
            .map_err(Self::map_write_error)
    }

    /// Partial update of the college currently keyed by `code`
    pub async fn update(
        pool: &PgPool,
        code: &str,
        req: UpdateCollegeRequest,
    ) -> Result<College, ApiError> {
        if req.college_code.is_none() && req.college_name.is_none() {
            return Err(ApiError::Validation("No data provided".to_string()));
        }

        let current = Self::get(pool, code).await?;

        let fields = CollegeFields {
            college_code: merge(req.college_code, &current.college_code, "college_code")?,
            college_name: merge(req.college_name, &current.college_name, "college_name")?,
        };
        check(&fields)?;

        if fields.college_code != current.college_code
            && CollegeRepository::get_by_code(pool, &fields.college_code)
                .await?
                .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "College code '{}' already exists",
                fields.college_code
            )));
        }

        if fields.college_name != current.college_name {
            if let Some(other) = CollegeRepository::get_by_name(pool, &fields.college_name).await? {
                if other.id != current.id {
                    return Err(ApiError::Conflict(format!(
                        "College name '{}' already exists",
                        fields.college_name
                    )));
                }
            }
        }

        CollegeRepository::update(pool, code, &fields)
            .await
            .map_err(Self::map_write_error)?
            .ok_or_else(|| ApiError::NotFound("College not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, code: &str) -> Result<(), ApiError> {
        match CollegeRepository::delete(pool, code).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ApiError::NotFound("College not found".to_string())),
            Err(DbError::ForeignKeyViolation { .. }) => Err(ApiError::ForeignKey(
                "Cannot delete college. It has related programs. Delete programs first."
                    .to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Constraint errors that slipped past the pre-checks (concurrent writers)
    fn map_write_error(err: DbError) -> ApiError {
        match &err {
            DbError::DuplicateKey { .. } if err.constraint() == Some(COLLEGE_NAME_KEY) => {
                ApiError::Conflict("College name already exists".to_string())
            }
            DbError::DuplicateKey { .. } => {
                ApiError::Conflict("College code already exists".to_string())
            }
            _ => err.into(),
        }
    }
}
