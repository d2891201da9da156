// src/services/student_service.rs
// DOCUMENTATION: Business rules for students
// PURPOSE: Form resolution, program checks and avatar upload around StudentRepository

use crate::db::{ProgramRepository, StudentRepository};
use crate::errors::{ApiError, DbError};
use crate::models::{
    split_csv, ListQuery, Listing, Student, StudentFields, StudentFilterQuery, StudentForm,
};
use crate::services::fields::{merge, page_request};
use crate::services::image_store::{FileUpload, ImageStore};
use sqlx::PgPool;
use validator::{Validate, ValidationErrors};

const INVALID_YEAR_OR_GENDER: &str = "Invalid year (1-4) or gender";

pub struct StudentService;

impl StudentService {
    pub async fn list(
        pool: &PgPool,
        query: &ListQuery,
        filters: &StudentFilterQuery,
    ) -> Result<Listing<Student>, ApiError> {
        match query.window() {
            Some((page, limit)) => {
                let filters = vec![
                    ("program_code", split_csv(filters.program.as_deref())),
                    ("year", split_csv(filters.year.as_deref())),
                    ("gender", split_csv(filters.gender.as_deref())),
                ];
                let req = page_request(page, limit, query, filters);
                Ok(Listing::Paged(StudentRepository::list_paged(pool, &req).await?))
            }
            None => Ok(Listing::All(StudentRepository::list(pool).await?)),
        }
    }

    pub async fn get(pool: &PgPool, student_id: &str) -> Result<Student, ApiError> {
        StudentRepository::get_by_student_id(pool, student_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))
    }

    pub async fn create(
        pool: &PgPool,
        store: &dyn ImageStore,
        form: StudentForm,
        avatar: Option<FileUpload>,
    ) -> Result<Student, ApiError> {
        let mut fields = Self::resolve_new(&form)?;

        if StudentRepository::get_by_student_id(pool, &fields.student_id)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("Student ID already exists".to_string()));
        }

        if ProgramRepository::get_by_code(pool, &fields.program_code)
            .await?
            .is_none()
        {
            return Err(ApiError::ForeignKey("Program code does not exist".to_string()));
        }

        if let Some(file) = avatar {
            fields.avatar_url = Self::upload_avatar(store, file).await;
        }

        StudentRepository::insert(pool, &fields)
            .await
            .map_err(|e| Self::map_write_error(e, "Program code does not exist"))
    }

    pub async fn update(
        pool: &PgPool,
        store: &dyn ImageStore,
        student_id: &str,
        form: StudentForm,
        avatar: Option<FileUpload>,
    ) -> Result<Student, ApiError> {
        if form == StudentForm::default() && avatar.is_none() {
            return Err(ApiError::Validation("No data provided".to_string()));
        }

        let current = Self::get(pool, student_id).await?;
        let mut fields = Self::resolve_update(form, &current)?;

        if fields.student_id != current.student_id
            && StudentRepository::get_by_student_id(pool, &fields.student_id)
                .await?
                .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "Student ID '{}' already exists",
                fields.student_id
            )));
        }

        if fields.program_code != current.program_code
            && ProgramRepository::get_by_code(pool, &fields.program_code)
                .await?
                .is_none()
        {
            return Err(ApiError::ForeignKey(
                "New program code does not exist".to_string(),
            ));
        }

        if let Some(file) = avatar {
            if let Some(url) = Self::upload_avatar(store, file).await {
                fields.avatar_url = Some(url);
            }
        }

        StudentRepository::update(pool, student_id, &fields)
            .await
            .map_err(|e| Self::map_write_error(e, "New program code does not exist"))?
            .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, student_id: &str) -> Result<(), ApiError> {
        if StudentRepository::delete(pool, student_id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound("Student not found".to_string()))
        }
    }

    /// Upload failures are logged and the record is written without the new avatar
    async fn upload_avatar(store: &dyn ImageStore, file: FileUpload) -> Option<String> {
        let filename = file.filename.clone();
        match store.upload(file).await {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Avatar upload failed for {}: {}", filename, e);
                None
            }
        }
    }

    /// Presence, parsing and range checks for a new student
    fn resolve_new(form: &StudentForm) -> Result<StudentFields, ApiError> {
        for name in StudentForm::REQUIRED {
            if form.get(name).map_or(true, |v| v.trim().is_empty()) {
                return Err(ApiError::Validation(format!("Missing field: {}", name)));
            }
        }

        let text = |name: &str| form.get(name).unwrap_or_default().to_string();
        let fields = StudentFields {
            student_id: text("student_id"),
            firstname: text("firstname"),
            lastname: text("lastname"),
            program_code: text("program_code"),
            year: parse_year(&text("year"))?,
            gender: text("gender"),
            avatar_url: None,
        };

        fields.validate().map_err(validation_error)?;
        Ok(fields)
    }

    /// Submitted fields override `current`; everything else is kept
    fn resolve_update(form: StudentForm, current: &Student) -> Result<StudentFields, ApiError> {
        let year = match form.year {
            Some(raw) => parse_year(&raw)?,
            None => current.year,
        };

        let fields = StudentFields {
            student_id: merge(form.student_id, &current.student_id, "student_id")?,
            firstname: merge(form.firstname, &current.firstname, "firstname")?,
            lastname: merge(form.lastname, &current.lastname, "lastname")?,
            program_code: merge(form.program_code, &current.program_code, "program_code")?,
            year,
            gender: merge(form.gender, &current.gender, "gender")?,
            avatar_url: current.avatar_url.clone(),
        };

        fields.validate().map_err(validation_error)?;
        Ok(fields)
    }

    fn map_write_error(err: DbError, missing_program: &str) -> ApiError {
        match err {
            DbError::DuplicateKey { .. } => {
                ApiError::Conflict("Student ID already exists".to_string())
            }
            DbError::ForeignKeyViolation { .. } => ApiError::ForeignKey(missing_program.to_string()),
            DbError::CheckViolation { .. } => ApiError::Validation(INVALID_YEAR_OR_GENDER.to_string()),
            other => other.into(),
        }
    }
}

fn parse_year(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Validation(INVALID_YEAR_OR_GENDER.to_string()))
}

fn validation_error(errors: ValidationErrors) -> ApiError {
    let fields = errors.field_errors();
    if fields.contains_key("year") || fields.contains_key("gender") {
        ApiError::Validation(INVALID_YEAR_OR_GENDER.to_string())
    } else {
        ApiError::Validation(format!("Invalid input: {}", errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateCollegeRequest, CreateProgramRequest};
    use crate::services::image_store::UploadError;
    use crate::services::{CollegeService, ProgramService};
    use async_trait::async_trait;

    fn form() -> StudentForm {
        StudentForm {
            student_id: Some("2024-0001".into()),
            firstname: Some("Mary".into()),
            lastname: Some("Smith".into()),
            program_code: Some("BSCS".into()),
            year: Some("2".into()),
            gender: Some("Female".into()),
        }
    }

    fn student() -> Student {
        Student {
            id: 1,
            student_id: "2024-0001".into(),
            firstname: "Mary".into(),
            lastname: "Smith".into(),
            program_code: "BSCS".into(),
            year: 2,
            gender: "Female".into(),
            avatar_url: Some("https://img.example/mary.png".into()),
        }
    }

    #[test]
    fn test_resolve_new_reports_first_missing_field() {
        let mut f = form();
        f.lastname = None;
        f.gender = None;
        let err = StudentService::resolve_new(&f).unwrap_err();
        assert_eq!(err.to_string(), "Missing field: lastname");

        let mut f = form();
        f.student_id = Some("  ".into());
        let err = StudentService::resolve_new(&f).unwrap_err();
        assert_eq!(err.to_string(), "Missing field: student_id");
    }

    #[test]
    fn test_resolve_new_rejects_bad_year_and_gender() {
        for (year, gender) in [("5", "Male"), ("two", "Male"), ("1", "Robot")] {
            let mut f = form();
            f.year = Some(year.into());
            f.gender = Some(gender.into());
            let err = StudentService::resolve_new(&f).unwrap_err();
            assert_eq!(err.to_string(), INVALID_YEAR_OR_GENDER);
        }
    }

    #[test]
    fn test_resolve_new_round_trips_input() {
        let fields = StudentService::resolve_new(&form()).unwrap();
        assert_eq!(fields.student_id, "2024-0001");
        assert_eq!(fields.year, 2);
        assert_eq!(fields.gender, "Female");
        assert_eq!(fields.avatar_url, None);
    }

    #[test]
    fn test_resolve_update_keeps_unspecified_fields() {
        let partial = StudentForm {
            lastname: Some("Jones".into()),
            year: Some("3".into()),
            ..Default::default()
        };
        let fields = StudentService::resolve_update(partial, &student()).unwrap();
        assert_eq!(fields.lastname, "Jones");
        assert_eq!(fields.year, 3);
        assert_eq!(fields.firstname, "Mary");
        assert_eq!(fields.program_code, "BSCS");
        assert_eq!(fields.avatar_url.as_deref(), Some("https://img.example/mary.png"));
    }

    #[test]
    fn test_map_check_violation() {
        let err = StudentService::map_write_error(
            DbError::CheckViolation {
                constraint: Some("student_table_year_check".into()),
            },
            "Program code does not exist",
        );
        assert_eq!(err.to_string(), INVALID_YEAR_OR_GENDER);
    }

    /// Image store double returning a fixed outcome
    struct FixedStore(Option<&'static str>);

    #[async_trait]
    impl ImageStore for FixedStore {
        async fn upload(&self, _file: FileUpload) -> Result<String, UploadError> {
            self.0.map(str::to_string).ok_or(UploadError::NotConfigured)
        }
    }

    fn avatar() -> FileUpload {
        FileUpload {
            filename: "mary.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        }
    }

    #[actix_web::test]
    async fn test_upload_failure_is_not_fatal() {
        assert_eq!(StudentService::upload_avatar(&FixedStore(None), avatar()).await, None);
        assert_eq!(
            StudentService::upload_avatar(&FixedStore(Some("https://img/x.png")), avatar()).await,
            Some("https://img/x.png".to_string())
        );
    }

    async fn seed_program(pool: &PgPool) {
        CollegeService::create(
            pool,
            CreateCollegeRequest {
                college_code: Some("CCS".into()),
                college_name: Some("College of Computer Studies".into()),
            },
        )
        .await
        .unwrap();
        ProgramService::create(
            pool,
            CreateProgramRequest {
                program_code: Some("BSCS".into()),
                program_name: Some("BS Computer Science".into()),
                college_code: Some("CCS".into()),
            },
        )
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a disposable Postgres in DATABASE_URL"]
    async fn test_create_with_failed_upload_still_writes(pool: PgPool) {
        seed_program(&pool).await;

        let created = StudentService::create(&pool, &FixedStore(None), form(), Some(avatar()))
            .await
            .unwrap();
        assert_eq!(created.student_id, "2024-0001");
        assert_eq!(created.avatar_url, None);

        let err = StudentService::create(&pool, &FixedStore(None), form(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Student ID already exists");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a disposable Postgres in DATABASE_URL"]
    async fn test_update_keeps_avatar_when_upload_fails(pool: PgPool) {
        seed_program(&pool).await;
        let store = FixedStore(Some("https://img/first.png"));
        StudentService::create(&pool, &store, form(), Some(avatar()))
            .await
            .unwrap();

        let updated = StudentService::update(
            &pool,
            &FixedStore(None),
            "2024-0001",
            StudentForm {
                firstname: Some("Maria".into()),
                ..Default::default()
            },
            Some(avatar()),
        )
        .await
        .unwrap();
        assert_eq!(updated.firstname, "Maria");
        assert_eq!(updated.lastname, "Smith");
        assert_eq!(updated.avatar_url.as_deref(), Some("https://img/first.png"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a disposable Postgres in DATABASE_URL"]
    async fn test_filtered_listing(pool: PgPool) {
        seed_program(&pool).await;
        let store = FixedStore(None);
        for (i, (year, gender)) in [("1", "Male"), ("2", "Female"), ("2", "Other"), ("4", "Female")]
            .into_iter()
            .enumerate()
        {
            let f = StudentForm {
                student_id: Some(format!("2024-000{}", i + 1)),
                year: Some(year.into()),
                gender: Some(gender.into()),
                ..form()
            };
            StudentService::create(&pool, &store, f, None).await.unwrap();
        }

        let query = ListQuery {
            page: Some(1),
            limit: Some(10),
            sort_by: Some("year".into()),
            sort_order: Some("desc".into()),
            ..Default::default()
        };
        let filters = StudentFilterQuery {
            year: Some("2,4".into()),
            gender: Some("Female".into()),
            ..Default::default()
        };
        let Listing::Paged(page) = StudentService::list(&pool, &query, &filters).await.unwrap()
        else {
            panic!("expected a paged listing");
        };
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].year, 4);
        assert_eq!(page.data[1].year, 2);
    }
}
