use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

/// Map a driver error onto the service taxonomy. Unique-constraint hits are
/// conflicts (duplicate email/username, duplicate review pair), everything
/// else is a plain database error.
pub fn from_db(e: sea_orm::DbErr) -> ServiceError {
    from_db_message(e.to_string())
}

fn from_db_message(msg: String) -> ServiceError {
    let lower = msg.to_lowercase();
    if lower.contains("unique") || lower.contains("duplicate") {
        ServiceError::Conflict(msg)
    } else {
        ServiceError::Db(msg)
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
            models::errors::ModelError::Db(msg) => from_db_message(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn unique_violations_become_conflicts() {
        let e: ServiceError =
            ModelError::Db("duplicate key value violates unique constraint \"uniq_review_reviewer_business\"".into())
                .into();
        assert!(matches!(e, ServiceError::Conflict(_)));
    }

    #[test]
    fn other_db_errors_stay_db() {
        let e: ServiceError = ModelError::Db("connection reset".into()).into();
        assert!(matches!(e, ServiceError::Db(_)));
    }

    #[test]
    fn model_validation_maps_to_validation() {
        let e: ServiceError = ModelError::Validation("invalid email".into()).into();
        assert!(matches!(e, ServiceError::Validation(_)));
    }
}
