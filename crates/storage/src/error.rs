use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

impl StorageError {
    /// Maps a unique-key violation (Postgres 23505) to `ConstraintViolation`
    /// with the given message; any other error passes through as `Database`.
    pub fn on_unique_violation(err: sqlx::Error, message: &str) -> Self {
        Self::on_violation(err, UNIQUE_VIOLATION, message)
    }

    /// Same mapping for CHECK constraint violations (Postgres 23514).
    pub fn on_check_violation(err: sqlx::Error, message: &str) -> Self {
        Self::on_violation(err, CHECK_VIOLATION, message)
    }

    fn on_violation(err: sqlx::Error, code: &str, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(code) => {
                StorageError::ConstraintViolation(message.to_string())
            }
            _ => StorageError::from(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct PgViolation(&'static str);

    impl std::fmt::Display for PgViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "violates constraint")
        }
    }

    impl StdError for PgViolation {}

    impl sqlx::error::DatabaseError for PgViolation {
        fn message(&self) -> &str {
            "violates constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgViolation(code)))
    }

    #[test]
    fn unique_violation_maps_to_constraint_violation() {
        let err = StorageError::on_unique_violation(db_error("23505"), "already joined");
        assert!(matches!(err, StorageError::ConstraintViolation(msg) if msg == "already joined"));
    }

    #[test]
    fn check_violation_maps_to_constraint_violation() {
        let err = StorageError::on_check_violation(db_error("23514"), "bad date spec");
        assert!(matches!(err, StorageError::ConstraintViolation(msg) if msg == "bad date spec"));
    }

    #[test]
    fn other_errors_pass_through_as_database() {
        let err = StorageError::on_unique_violation(db_error("40001"), "already joined");
        assert!(matches!(err, StorageError::Database(_)));

        let err = StorageError::on_check_violation(sqlx::Error::RowNotFound, "bad date spec");
        assert!(matches!(err, StorageError::Database(_)));
    }
}
