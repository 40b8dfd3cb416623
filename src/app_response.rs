use std::fmt::{Display, Formatter};

use lmdb::Error as LmdbError;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

/// Result envelope returned to FFI callers and error type of the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppResponse {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    ValidationError(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppResponse::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppResponse::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl std::error::Error for AppResponse {}

impl From<LmdbError> for AppResponse {
    fn from(err: LmdbError) -> Self {
        match err {
            LmdbError::NotFound => AppResponse::NotFound("Key not found".to_string()),
            LmdbError::Corrupted | LmdbError::PageNotFound | LmdbError::Panic => {
                AppResponse::DatabaseError(format!("Database is corrupted: {}", err))
            }
            LmdbError::MapFull => {
                AppResponse::DatabaseError(format!("Database map is full, raise mapSize: {}", err))
            }
            _ => AppResponse::DatabaseError(format!("LMDB error: {}", err)),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for AppResponse {
    fn from(err: std::io::Error) -> Self {
        AppResponse::DatabaseError(format!("IO error: {}", err))
    }
}

impl AppResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        AppResponse::Ok(msg.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AppResponse::Ok(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lmdb_errors_map_to_response_kinds() {
        assert!(matches!(AppResponse::from(LmdbError::NotFound), AppResponse::NotFound(_)));
        assert!(matches!(AppResponse::from(LmdbError::MapFull), AppResponse::DatabaseError(_)));
    }

    #[test]
    fn serializes_as_externally_tagged_variant() {
        let json = serde_json::to_string(&AppResponse::success("done")).unwrap();
        assert_eq!(json, r#"{"Ok":"done"}"#);
    }
}
