use serde::{Deserialize, Serialize};

use crate::domain::MatchId;
use crate::engine::errors::{SessionError, ValidationError};

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, команда не к той сессии).
    BadRequest(String),

    /// Сессия матча не найдена.
    MatchNotFound(MatchId),

    /// Команда отклонена правилами (восстановимо, оператор исправляет ввод).
    Validation(String),

    /// Внутренняя ошибка.
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(e) => ApiError::Validation(e.to_string()),
            SessionError::SnapshotNotFound(id) => ApiError::MatchNotFound(id),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}
