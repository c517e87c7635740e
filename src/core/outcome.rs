use crate::api::FieldErrors;

/// Result of a mutating controller operation.
///
/// Unlike `Result`, a failure here is already user-presentable: `message` is
/// either a stable generic message or the backend's own wording, and
/// `field_errors` carries any per-field validation detail.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome<T = ()> {
    Success(T),
    Failure {
        message: String,
        field_errors: FieldErrors,
    },
}

impl<T> OperationOutcome<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }

    pub fn invalid(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        Self::Failure {
            message: message.into(),
            field_errors,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message, .. } => Some(message),
        }
    }

    /// Empty on success and on failures without field detail.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Success(_) => None,
            Self::Failure { field_errors, .. } => Some(field_errors),
        }
    }
}
