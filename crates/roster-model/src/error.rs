use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    FieldNotFound(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("duplicate field id in schema: {0}")]
    DuplicateField(String),
    #[error("field ids must not be empty")]
    EmptyFieldId,
    #[error("schema defines no fields")]
    EmptySchema,
}

pub type Result<T> = std::result::Result<T, ModelError>;
