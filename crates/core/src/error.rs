use crate::components::patient::RequiredField;

#[derive(Debug, thiserror::Error)]
pub enum EnzianError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("report is missing required fields: {}", join_fields(.0))]
    MissingRequiredFields(Vec<RequiredField>),

    #[error("invalid text: {0}")]
    Text(#[from] enzian_types::TextError),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type EnzianResult<T> = std::result::Result<T, EnzianError>;
