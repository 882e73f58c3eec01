use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid tariff schedule: {0}")]
    InvalidSchedule(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_convert_transparently() {
        let err: AppError = DomainError::Validation("nombre is required".into()).into();
        assert_eq!(err.to_string(), "Validation: nombre is required");
        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn infra_errors_convert_transparently() {
        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        let err: AppError = InfraError::from(json_err).into();
        assert!(err.to_string().starts_with("Serialization error"));
        assert!(matches!(err, AppError::Infra(InfraError::Serialization(_))));
    }
}
