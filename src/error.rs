use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_error_kind() {
        let err = Error::InvalidShape("input len 3, expected 2".to_owned());
        assert_eq!(format!("{err}"), "invalid shape: input len 3, expected 2");

        let err = Error::InvalidConfig("max_epochs must be > 0".to_owned());
        assert!(format!("{err}").starts_with("invalid config"));
    }
}
