use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    MissingDirective,
    ParameterCollision(String),
    Serialize(String),
    Deserialize(String),
    Store(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingDirective => {
                write!(f, "Missing directive: can not traverse from an empty vertex")
            }
            Error::ParameterCollision(key) => write!(f, "Duplication of bind key: {}", key),
            Error::Serialize(err) => write!(f, "Serialization error: {}", err),
            Error::Deserialize(err) => write!(f, "Deserialization error: {}", err),
            Error::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for Error {}
