use std::fmt;

#[derive(Debug)]
pub enum StampError {
    Validation { field: usize, reason: String },
    Decode(String),
    UnsupportedImage,
    Encrypted,
    EmptyDocument,
    Serialize(String),
    Io(std::io::Error),
}

impl fmt::Display for StampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StampError::Validation { field, reason } => {
                write!(f, "invalid field {}: {}", field + 1, reason)
            }
            StampError::Decode(message) => write!(f, "pdf load error: {}", message),
            StampError::UnsupportedImage => {
                write!(f, "image data is neither valid PNG nor valid JPEG")
            }
            StampError::Encrypted => write!(f, "document is encrypted"),
            StampError::EmptyDocument => write!(f, "document has no pages"),
            StampError::Serialize(message) => write!(f, "pdf save error: {}", message),
            StampError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for StampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StampError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StampError {
    fn from(value: std::io::Error) -> Self {
        StampError::Io(value)
    }
}
