//! Error type for overlay configuration.
//!
//! Only configuration can fail. Placement and lifecycle operations degrade
//! to "not yet visible" instead of returning errors, because they run inside
//! host notification callbacks.

/// Errors raised while building or updating overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// The offset configuration does not have a recognized shape.
    InvalidOffset(String),
    /// An anchor name outside the nine recognized anchors.
    InvalidAnchor(String),
    /// A path-based option update produced an invalid configuration.
    InvalidOption { path: String, message: String },
    /// An option path was empty or contained an empty segment.
    InvalidPath(String),
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayError::InvalidOffset(msg) => write!(f, "Invalid offset: {}", msg),
            OverlayError::InvalidAnchor(name) => write!(f, "Unknown anchor: {:?}", name),
            OverlayError::InvalidOption { path, message } => {
                write!(f, "Invalid value for option `{}`: {}", path, message)
            }
            OverlayError::InvalidPath(path) => write!(f, "Invalid option path: {:?}", path),
        }
    }
}

impl std::error::Error for OverlayError {}

pub type Result<T> = std::result::Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = OverlayError::InvalidAnchor("middle".to_string());
        assert_eq!(err.to_string(), "Unknown anchor: \"middle\"");

        let err = OverlayError::InvalidOption {
            path: "offset.top".to_string(),
            message: "expected array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for option `offset.top`: expected array"
        );
    }
}
