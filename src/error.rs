//! Error types for map loading and catalog handling.

use thiserror::Error;

/// Error codes for lot map processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No map registered for the lot (E100)
    AssetNotFound = 100,
    /// Map asset could not be loaded or scanned (E101)
    AssetLoadFailed = 101,
    /// Availability response has no spot array (E200)
    MalformedAvailabilityPayload = 200,
    /// Catalog, availability or reservation lookup failed (E201)
    FetchFailed = 201,
    /// Spot label or id does not follow the naming convention (E300)
    InvalidSpot = 300,
}

/// Main error type for the lot map engine.
#[derive(Debug, Error)]
pub enum LotMapError {
    #[error("No map registered for lot {lot_id}")]
    AssetNotFound { lot_id: String },

    #[error("Failed to load map for lot {lot_id}: {message}")]
    AssetLoadFailed { lot_id: String, message: String },

    #[error("Malformed availability payload: {message}")]
    MalformedAvailabilityPayload { message: String },

    #[error("Failed to fetch {resource}: {message}")]
    FetchFailed { resource: String, message: String },

    #[error("Invalid spot label '{label}': expected Spot<number>")]
    InvalidSpotLabel { label: String },

    #[error("Invalid spot id '{spot_id}': expected <lot>-<number>")]
    InvalidSpotId { spot_id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LotMapError {
    /// Create a fetch failure for a named resource.
    pub fn fetch_failed(resource: impl Into<String>, message: impl Into<String>) -> Self {
        LotMapError::FetchFailed {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LotMapError::AssetNotFound { .. } => ErrorCode::AssetNotFound,
            LotMapError::AssetLoadFailed { .. } => ErrorCode::AssetLoadFailed,
            LotMapError::MalformedAvailabilityPayload { .. } => {
                ErrorCode::MalformedAvailabilityPayload
            }
            LotMapError::FetchFailed { .. } => ErrorCode::FetchFailed,
            LotMapError::InvalidSpotLabel { .. } => ErrorCode::InvalidSpot,
            LotMapError::InvalidSpotId { .. } => ErrorCode::InvalidSpot,
            LotMapError::Io(_) => ErrorCode::AssetLoadFailed,
            LotMapError::Json(_) => ErrorCode::MalformedAvailabilityPayload,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// A missing map is final for the lot; nothing will make it appear.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LotMapError::AssetNotFound { .. })
    }

    /// Whether asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LotMapError::FetchFailed { .. } | LotMapError::AssetLoadFailed { .. } | LotMapError::Io(_)
        )
    }

    /// Text shown to the user in place of the map or spot states.
    pub fn user_message(&self) -> &'static str {
        match self.code() {
            ErrorCode::AssetNotFound | ErrorCode::AssetLoadFailed => {
                "No map yet: this lot does not have a map uploaded."
            }
            ErrorCode::MalformedAvailabilityPayload => {
                "Spot availability could not be read for this lot."
            }
            ErrorCode::FetchFailed => "Could not load parking data. Please try again.",
            ErrorCode::InvalidSpot => "This lot map contains an unrecognised spot.",
        }
    }
}

/// Result type alias for lot map operations.
pub type Result<T> = std::result::Result<T, LotMapError>;
