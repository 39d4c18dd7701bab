//! Error types for the roomhold library.
//!
//! Every failure the engine can report is a variant of [`Error`]. Callers
//! that need to route errors (an HTTP layer, the CLI) use [`Error::kind`]
//! for the broad category and [`Error::reason_code`] for the stable,
//! machine-readable reason.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for operations that may fail with a roomhold error.
///
/// # Examples
///
/// ```
/// use roomhold::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(2)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Broad error category used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or impossible request.
    Validation,
    /// Unknown room type, booking, reference or code.
    NotFound,
    /// No availability, or a lost reservation race.
    Conflict,
    /// Illegal lifecycle transition.
    State,
    /// Persistence, randomness, configuration or I/O failure.
    System,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not found"),
            Self::Conflict => write!(f, "conflict"),
            Self::State => write!(f, "state"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Why a request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// A required field was empty.
    MissingField,
    /// A text field exceeded its maximum length.
    FieldTooLong,
    /// The guest email is not a plausible address.
    InvalidEmail,
    /// The guest count was zero.
    InvalidGuestCount,
    /// Check-in lies before today.
    PastDate,
    /// Check-out is not after check-in.
    InvalidRange,
    /// More guests than a single unit accommodates.
    OverCapacityGuests,
    /// A booking reference could not be parsed.
    InvalidReference,
    /// A booking status string was not recognized.
    InvalidStatus,
    /// A room type definition is inconsistent.
    InvalidRoomType,
    /// A listing filter is out of range.
    InvalidFilter,
}

impl ValidationReason {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingField => "MISSING_FIELD",
            Self::FieldTooLong => "FIELD_TOO_LONG",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidGuestCount => "INVALID_GUEST_COUNT",
            Self::PastDate => "PAST_DATE",
            Self::InvalidRange => "INVALID_RANGE",
            Self::OverCapacityGuests => "OVER_CAPACITY_GUESTS",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidRoomType => "INVALID_ROOM_TYPE",
            Self::InvalidFilter => "INVALID_FILTER",
        }
    }
}

/// What could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotFoundReason {
    /// Unknown or inactive room type.
    RoomType,
    /// Unknown booking id.
    Booking,
    /// Unknown booking reference.
    Reference,
    /// Unknown verification code.
    Code,
}

impl NotFoundReason {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RoomType => "ROOM_TYPE_NOT_FOUND",
            Self::Booking => "BOOKING_NOT_FOUND",
            Self::Reference => "REFERENCE_NOT_FOUND",
            Self::Code => "CODE_NOT_FOUND",
        }
    }
}

/// Why a lifecycle transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionRefusal {
    /// The booking is already confirmed.
    AlreadyConfirmed,
    /// The booking is cancelled or expired.
    TerminalState,
    /// The hold lapsed before the request arrived.
    Expired,
    /// The supplied email does not match the booking.
    EmailMismatch,
    /// The verification code is no longer available for review.
    NotAvailable,
}

impl TransitionRefusal {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AlreadyConfirmed => "ALREADY_CONFIRMED",
            Self::TerminalState => "TERMINAL_STATE",
            Self::Expired => "EXPIRED",
            Self::EmailMismatch => "EMAIL_MISMATCH",
            Self::NotAvailable => "NOT_AVAILABLE",
        }
    }
}

impl fmt::Display for TransitionRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyConfirmed => write!(f, "booking has already been confirmed"),
            Self::TerminalState => write!(f, "booking is cancelled or expired"),
            Self::Expired => write!(f, "hold has expired"),
            Self::EmailMismatch => write!(f, "email does not match the booking"),
            Self::NotAvailable => write!(f, "verification code is not available"),
        }
    }
}

/// The main error type for the roomhold library.
#[derive(Debug, Error)]
pub enum Error {
    /// A request failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The specific validation rule that failed.
        reason: ValidationReason,
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// What kind of resource was missing.
        reason: NotFoundReason,
        /// Human-readable identification of the resource.
        resource: String,
    },

    /// The room type has no free unit for the requested range.
    #[error("no availability for room type {room_type} from {check_in} to {check_out}")]
    NoAvailability {
        /// The room type requested.
        room_type: i64,
        /// Requested check-in date.
        check_in: NaiveDate,
        /// Requested check-out date.
        check_out: NaiveDate,
    },

    /// A lifecycle transition was refused.
    #[error("booking {booking}: {reason}")]
    Refused {
        /// Why the transition was refused.
        reason: TransitionRefusal,
        /// Reference (or id) of the booking concerned.
        booking: String,
    },

    /// No unique verification code could be issued.
    #[error("could not issue a unique verification code after {attempts} attempt(s)")]
    LowEntropy {
        /// Number of codes drawn before giving up.
        attempts: u32,
    },

    /// The random source failed.
    #[error("random source failure: {details}")]
    Randomness {
        /// Details from the random source.
        details: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration value is invalid.
    #[error("invalid configuration for '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database write lock could not be obtained.
    #[error("database lock timeout after {attempts} attempt(s) of {seconds}s")]
    LockTimeout {
        /// Busy timeout per attempt, in seconds.
        seconds: u64,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Stored data violates an invariant the schema should have enforced.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl Error {
    /// Builds a validation error.
    pub fn validation(
        reason: ValidationReason,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            reason,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a not-found error.
    pub fn not_found(reason: NotFoundReason, resource: impl Into<String>) -> Self {
        Self::NotFound {
            reason,
            resource: resource.into(),
        }
    }

    /// Builds a refused-transition error.
    pub fn refused(reason: TransitionRefusal, booking: impl Into<String>) -> Self {
        Self::Refused {
            reason,
            booking: booking.into(),
        }
    }

    /// Returns the broad category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomhold::error::{Error, ErrorKind, TransitionRefusal};
    ///
    /// let err = Error::refused(TransitionRefusal::Expired, "FW-2026-00001");
    /// assert_eq!(err.kind(), ErrorKind::State);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoAvailability { .. } => ErrorKind::Conflict,
            Self::Refused { .. } => ErrorKind::State,
            Self::LowEntropy { .. }
            | Self::Randomness { .. }
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::InvalidConfig { .. }
            | Self::Io(_)
            | Self::LockTimeout { .. }
            | Self::DataDirectoryNotFound { .. }
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. } => ErrorKind::System,
        }
    }

    /// Returns the stable, machine-readable reason code.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomhold::error::{Error, ValidationReason};
    ///
    /// let err = Error::validation(ValidationReason::PastDate, "check_in", "in the past");
    /// assert_eq!(err.reason_code(), "PAST_DATE");
    /// ```
    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::Validation { reason, .. } => reason.code(),
            Self::NotFound { reason, .. } => reason.code(),
            Self::NoAvailability { .. } => "NO_AVAILABILITY",
            Self::Refused { reason, .. } => reason.code(),
            Self::LowEntropy { .. } => "LOW_ENTROPY",
            Self::Randomness { .. } => "RANDOMNESS_FAILURE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) | Self::InvalidConfig { .. } => "CONFIGURATION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::LockTimeout { .. } => "LOCK_TIMEOUT",
            Self::DataDirectoryNotFound { .. } => "DATA_DIRECTORY_NOT_FOUND",
            Self::DatabaseCorruption { .. } => "DATABASE_CORRUPTION",
            Self::UnsupportedSchemaVersion { .. } => "UNSUPPORTED_SCHEMA_VERSION",
        }
    }

    /// Returns the refusal reason if this is a refused transition.
    #[must_use]
    pub const fn refusal(&self) -> Option<TransitionRefusal> {
        match self {
            Self::Refused { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Check if error indicates a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error indicates exhausted capacity.
    #[must_use]
    pub const fn is_no_availability(&self) -> bool {
        matches!(self, Self::NoAvailability { .. })
    }
}
