//! Error types for the paging engine.

use thiserror::Error;

/// Errors raised while building pages, compiling them into query plans, or
/// executing those plans.
#[derive(Debug, Error)]
pub enum PageError {
	/// A builder or criterion argument was rejected.
	#[error("Invalid argument {name}: {reason}")]
	InvalidArgument {
		/// Name of the offending argument.
		name: String,
		/// Why the argument was rejected.
		reason: String,
	},

	/// A single-assignment builder setting was assigned twice.
	#[error("{0} has already been set")]
	AlreadySet(&'static str),

	/// A loosely typed criteria value could not be interpreted for its field.
	///
	/// The compiler recovers from this error by skipping the field.
	#[error("Cannot parse predicate for {field}({expected}) = {value}")]
	UnparsableCriterion {
		/// Criteria key.
		field: String,
		/// Declared type of the field.
		expected: String,
		/// Textual form of the rejected value.
		value: String,
	},

	/// The backend does not support the requested feature.
	#[error("Sorry, {backend} does not support {limitation}")]
	Unsupported {
		/// Backend display name.
		backend: String,
		/// Description of the missing feature.
		limitation: String,
	},

	/// A projection was requested without a usable field mapping.
	#[error(
		"You must provide a non-empty path mapping when the result type {result} differs from the entity type {entity}"
	)]
	IllegalMapping {
		/// Queried entity.
		entity: String,
		/// Requested result type.
		result: String,
	},

	/// The criteria value has a shape the compiler cannot express.
	#[error("Unsupported criteria value for {field}: {value}")]
	UnsupportedCriteria {
		/// Criteria key.
		field: String,
		/// Textual form of the value.
		value: String,
	},

	/// The entity is not declared in the schema.
	#[error("Unknown entity: {0}")]
	UnknownEntity(String),

	/// A dotted path does not resolve against the entity.
	#[error("Unknown field {path} on entity {entity}")]
	UnknownField {
		/// Entity the path was resolved from.
		entity: String,
		/// The dotted path.
		path: String,
	},

	/// A plan references a parameter that was never bound.
	#[error("Unbound parameter: {0}")]
	UnboundParameter(String),

	/// Paging settings could not be loaded.
	#[error("Invalid settings: {0}")]
	Settings(String),

	/// The executor failed to run a plan.
	#[error("Query execution failed: {0}")]
	Execution(String),
}

impl PageError {
	/// Shorthand for [`PageError::InvalidArgument`].
	pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidArgument {
			name: name.into(),
			reason: reason.into(),
		}
	}

	/// Shorthand for [`PageError::Unsupported`].
	pub fn unsupported(backend: impl Into<String>, limitation: impl Into<String>) -> Self {
		Self::Unsupported {
			backend: backend.into(),
			limitation: limitation.into(),
		}
	}

	/// Whether the compiler may skip the offending criterion and continue.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::UnparsableCriterion { .. })
	}
}

impl From<toml::de::Error> for PageError {
	fn from(err: toml::de::Error) -> Self {
		Self::Settings(err.to_string())
	}
}

/// Result type alias for paging operations.
pub type Result<T> = std::result::Result<T, PageError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unsupported_message() {
		// Arrange
		let error = PageError::unsupported("MySQL", "sorting a to-many relationship");

		// Act
		let message = error.to_string();

		// Assert
		assert_eq!(
			message,
			"Sorry, MySQL does not support sorting a to-many relationship"
		);
	}

	#[rstest]
	fn test_already_set_message() {
		let error = PageError::AlreadySet("range");
		assert_eq!(error.to_string(), "range has already been set");
	}

	#[rstest]
	#[case(PageError::UnparsableCriterion {
		field: "age".to_string(),
		expected: "Int".to_string(),
		value: "abc".to_string(),
	}, true)]
	#[case(PageError::invalid_argument("offset", "must be zero or positive"), false)]
	#[case(PageError::UnknownEntity("Ghost".to_string()), false)]
	fn test_is_recoverable(#[case] error: PageError, #[case] expected: bool) {
		assert_eq!(error.is_recoverable(), expected);
	}

	#[rstest]
	fn test_toml_error_from() {
		let toml_error = toml::from_str::<toml::Table>("backend = ").unwrap_err();
		let error: PageError = toml_error.into();
		assert!(matches!(error, PageError::Settings(_)));
	}
}
