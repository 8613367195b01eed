//! Backend capability descriptors.
//!
//! The compiler never branches on a backend's identity. Every dialect
//! difference it cares about is a field of [`BackendCapabilities`].

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
	#[default]
	Postgres,
	Mysql,
	Sqlite,
}

impl fmt::Display for DatabaseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Postgres => f.write_str("postgres"),
			Self::Mysql => f.write_str("mysql"),
			Self::Sqlite => f.write_str("sqlite"),
		}
	}
}

/// How "collection contains all of these values" is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMatch {
	/// A correlated subquery counting distinct matching elements.
	CorrelatedSubquery,
	/// An `IN` list on the joined collection plus `HAVING COUNT(DISTINCT ..) = n`.
	GroupedIn,
}

/// How a filtered total is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStrategy {
	/// `COUNT(root) WHERE root.id IN (filtered ids)`.
	InSubquery,
	/// `COUNT(root) WHERE EXISTS (correlated filtered row)`.
	Exists,
	/// `COUNT(DISTINCT root.id)` over the filtered joins.
	Distinct,
}

/// How a numeric column is turned into text for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericTextCast {
	/// The backend converts implicitly.
	Implicit,
	/// `CAST(x AS type_name)`.
	Cast { type_name: String },
	/// `name(x, 'format')`.
	Function { name: String, format: String },
}

/// Feature descriptor of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCapabilities {
	/// Display name used in error messages.
	pub name: String,
	/// Whether ordering by a to-many or element collection path is allowed.
	pub order_by_collection: bool,
	/// Whether filtering by a to-many or element collection path is allowed.
	pub filter_collection: bool,
	/// Whether result caching hints are honored.
	pub second_level_cache: bool,
	pub collection_match: CollectionMatch,
	pub count_strategy: CountStrategy,
	pub numeric_text_cast: NumericTextCast,
}

impl BackendCapabilities {
	pub fn postgres() -> Self {
		Self {
			name: "PostgreSQL".to_string(),
			order_by_collection: true,
			filter_collection: true,
			second_level_cache: true,
			collection_match: CollectionMatch::CorrelatedSubquery,
			count_strategy: CountStrategy::InSubquery,
			numeric_text_cast: NumericTextCast::Function {
				name: "TO_CHAR".to_string(),
				format: "FM999999999999999999".to_string(),
			},
		}
	}

	pub fn mysql() -> Self {
		Self {
			name: "MySQL".to_string(),
			order_by_collection: true,
			filter_collection: true,
			second_level_cache: true,
			collection_match: CollectionMatch::GroupedIn,
			count_strategy: CountStrategy::Exists,
			numeric_text_cast: NumericTextCast::Implicit,
		}
	}

	pub fn sqlite() -> Self {
		Self {
			name: "SQLite".to_string(),
			order_by_collection: true,
			filter_collection: true,
			second_level_cache: false,
			collection_match: CollectionMatch::CorrelatedSubquery,
			count_strategy: CountStrategy::Distinct,
			numeric_text_cast: NumericTextCast::Cast {
				type_name: "TEXT".to_string(),
			},
		}
	}

	/// Shared preset for `backend`, built once per process.
	pub fn for_backend(backend: DatabaseType) -> &'static BackendCapabilities {
		static POSTGRES: OnceLock<BackendCapabilities> = OnceLock::new();
		static MYSQL: OnceLock<BackendCapabilities> = OnceLock::new();
		static SQLITE: OnceLock<BackendCapabilities> = OnceLock::new();

		match backend {
			DatabaseType::Postgres => POSTGRES.get_or_init(Self::postgres),
			DatabaseType::Mysql => MYSQL.get_or_init(Self::mysql),
			DatabaseType::Sqlite => SQLITE.get_or_init(Self::sqlite),
		}
	}
}

impl Default for BackendCapabilities {
	fn default() -> Self {
		Self::for_backend(DatabaseType::default()).clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(DatabaseType::Postgres, "PostgreSQL", CountStrategy::InSubquery)]
	#[case(DatabaseType::Mysql, "MySQL", CountStrategy::Exists)]
	#[case(DatabaseType::Sqlite, "SQLite", CountStrategy::Distinct)]
	fn test_presets(
		#[case] backend: DatabaseType,
		#[case] name: &str,
		#[case] count_strategy: CountStrategy,
	) {
		// Act
		let capabilities = BackendCapabilities::for_backend(backend);

		// Assert
		assert_eq!(capabilities.name, name);
		assert_eq!(capabilities.count_strategy, count_strategy);
		assert!(capabilities.filter_collection);
	}

	#[rstest]
	fn test_for_backend_is_shared() {
		let first = BackendCapabilities::for_backend(DatabaseType::Mysql);
		let second = BackendCapabilities::for_backend(DatabaseType::Mysql);
		assert!(std::ptr::eq(first, second));
	}

	#[rstest]
	fn test_numeric_text_cast_deserializes_tagged() {
		// Arrange
		let source = r#"{"kind":"function","name":"TO_CHAR","format":"FM9"}"#;

		// Act
		let cast: NumericTextCast = serde_json::from_str(source).unwrap();

		// Assert
		assert_eq!(
			cast,
			NumericTextCast::Function {
				name: "TO_CHAR".to_string(),
				format: "FM9".to_string(),
			}
		);
	}
}
