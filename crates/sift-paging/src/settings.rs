//! Paging configuration.
//!
//! ```rust
//! use sift_paging::settings::PagingSettings;
//!
//! let settings = PagingSettings::from_toml(
//!     r#"
//!     backend = "mysql"
//!
//!     [capabilities]
//!     order_by_collection = false
//!     "#,
//! )?;
//!
//! let capabilities = settings.capabilities();
//! assert_eq!(capabilities.name, "MySQL");
//! assert!(!capabilities.order_by_collection);
//! # Ok::<(), sift_paging::PageError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capabilities::{
	BackendCapabilities, CollectionMatch, CountStrategy, DatabaseType, NumericTextCast,
};
use crate::error::{PageError, Result};

/// Paging settings, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
	/// Backend whose capability preset is used.
	pub backend: DatabaseType,

	/// Per-flag overrides of the preset.
	pub capabilities: CapabilityOverrides,

	/// Attach cache hints to compiled plans when the backend supports them.
	#[serde(default = "default_cacheable")]
	pub cacheable: bool,
}

fn default_cacheable() -> bool {
	true
}

impl Default for PagingSettings {
	fn default() -> Self {
		Self {
			backend: DatabaseType::default(),
			capabilities: CapabilityOverrides::default(),
			cacheable: default_cacheable(),
		}
	}
}

/// Optional replacements for individual capability flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityOverrides {
	pub order_by_collection: Option<bool>,
	pub filter_collection: Option<bool>,
	pub second_level_cache: Option<bool>,
	pub collection_match: Option<CollectionMatch>,
	pub count_strategy: Option<CountStrategy>,
	pub numeric_text_cast: Option<NumericTextCast>,
}

impl PagingSettings {
	pub fn new(backend: DatabaseType) -> Self {
		Self {
			backend,
			..Self::default()
		}
	}

	/// Parse settings from TOML text.
	pub fn from_toml(content: &str) -> Result<Self> {
		Ok(toml::from_str(content)?)
	}

	/// Read settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)
			.map_err(|e| PageError::Settings(format!("{}: {e}", path.display())))?;
		Self::from_toml(&content)
	}

	/// The backend preset with every override applied.
	pub fn capabilities(&self) -> BackendCapabilities {
		let mut capabilities = BackendCapabilities::for_backend(self.backend).clone();
		let overrides = &self.capabilities;
		if let Some(flag) = overrides.order_by_collection {
			capabilities.order_by_collection = flag;
		}
		if let Some(flag) = overrides.filter_collection {
			capabilities.filter_collection = flag;
		}
		if let Some(flag) = overrides.second_level_cache {
			capabilities.second_level_cache = flag;
		}
		if let Some(collection_match) = overrides.collection_match {
			capabilities.collection_match = collection_match;
		}
		if let Some(count_strategy) = overrides.count_strategy {
			capabilities.count_strategy = count_strategy;
		}
		if let Some(cast) = &overrides.numeric_text_cast {
			capabilities.numeric_text_cast = cast.clone();
		}
		capabilities
	}
}
