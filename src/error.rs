//! Crate error type.

/// Result alias used across the crate.
pub type VisResult<T> = Result<T, VisError>;

/// Failures the visualizations report to their callers.
///
/// Data-quality problems inside a dataset (non-numeric fields, dangling
/// `flows_into` titles) are not errors: they degrade to `NaN` or are dropped.
#[derive(thiserror::Error, Debug)]
pub enum VisError {
	/// A sort was requested on a field that no record carries.
	#[error("cannot sort by unknown field `{0}`")]
	InvalidSortField(String),

	/// A dataset could not be parsed at all.
	#[error("dataset `{name}` is malformed: {source}")]
	Dataset {
		/// Dataset label, for the error page.
		name: &'static str,
		/// Underlying parse failure.
		#[source]
		source: serde_json::Error,
	},

	/// A configuration overlay could not be parsed.
	#[error("configuration is malformed: {0}")]
	Config(#[source] serde_json::Error),
}

impl VisError {
	pub fn invalid_sort_field(field: impl Into<String>) -> Self {
		Self::InvalidSortField(field.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_sort_field_names_the_field() {
		let err = VisError::invalid_sort_field("charisma");
		assert_eq!(err.to_string(), "cannot sort by unknown field `charisma`");
	}

	#[test]
	fn dataset_error_keeps_source() {
		let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
		let err = VisError::Dataset {
			name: "movies",
			source,
		};
		assert!(err.to_string().starts_with("dataset `movies` is malformed"));
		assert!(std::error::Error::source(&err).is_some());
	}
}
