use thiserror::Error;

/// Everything that can stop a bubble chart from being built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChartError {
	/// The dataset could not be fetched or one of its rows is malformed.
	#[error("failed to load `{source_name}`: {message}")]
	DataLoad {
		source_name: String,
		message: String,
	},

	/// No row is left after the retweet filter, so no scale can be derived.
	#[error("no tweet has more than {threshold} retweets; nothing to chart")]
	EmptyDataset { threshold: u64 },

	/// A layout mode name that is neither `all` nor `year`.
	#[error("unknown layout mode `{0}`")]
	InvalidMode(String),

	#[error("invalid chart configuration: {0}")]
	InvalidConfig(String),
}

impl ChartError {
	pub fn data_load(source_name: impl Into<String>, message: impl ToString) -> Self {
		Self::DataLoad {
			source_name: source_name.into(),
			message: message.to_string(),
		}
	}
}
