use super::error::ChartError;

/// Tweets at or below this many retweets are left out of the chart.
pub const RETWEET_THRESHOLD: u64 = 1200;
pub const DEFAULT_WIDTH: f64 = 940.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;
pub const DEFAULT_DATASET_PATH: &str = "data/tweets.csv";

/// Sizing and data options for one chart instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
	pub width: f64,
	pub height: f64,
	pub retweet_threshold: u64,
	pub dataset_path: String,
}

impl Default for ChartConfig {
	fn default() -> Self {
		Self {
			width: DEFAULT_WIDTH,
			height: DEFAULT_HEIGHT,
			retweet_threshold: RETWEET_THRESHOLD,
			dataset_path: DEFAULT_DATASET_PATH.into(),
		}
	}
}

impl ChartConfig {
	/// Applies `width`, `height` and `threshold` overrides from a key lookup
	/// such as the page query string. Unparsable values are ignored.
	pub fn with_overrides<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(width) = lookup("width").and_then(|v| v.parse().ok()) {
			self.width = width;
		}
		if let Some(height) = lookup("height").and_then(|v| v.parse().ok()) {
			self.height = height;
		}
		if let Some(threshold) = lookup("threshold").and_then(|v| v.parse().ok()) {
			self.retweet_threshold = threshold;
		}
		self
	}

	pub fn validate(&self) -> Result<(), ChartError> {
		for (name, value) in [("width", self.width), ("height", self.height)] {
			if !value.is_finite() || value <= 0.0 {
				return Err(ChartError::InvalidConfig(format!(
					"{name} must be a positive number of pixels, got {value}"
				)));
			}
		}
		if self.dataset_path.trim().is_empty() {
			return Err(ChartError::InvalidConfig("dataset path is empty".into()));
		}
		Ok(())
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_original_canvas() {
		let config = ChartConfig::default();
		assert_eq!(config.width, 940.0);
		assert_eq!(config.height, 600.0);
		assert_eq!(config.retweet_threshold, 1200);
		assert_eq!(config.center(), (470.0, 300.0));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn rejects_non_positive_or_nan_sizes() {
		for (w, h) in [(0.0, 600.0), (940.0, -1.0), (f64::NAN, 600.0), (f64::INFINITY, 1.0)] {
			let config = ChartConfig {
				width: w,
				height: h,
				..ChartConfig::default()
			};
			let err = config.validate().unwrap_err();
			assert!(matches!(err, ChartError::InvalidConfig(_)), "{w}x{h}");
		}
	}

	#[test]
	fn overrides_replace_only_parsable_values() {
		let config = ChartConfig::default().with_overrides(|key| match key {
			"width" => Some("1200".into()),
			"height" => Some("tall".into()),
			_ => None,
		});
		assert_eq!(config.width, 1200.0);
		assert_eq!(config.height, DEFAULT_HEIGHT);
		assert_eq!(config.retweet_threshold, RETWEET_THRESHOLD);
	}

	#[test]
	fn rejects_blank_dataset_path() {
		let config = ChartConfig {
			dataset_path: "  ".into(),
			..ChartConfig::default()
		};
		assert!(config.validate().is_err());
	}
}
