use std::fmt;
use std::str::FromStr;

use log::warn;

use super::error::ChartError;
use super::scale::TimeScale;
use super::simulation::{AxisTarget, PositionForce};
use super::types::BubbleNode;

/// Pull toward the shared center in the grouped view.
pub const GROUPED_STRENGTH: f64 = 0.03;
/// Pull toward each node's date column in the split view.
pub const SPLIT_STRENGTH: f64 = 0.08;
/// Scales a bubble's area into its repulsion strength.
pub const CHARGE_FACTOR: f64 = 0.03;

/// Which arrangement the bubbles settle into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
	/// Every bubble drifts toward the canvas center.
	#[default]
	Grouped,
	/// Bubbles spread horizontally by tweet date.
	SplitByDate,
}

/// The pair of positional forces a mode installs in the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutTargets {
	pub x: PositionForce,
	pub y: PositionForce,
}

impl LayoutMode {
	pub const ALL: [LayoutMode; 2] = [LayoutMode::Grouped, LayoutMode::SplitByDate];

	/// Id of the toolbar button that selects this mode.
	pub fn trigger_id(self) -> &'static str {
		match self {
			LayoutMode::Grouped => "all",
			LayoutMode::SplitByDate => "year",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			LayoutMode::Grouped => "All Tweets",
			LayoutMode::SplitByDate => "By Date",
		}
	}

	/// Maps a clicked button id to a mode. Only `year` splits; any other id,
	/// known or not, falls back to the grouped view.
	pub fn from_trigger_id(id: &str) -> Self {
		id.parse().unwrap_or_else(|e: ChartError| {
			warn!("{e}, showing all tweets grouped");
			LayoutMode::Grouped
		})
	}

	pub fn targets(self, center: (f64, f64), time_scale: &TimeScale) -> LayoutTargets {
		let (cx, cy) = center;
		match self {
			LayoutMode::Grouped => LayoutTargets {
				x: PositionForce::new(AxisTarget::Fixed(cx), GROUPED_STRENGTH),
				y: PositionForce::new(AxisTarget::Fixed(cy), GROUPED_STRENGTH),
			},
			LayoutMode::SplitByDate => LayoutTargets {
				x: PositionForce::new(AxisTarget::ByDate(*time_scale), SPLIT_STRENGTH),
				y: PositionForce::new(AxisTarget::Fixed(cy), SPLIT_STRENGTH),
			},
		}
	}
}

impl FromStr for LayoutMode {
	type Err = ChartError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"all" => Ok(LayoutMode::Grouped),
			"year" => Ok(LayoutMode::SplitByDate),
			other => Err(ChartError::InvalidMode(other.into())),
		}
	}
}

impl fmt::Display for LayoutMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.trigger_id())
	}
}

/// Repulsion a bubble exerts on every other one. Mode independent.
pub fn charge(node: &BubbleNode) -> f64 {
	-(node.radius.powi(2) * CHARGE_FACTOR)
}
