use chrono::NaiveDateTime;
use log::debug;
use rand::Rng;

use super::config::ChartConfig;
use super::error::ChartError;
use super::scale::{RadiusScale, TimeScale};
use super::types::{BubbleNode, ColorGroup, RawRow};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const RADIUS_RANGE: (f64, f64) = (2.0, 30.0);
/// Horizontal padding kept free on both sides of the date axis.
pub const DATE_MARGIN: f64 = 200.0;

/// Nodes ready for layout, plus the date scale the split view pulls them along.
#[derive(Clone, Debug)]
pub struct BuiltNodes {
	pub nodes: Vec<BubbleNode>,
	pub time_scale: TimeScale,
}

pub fn parse_timestamp(row: &RawRow) -> Result<NaiveDateTime, ChartError> {
	NaiveDateTime::parse_from_str(row.date.trim(), DATE_FORMAT).map_err(|e| {
		ChartError::data_load(
			format!("tweet {}", row.tweet_id),
			format!("bad date `{}`: {e}", row.date),
		)
	})
}

/// Turns raw rows into bubbles.
///
/// Only rows with strictly more retweets than the configured threshold are
/// kept. The result is sorted by retweets, largest first, so that smaller
/// bubbles are drawn last and stay visible on top of the big ones.
pub fn build_nodes<R: Rng>(
	rows: &[RawRow],
	config: &ChartConfig,
	rng: &mut R,
) -> Result<BuiltNodes, ChartError> {
	config.validate()?;
	let threshold = config.retweet_threshold;

	let kept = rows
		.iter()
		.filter(|row| row.retweets > threshold)
		.map(|row| Ok((row, parse_timestamp(row)?)))
		.collect::<Result<Vec<_>, ChartError>>()?;
	debug!("{} of {} rows above {threshold} retweets", kept.len(), rows.len());

	let (Some(max_retweets), Some(first), Some(last)) = (
		kept.iter().map(|(row, _)| row.retweets).max(),
		kept.iter().map(|&(_, ts)| ts).min(),
		kept.iter().map(|&(_, ts)| ts).max(),
	) else {
		return Err(ChartError::EmptyDataset { threshold });
	};

	let radius_scale = RadiusScale::sqrt((threshold as f64, max_retweets as f64), RADIUS_RANGE);
	let time_scale =
		TimeScale::new((first, last), (DATE_MARGIN, config.width - DATE_MARGIN)).nice();
	debug!("date domain {:?} niced from {:?}", time_scale.domain(), time_scale.extent());

	let mut nodes: Vec<BubbleNode> = kept
		.into_iter()
		.map(|(row, timestamp)| BubbleNode {
			id: row.tweet_id.clone(),
			radius: radius_scale.apply(row.retweets as f64),
			retweets: row.retweets,
			likes: row.likes,
			followers: row.followers,
			user_name: row.user_name.clone(),
			timestamp,
			text: row.text.clone(),
			is_retweet: row
				.retweet_from_username
				.clone()
				.filter(|name| !name.trim().is_empty()),
			group: ColorGroup::default(),
			x: rng.random_range(0.0..config.width),
			y: rng.random_range(0.0..config.height),
			vx: 0.0,
			vy: 0.0,
		})
		.collect();

	nodes.sort_by(|a, b| b.retweets.cmp(&a.retweets));
	assign_groups(&mut nodes);

	Ok(BuiltNodes { nodes, time_scale })
}

/// Splits nodes already sorted by retweets into thirds: high, medium, low.
fn assign_groups(nodes: &mut [BubbleNode]) {
	let n = nodes.len();
	for (rank, node) in nodes.iter_mut().enumerate() {
		node.group = match rank * 3 / n {
			0 => ColorGroup::High,
			1 => ColorGroup::Medium,
			_ => ColorGroup::Low,
		};
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn row(id: &str, retweets: u64, date: &str) -> RawRow {
		RawRow {
			tweet_id: id.into(),
			retweets,
			likes: retweets * 2,
			followers: 10_000,
			user_name: format!("user_{id}"),
			date: date.into(),
			text: format!("tweet {id}"),
			retweet_from_username: None,
		}
	}

	fn build(rows: &[RawRow]) -> Result<BuiltNodes, ChartError> {
		build_nodes(rows, &ChartConfig::default(), &mut SmallRng::seed_from_u64(7))
	}

	#[test]
	fn keeps_strictly_above_threshold_sorted_descending() {
		let rows = [
			row("a", 1500, "2017-03-01 10:00:00"),
			row("b", 1200, "2017-03-02 10:00:00"),
			row("c", 5000, "2017-03-03 10:00:00"),
		];
		let built = build(&rows).unwrap();
		let kept: Vec<_> = built.nodes.iter().map(|n| (n.id.as_str(), n.retweets)).collect();
		assert_eq!(kept, vec![("c", 5000), ("a", 1500)]);
	}

	#[test]
	fn every_surviving_row_appears_exactly_once() {
		let counts = [0, 1199, 1200, 1201, 4000, 4000, 25_000, 800, 1_000_000, 1300];
		let rows: Vec<_> = counts
			.iter()
			.enumerate()
			.map(|(i, &c)| row(&i.to_string(), c, "2017-03-01 10:00:00"))
			.collect();
		let built = build(&rows).unwrap();

		let mut ids: Vec<_> = built.nodes.iter().map(|n| n.id.clone()).collect();
		ids.sort();
		let mut expected: Vec<_> = rows
			.iter()
			.filter(|r| r.retweets > 1200)
			.map(|r| r.tweet_id.clone())
			.collect();
		expected.sort();
		assert_eq!(ids, expected);

		for pair in built.nodes.windows(2) {
			assert!(pair[0].retweets >= pair[1].retweets);
			assert!(pair[0].radius >= pair[1].radius);
		}
		for node in &built.nodes {
			assert!((2.0..=30.0).contains(&node.radius));
		}
		assert_eq!(built.nodes[0].radius, 30.0);
	}

	#[test]
	fn empty_after_filtering_is_an_error() {
		let rows = [row("a", 12, "2017-03-01 10:00:00"), row("b", 1200, "2017-03-01 10:00:00")];
		assert_eq!(build(&rows).unwrap_err(), ChartError::EmptyDataset { threshold: 1200 });
		assert_eq!(build(&[]).unwrap_err(), ChartError::EmptyDataset { threshold: 1200 });
	}

	#[test]
	fn date_extent_spans_only_surviving_rows() {
		let rows = [
			row("old", 10, "2016-01-01 00:00:00"),
			row("a", 2000, "2017-03-04 09:30:00"),
			row("b", 3000, "2017-03-01 10:17:00"),
			row("c", 1300, "2017-03-20 08:00:00"),
		];
		let built = build(&rows).unwrap();
		let ts = |s: &str| NaiveDateTime::parse_from_str(s, DATE_FORMAT).unwrap();
		let scale = built.time_scale;
		assert_eq!(scale.extent(), (ts("2017-03-01 10:17:00"), ts("2017-03-20 08:00:00")));
		let (d0, d1) = scale.domain();
		assert!(d0 <= scale.extent().0 && d1 >= scale.extent().1);
		assert_eq!(scale.range(), (200.0, 740.0));
	}

	#[test]
	fn malformed_date_on_a_kept_row_is_a_load_error() {
		let rows = [row("a", 2000, "03/01/2017")];
		assert!(matches!(build(&rows), Err(ChartError::DataLoad { .. })));
		// filtered rows are never parsed
		let rows = [row("a", 2000, "2017-03-01 10:00:00"), row("b", 10, "garbage")];
		assert!(build(&rows).is_ok());
	}

	#[test]
	fn initial_positions_fall_inside_the_canvas() {
		let rows: Vec<_> = (0..50)
			.map(|i| row(&i.to_string(), 1201 + i * 37, "2017-03-01 10:00:00"))
			.collect();
		for node in build(&rows).unwrap().nodes {
			assert!((0.0..940.0).contains(&node.x));
			assert!((0.0..600.0).contains(&node.y));
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn groups_follow_retweet_tertiles() {
		let rows: Vec<_> = (0..6)
			.map(|i| row(&i.to_string(), 2000 + i * 100, "2017-03-01 10:00:00"))
			.collect();
		let groups: Vec<_> = build(&rows).unwrap().nodes.iter().map(|n| n.group).collect();
		use ColorGroup::*;
		assert_eq!(groups, vec![High, High, Medium, Medium, Low, Low]);
	}

	#[test]
	fn blank_retweet_source_is_not_a_retweet() {
		let mut original = row("a", 2000, "2017-03-01 10:00:00");
		original.retweet_from_username = Some(" ".into());
		let mut shared = row("b", 3000, "2017-03-01 10:00:00");
		shared.retweet_from_username = Some("police".into());
		let nodes = build(&[original, shared]).unwrap().nodes;
		assert_eq!(nodes[0].is_retweet.as_deref(), Some("police"));
		assert_eq!(nodes[1].is_retweet, None);
	}
}
