use super::types::BubbleNode;

/// Text shown in the tooltip of a hovered bubble.
#[derive(Clone, Debug, PartialEq)]
pub struct TweetDetail {
	pub user_name: String,
	pub text: String,
	pub retweets: String,
	pub likes: String,
	pub date: String,
	pub retweeted_from: Option<String>,
	/// Canvas coordinates to anchor the tooltip at.
	pub x: f64,
	pub y: f64,
}

impl TweetDetail {
	pub fn from_node(node: &BubbleNode) -> Self {
		Self {
			user_name: node.user_name.clone(),
			text: node.text.clone(),
			retweets: format_count(node.retweets),
			likes: format_count(node.likes),
			date: node.timestamp.format("%b %-d, %Y %H:%M").to_string(),
			retweeted_from: node.is_retweet.clone(),
			x: node.x + node.radius,
			y: node.y - node.radius,
		}
	}
}

/// Formats a count with comma thousands separators: `1234567` -> `1,234,567`.
pub fn format_count(n: u64) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(ch);
	}
	out
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDateTime;

	use super::*;
	use crate::components::bubble_chart::types::ColorGroup;

	#[test]
	fn counts_get_thousands_separators() {
		assert_eq!(format_count(0), "0");
		assert_eq!(format_count(999), "999");
		assert_eq!(format_count(1000), "1,000");
		assert_eq!(format_count(25_300), "25,300");
		assert_eq!(format_count(1_234_567), "1,234,567");
	}

	#[test]
	fn detail_is_anchored_at_the_bubble_edge() {
		let node = BubbleNode {
			id: "42".into(),
			radius: 10.0,
			retweets: 12_500,
			likes: 30_001,
			followers: 5,
			user_name: "police".into(),
			timestamp: NaiveDateTime::parse_from_str("2017-03-05 14:07:00", "%Y-%m-%d %H:%M:%S")
				.unwrap(),
			text: "hello".into(),
			is_retweet: Some("policier".into()),
			group: ColorGroup::High,
			x: 100.0,
			y: 50.0,
			vx: 0.0,
			vy: 0.0,
		};
		let detail = TweetDetail::from_node(&node);
		assert_eq!(detail.retweets, "12,500");
		assert_eq!(detail.likes, "30,001");
		assert_eq!(detail.date, "Mar 5, 2017 14:07");
		assert_eq!(detail.retweeted_from.as_deref(), Some("policier"));
		assert_eq!((detail.x, detail.y), (110.0, 40.0));
	}
}
