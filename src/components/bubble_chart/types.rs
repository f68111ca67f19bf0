use chrono::NaiveDateTime;
use serde::Deserialize;

/// One record of the tweets CSV, as read from disk.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawRow {
	pub tweet_id: String,
	pub retweets: u64,
	pub likes: u64,
	pub followers: u64,
	pub user_name: String,
	pub date: String,
	pub text: String,
	#[serde(default)]
	pub retweet_from_username: Option<String>,
}

/// Retweet tier used to pick a bubble's color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorGroup {
	#[default]
	Low,
	Medium,
	High,
}

/// A tweet that survived the retweet filter, with its layout state.
#[derive(Clone, Debug)]
pub struct BubbleNode {
	pub id: String,
	pub radius: f64,
	pub retweets: u64,
	pub likes: u64,
	pub followers: u64,
	pub user_name: String,
	pub timestamp: NaiveDateTime,
	pub text: String,
	pub is_retweet: Option<String>,
	pub group: ColorGroup,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

/// What the render surface needs to draw one bubble for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleFrame<'a> {
	pub id: &'a str,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub group: ColorGroup,
}

impl BubbleNode {
	pub fn frame(&self) -> BubbleFrame<'_> {
		BubbleFrame {
			id: &self.id,
			x: self.x,
			y: self.y,
			radius: self.radius,
			group: self.group,
		}
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		let (dx, dy) = (self.x - x, self.y - y);
		dx * dx + dy * dy <= self.radius * self.radius
	}
}
