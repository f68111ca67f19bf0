//! Semi-implicit Euler force simulation with alpha cooling.
//!
//! Every tick cools `alpha` toward zero, applies the positional x and y forces
//! and the many-body repulsion to node velocities, then moves each node by its
//! decayed velocity. Once `alpha` drops below [`ALPHA_MIN`] the layout is
//! considered settled and ticks become no-ops until [`Simulation::restart`].

use rand::Rng;
use rand::rngs::SmallRng;

use super::scale::TimeScale;
use super::types::BubbleNode;

pub const ALPHA_MIN: f64 = 0.001;
/// Fraction of velocity lost per tick.
pub const VELOCITY_DECAY: f64 = 0.2;
/// Ticks from a restart until alpha reaches [`ALPHA_MIN`].
const COOLING_TICKS: f64 = 300.0;
/// Squared distance below which repulsion stops growing.
const DISTANCE_MIN_SQ: f64 = 1.0;

/// Where a positional force pulls a node along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisTarget {
	Fixed(f64),
	/// The node's timestamp projected through the date scale.
	ByDate(TimeScale),
}

impl AxisTarget {
	pub fn resolve(&self, node: &BubbleNode) -> f64 {
		match self {
			AxisTarget::Fixed(v) => *v,
			AxisTarget::ByDate(scale) => scale.apply(node.timestamp),
		}
	}
}

/// Spring-like pull toward a per-node target on one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionForce {
	pub target: AxisTarget,
	pub strength: f64,
}

impl PositionForce {
	pub fn new(target: AxisTarget, strength: f64) -> Self {
		Self { target, strength }
	}
}

pub struct Simulation {
	nodes: Vec<BubbleNode>,
	charges: Vec<f64>,
	force_x: PositionForce,
	force_y: PositionForce,
	alpha: f64,
	alpha_decay: f64,
	velocity_keep: f64,
	rng: SmallRng,
}

impl Simulation {
	/// `charge` is evaluated once per node; negative values repel.
	pub fn new<F>(
		nodes: Vec<BubbleNode>,
		charge: F,
		force_x: PositionForce,
		force_y: PositionForce,
		rng: SmallRng,
	) -> Self
	where
		F: Fn(&BubbleNode) -> f64,
	{
		let charges = nodes.iter().map(charge).collect();
		Self {
			nodes,
			charges,
			force_x,
			force_y,
			alpha: 1.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / COOLING_TICKS),
			velocity_keep: 1.0 - VELOCITY_DECAY,
			rng,
		}
	}

	pub fn nodes(&self) -> &[BubbleNode] {
		&self.nodes
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < ALPHA_MIN
	}

	/// Replaces both positional forces. Takes effect on the next tick.
	pub fn set_position_forces(&mut self, force_x: PositionForce, force_y: PositionForce) {
		self.force_x = force_x;
		self.force_y = force_y;
	}

	/// Reheats the simulation so the layout visibly re-settles.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
	}

	/// Advances one step. Returns `false` once the layout has settled.
	pub fn tick(&mut self) -> bool {
		if self.is_settled() {
			return false;
		}
		self.alpha += (0.0 - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;

		let (fx, fy) = (self.force_x, self.force_y);
		for node in &mut self.nodes {
			node.vx += (fx.target.resolve(node) - node.x) * fx.strength * alpha;
		}
		for node in &mut self.nodes {
			node.vy += (fy.target.resolve(node) - node.y) * fy.strength * alpha;
		}
		self.apply_charge(alpha);

		let keep = self.velocity_keep;
		for node in &mut self.nodes {
			node.vx *= keep;
			node.x += node.vx;
			node.vy *= keep;
			node.y += node.vy;
		}
		!self.is_settled()
	}

	fn apply_charge(&mut self, alpha: f64) {
		let positions: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();
		for (i, node) in self.nodes.iter_mut().enumerate() {
			let (xi, yi) = positions[i];
			for (j, &(xj, yj)) in positions.iter().enumerate() {
				if i == j {
					continue;
				}
				let (mut dx, mut dy) = (xj - xi, yj - yi);
				if dx == 0.0 {
					dx = jiggle(&mut self.rng);
				}
				if dy == 0.0 {
					dy = jiggle(&mut self.rng);
				}
				let mut l = dx * dx + dy * dy;
				if l < DISTANCE_MIN_SQ {
					l = (DISTANCE_MIN_SQ * l).sqrt();
				}
				let w = self.charges[j] * alpha / l;
				node.vx += dx * w;
				node.vy += dy * w;
			}
		}
	}
}

/// Tiny random offset separating exactly coincident nodes.
fn jiggle(rng: &mut SmallRng) -> f64 {
	(rng.random::<f64>() - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDateTime;
	use rand::SeedableRng;

	use super::*;
	use crate::components::bubble_chart::types::ColorGroup;

	fn node(id: &str, x: f64, y: f64, radius: f64, date: &str) -> BubbleNode {
		BubbleNode {
			id: id.into(),
			radius,
			retweets: 2000,
			likes: 0,
			followers: 0,
			user_name: String::new(),
			timestamp: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
			text: String::new(),
			is_retweet: None,
			group: ColorGroup::Low,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	fn fixed(v: f64, strength: f64) -> PositionForce {
		PositionForce::new(AxisTarget::Fixed(v), strength)
	}

	fn settle(sim: &mut Simulation) -> usize {
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 1000, "simulation never cooled down");
		}
		ticks + 1
	}

	#[test]
	fn cools_down_in_about_three_hundred_ticks() {
		let nodes = vec![node("a", 0.0, 0.0, 5.0, "2017-03-01 00:00:00")];
		let mut sim = Simulation::new(
			nodes,
			|_| 0.0,
			fixed(470.0, 0.03),
			fixed(300.0, 0.03),
			SmallRng::seed_from_u64(1),
		);
		let ticks = settle(&mut sim);
		assert!((295..=305).contains(&ticks), "settled after {ticks} ticks");
		assert!(sim.is_settled());
		assert!(!sim.tick());

		let settled = (sim.nodes()[0].x, sim.nodes()[0].y);
		assert!((settled.0 - 470.0).abs() < 2.0 && (settled.1 - 300.0).abs() < 2.0);
	}

	#[test]
	fn restart_reheats_a_settled_simulation() {
		let nodes = vec![node("a", 100.0, 100.0, 5.0, "2017-03-01 00:00:00")];
		let mut sim = Simulation::new(
			nodes,
			|_| 0.0,
			fixed(470.0, 0.03),
			fixed(300.0, 0.03),
			SmallRng::seed_from_u64(1),
		);
		settle(&mut sim);
		sim.set_position_forces(fixed(100.0, 0.08), fixed(100.0, 0.08));
		assert!(!sim.tick());
		assert!((sim.nodes()[0].x - 470.0).abs() < 2.0);

		sim.restart();
		assert_eq!(sim.alpha(), 1.0);
		settle(&mut sim);
		assert!((sim.nodes()[0].x - 100.0).abs() < 0.5);
		assert!((sim.nodes()[0].y - 100.0).abs() < 0.5);
	}

	#[test]
	fn repulsion_balances_the_centering_pull() {
		let nodes = vec![
			node("a", 460.0, 300.0, 30.0, "2017-03-01 00:00:00"),
			node("b", 480.0, 300.0, 30.0, "2017-03-01 00:00:00"),
		];
		let mut sim = Simulation::new(
			nodes,
			|n| -(n.radius * n.radius * 0.03),
			fixed(470.0, 0.03),
			fixed(300.0, 0.03),
			SmallRng::seed_from_u64(3),
		);
		settle(&mut sim);
		let (a, b) = (&sim.nodes()[0], &sim.nodes()[1]);
		// 27 / d == 0.03 * d / 2 at rest
		let gap = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
		assert!((gap - 1800f64.sqrt()).abs() < 0.5, "gap {gap}");
		assert!(a.x < 470.0 && b.x > 470.0);
	}

	#[test]
	fn coincident_nodes_are_pushed_apart() {
		let nodes = vec![
			node("a", 470.0, 300.0, 10.0, "2017-03-01 00:00:00"),
			node("b", 470.0, 300.0, 10.0, "2017-03-01 00:00:00"),
		];
		let mut sim = Simulation::new(
			nodes,
			|n| -(n.radius * n.radius * 0.03),
			fixed(470.0, 0.03),
			fixed(300.0, 0.03),
			SmallRng::seed_from_u64(9),
		);
		settle(&mut sim);
		let (a, b) = (&sim.nodes()[0], &sim.nodes()[1]);
		assert!(a.x.is_finite() && b.y.is_finite());
		assert!(((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt() > 5.0);
	}

	#[test]
	fn date_targets_spread_nodes_along_x() {
		let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
		let scale =
			TimeScale::new((at("2017-03-01 00:00:00"), at("2017-03-03 00:00:00")), (200.0, 740.0));
		let nodes = vec![
			node("early", 470.0, 300.0, 2.0, "2017-03-01 00:00:00"),
			node("late", 470.0, 310.0, 2.0, "2017-03-03 00:00:00"),
		];
		let mut sim = Simulation::new(
			nodes,
			|n| -(n.radius * n.radius * 0.03),
			PositionForce::new(AxisTarget::ByDate(scale), 0.08),
			fixed(300.0, 0.08),
			SmallRng::seed_from_u64(5),
		);
		settle(&mut sim);
		assert!((sim.nodes()[0].x - 200.0).abs() < 0.5);
		assert!((sim.nodes()[1].x - 740.0).abs() < 0.5);
	}
}
