use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::ChartConfig;
use super::error::ChartError;
use super::layout::{self, LayoutMode};
use super::nodes::{BuiltNodes, build_nodes};
use super::render::RenderSurface;
use super::scale::TimeScale;
use super::simulation::Simulation;
use super::types::{BubbleFrame, BubbleNode, RawRow};

/// Everything one chart instance owns: its bubbles, the simulation moving
/// them, the active layout and the sprites drawn for them.
pub struct BubbleChartState {
	config: ChartConfig,
	simulation: Simulation,
	time_scale: TimeScale,
	mode: LayoutMode,
	surface: RenderSurface,
	hovered: Option<String>,
}

impl BubbleChartState {
	/// Builds the bubbles and starts them settling into the grouped layout.
	/// `seed` drives initial positions and collision jitter.
	pub fn new(rows: &[RawRow], config: ChartConfig, seed: u64) -> Result<Self, ChartError> {
		let mut rng = SmallRng::seed_from_u64(seed);
		let BuiltNodes { nodes, time_scale } = build_nodes(rows, &config, &mut rng)?;
		info!("Charting {} of {} tweets", nodes.len(), rows.len());

		let mode = LayoutMode::default();
		let targets = mode.targets(config.center(), &time_scale);
		let simulation = Simulation::new(nodes, layout::charge, targets.x, targets.y, rng);

		let mut state = Self {
			config,
			simulation,
			time_scale,
			mode,
			surface: RenderSurface::default(),
			hovered: None,
		};
		state.set_mode(mode);
		Ok(state)
	}

	/// Installs the mode's target forces and reheats the simulation. Calling
	/// it with the current mode just restarts the settling.
	pub fn set_mode(&mut self, mode: LayoutMode) {
		info!("Layout mode: {mode}");
		let targets = mode.targets(self.config.center(), &self.time_scale);
		self.simulation.set_position_forces(targets.x, targets.y);
		self.simulation.restart();
		self.mode = mode;
	}

	pub fn mode(&self) -> LayoutMode {
		self.mode
	}

	/// One simulation step; `false` once the layout has come to rest.
	pub fn tick(&mut self) -> bool {
		self.simulation.tick()
	}

	pub fn nodes(&self) -> &[BubbleNode] {
		self.simulation.nodes()
	}

	/// Draw list for the current positions, largest bubble first.
	pub fn frame(&self) -> Vec<BubbleFrame<'_>> {
		self.nodes().iter().map(BubbleNode::frame).collect()
	}

	/// Binds the current bubbles to sprites, creating any that are new.
	pub fn bind_surface(&mut self, now_ms: f64) -> usize {
		let frames: Vec<BubbleFrame<'_>> = self.simulation.nodes().iter().map(BubbleNode::frame).collect();
		let created = self.surface.bind(&frames, now_ms);
		if created > 0 {
			debug!("Bound {created} new bubbles, {} on the surface", self.surface.len());
		}
		created
	}

	pub fn surface(&self) -> &RenderSurface {
		&self.surface
	}

	/// Topmost bubble under a canvas point. Later bubbles are drawn over
	/// earlier ones, so the search runs back to front.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<&BubbleNode> {
		self.nodes().iter().rev().find(|node| node.contains(x, y))
	}

	pub fn set_hover(&mut self, id: Option<&str>) {
		if self.hovered.as_deref() != id {
			self.hovered = id.map(str::to_owned);
		}
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	pub fn time_scale(&self) -> &TimeScale {
		&self.time_scale
	}

	pub fn width(&self) -> f64 {
		self.config.width
	}

	pub fn height(&self) -> f64 {
		self.config.height
	}
}
