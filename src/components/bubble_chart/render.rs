use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::layout::LayoutMode;
use super::state::BubbleChartState;
use super::types::{BubbleFrame, ColorGroup};

/// How long a new bubble takes to grow from nothing to its full radius.
pub const APPEAR_MS: f64 = 2000.0;
const STROKE_WIDTH: f64 = 2.0;
const DARKEN: f64 = 0.7;
const AXIS_FONT: &str = "12px sans-serif";

impl ColorGroup {
	pub const ALL: [ColorGroup; 3] = [ColorGroup::Low, ColorGroup::Medium, ColorGroup::High];

	pub fn fill(self) -> &'static str {
		match self {
			ColorGroup::Low => "#d84b2a",
			ColorGroup::Medium => "#beccae",
			ColorGroup::High => "#7aa25c",
		}
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0) * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// `#rrggbb` darkened by a constant factor, as an `rgb()` color.
pub fn darker(hex: &str) -> Option<String> {
	let hex = hex.strip_prefix('#')?;
	if hex.len() != 6 {
		return None;
	}
	let channel = |i: usize| {
		u8::from_str_radix(hex.get(i..i + 2)?, 16)
			.ok()
			.map(|c| (f64::from(c) * DARKEN).round() as u8)
	};
	Some(format!("rgb({}, {}, {})", channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Clone, Copy, Debug)]
struct Sprite {
	born_ms: f64,
}

/// Visual elements bound to bubbles by id.
///
/// A sprite is created the first time an id is bound and then reused, so the
/// grow-in transition plays once per bubble no matter how often the layout
/// changes.
#[derive(Debug, Default)]
pub struct RenderSurface {
	sprites: HashMap<String, Sprite>,
}

impl RenderSurface {
	/// Binds this tick's frames, returning how many sprites were created.
	pub fn bind(&mut self, frames: &[BubbleFrame<'_>], now_ms: f64) -> usize {
		let mut created = 0;
		for frame in frames {
			if !self.sprites.contains_key(frame.id) {
				self.sprites.insert(frame.id.to_owned(), Sprite { born_ms: now_ms });
				created += 1;
			}
		}
		created
	}

	pub fn len(&self) -> usize {
		self.sprites.len()
	}

	/// Radius to draw right now; unbound ids are not drawn at all.
	pub fn drawn_radius(&self, frame: &BubbleFrame<'_>, now_ms: f64) -> f64 {
		match self.sprites.get(frame.id) {
			Some(sprite) => frame.radius * ease_cubic_in_out((now_ms - sprite.born_ms) / APPEAR_MS),
			None => 0.0,
		}
	}
}

pub fn render(state: &BubbleChartState, ctx: &CanvasRenderingContext2d, now_ms: f64) {
	ctx.clear_rect(0.0, 0.0, state.width(), state.height());
	if state.mode() == LayoutMode::SplitByDate {
		draw_date_axis(state, ctx);
	}
	draw_bubbles(state, ctx, now_ms);
}

fn draw_bubbles(state: &BubbleChartState, ctx: &CanvasRenderingContext2d, now_ms: f64) {
	let strokes = ColorGroup::ALL.map(|g| darker(g.fill()).unwrap_or_else(|| g.fill().into()));
	let hovered = state.hovered();
	ctx.set_line_width(STROKE_WIDTH);

	// largest first, so small bubbles end up on top
	for frame in state.frame() {
		let radius = state.surface().drawn_radius(&frame, now_ms);
		if radius <= 0.0 {
			continue;
		}
		let stroke = &strokes[frame.group as usize];

		ctx.begin_path();
		let _ = ctx.arc(frame.x, frame.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(frame.group.fill());
		ctx.fill();
		ctx.set_stroke_style_str(stroke);
		ctx.stroke();

		if hovered == Some(frame.id) {
			ctx.begin_path();
			let _ = ctx.arc(frame.x, frame.y, radius + STROKE_WIDTH, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("#222");
			ctx.stroke();
		}
	}
}

/// Labels both ends of the date scale above the split layout.
fn draw_date_axis(state: &BubbleChartState, ctx: &CanvasRenderingContext2d) {
	let scale = state.time_scale();
	let (start, end) = scale.domain();
	let (x0, x1) = scale.range();

	ctx.set_fill_style_str("#555");
	ctx.set_font(AXIS_FONT);
	ctx.set_text_align("center");
	for (x, at) in [(x0, start), (x1, end)] {
		let _ = ctx.fill_text(&at.format("%b %-d, %Y").to_string(), x, 40.0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame(id: &str, radius: f64) -> BubbleFrame<'_> {
		BubbleFrame {
			id,
			x: 0.0,
			y: 0.0,
			radius,
			group: ColorGroup::Low,
		}
	}

	#[test]
	fn darker_scales_each_channel() {
		assert_eq!(darker("#d84b2a").as_deref(), Some("rgb(151, 53, 29)"));
		assert_eq!(darker("#7aa25c").as_deref(), Some("rgb(85, 113, 64)"));
		assert_eq!(darker("#ffffff").as_deref(), Some("rgb(179, 179, 179)"));
		assert_eq!(darker("d84b2a"), None);
		assert_eq!(darker("#fff"), None);
		assert_eq!(darker("#zzzzzz"), None);
	}

	#[test]
	fn easing_starts_at_zero_and_ends_at_one() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(0.5), 0.5);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
		assert_eq!(ease_cubic_in_out(3.0), 1.0);
		assert!(ease_cubic_in_out(0.25) < 0.25);
		assert!(ease_cubic_in_out(0.75) > 0.75);
	}

	#[test]
	fn bubbles_grow_in_once_per_id() {
		let mut surface = RenderSurface::default();
		assert_eq!(surface.bind(&[frame("a", 10.0), frame("b", 20.0)], 0.0), 2);
		assert_eq!(surface.drawn_radius(&frame("a", 10.0), 0.0), 0.0);
		assert_eq!(surface.drawn_radius(&frame("b", 20.0), APPEAR_MS / 2.0), 10.0);

		// rebinding after a layout change keeps the existing sprites
		assert_eq!(surface.bind(&[frame("b", 20.0), frame("a", 10.0)], 1500.0), 0);
		assert_eq!(surface.len(), 2);
		assert_eq!(surface.drawn_radius(&frame("a", 10.0), APPEAR_MS), 10.0);

		assert_eq!(surface.bind(&[frame("c", 5.0)], 3000.0), 1);
		assert_eq!(surface.drawn_radius(&frame("c", 5.0), 3000.0), 0.0);
		assert_eq!(surface.drawn_radius(&frame("unbound", 5.0), 9000.0), 0.0);
	}
}
