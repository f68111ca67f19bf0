use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::detail::TweetDetail;
use super::layout::LayoutMode;
use super::render;
use super::state::BubbleChartState;

fn request_frame(cb: &Closure<dyn FnMut(f64)>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas bubble chart driven by its own animation loop.
///
/// Every change of `mode`, including a repeat of the current one, reheats the
/// layout.
#[component]
pub fn BubbleChart(
	state: BubbleChartState,
	#[prop(into)] mode: Signal<LayoutMode>,
) -> impl IntoView {
	let (width, height) = (state.width(), state.height());
	let state = Rc::new(RefCell::new(state));
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let detail = RwSignal::new(None::<TweetDetail>);
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let Some(ctx) = context_2d(&canvas) else {
			error!("Canvas has no 2d context, nothing will be drawn");
			return;
		};

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			{
				let mut s = state_anim.borrow_mut();
				s.tick();
				s.bind_surface(now);
				render::render(&s, &ctx, now);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				request_frame(cb);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			request_frame(cb);
		}
	});

	let state_mode = state.clone();
	Effect::new(move |_| {
		let mode = mode.get();
		state_mode.borrow_mut().set_mode(mode);
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut s = state_mm.borrow_mut();
		let hit = s
			.node_at_position(x, y)
			.map(|node| (node.id.clone(), TweetDetail::from_node(node)));
		match hit {
			Some((id, d)) if s.hovered() != Some(id.as_str()) => {
				s.set_hover(Some(&id));
				detail.set(Some(d));
			}
			Some(_) => {}
			None if s.hovered().is_some() => {
				s.set_hover(None);
				detail.set(None);
			}
			None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().set_hover(None);
		detail.set(None);
	};

	view! {
		<div
			class="bubble-chart"
			style=format!("position: relative; width: {width}px; height: {height}px;")
		>
			<canvas
				node_ref=canvas_ref
				class="bubble-chart-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				style="display: block;"
			/>
			{move || detail.get().map(|d| view! { <Tooltip detail=d /> })}
		</div>
	}
}

#[component]
fn Tooltip(detail: TweetDetail) -> impl IntoView {
	let TweetDetail {
		user_name,
		text,
		retweets,
		likes,
		date,
		retweeted_from,
		x,
		y,
	} = detail;

	view! {
		<div class="tooltip" style=format!("position: absolute; left: {}px; top: {}px;", x + 8.0, y)>
			<span class="name">"@" {user_name}</span>
			<br />
			<span class="value">{text}</span>
			<br />
			<span class="name">"Retweets: "</span>
			<span class="value">{retweets}</span>
			<br />
			<span class="name">"Likes: "</span>
			<span class="value">{likes}</span>
			<br />
			<span class="name">"Date: "</span>
			<span class="value">{date}</span>
			{retweeted_from
				.map(|from| {
					view! {
						<br />
						<span class="name">"Retweeted from @"</span>
						<span class="value">{from}</span>
					}
				})}
		</div>
	}
}
