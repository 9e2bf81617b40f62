use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, HANDLE_RADIUS, NODE_CORNER, NODE_HEIGHT, NODE_WIDTH, NodeInfo};

const BACKGROUND: &str = "#eef2ff";
const GRID: &str = "rgba(148, 163, 184, 0.35)";
const GRID_GAP: f64 = 16.0;
const LABEL_CHARS: usize = 18;

struct Palette {
	fill: &'static str,
	border: &'static str,
	text: &'static str,
	bar: &'static str,
}

const POPULAR: Palette = Palette {
	fill: "#f0fdf4",
	border: "#4ade80",
	text: "#14532d",
	bar: "#10b981",
};

const REGULAR: Palette = Palette {
	fill: "#f8fafc",
	border: "#94a3b8",
	text: "#1e293b",
	bar: "#6366f1",
};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_connector(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_grid(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let gap = GRID_GAP * state.transform.k;
	if gap < 6.0 {
		return;
	}
	let (ox, oy) = (
		state.transform.x.rem_euclid(gap),
		state.transform.y.rem_euclid(gap),
	);
	ctx.set_fill_style_str(GRID);
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += gap;
		}
		x += gap;
	}
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap) = (2.0 / k, 8.0 / k, 4.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let is_highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());

		// t=0: every edge at 0.6, t=1: highlighted edges 0.95, the rest 0.15
		let (alpha, width) = if is_highlighted {
			(0.6 + 0.35 * t, line_width * (1.0 + 0.4 * t))
		} else {
			(0.6 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(99, 102, 241, {})", alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_connector(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let Some(source) = state.connector.source else {
		return;
	};
	let (tx, ty) = (state.connector.x, state.connector.y);

	let mut start = None;
	let mut snap = None;
	state.graph.visit_nodes(|node| {
		if node.index() == source {
			start = Some((node.x() as f64, node.y() as f64 + NODE_HEIGHT / 2.0));
		}
		if Some(node.index()) == state.connector.target {
			snap = Some((node.x() as f64, node.y() as f64 - NODE_HEIGHT / 2.0));
		}
	});
	let Some((sx, sy)) = start else {
		return;
	};
	let (ex, ey) = snap.unwrap_or((tx, ty));

	ctx.set_stroke_style_str("rgba(59, 130, 246, 0.7)");
	ctx.set_line_width(2.0 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(5.0 / k),
		&JsValue::from_f64(5.0 / k),
	));
	ctx.begin_path();
	ctx.move_to(sx, sy);
	ctx.line_to(ex, ey);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn truncate(label: &str) -> String {
	if label.chars().count() <= LABEL_CHARS {
		return label.to_string();
	}
	let mut out: String = label.chars().take(LABEL_CHARS - 1).collect();
	out.push('\u{2026}');
	out
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let dimmed = has_highlight && !state.is_highlighted(idx);
		let alpha = if dimmed { 1.0 - 0.6 * t } else { 1.0 };

		let border = if state.drag.node_idx == Some(idx) && state.drag.moved {
			"#3b82f6"
		} else if state.drag.drop_target == Some(idx) || state.connector.target == Some(idx) {
			"#a855f7"
		} else if state.selected == Some(idx) {
			"#eab308"
		} else if info.popular {
			POPULAR.border
		} else {
			REGULAR.border
		};
		let emphasis = state.is_hovered(idx) || state.drag.drop_target == Some(idx);

		ctx.set_global_alpha(alpha);
		draw_card(ctx, info, x, y, border, emphasis, state.transform.k);
		ctx.set_global_alpha(1.0);
	});
}

fn draw_card(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	cx: f64,
	cy: f64,
	border: &str,
	emphasis: bool,
	k: f64,
) {
	let palette = if info.popular { &POPULAR } else { &REGULAR };
	let (x, y) = (cx - NODE_WIDTH / 2.0, cy - NODE_HEIGHT / 2.0);

	if info.popular || emphasis {
		// Glow scales with popularity, capped at a score of 10
		let strength = (info.score / 10.0).clamp(0.0, 1.0);
		ctx.set_shadow_color(&format!("rgba(34, 197, 94, {})", 0.3 + 0.5 * strength));
		ctx.set_shadow_blur(if emphasis { 18.0 } else { 4.0 + 10.0 * strength });
	}
	rounded_rect(ctx, x, y, NODE_WIDTH, NODE_HEIGHT, NODE_CORNER);
	ctx.set_fill_style_str(palette.fill);
	ctx.fill();
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_color("transparent");

	ctx.set_stroke_style_str(border);
	ctx.set_line_width(if emphasis { 3.0 } else { 2.0 });
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_fill_style_str(palette.text);
	ctx.set_font(&format!("bold {}px sans-serif", 13.0_f64.max(9.0 / k)));
	let _ = ctx.fill_text(&truncate(&info.label), cx, y + 18.0);

	ctx.set_fill_style_str("#475569");
	ctx.set_font("11px sans-serif");
	let _ = ctx.fill_text(
		&format!("Age: {}   Score: {:.1}", info.age, info.score),
		cx,
		y + 34.0,
	);

	let (bar_x, bar_y, bar_w) = (x + 12.0, y + 42.0, NODE_WIDTH - 24.0);
	ctx.set_fill_style_str("#cbd5e1");
	rounded_rect(ctx, bar_x, bar_y, bar_w, 5.0, 2.5);
	ctx.fill();
	let filled = bar_w * (info.score / 10.0).clamp(0.0, 1.0);
	if filled > 5.0 {
		ctx.set_fill_style_str(palette.bar);
		rounded_rect(ctx, bar_x, bar_y, filled, 5.0, 2.5);
		ctx.fill();
	}

	if info.popular {
		ctx.set_text_align("right");
		ctx.set_fill_style_str("#15803d");
		ctx.set_font("bold 12px sans-serif");
		let _ = ctx.fill_text("\u{2605}", x + NODE_WIDTH - 8.0, y + 15.0);
	}

	ctx.begin_path();
	let _ = ctx.arc(cx, cy + NODE_HEIGHT / 2.0, HANDLE_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("#ffffff");
	ctx.fill();
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(1.5);
	ctx.stroke();
}
