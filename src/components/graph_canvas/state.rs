use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::layout::{LAYOUT_HEIGHT, LAYOUT_WIDTH, circular_layout};

pub const NODE_WIDTH: f64 = 150.0;
pub const NODE_HEIGHT: f64 = 64.0;
pub const NODE_CORNER: f64 = 10.0;
pub const HANDLE_RADIUS: f64 = 6.0;
/// Hobby drops farther than this (graph units) from every node are ignored.
pub const HOBBY_DROP_RADIUS: f64 = 100.0;

const HANDLE_HIT_RADIUS: f64 = 10.0;
// Screen pixels a press may travel and still count as a click.
const CLICK_SLOP: f64 = 4.0;
const FIT_MARGIN: f64 = 40.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub age: u32,
	pub score: f64,
	pub popular: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	pub moved: bool,
	pub drop_target: Option<DefaultNodeIdx>,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A connector being drawn out of a node's handle, in graph coordinates.
#[derive(Clone, Debug, Default)]
pub struct ConnectorState {
	pub source: Option<DefaultNodeIdx>,
	pub x: f64,
	pub y: f64,
	pub target: Option<DefaultNodeIdx>,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// What a finished pointer interaction asks the app to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
	Select(String),
	Connect { source: String, target: String },
}

pub struct CanvasState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub connector: ConnectorState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub physics: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	index: HashMap<String, DefaultNodeIdx>,
	fitted: bool,
}

fn new_graph() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 4000.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: new_graph(),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			connector: ConnectorState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			physics: false,
			flow_time: 0.0,
			edges: Vec::new(),
			index: HashMap::new(),
			fitted: false,
		}
	}

	/// Rebuilds nodes and edges from fresh data.
	///
	/// Nodes already on screen keep their position; new ones take the
	/// circular-layout slot of their list index. The first non-empty data set
	/// is fitted to the viewport.
	pub fn sync(&mut self, data: &GraphData) {
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(node.data.user_data.id.clone(), (node.data.x, node.data.y));
		});
		let selected_id = self.selected.and_then(|idx| self.node_id(idx));

		let slots = circular_layout(data.nodes.len(), LAYOUT_WIDTH, LAYOUT_HEIGHT);
		let mut graph = new_graph();
		let mut index = HashMap::new();
		for (node, (lx, ly)) in data.nodes.iter().zip(slots) {
			let (x, y) = previous
				.get(&node.id)
				.copied()
				.unwrap_or((lx as f32, ly as f32));
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: !self.physics,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					age: node.age,
					score: node.score,
					popular: node.popular(),
				},
			});
			index.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (index.get(&link.source), index.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		self.graph = graph;
		self.edges = edges;
		self.index = index;
		self.drag = DragState::default();
		self.connector = ConnectorState::default();
		self.hover = HoverState::default();
		self.selected = selected_id.and_then(|id| self.index.get(&id).copied());

		if !self.fitted && !data.nodes.is_empty() {
			self.fit_view();
			self.fitted = true;
		}
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	#[cfg(test)]
	pub fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		let idx = *self.index.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn set_selected(&mut self, id: Option<&str>) {
		self.selected = id.and_then(|id| self.index.get(id).copied());
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	#[cfg(test)]
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	fn node_hit(&self, sx: f64, sy: f64, except: Option<DefaultNodeIdx>) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if Some(node.index()) == except {
				return;
			}
			let (dx, dy) = ((node.x() as f64 - gx).abs(), (node.y() as f64 - gy).abs());
			// Last hit wins, matching draw order.
			if dx <= NODE_WIDTH / 2.0 && dy <= NODE_HEIGHT / 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		self.node_hit(sx, sy, None)
	}

	pub fn handle_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (hx, hy) = (node.x() as f64, node.y() as f64 + NODE_HEIGHT / 2.0);
			if ((hx - gx).powi(2) + (hy - gy).powi(2)).sqrt() <= HANDLE_HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Id of the node whose centre is closest to the screen point, if within
	/// `radius` graph units.
	pub fn node_near(&self, sx: f64, sy: f64, radius: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut best: Option<(f64, String)> = None;
		self.graph.visit_nodes(|node| {
			let dist = ((node.x() as f64 - gx).powi(2) + (node.y() as f64 - gy).powi(2)).sqrt();
			let closer = best.as_ref().is_none_or(|(d, _)| dist < *d);
			if dist < radius && closer {
				best = Some((dist, node.data.user_data.id.clone()));
			}
		});
		best.map(|(_, id)| id)
	}

	/// Pointer down: a handle starts a connector, a node starts a drag,
	/// anything else pans.
	pub fn press(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.handle_at_position(sx, sy) {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.connector = ConnectorState {
				source: Some(idx),
				x: gx,
				y: gy,
				target: None,
			};
		} else if let Some(idx) = self.node_at_position(sx, sy) {
			let (mut nx, mut ny) = (0.0, 0.0);
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					(nx, ny) = (node.x(), node.y());
				}
			});
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start_x: nx,
				node_start_y: ny,
				moved: false,
				drop_target: None,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(source) = self.connector.source {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.connector.x = gx;
			self.connector.y = gy;
			self.connector.target = self.node_hit(sx, sy, Some(source));
			return;
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if !self.drag.moved && (dx * dx + dy * dy).sqrt() <= CLICK_SLOP {
				return;
			}
			self.drag.moved = true;
			let (nx, ny) = (
				self.drag.node_start_x + (dx / self.transform.k) as f32,
				self.drag.node_start_y + (dy / self.transform.k) as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
			self.drag.drop_target = self.node_hit(sx, sy, Some(idx));
			return;
		}

		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			return;
		}

		let hovered = self.node_at_position(sx, sy);
		self.set_hover(hovered);
	}

	/// Pointer up. Ends whatever [`Self::press`] started and reports a click
	/// or a connection request.
	pub fn release(&mut self, sx: f64, sy: f64) -> Option<Gesture> {
		let connector = std::mem::take(&mut self.connector);
		let drag = std::mem::take(&mut self.drag);
		self.pan.active = false;

		if let Some(source) = connector.source {
			// Released over the source itself is still reported so the app
			// can refuse the self-link.
			let target = self.node_at_position(sx, sy)?;
			return Some(Gesture::Connect {
				source: self.node_id(source)?,
				target: self.node_id(target)?,
			});
		}

		let idx = drag.node_idx.filter(|_| drag.active)?;
		if !drag.moved {
			return self.node_id(idx).map(Gesture::Select);
		}
		let pinned = !self.physics;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = pinned;
			}
		});
		let target = self.node_hit(sx, sy, Some(idx))?;
		Some(Gesture::Connect {
			source: self.node_id(idx)?,
			target: self.node_id(target)?,
		})
	}

	/// Pointer left the canvas: abandon every gesture in progress.
	pub fn cancel(&mut self) {
		self.drag = DragState::default();
		self.connector = ConnectorState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	/// True while a node is dragged or a connector is drawn.
	pub fn connecting(&self) -> bool {
		self.connector.source.is_some() || (self.drag.active && self.drag.moved)
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Scales and centres the view so every card is visible.
	pub fn fit_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};

		let bw = (x1 - x0) + NODE_WIDTH + 2.0 * FIT_MARGIN;
		let bh = (y1 - y0) + NODE_HEIGHT + 2.0 * FIT_MARGIN;
		let k = (self.width / bw).min(self.height / bh).clamp(MIN_ZOOM, 1.5);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// Turns the force simulation on or off. Off pins every node where it is.
	pub fn set_physics(&mut self, on: bool) {
		self.physics = on;
		self.graph.visit_nodes_mut(|node| node.data.is_anchor = !on);
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the previous highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		if self.physics {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_canvas::types::{GraphLink, GraphNode};

	fn node(id: &str, score: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			age: 30,
			score,
		}
	}

	fn state_with(ids: &[&str], links: &[(&str, &str)]) -> CanvasState {
		let mut state = CanvasState::new(1200.0, 800.0);
		state.sync(&GraphData {
			nodes: ids.iter().map(|id| node(id, 1.0)).collect(),
			links: links
				.iter()
				.map(|(s, t)| GraphLink {
					source: s.to_string(),
					target: t.to_string(),
				})
				.collect(),
		});
		state
	}

	fn screen_of(state: &CanvasState, id: &str) -> (f64, f64) {
		let (gx, gy) = state.node_position(id).unwrap();
		state.graph_to_screen(gx, gy)
	}

	#[test]
	fn initial_positions_follow_circular_layout() {
		let state = state_with(&["a", "b", "c", "d"], &[]);
		let slots = circular_layout(4, LAYOUT_WIDTH, LAYOUT_HEIGHT);
		for (id, (x, y)) in ["a", "b", "c", "d"].iter().zip(slots) {
			let (nx, ny) = state.node_position(id).unwrap();
			assert!((nx - x).abs() < 0.01 && (ny - y).abs() < 0.01);
		}
	}

	#[test]
	fn positions_survive_resync() {
		let mut state = state_with(&["a", "b"], &[]);
		let (ax, ay) = screen_of(&state, "a");
		state.press(ax, ay);
		state.pointer_move(ax + 50.0, ay + 30.0);
		state.release(ax + 50.0, ay + 30.0);
		let moved = state.node_position("a").unwrap();

		state.sync(&GraphData {
			nodes: vec![node("a", 1.0), node("b", 1.0), node("c", 9.0)],
			links: vec![],
		});
		assert_eq!(state.node_position("a"), Some(moved));
		assert!(state.node_position("c").is_some());
	}

	#[test]
	fn click_on_node_selects_it() {
		let mut state = state_with(&["a", "b"], &[]);
		let (ax, ay) = screen_of(&state, "a");
		state.press(ax, ay);
		state.pointer_move(ax + 1.0, ay);
		assert_eq!(state.release(ax + 1.0, ay), Some(Gesture::Select("a".into())));
	}

	#[test]
	fn dropping_node_on_another_requests_link() {
		let mut state = state_with(&["a", "b"], &[]);
		let (ax, ay) = screen_of(&state, "a");
		let (bx, by) = screen_of(&state, "b");
		state.press(ax, ay);
		state.pointer_move(bx, by);
		assert!(state.connecting());
		assert_eq!(
			state.release(bx, by),
			Some(Gesture::Connect {
				source: "a".into(),
				target: "b".into()
			})
		);
		assert!(!state.connecting());
	}

	#[test]
	fn handle_connector_requests_link() {
		let mut state = state_with(&["a", "b", "c"], &[]);
		let (gx, gy) = state.node_position("a").unwrap();
		let (hx, hy) = state.graph_to_screen(gx, gy + NODE_HEIGHT / 2.0);
		let (cx, cy) = screen_of(&state, "c");

		state.press(hx, hy);
		state.pointer_move(cx, cy);
		assert!(state.connector.target.is_some());
		assert_eq!(
			state.release(cx, cy),
			Some(Gesture::Connect {
				source: "a".into(),
				target: "c".into()
			})
		);
		// The node itself did not move.
		assert_eq!(state.node_position("a"), Some((gx, gy)));
	}

	#[test]
	fn connector_released_on_empty_space_does_nothing() {
		let mut state = state_with(&["a", "b"], &[]);
		let (gx, gy) = state.node_position("a").unwrap();
		let (hx, hy) = state.graph_to_screen(gx, gy + NODE_HEIGHT / 2.0);
		let (ex, ey) = state.graph_to_screen(LAYOUT_WIDTH / 2.0, LAYOUT_HEIGHT / 2.0);
		state.press(hx, hy);
		state.pointer_move(ex, ey);
		assert_eq!(state.release(ex, ey), None);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = state_with(&["a", "b"], &[]);
		let (ex, ey) = state.graph_to_screen(LAYOUT_WIDTH / 2.0, LAYOUT_HEIGHT / 2.0);
		let before = (state.transform.x, state.transform.y);
		state.press(ex, ey);
		state.pointer_move(ex + 20.0, ey - 10.0);
		assert_eq!(state.release(ex + 20.0, ey - 10.0), None);
		assert_eq!(
			(state.transform.x, state.transform.y),
			(before.0 + 20.0, before.1 - 10.0)
		);
	}

	#[test]
	fn hobby_drop_finds_nearest_node_in_range() {
		let state = state_with(&["a", "b"], &[]);
		let (gx, gy) = state.node_position("a").unwrap();
		let (sx, sy) = state.graph_to_screen(gx + 30.0, gy);
		assert_eq!(state.node_near(sx, sy, HOBBY_DROP_RADIUS).as_deref(), Some("a"));

		let (fx, fy) = state.graph_to_screen(LAYOUT_WIDTH / 2.0, LAYOUT_HEIGHT / 2.0);
		assert_eq!(state.node_near(fx, fy, HOBBY_DROP_RADIUS), None);
	}

	#[test]
	fn hover_collects_neighbours() {
		let mut state = state_with(&["a", "b", "c"], &[("a", "b")]);
		let (ax, ay) = screen_of(&state, "a");
		state.pointer_move(ax, ay);
		let b = state.index["b"];
		let c = state.index["c"];
		assert!(state.is_highlighted(b));
		assert!(!state.is_highlighted(c));
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let mut state = state_with(&["a"], &[]);
		let before = state.screen_to_graph(300.0, 200.0);
		state.zoom_at(300.0, 200.0, 1.1);
		let after = state.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn selection_follows_id_across_resync() {
		let mut state = state_with(&["a", "b"], &[]);
		state.set_selected(Some("b"));
		state.sync(&GraphData {
			nodes: vec![node("b", 1.0)],
			links: vec![],
		});
		assert_eq!(state.selected.and_then(|i| state.node_id(i)).as_deref(), Some("b"));
	}
}
