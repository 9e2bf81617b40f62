use std::f64::consts::PI;

/// Width of the virtual canvas used for initial placement.
pub const LAYOUT_WIDTH: f64 = 1200.0;
/// Height of the virtual canvas used for initial placement.
pub const LAYOUT_HEIGHT: f64 = 800.0;

/// Places `count` points evenly on a circle centred in a `width` x `height`
/// canvas, starting at angle zero and going clockwise in screen space.
///
/// The radius is a third of the smaller canvas side.
pub fn circular_layout(count: usize, width: f64, height: f64) -> Vec<(f64, f64)> {
	let (cx, cy) = (width / 2.0, height / 2.0);
	let radius = width.min(height) / 3.0;

	(0..count)
		.map(|i| {
			let angle = (i as f64 / count as f64) * 2.0 * PI;
			(cx + radius * angle.cos(), cy + radius * angle.sin())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn empty_count_gives_no_positions() {
		assert!(circular_layout(0, 1200.0, 800.0).is_empty());
	}

	#[test]
	fn four_nodes_sit_on_the_axes() {
		let positions = circular_layout(4, 1200.0, 800.0);
		let r = 800.0 / 3.0;
		let expected = [
			(600.0 + r, 400.0),
			(600.0, 400.0 + r),
			(600.0 - r, 400.0),
			(600.0, 400.0 - r),
		];
		assert_eq!(positions.len(), 4);
		for ((x, y), (ex, ey)) in positions.iter().zip(expected) {
			assert!((x - ex).abs() < EPS, "{x} != {ex}");
			assert!((y - ey).abs() < EPS, "{y} != {ey}");
		}
	}

	#[test]
	fn every_position_is_equidistant_from_the_centre() {
		let (w, h) = (900.0, 600.0);
		for (x, y) in circular_layout(7, w, h) {
			let dist = ((x - w / 2.0).powi(2) + (y - h / 2.0).powi(2)).sqrt();
			assert!((dist - 200.0).abs() < EPS);
		}
	}

	#[test]
	fn neighbours_are_evenly_spaced() {
		let positions = circular_layout(6, 600.0, 600.0);
		let step = 2.0 * PI / 6.0;
		for (i, (x, y)) in positions.iter().enumerate() {
			let angle = (y - 300.0).atan2(x - 300.0).rem_euclid(2.0 * PI);
			assert!((angle - step * i as f64).abs() < 1e-6);
		}
	}
}
