//! Uniform grid over base positions for minimum-spacing checks.
//!
//! Cells are at least `gap` wide, so any base closer than `gap` to a query
//! point lies in the query cell or one of its eight neighbours.

/// Occupancy index of particle base positions.
#[derive(Clone, Debug)]
pub struct SpacingGrid {
	gap: f64,
	cell: f64,
	cols: usize,
	rows: usize,
	cells: Vec<Vec<(f64, f64)>>,
	len: usize,
}

impl SpacingGrid {
	pub fn new(gap: f64, width: u32, height: u32) -> Self {
		let cell = gap.max(1.0);
		let cols = ((width as f64 / cell).ceil() as usize).max(1);
		let rows = ((height as f64 / cell).ceil() as usize).max(1);
		Self {
			gap,
			cell,
			cols,
			rows,
			cells: vec![Vec::new(); cols * rows],
			len: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
		let col = ((x / self.cell).floor().max(0.0) as usize).min(self.cols - 1);
		let row = ((y / self.cell).floor().max(0.0) as usize).min(self.rows - 1);
		(col, row)
	}

	/// True when every stored base is at least `gap` away from `(x, y)`.
	pub fn has_room(&self, x: f64, y: f64) -> bool {
		let (col, row) = self.cell_of(x, y);
		let gap_sq = self.gap * self.gap;
		for r in row.saturating_sub(1)..=(row + 1).min(self.rows - 1) {
			for c in col.saturating_sub(1)..=(col + 1).min(self.cols - 1) {
				let crowded = self.cells[r * self.cols + c].iter().any(|&(bx, by)| {
					let (dx, dy) = (bx - x, by - y);
					dx * dx + dy * dy < gap_sq
				});
				if crowded {
					return false;
				}
			}
		}
		true
	}

	pub fn insert(&mut self, x: f64, y: f64) {
		let (col, row) = self.cell_of(x, y);
		self.cells[row * self.cols + col].push((x, y));
		self.len += 1;
	}

	/// Removes one base stored at exactly `(x, y)`. Returns whether one was found.
	pub fn remove(&mut self, x: f64, y: f64) -> bool {
		let (col, row) = self.cell_of(x, y);
		let cell = &mut self.cells[row * self.cols + col];
		match cell.iter().position(|&p| p == (x, y)) {
			Some(i) => {
				cell.swap_remove(i);
				self.len -= 1;
				true
			}
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_points_closer_than_gap() {
		let mut grid = SpacingGrid::new(2.5, 100, 100);
		grid.insert(10.0, 10.0);
		assert!(!grid.has_room(10.0, 10.0));
		assert!(!grid.has_room(12.0, 11.0));
		assert!(grid.has_room(12.5, 10.0));
		assert!(grid.has_room(13.0, 13.0));
	}

	#[test]
	fn finds_neighbours_across_cell_borders() {
		let mut grid = SpacingGrid::new(3.0, 30, 30);
		// 5.9 lives in cell 1, 6.1 in cell 2.
		grid.insert(5.9, 5.9);
		assert!(!grid.has_room(6.1, 6.1));
	}

	#[test]
	fn remove_frees_the_spot() {
		let mut grid = SpacingGrid::new(2.5, 50, 50);
		grid.insert(4.0, 4.0);
		assert_eq!(grid.len(), 1);
		assert!(grid.remove(4.0, 4.0));
		assert!(!grid.remove(4.0, 4.0));
		assert!(grid.is_empty());
		assert!(grid.has_room(4.0, 4.0));
	}

	#[test]
	fn edge_points_clamp_into_grid() {
		let mut grid = SpacingGrid::new(2.5, 10, 10);
		grid.insert(9.0, 9.0);
		assert!(!grid.has_room(9.5, 9.5));
		assert!(grid.has_room(0.0, 0.0));
	}
}
