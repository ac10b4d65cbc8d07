//! Occupancy grid and movement resolution.
//!
//! The world owns a 2-D occupancy bitmap over a bordered grid. Positions on
//! the 1-cell border are never valid occupancy targets; the interior spans
//! `1..=width-2` by `1..=height-2`. Exactly one writer mutates the grid at
//! a time, and an agent's cell stays marked for as long as the agent holds
//! that position, so no two live agents ever share a cell.

use crate::error::SimError;
use petri_data::Position;
use rand::Rng;

/// The simulation grid: coordinate space plus occupancy state.
pub struct World {
    width: u16,
    height: u16,
    occupied: Vec<bool>,
}

impl World {
    /// Creates an empty grid. Dimensions include the reserved border, so
    /// anything below 3x3 has no interior at all.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        debug_assert!(width >= 3 && height >= 3, "grid needs an interior");
        Self {
            width,
            height,
            occupied: vec![false; usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells inside the border.
    #[must_use]
    pub fn interior_capacity(&self) -> usize {
        usize::from(self.width - 2) * usize::from(self.height - 2)
    }

    /// True when `(x, y)` lies strictly inside the border.
    #[must_use]
    pub fn in_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && x <= i32::from(self.width) - 2 && y >= 1 && y <= i32::from(self.height) - 2
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(x >= 0 && y >= 0);
        y as usize * usize::from(self.width) + x as usize
    }

    fn occupied_at(&self, x: i32, y: i32) -> bool {
        self.occupied[self.index(x, y)]
    }

    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupied_at(i32::from(position.x), i32::from(position.y))
    }

    /// Marks a cell occupied. Returns false if the cell is outside the
    /// interior or already taken; the grid is unchanged in that case.
    pub fn place(&mut self, position: Position) -> bool {
        let (x, y) = (i32::from(position.x), i32::from(position.y));
        if !self.in_interior(x, y) || self.occupied_at(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.occupied[idx] = true;
        true
    }

    /// Releases a cell.
    pub fn vacate(&mut self, position: Position) {
        let idx = self.index(i32::from(position.x), i32::from(position.y));
        debug_assert!(self.occupied[idx], "vacating an empty cell");
        self.occupied[idx] = false;
    }

    /// Releases every cell, e.g. at a generation boundary before agents are
    /// re-placed.
    pub fn clear(&mut self) {
        self.occupied.fill(false);
    }

    /// Draws random interior cells until a vacant one is found, bounded by
    /// `attempts`. Exhaustion means the grid is too small for its
    /// population and surfaces as a fatal configuration error.
    pub fn place_random_with_rng<R: Rng>(
        &mut self,
        attempts: usize,
        rng: &mut R,
    ) -> Result<Position, SimError> {
        for _ in 0..attempts {
            let position = Position::new(
                rng.gen_range(1..=self.width - 2),
                rng.gen_range(1..=self.height - 2),
            );
            if self.place(position) {
                return Ok(position);
            }
        }
        Err(SimError::PlacementExhausted { attempts })
    }

    /// Resolves a requested move with each delta component in {-1, 0, 1}.
    ///
    /// The diagonal target wins if in bounds and vacant; otherwise the
    /// horizontal-only target is tried before the vertical-only one (fixed
    /// tie-break, never random), and a fully blocked agent stays put. The
    /// old cell is vacated and the resolved cell occupied within this one
    /// call, so callers never observe an agent on zero or two cells.
    pub fn resolve_move(&mut self, current: Position, delta: (i8, i8)) -> Position {
        let (cx, cy) = (i32::from(current.x), i32::from(current.y));
        let tx = cx + i32::from(delta.0);
        let ty = cy + i32::from(delta.1);

        // The mover's own cell counts as vacant while its move resolves.
        self.vacate(current);

        let mut next = current;
        if self.in_interior(tx, ty) && !self.occupied_at(tx, ty) {
            next = Position::new(tx as u16, ty as u16);
        } else if self.in_interior(tx, cy) && !self.occupied_at(tx, cy) {
            next = Position::new(tx as u16, current.y);
        } else if self.in_interior(cx, ty) && !self.occupied_at(cx, ty) {
            next = Position::new(current.x, ty as u16);
        }

        let placed = self.place(next);
        debug_assert!(placed, "resolved target must be vacant");
        next
    }
}
