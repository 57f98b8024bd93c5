use rand::Rng;

use crate::error::PlacementError;

/// Top-left corner of a target in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether `(px, py)` lies on a square of side `size` anchored here.
    /// Edges are inclusive.
    pub fn contains(&self, px: f64, py: f64, size: u32) -> bool {
        let (x, y, size) = (self.x as f64, self.y as f64, size as f64);
        px >= x && px <= x + size && py >= y && py <= y + size
    }

    pub fn center(&self, size: u32) -> (f64, f64) {
        (
            self.x as f64 + size as f64 / 2.0,
            self.y as f64 + size as f64 / 2.0,
        )
    }
}

/// Fails unless the target fits strictly inside the field on both axes.
pub fn check_bounds(
    field_width: u32,
    field_height: u32,
    target_size: u32,
) -> Result<(), PlacementError> {
    if field_width > target_size && field_height > target_size {
        Ok(())
    } else {
        Err(PlacementError {
            field_width,
            field_height,
            target_size,
        })
    }
}

/// Placement for a field whose bounds were checked once up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPlacer {
    field_width: u32,
    field_height: u32,
    target_size: u32,
}

impl TargetPlacer {
    pub fn new(field_width: u32, field_height: u32, target_size: u32) -> Result<Self, PlacementError> {
        check_bounds(field_width, field_height, target_size)?;
        Ok(Self {
            field_width,
            field_height,
            target_size,
        })
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Picks a uniformly random position that keeps the whole target in the field.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = rng.gen_range(0..=self.field_width - self.target_size);
        let y = rng.gen_range(0..=self.field_height - self.target_size);

        Position { x, y }
    }
}

/// One-off placement that checks bounds on every call.
pub fn place<R: Rng + ?Sized>(
    field_width: u32,
    field_height: u32,
    target_size: u32,
    rng: &mut R,
) -> Result<Position, PlacementError> {
    Ok(TargetPlacer::new(field_width, field_height, target_size)?.place(rng))
}
