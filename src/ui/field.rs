use ratatui::layout::Rect;

/// Fraction of a cell kept clear of its edges when picking a click point
const CELL_INSET: f64 = 1e-6;

/// Maps play-field coordinates onto the terminal cells that show the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub area: Rect,
    pub field_width: u32,
    pub field_height: u32,
}

impl FieldGeometry {
    pub fn new(area: Rect, field_width: u32, field_height: u32) -> Self {
        Self {
            area,
            field_width,
            field_height,
        }
    }

    fn cell_w(&self) -> f64 {
        self.field_width as f64 / self.area.width.max(1) as f64
    }

    fn cell_h(&self) -> f64 {
        self.field_height as f64 / self.area.height.max(1) as f64
    }

    /// Cells covering the square `[x, x+size] × [y, y+size]`. Never empty
    /// while the field area has any cells.
    pub fn target_rect(&self, x: u32, y: u32, size: u32) -> Rect {
        let (cw, ch) = (self.cell_w(), self.cell_h());
        let last_col = self.area.width.saturating_sub(1);
        let last_row = self.area.height.saturating_sub(1);

        let c0 = ((x as f64 / cw).floor() as u16).min(last_col);
        let r0 = ((y as f64 / ch).floor() as u16).min(last_row);
        let c1 = (((x + size) as f64 / cw).ceil() as u16).clamp(c0 + 1, last_col + 1);
        let r1 = (((y + size) as f64 / ch).ceil() as u16).clamp(r0 + 1, last_row + 1);

        Rect::new(self.area.x + c0, self.area.y + r0, c1 - c0, r1 - r0)
    }

    /// Field coordinates for a click on `(column, row)`, or `None` outside
    /// the field.
    ///
    /// A cell spans a range of field coordinates; the point picked is the one
    /// strictly inside that range closest to `aim` (the target centre). Any
    /// drawn target cell registers as a hit, and a cell that only touches the
    /// target's edge does not.
    pub fn click_point(&self, column: u16, row: u16, aim: Option<(f64, f64)>) -> Option<(f64, f64)> {
        let area = self.area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let (cw, ch) = (self.cell_w(), self.cell_h());
        let (col, row) = ((column - area.x) as f64, (row - area.y) as f64);
        let (lo_x, hi_x) = ((col + CELL_INSET) * cw, (col + 1.0 - CELL_INSET) * cw);
        let (lo_y, hi_y) = ((row + CELL_INSET) * ch, (row + 1.0 - CELL_INSET) * ch);

        Some(match aim {
            Some((ax, ay)) => (ax.clamp(lo_x, hi_x), ay.clamp(lo_y, hi_y)),
            None => ((lo_x + hi_x) / 2.0, (lo_y + hi_y) / 2.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick::placement::Position;

    fn geometry() -> FieldGeometry {
        FieldGeometry::new(Rect::new(1, 2, 80, 35), 700, 700)
    }

    #[test]
    fn small_target_gets_at_least_one_cell() {
        let rect = geometry().target_rect(0, 0, 1);
        assert!(rect.width >= 1 && rect.height >= 1);
        assert_eq!((rect.x, rect.y), (1, 2));
    }

    #[test]
    fn target_at_far_corner_stays_in_area() {
        let g = geometry();
        let rect = g.target_rect(690, 690, 10);
        assert!(rect.right() <= g.area.right());
        assert!(rect.bottom() <= g.area.bottom());
    }

    #[test]
    fn every_drawn_cell_is_a_hit() {
        let g = geometry();
        for (x, y) in [(0, 0), (5, 13), (347, 601), (690, 690), (123, 0)] {
            let target = Position::new(x, y);
            let rect = g.target_rect(x, y, 10);
            let aim = Some(target.center(10));
            for col in rect.left()..rect.right() {
                for row in rect.top()..rect.bottom() {
                    let (px, py) = g.click_point(col, row, aim).unwrap();
                    assert!(target.contains(px, py, 10), "cell ({col},{row}) missed {x},{y}");
                }
            }
        }
    }

    #[test]
    fn cell_touching_target_edge_is_a_miss() {
        // ten field units per cell, so the target ends exactly on a cell boundary
        let g = FieldGeometry::new(Rect::new(0, 0, 70, 70), 700, 700);
        let target = Position::new(10, 10);
        let aim = Some(target.center(10));
        assert_eq!(g.target_rect(10, 10, 10), Rect::new(1, 1, 1, 1));

        let (px, py) = g.click_point(1, 1, aim).unwrap();
        assert!(target.contains(px, py, 10));
        for (col, row) in [(2, 1), (1, 2), (0, 1), (1, 0), (2, 2)] {
            let (px, py) = g.click_point(col, row, aim).unwrap();
            assert!(!target.contains(px, py, 10), "cell ({col},{row}) hit");
        }
    }

    #[test]
    fn far_cell_is_a_miss() {
        let g = geometry();
        let target = Position::new(0, 0);
        let (px, py) = g.click_point(70, 30, Some(target.center(10))).unwrap();
        assert!(!target.contains(px, py, 10));
    }

    #[test]
    fn clicks_outside_area_are_dropped() {
        let g = geometry();
        assert_eq!(g.click_point(0, 5, None), None);
        assert_eq!(g.click_point(10, 1, None), None);
        assert_eq!(g.click_point(81, 5, None), None);
        assert!(g.click_point(1, 2, None).is_some());
    }
}
