//! Input handling: coordinate conversion, click targets, and event types.
//!
//! Pure logic only; web_sys DOM access stays in `main.rs` so everything here
//! can be unit tested.

use ratzilla::ratatui::layout::Rect;

/// All input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char),
    /// A click/tap on a registered target, identified by a semantic action ID
    /// (see `game::actions`).
    Click(u16),
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// The rectangular region (in terminal cell coordinates) for hit testing.
    pub rect: Rect,
    /// Semantic action ID.
    pub action_id: u16,
}

/// Shared state between the render loop and the click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    /// Center of the star art (col, row), registered during render. Clicks
    /// near it are resolved radially instead of by rectangle.
    pub star_center: Option<(u16, u16)>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            star_center: None,
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
        self.star_center = None;
    }

    /// Register a click target with a rectangular hit region.
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Convenience: register a full-row click target at the given row within
    /// an area.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.targets.push(ClickTarget {
                rect: Rect::new(area.x, row, area.width, 1),
                action_id,
            });
        }
    }

    /// Hit-test a terminal cell coordinate against all registered targets.
    /// Later-registered (topmost) targets win when targets overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Radial hit test against the star. Terminal cells are roughly twice as
/// tall as wide, so column distance is halved to make the clickable region
/// visually circular. `radius_rows` is the radius in rows.
pub fn is_within_star(col: u16, row: u16, center: (u16, u16), radius_rows: f64) -> bool {
    let dx = (col as f64 - center.0 as f64) / 2.0;
    let dy = row as f64 - center.1 as f64;
    (dx * dx + dy * dy).sqrt() <= radius_rows
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y coordinate to a terminal row index.
///
/// `click_y` is relative to the grid container's top edge.
/// `grid_height` is the total pixel height of the grid container.
///
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }

    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;

    if row >= terminal_rows {
        return None;
    }

    Some(row)
}

/// Convert a pixel X coordinate to a terminal column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols {
        None
    } else {
        Some(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hit_test tests ──────────────────────────────────────────────

    #[test]
    fn hit_test_basic() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);

        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
    }

    #[test]
    fn hit_test_miss_returns_none() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);

        assert_eq!(cs.hit_test(5, 9), None);
        assert_eq!(cs.hit_test(5, 11), None);
    }

    #[test]
    fn hit_test_overlap_last_wins() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        cs.add_click_target(Rect::new(5, 5, 10, 1), 2);

        assert_eq!(cs.hit_test(7, 5), Some(2));
        assert_eq!(cs.hit_test(0, 5), Some(1));
        assert_eq!(cs.hit_test(20, 5), Some(1));
    }

    #[test]
    fn hit_test_empty() {
        let cs = ClickState::new();
        assert_eq!(cs.hit_test(0, 0), None);
    }

    // ── add_row_target tests ──────────────────────────────────────

    #[test]
    fn add_row_target_within_area() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 12, 99);

        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(15, 12), Some(99));
    }

    #[test]
    fn add_row_target_outside_area_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 99); // before area
        cs.add_row_target(area, 15, 98); // after area

        assert_eq!(cs.targets.len(), 0);
    }

    #[test]
    fn click_state_clear_drops_star_center() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.star_center = Some((40, 10));

        cs.clear_targets();
        assert_eq!(cs.targets.len(), 0);
        assert_eq!(cs.star_center, None);
    }

    // ── star hit test ──────────────────────────────────────────────

    #[test]
    fn star_hit_at_center() {
        assert!(is_within_star(40, 10, (40, 10), 3.0));
    }

    #[test]
    fn star_hit_respects_radius_vertically() {
        let center = (40, 10);
        assert!(is_within_star(40, 13, center, 3.0));
        assert!(!is_within_star(40, 14, center, 3.0));
    }

    #[test]
    fn star_hit_is_wider_than_tall() {
        // Cell aspect correction: 6 columns out equals 3 rows out.
        let center = (40, 10);
        assert!(is_within_star(46, 10, center, 3.0));
        assert!(!is_within_star(47, 10, center, 3.0));
    }

    #[test]
    fn star_hit_diagonal() {
        let center = (40, 10);
        // dx = 4/2 = 2, dy = 2 → dist = 2.83 < 3
        assert!(is_within_star(44, 12, center, 3.0));
        // dx = 6/2 = 3, dy = 3 → dist = 4.24 > 3
        assert!(!is_within_star(46, 13, center, 3.0));
    }

    // ── Layout responsive tests ────────────────────────────────────

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(30));
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
        assert!(!is_narrow_layout(80));
    }

    // ── pixel coordinate conversion tests ──────────────────────────

    #[test]
    fn pixel_to_row_basic() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
    }

    #[test]
    fn pixel_to_row_out_of_bounds() {
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
    }

    #[test]
    fn pixel_to_row_fractional_cell_height() {
        assert_eq!(pixel_y_to_row(0.0, 400.0, 24), Some(0));
        assert_eq!(pixel_y_to_row(16.0, 400.0, 24), Some(0));
        assert_eq!(pixel_y_to_row(17.0, 400.0, 24), Some(1));
        assert_eq!(pixel_y_to_row(399.0, 400.0, 24), Some(23));
    }

    #[test]
    fn pixel_x_to_col_basic() {
        assert_eq!(pixel_x_to_col(0.0, 800.0, 80), Some(0));
        assert_eq!(pixel_x_to_col(10.0, 800.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(799.0, 800.0, 80), Some(79));
    }

    #[test]
    fn pixel_x_to_col_out_of_bounds() {
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
        assert_eq!(pixel_x_to_col(-1.0, 800.0, 80), None);
    }

    // ── Integration-style pipeline test ─────────────────────────────

    #[test]
    fn full_click_pipeline() {
        let mut cs = ClickState::new();
        cs.terminal_cols = 80;
        cs.terminal_rows = 30;
        cs.star_center = Some((40, 8));

        cs.add_click_target(Rect::new(0, 20, 80, 1), 100);
        for row in 27..30 {
            cs.add_click_target(Rect::new(0, row, 80, 1), 2);
        }

        let grid_height = 450.0;
        let grid_width = 800.0;
        let cell_height = grid_height / 30.0;

        // Tap near the star center: radial test catches it before rects.
        let row = pixel_y_to_row(8.0 * cell_height + 7.0, grid_height, 30).unwrap();
        let col = pixel_x_to_col(41.0 * 10.0, grid_width, 80).unwrap();
        assert!(is_within_star(col, row, cs.star_center.unwrap(), 4.0));

        // Tap an upgrade row.
        let row = pixel_y_to_row(20.0 * cell_height + 7.0, grid_height, 30).unwrap();
        assert!(!is_within_star(40, row, cs.star_center.unwrap(), 4.0));
        assert_eq!(cs.hit_test(40, row), Some(100));

        // Tap the help bar.
        let row = pixel_y_to_row(28.0 * cell_height + 10.0, grid_height, 30).unwrap();
        assert_eq!(cs.hit_test(0, row), Some(2));
    }
}
