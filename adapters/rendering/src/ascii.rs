//! Plain-text rendering of maze layouts.

use std::fmt::Write as _;

use maze_ball_core::{CellCoord, Direction, MazeLayout};

/// Renders the layout as `+--+` / `|` art, one text row per grid row plus borders.
#[must_use]
pub fn render_layout(layout: &MazeLayout) -> String {
    let size = layout.size();
    let mut output = String::new();

    output.push('+');
    for _ in 0..size.columns() {
        output.push_str("--+");
    }
    output.push('\n');

    for row in 0..size.rows() {
        let mut body = String::from("|");
        let mut floor = String::from("+");
        for column in 0..size.columns() {
            let cell = CellCoord::new(column, row);
            body.push_str("  ");
            body.push(if layout.is_open(cell, Direction::East) {
                ' '
            } else {
                '|'
            });
            floor.push_str(if layout.is_open(cell, Direction::South) {
                "  "
            } else {
                "--"
            });
            floor.push('+');
        }
        let _ = writeln!(output, "{body}");
        let _ = writeln!(output, "{floor}");
    }

    output
}
