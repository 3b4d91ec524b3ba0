//! ASCII track renderer.
//!
//! Draws the ball's position as a fixed-width track between `|` delimiters,
//! with `0` marking the reference tick and `*` the ball, followed by a
//! `T:/P=/F=/V=` status line. Positions beyond ±105 display units clamp to
//! the two end cells.

use static_assertions::const_assert_eq;

use ballsim_core::sim::TickSnapshot;

/// Total track width in characters, delimiters included.
pub const TRACK_CELLS: usize = 43;

/// Interior cells between the delimiters.
pub const TRACK_INTERIOR: usize = 41;

/// Cell carrying the reference `0` mark.
pub const CENTER_INDEX: usize = 21;

/// Display half-width: positions beyond ±105 display units render on the
/// end cells.
const DISPLAY_SPAN: i32 = 105;

/// Display units per interior cell.
const UNITS_PER_CELL: i32 = 5;

const_assert_eq!(TRACK_CELLS, TRACK_INTERIOR + 2);
const_assert_eq!(CENTER_INDEX, TRACK_CELLS / 2);
const_assert_eq!((2 * DISPLAY_SPAN / UNITS_PER_CELL) as usize + 1, TRACK_CELLS);

/// Stateless per-tick track renderer.
#[derive(Debug, Clone, Copy)]
pub struct TrackRenderer {
    /// Convergence band half-width: anything strictly inside renders on
    /// the center cell.
    hold_band: f64,
}

impl TrackRenderer {
    /// Create a renderer for the given convergence band.
    pub fn new(hold_band: f64) -> Self {
        Self { hold_band }
    }

    /// Track cell index for a ball position.
    ///
    /// In-band positions snap to the center mark; everything else maps
    /// linearly at 5 units per cell with truncation toward zero, clamped
    /// to the delimiter cells beyond ±105.
    fn cell(&self, position: f64) -> usize {
        if position < -(DISPLAY_SPAN as f64) {
            0
        } else if -self.hold_band < position && position < self.hold_band {
            CENTER_INDEX
        } else if position < DISPLAY_SPAN as f64 {
            1 + ((position as i32 + DISPLAY_SPAN) / UNITS_PER_CELL) as usize
        } else {
            TRACK_CELLS - 1
        }
    }

    /// Render one tick as a track line plus the status suffix.
    pub fn line(&self, snapshot: &TickSnapshot) -> String {
        let mut cells = [b'-'; TRACK_CELLS];
        cells[0] = b'|';
        cells[TRACK_CELLS - 1] = b'|';
        cells[CENTER_INDEX] = b'0';
        cells[self.cell(snapshot.position)] = b'*';

        format!(
            "{}\tT:{:.2},P={:.2},F={:.2},V={:.2}",
            String::from_utf8_lossy(&cells),
            snapshot.time,
            snapshot.position,
            snapshot.force,
            snapshot.velocity,
        )
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> TrackRenderer {
        TrackRenderer::new(2.5)
    }

    fn snapshot(position: f64) -> TickSnapshot {
        TickSnapshot {
            time: 1.25,
            position,
            force: -3.5,
            velocity: 0.75,
        }
    }

    /// Index of `*` in the rendered track.
    fn star_cell(position: f64) -> usize {
        let line = renderer().line(&snapshot(position));
        line.bytes().position(|b| b == b'*').unwrap()
    }

    #[test]
    fn track_geometry() {
        let line = renderer().line(&snapshot(0.0));
        let (track, status) = line.split_once('\t').unwrap();
        assert_eq!(track.len(), TRACK_CELLS);
        assert!(track.ends_with('|'));
        assert_eq!(status, "T:1.25,P=0.00,F=-3.50,V=0.75");
        // In-band ball overdraws the reference mark.
        assert_eq!(track.as_bytes()[CENTER_INDEX], b'*');
    }

    #[test]
    fn reference_mark_visible_when_ball_elsewhere() {
        let line = renderer().line(&snapshot(50.0));
        assert_eq!(line.as_bytes()[CENTER_INDEX], b'0');
    }

    #[test]
    fn in_band_positions_snap_to_center() {
        for p in [0.0, 2.49, -2.49, 1.0] {
            assert_eq!(star_cell(p), CENTER_INDEX, "position {p}");
        }
    }

    #[test]
    fn band_edges_map_linearly() {
        // Exactly ±2.5 is out of band; truncation toward zero puts the
        // negative edge on the center cell anyway and the positive edge
        // one cell right of it.
        assert_eq!(star_cell(-2.5), 21);
        assert_eq!(star_cell(2.5), 22);
    }

    #[test]
    fn linear_mapping_examples() {
        assert_eq!(star_cell(-104.9), 1);
        assert_eq!(star_cell(-105.0), 1);
        assert_eq!(star_cell(-60.0), 10);
        assert_eq!(star_cell(-8.7), 20);
        assert_eq!(star_cell(10.0), 24);
        assert_eq!(star_cell(17.3), 25);
        assert_eq!(star_cell(60.0), 34);
        assert_eq!(star_cell(99.9), 41);
    }

    #[test]
    fn far_positions_clamp_to_end_cells() {
        assert_eq!(star_cell(-200.0), 0);
        assert_eq!(star_cell(-105.01), 0);
        assert_eq!(star_cell(200.0), TRACK_CELLS - 1);
        assert_eq!(star_cell(105.0), TRACK_CELLS - 1);
        // Positions in [100, 105) already truncate onto the right
        // delimiter cell.
        assert_eq!(star_cell(100.0), TRACK_CELLS - 1);
        assert_eq!(star_cell(104.9), TRACK_CELLS - 1);
    }

    #[test]
    fn status_line_formats_two_decimals() {
        let line = renderer().line(&TickSnapshot {
            time: 0.05,
            position: -17.123,
            force: 65535.0,
            velocity: -0.005,
        });
        let (_, status) = line.split_once('\t').unwrap();
        assert_eq!(status, "T:0.05,P=-17.12,F=65535.00,V=-0.01");
    }
}
