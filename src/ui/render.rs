// Grid renderer - Draws the editor view onto any GridBackend

use crate::sequencer::pattern::Pattern;
use crate::ui::backend::{CellStyle, Color, GridBackend};
use std::io;

pub const EDIT_MODE_TEXT: &str = "EDIT MODE";
pub const NAVIGATE_MODE_TEXT: &str = "Press 'e' to edit.";
pub const EDIT_BOX_TITLE: &str = "NoteNumber Velocity";

/// Top-left corner of the pattern grid
const ORIGIN_X: u16 = 5;
const ORIGIN_Y: u16 = 5;
/// Width of a number field
const NUM_WIDTH: u16 = 4;
/// Horizontal distance between track columns
const TRACK_WIDTH: u16 = 8;

/// Position of the cell edit box
const EDIT_BOX_X: u16 = 20;
const EDIT_BOX_Y: u16 = 20;

/// Everything the renderer needs to know about the editor
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub pattern: &'a Pattern,
    pub pattern_index: usize,
    pub pattern_count: usize,
    pub editing: bool,
    /// (track, step)
    pub cursor: (usize, usize),
    pub playing_row: Option<usize>,
    /// Text typed so far while the edit box is open
    pub line_input: Option<&'a str>,
    pub status: Option<&'a str>,
}

/// Screen row of a pattern line, None past the last addressable row
pub fn row_y(line: usize) -> Option<u16> {
    u16::try_from(line).ok()?.checked_add(ORIGIN_Y + NUM_WIDTH)
}

/// Screen column where a track's note field starts
pub fn note_x(track: usize) -> Option<u16> {
    track_x(track)?.checked_add(NUM_WIDTH)
}

/// Screen column where a track's velocity field starts
pub fn velocity_x(track: usize) -> Option<u16> {
    track_x(track)?.checked_add(NUM_WIDTH * 2)
}

fn track_x(track: usize) -> Option<u16> {
    u16::try_from(track)
        .ok()?
        .checked_mul(TRACK_WIDTH)?
        .checked_add(ORIGIN_X + 1)
}

/// Redraw the whole view and flush it
pub fn render(view: &GridView<'_>, backend: &mut dyn GridBackend) -> io::Result<()> {
    backend.clear();

    let header = if view.editing {
        EDIT_MODE_TEXT
    } else {
        NAVIGATE_MODE_TEXT
    };
    backend.put_str(1, 1, header, CellStyle::default());
    backend.put_str(
        1,
        2,
        &format!("Pattern {}/{}", view.pattern_index + 1, view.pattern_count.max(1)),
        CellStyle::fg(Color::Blue),
    );
    if let Some(status) = view.status {
        backend.put_str(1, 3, status, CellStyle::fg(Color::Red));
    }

    draw_pattern(view, backend);

    if let Some(input) = view.line_input {
        draw_edit_box(backend, EDIT_BOX_X, EDIT_BOX_Y, EDIT_BOX_TITLE, input);
    }

    backend.flush()
}

fn draw_pattern(view: &GridView<'_>, backend: &mut dyn GridBackend) {
    for (row, line) in view.pattern.lines().iter().enumerate() {
        // Lines below the addressable grid are never visible
        let Some(y) = row_y(row) else {
            break;
        };
        backend.put_str(ORIGIN_X, y, &format!("{:>4}", row), CellStyle::fg(Color::Blue));

        for (track, event) in line.iter().enumerate() {
            let (Some(x_note), Some(x_velocity)) = (note_x(track), velocity_x(track)) else {
                break;
            };
            let bg = if view.editing && view.cursor == (track, row) {
                Color::Yellow
            } else if view.playing_row == Some(row) {
                Color::Red
            } else {
                Color::Default
            };

            backend.put_str(
                x_note,
                y,
                &format!("{:>4}", event.note_num),
                CellStyle::fg(Color::Default).on(bg),
            );
            backend.put_str(
                x_velocity,
                y,
                &format!("{:>4}", event.velocity),
                CellStyle::fg(Color::Green).on(bg),
            );
        }
    }
}

fn draw_edit_box(backend: &mut dyn GridBackend, x: u16, y: u16, title: &str, input: &str) {
    let title_len = title.chars().count() as u16;
    let width = 9 + title_len;
    let height = 5;
    let style = CellStyle::default();

    for col in x..x + width {
        backend.set_cell(col, y, '-', style);
        backend.set_cell(col, y + height - 1, '-', style);
    }
    for row in y..y + height {
        backend.set_cell(x, row, '|', style);
        backend.set_cell(x + width, row, '|', style);
        if row > y && row < y + height - 1 {
            for col in x + 1..x + width {
                backend.set_cell(col, row, ' ', style);
            }
        }
    }

    backend.put_str(x + 3, y + 1, title, style);
    backend.put_str(x + 2, y + 3, input, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::event::GeneratorRef;
    use crate::sequencer::pattern::Track;
    use crate::ui::backend::MemoryGrid;

    fn pattern() -> Pattern {
        Pattern::new(vec![
            Track::from_notes(GeneratorRef::Mock, 100, &[60, 62, 64]),
            Track::from_notes(GeneratorRef::Mock, 90, &[36]),
        ])
    }

    fn view(pattern: &Pattern) -> GridView<'_> {
        GridView {
            pattern,
            pattern_index: 0,
            pattern_count: 1,
            editing: false,
            cursor: (0, 0),
            playing_row: None,
            line_input: None,
            status: None,
        }
    }

    #[test]
    fn test_header_follows_mode() {
        let pattern = pattern();
        let mut grid = MemoryGrid::new();

        render(&view(&pattern), &mut grid).unwrap();
        assert_eq!(grid.row_text(1), format!(" {}", NAVIGATE_MODE_TEXT));

        let editing = GridView {
            editing: true,
            ..view(&pattern)
        };
        render(&editing, &mut grid).unwrap();
        assert_eq!(grid.row_text(1), format!(" {}", EDIT_MODE_TEXT));
        assert_eq!(grid.flush_count(), 2);
    }

    #[test]
    fn test_grid_layout() {
        let pattern = pattern();
        let mut grid = MemoryGrid::new();
        render(&view(&pattern), &mut grid).unwrap();

        // Row 0 at y=9: number at x=5, track 0 note at x=10, velocity at x=14
        assert_eq!(grid.row_text(9), "        0   60 100  36  90");
        // Short tracks show rests
        assert_eq!(grid.row_text(11), "        2   64 100   0   0");
        assert_eq!(grid.style_at(16, 9).fg, Color::Green);
        assert_eq!(grid.style_at(8, 9).fg, Color::Blue);
    }

    #[test]
    fn test_playing_row_highlight() {
        let pattern = pattern();
        let mut grid = MemoryGrid::new();
        let playing = GridView {
            playing_row: Some(1),
            ..view(&pattern)
        };
        render(&playing, &mut grid).unwrap();

        assert_eq!(grid.style_at(note_x(0).unwrap(), row_y(1).unwrap()).bg, Color::Red);
        assert_eq!(
            grid.style_at(velocity_x(1).unwrap(), row_y(1).unwrap()).bg,
            Color::Red
        );
        assert_eq!(
            grid.style_at(note_x(0).unwrap(), row_y(0).unwrap()).bg,
            Color::Default
        );
    }

    #[test]
    fn test_cursor_wins_over_playing_row() {
        let pattern = pattern();
        let mut grid = MemoryGrid::new();
        let both = GridView {
            editing: true,
            cursor: (1, 1),
            playing_row: Some(1),
            ..view(&pattern)
        };
        render(&both, &mut grid).unwrap();

        assert_eq!(
            grid.style_at(note_x(1).unwrap(), row_y(1).unwrap()).bg,
            Color::Yellow
        );
        assert_eq!(grid.style_at(note_x(0).unwrap(), row_y(1).unwrap()).bg, Color::Red);
    }

    #[test]
    fn test_cursor_hidden_outside_edit_mode() {
        let pattern = pattern();
        let mut grid = MemoryGrid::new();
        render(&view(&pattern), &mut grid).unwrap();
        assert_eq!(
            grid.style_at(note_x(0).unwrap(), row_y(0).unwrap()).bg,
            Color::Default
        );
    }

    #[test]
    fn test_edit_box_and_status() {
        let pattern = pattern();
        let mut grid = MemoryGrid::new();
        let open = GridView {
            editing: true,
            line_input: Some("64 1"),
            status: Some("bad input"),
            ..view(&pattern)
        };
        render(&open, &mut grid).unwrap();

        assert!(grid.contains(EDIT_BOX_TITLE));
        let input_row = grid.row_text(EDIT_BOX_Y + 3);
        assert!(input_row.trim_start().starts_with("| 64 1"));
        assert!(input_row.ends_with('|'));
        assert!(grid.contains("bad input"));
    }

    #[test]
    fn test_huge_pattern_stops_at_grid_edge() {
        let notes: Vec<u8> = (0..70_000).map(|i| (i % 128) as u8).collect();
        let tall = Pattern::new(vec![Track::from_notes(GeneratorRef::Mock, 100, &notes)]);
        let mut grid = MemoryGrid::new();

        render(&view(&tall), &mut grid).unwrap();

        // Nothing wraps around over the header
        assert_eq!(grid.row_text(1), format!(" {}", NAVIGATE_MODE_TEXT));
        assert_eq!(grid.row_text(0), "");
        assert_eq!(grid.row_text(9), "        0    0 100");
        assert!(row_y(70_000).is_none());
        assert_eq!(row_y(u16::MAX as usize - 9), Some(u16::MAX));
    }

    #[test]
    fn test_too_many_tracks_are_clipped() {
        let wide = Pattern::new(
            (0..9_000)
                .map(|_| Track::from_notes(GeneratorRef::Mock, 1, &[2]))
                .collect(),
        );
        let mut grid = MemoryGrid::new();

        render(&view(&wide), &mut grid).unwrap();

        assert!(note_x(9_000).is_none());
        let (x, y) = (note_x(0).unwrap() + 3, row_y(0).unwrap());
        assert_eq!(grid.cell(x, y).map(|(ch, _)| ch), Some('2'));
    }
}
