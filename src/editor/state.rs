// Grid editor - Interaction state machine over the pattern table
//
// Navigate is the default and live playback view; Edit enables the cursor
// and cell editing. All pattern writes go through the edit history and the
// pattern's write lock.

use crate::command::{EditHistory, InsertEventCommand};
use crate::editor::action::{Direction, InputAction, InputContext};
use crate::editor::error::EditError;
use crate::editor::line_input::LineInput;
use crate::sequencer::event::Event;
use crate::sequencer::pattern::SharedPattern;
use crate::sequencer::player::PatternTable;
use crate::sequencer::scheduler::{PlaybackControl, PlaybackEvent, Toggle};
use crate::ui::backend::{GridBackend, Key};
use crate::ui::render::{GridView, render};
use std::io;

/// Editor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,
    Edit,
}

/// What the control loop should do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going and redraw
    Redraw,
    /// Input was not bound to anything
    Ignored,
    Exit,
}

pub struct GridEditor {
    table: PatternTable,
    shown: usize,
    mode: Mode,
    /// (track, step)
    cursor: (usize, usize),
    playing_row: Option<usize>,
    line_input: Option<LineInput>,
    status: Option<String>,
    history: EditHistory,
}

impl GridEditor {
    /// Create an editor showing the first pattern of the table
    pub fn new(table: PatternTable) -> Self {
        Self {
            table,
            shown: 0,
            mode: Mode::Navigate,
            cursor: (0, 0),
            playing_row: None,
            line_input: None,
            status: None,
            history: EditHistory::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn playing_row(&self) -> Option<usize> {
        self.playing_row
    }

    /// Index of the pattern on screen
    pub fn shown_index(&self) -> usize {
        self.shown
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn line_input(&self) -> Option<&str> {
        self.line_input.as_ref().map(LineInput::text)
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Pattern on screen, if the table has any
    pub fn current_pattern(&self) -> Option<&SharedPattern> {
        self.table.get(self.shown)
    }

    /// Dispatch table for the current state
    pub fn context(&self) -> InputContext {
        match (self.mode, &self.line_input) {
            (_, Some(_)) => InputContext::LineInput,
            (Mode::Edit, None) => InputContext::Edit,
            (Mode::Navigate, None) => InputContext::Navigate,
        }
    }

    /// Translate and handle a raw key
    pub fn handle_key(&mut self, key: Key, control: &dyn PlaybackControl) -> Outcome {
        match self.context().action_for(key) {
            Some(action) => self.handle(action, control),
            None => Outcome::Ignored,
        }
    }

    /// Apply one input action
    pub fn handle(&mut self, action: InputAction, control: &dyn PlaybackControl) -> Outcome {
        match action {
            InputAction::Exit => return Outcome::Exit,
            InputAction::ToggleEdit => self.toggle_edit(control),
            InputAction::TogglePlay => self.toggle_play(control),
            InputAction::Move(direction) => {
                if self.mode == Mode::Edit {
                    self.move_cursor(direction);
                }
            }
            InputAction::Commit => {
                if self.mode == Mode::Edit {
                    self.line_input = Some(LineInput::new());
                }
            }
            InputAction::Undo => {
                let result = self.undo();
                self.report(result);
            }
            InputAction::Redo => {
                let result = self.redo();
                self.report(result);
            }
            InputAction::Char(c) => {
                if let Some(input) = &mut self.line_input {
                    input.push(c);
                }
            }
            InputAction::Erase => {
                if let Some(input) = &mut self.line_input {
                    input.erase();
                }
            }
            InputAction::Cancel => self.line_input = None,
            InputAction::Submit => {
                if let Some(input) = self.line_input.take() {
                    let result = self.submit(&input);
                    self.report(result);
                }
            }
        }
        Outcome::Redraw
    }

    /// Follow the playback traversal
    pub fn on_playback(&mut self, event: PlaybackEvent) {
        match event {
            // Entering Edit already stopped playback; lines still queued are stale
            PlaybackEvent::LineAdvanced { .. } if self.mode == Mode::Edit => {
                tracing::debug!("ignoring line advance while editing");
            }
            PlaybackEvent::LineAdvanced { pattern, line } => {
                if pattern != self.shown && pattern < self.table.len() {
                    self.show_pattern(pattern);
                }
                self.playing_row = Some(line);
            }
            PlaybackEvent::Finished | PlaybackEvent::Stopped => self.playing_row = None,
        }
    }

    /// Draw the editor onto a backend
    pub fn render(&self, backend: &mut dyn GridBackend) -> io::Result<()> {
        let empty = Default::default();
        let guard = self.current_pattern().map(SharedPattern::read);
        let pattern = guard.as_deref().unwrap_or(&empty);

        let view = GridView {
            pattern,
            pattern_index: self.shown,
            pattern_count: self.table.len(),
            editing: self.mode == Mode::Edit,
            cursor: self.cursor,
            playing_row: self.playing_row,
            line_input: self.line_input(),
            status: self.status(),
        };
        render(&view, backend)
    }

    fn toggle_edit(&mut self, control: &dyn PlaybackControl) {
        match self.mode {
            Mode::Navigate => {
                if control.is_playing() {
                    control.stop();
                }
                self.mode = Mode::Edit;
                self.status = None;
            }
            Mode::Edit => {
                self.mode = Mode::Navigate;
                self.line_input = None;
            }
        }
    }

    fn toggle_play(&mut self, control: &dyn PlaybackControl) {
        self.mode = Mode::Navigate;
        self.line_input = None;

        match control.toggle_playback() {
            Ok(Toggle::Started) => tracing::info!("playback toggled on"),
            Ok(Toggle::StopRequested) => tracing::info!("playback toggled off"),
            Err(e) => {
                tracing::warn!("could not toggle playback: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    /// Largest valid cursor position, None if the pattern has no cells
    fn cursor_bounds(&self) -> Option<(usize, usize)> {
        let pattern = self.current_pattern()?.read();
        let tracks = pattern.track_count();
        let steps = pattern.max_track_len();
        (tracks > 0 && steps > 0).then(|| (tracks - 1, steps - 1))
    }

    fn move_cursor(&mut self, direction: Direction) {
        let Some((max_x, max_y)) = self.cursor_bounds() else {
            return;
        };
        let (x, y) = self.cursor;

        self.cursor = match direction {
            Direction::Up => (x, y.saturating_sub(1)),
            Direction::Down => (x, (y + 1).min(max_y)),
            Direction::Left => (x.saturating_sub(1), y),
            Direction::Right => ((x + 1).min(max_x), y),
        };
    }

    fn show_pattern(&mut self, index: usize) {
        self.shown = index;
        // History entries refer to the previously shown pattern
        self.history.clear();
        self.line_input = None;

        let (max_x, max_y) = self.cursor_bounds().unwrap_or((0, 0));
        self.cursor = (self.cursor.0.min(max_x), self.cursor.1.min(max_y));
    }

    fn submit(&mut self, input: &LineInput) -> Result<(), EditError> {
        let (note, velocity) = input.parse()?;
        let pattern = self
            .current_pattern()
            .cloned()
            .ok_or_else(|| EditError::Validation("No pattern loaded".to_string()))?;

        let (track, step) = self.cursor;
        let generator = pattern
            .read()
            .track(track)
            .map(|t| t.default_generator())
            .unwrap_or_default();

        let command = InsertEventCommand::new(track, step, Event::new(note, velocity, generator));
        self.history.execute(Box::new(command), &pattern)?;

        tracing::debug!(track, step, note, velocity, "cell edited");
        Ok(())
    }

    fn undo(&mut self) -> Result<(), EditError> {
        if self.mode != Mode::Edit {
            return Ok(());
        }
        let Some(pattern) = self.current_pattern().cloned() else {
            return Ok(());
        };
        let description = self.history.undo(&pattern)?;
        tracing::info!("undo: {}", description);
        Ok(())
    }

    fn redo(&mut self) -> Result<(), EditError> {
        if self.mode != Mode::Edit {
            return Ok(());
        }
        let Some(pattern) = self.current_pattern().cloned() else {
            return Ok(());
        };
        let description = self.history.redo(&pattern)?;
        tracing::info!("redo: {}", description);
        Ok(())
    }

    fn report(&mut self, result: Result<(), EditError>) {
        match result {
            Ok(()) => self.status = None,
            Err(e) => {
                tracing::warn!("edit rejected: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::event::GeneratorRef;
    use crate::sequencer::pattern::{Pattern, Track};
    use crate::sequencer::scheduler::SchedulerError;
    use crate::ui::backend::MemoryGrid;
    use std::cell::Cell;

    /// Playback stand-in recording what the editor asked for
    #[derive(Default)]
    struct FakeTransport {
        playing: Cell<bool>,
        stops: Cell<usize>,
    }

    impl PlaybackControl for FakeTransport {
        fn is_playing(&self) -> bool {
            self.playing.get()
        }

        fn stop(&self) -> bool {
            self.stops.set(self.stops.get() + 1);
            self.playing.replace(false)
        }

        fn toggle_playback(&self) -> Result<Toggle, SchedulerError> {
            if self.playing.get() {
                self.stop();
                Ok(Toggle::StopRequested)
            } else {
                self.playing.set(true);
                Ok(Toggle::Started)
            }
        }
    }

    fn editor() -> GridEditor {
        let table: PatternTable = [
            Pattern::new(vec![
                Track::from_notes(GeneratorRef::Audio(0), 100, &[1, 2, 3]),
                Track::from_notes(GeneratorRef::Mock, 100, &[4]),
            ]),
            Pattern::new(vec![Track::from_notes(GeneratorRef::Mock, 100, &[5])]),
        ]
        .into_iter()
        .collect();
        GridEditor::new(table)
    }

    fn type_text(editor: &mut GridEditor, text: &str, control: &dyn PlaybackControl) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            editor.handle_key(key, control);
        }
    }

    fn cell(editor: &GridEditor, track: usize, step: usize) -> Option<Event> {
        editor
            .current_pattern()
            .and_then(|p| p.read().track(track).and_then(|t| t.get(step)).copied())
    }

    #[test]
    fn test_toggle_edit_stops_playback() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        transport.playing.set(true);

        editor.handle_key(Key::Char('e'), &transport);
        assert_eq!(editor.mode(), Mode::Edit);
        assert!(!transport.is_playing());
        assert_eq!(transport.stops.get(), 1);

        editor.handle_key(Key::Char('e'), &transport);
        assert_eq!(editor.mode(), Mode::Navigate);
    }

    #[test]
    fn test_toggle_play_forces_navigate() {
        let mut editor = editor();
        let transport = FakeTransport::default();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Enter, &transport);
        assert!(editor.line_input().is_some());

        // 'p' is text while the edit box is open
        editor.handle_key(Key::Esc, &transport);
        editor.handle_key(Key::Char('p'), &transport);
        assert_eq!(editor.mode(), Mode::Navigate);
        assert!(transport.is_playing());
    }

    #[test]
    fn test_moves_ignored_in_navigate() {
        let mut editor = editor();
        let transport = FakeTransport::default();

        editor.handle_key(Key::Down, &transport);
        assert_eq!(editor.cursor(), (0, 0));
    }

    #[test]
    fn test_cursor_clamped_to_pattern() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        editor.handle_key(Key::Char('e'), &transport);

        editor.handle_key(Key::Up, &transport);
        editor.handle_key(Key::Left, &transport);
        assert_eq!(editor.cursor(), (0, 0));

        for _ in 0..5 {
            editor.handle_key(Key::Down, &transport);
            editor.handle_key(Key::Right, &transport);
        }
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn test_cell_edit_flow() {
        let mut editor = editor();
        let transport = FakeTransport::default();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Right, &transport);
        editor.handle_key(Key::Down, &transport);
        editor.handle_key(Key::Down, &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "64  90", &transport);
        editor.handle_key(Key::Enter, &transport);

        // Track 1 was one step long: padded, then the new event appended
        assert_eq!(cell(&editor, 1, 1), Some(Event::rest()));
        assert_eq!(cell(&editor, 1, 2), Some(Event::new(64, 90, GeneratorRef::Mock)));
        assert_eq!(editor.mode(), Mode::Edit);
        assert!(editor.line_input().is_none());
        assert!(editor.status().is_none());
    }

    #[test]
    fn test_overwrite_keeps_generator() {
        let mut editor = editor();
        let transport = FakeTransport::default();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "70 1", &transport);
        editor.handle_key(Key::Enter, &transport);

        assert_eq!(cell(&editor, 0, 0), Some(Event::new(70, 1, GeneratorRef::Audio(0))));
    }

    #[test]
    fn test_invalid_input_keeps_pattern() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        let before = editor.current_pattern().unwrap().snapshot();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "sixty 1", &transport);
        editor.handle_key(Key::Enter, &transport);

        assert_eq!(editor.current_pattern().unwrap().snapshot(), before);
        assert_eq!(editor.mode(), Mode::Edit);
        assert!(editor.status().unwrap().contains("sixty"));
    }

    #[test]
    fn test_cancel_discards_input() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        let before = editor.current_pattern().unwrap().snapshot();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "1 1", &transport);
        editor.handle_key(Key::Backspace, &transport);
        assert_eq!(editor.line_input(), Some("1 "));
        editor.handle_key(Key::Esc, &transport);

        assert!(editor.line_input().is_none());
        assert_eq!(editor.mode(), Mode::Edit);
        assert_eq!(editor.current_pattern().unwrap().snapshot(), before);
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        let before = editor.current_pattern().unwrap().snapshot();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "9 9", &transport);
        editor.handle_key(Key::Enter, &transport);
        let after = editor.current_pattern().unwrap().snapshot();

        editor.handle_key(Key::Char('u'), &transport);
        assert_eq!(editor.current_pattern().unwrap().snapshot(), before);

        editor.handle_key(Key::Char('r'), &transport);
        assert_eq!(editor.current_pattern().unwrap().snapshot(), after);

        editor.handle_key(Key::Char('r'), &transport);
        assert_eq!(editor.status(), Some("Nothing to redo"));
    }

    #[test]
    fn test_playback_follows_patterns() {
        let mut editor = editor();
        let transport = FakeTransport::default();

        editor.on_playback(PlaybackEvent::LineAdvanced { pattern: 0, line: 2 });
        assert_eq!(editor.playing_row(), Some(2));

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Down, &transport);
        editor.handle_key(Key::Right, &transport);
        editor.handle_key(Key::Char('e'), &transport);

        editor.on_playback(PlaybackEvent::LineAdvanced { pattern: 1, line: 0 });
        assert_eq!(editor.shown_index(), 1);
        // Second pattern has a single cell
        assert_eq!(editor.cursor(), (0, 0));

        editor.on_playback(PlaybackEvent::Finished);
        assert_eq!(editor.playing_row(), None);
    }

    #[test]
    fn test_stale_line_advance_ignored_while_editing() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        transport.playing.set(true);

        editor.handle_key(Key::Char('e'), &transport);
        assert!(!transport.is_playing());
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "9 9", &transport);
        editor.handle_key(Key::Enter, &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "1", &transport);

        // Queued behind the key that stopped playback
        editor.on_playback(PlaybackEvent::LineAdvanced { pattern: 1, line: 0 });

        assert_eq!(editor.shown_index(), 0);
        assert_eq!(editor.playing_row(), None);
        assert_eq!(editor.line_input(), Some("1"));
        assert!(editor.history().can_undo());

        editor.on_playback(PlaybackEvent::Stopped);
        assert_eq!(editor.mode(), Mode::Edit);
    }

    #[test]
    fn test_exit_from_any_mode() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        assert_eq!(editor.handle_key(Key::Esc, &transport), Outcome::Exit);

        editor.handle_key(Key::Char('e'), &transport);
        assert_eq!(editor.handle_key(Key::Esc, &transport), Outcome::Exit);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        assert_eq!(editor.handle_key(Key::Char('z'), &transport), Outcome::Ignored);
    }

    #[test]
    fn test_empty_table_renders_and_reports() {
        let mut editor = GridEditor::new(PatternTable::default());
        let transport = FakeTransport::default();
        let mut grid = MemoryGrid::new();

        editor.handle_key(Key::Char('e'), &transport);
        editor.handle_key(Key::Down, &transport);
        editor.handle_key(Key::Enter, &transport);
        type_text(&mut editor, "1 1", &transport);
        editor.handle_key(Key::Enter, &transport);

        assert_eq!(editor.status(), Some("No pattern loaded"));
        editor.render(&mut grid).unwrap();
        assert!(grid.contains("EDIT MODE"));
    }

    #[test]
    fn test_render_highlights_cursor() {
        let mut editor = editor();
        let transport = FakeTransport::default();
        let mut grid = MemoryGrid::new();

        editor.handle_key(Key::Char('e'), &transport);
        editor.render(&mut grid).unwrap();

        use crate::ui::backend::Color;
        use crate::ui::render::{note_x, row_y};
        assert_eq!(grid.style_at(note_x(0).unwrap(), row_y(0).unwrap()).bg, Color::Yellow);
    }
}
