// Terminal backend - ratatui grid and crossterm key polling

use crate::ui::backend::{CellStyle, Color, GridBackend, Key, KeySource};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color as TermColor, Style};
use std::io;

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Blue => TermColor::Blue,
        Color::Green => TermColor::Green,
        Color::Red => TermColor::Red,
        Color::Yellow => TermColor::Yellow,
    }
}

/// Full-screen character grid on the controlling terminal
///
/// Cells are written into an off-screen buffer and copied to the terminal
/// on `flush`. The terminal is restored when the grid is dropped.
pub struct TerminalGrid {
    terminal: DefaultTerminal,
    buffer: Buffer,
}

impl TerminalGrid {
    /// Enter raw mode and the alternate screen
    pub fn init() -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        let size = match terminal.size() {
            Ok(size) => size,
            Err(e) => {
                ratatui::restore();
                return Err(e);
            }
        };

        Ok(Self {
            terminal,
            buffer: Buffer::empty(Rect::new(0, 0, size.width, size.height)),
        })
    }
}

impl GridBackend for TerminalGrid {
    fn clear(&mut self) {
        self.buffer.reset();
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if let Some(cell) = self.buffer.cell_mut((x, y)) {
            cell.set_char(ch)
                .set_style(Style::default().fg(term_color(style.fg)).bg(term_color(style.bg)));
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let buffer = &mut self.buffer;
        self.terminal.draw(|frame| {
            let area = frame.area();
            // Follow terminal resizes; content is redrawn on the next render
            if buffer.area != area {
                buffer.resize(area);
            }
            frame.buffer_mut().merge(buffer);
        })?;
        Ok(())
    }
}

impl Drop for TerminalGrid {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Blocking key reader on the terminal's event stream
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl CrosstermKeys {
    pub fn new() -> Self {
        Self
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    })
}

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        match event::read()? {
            // Ignore release/repeat events on platforms that report them
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key.code)),
            _ => Ok(None),
        }
    }
}
