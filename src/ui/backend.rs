// Character grid backend abstraction
//
// The renderer only needs to place styled characters, clear and flush.
// Key polling is a separate capability so it can live on its own thread.

use std::collections::HashMap;
use std::io;

/// Colors the grid uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Blue,
    Green,
    Red,
    Yellow,
}

/// Foreground and background of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
}

impl CellStyle {
    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Default,
        }
    }

    /// Same foreground, different background
    pub const fn on(self, bg: Color) -> Self {
        Self { fg: self.fg, bg }
    }
}

/// Discrete key presses delivered by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Space,
    Backspace,
    Delete,
    Char(char),
}

/// Something that can display a grid of styled characters
pub trait GridBackend {
    /// Blank the whole grid
    fn clear(&mut self);

    /// Place a character; coordinates outside the grid are ignored
    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle);

    /// Make buffered changes visible
    fn flush(&mut self) -> io::Result<()>;

    /// Write a string starting at (x, y), one cell per char, clipped at the last column
    fn put_str(&mut self, x: u16, y: u16, text: &str, style: CellStyle) {
        for (i, ch) in text.chars().enumerate() {
            let Some(col) = u16::try_from(i).ok().and_then(|i| x.checked_add(i)) else {
                break;
            };
            self.set_cell(col, y, ch, style);
        }
    }
}

/// Blocking source of key presses
pub trait KeySource: Send {
    /// Wait for the next key; `Ok(None)` for input that is not a recognised key
    fn next_key(&mut self) -> io::Result<Option<Key>>;
}

/// In-memory grid, used for headless rendering and tests
#[derive(Debug, Default)]
pub struct MemoryGrid {
    cells: HashMap<(u16, u16), (char, CellStyle)>,
    flushes: usize,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<(char, CellStyle)> {
        self.cells.get(&(x, y)).copied()
    }

    pub fn style_at(&self, x: u16, y: u16) -> CellStyle {
        self.cell(x, y).map(|(_, style)| style).unwrap_or_default()
    }

    /// Text of a row with unset cells as spaces, trailing spaces trimmed
    pub fn row_text(&self, y: u16) -> String {
        let width = self
            .cells
            .keys()
            .filter(|(_, row)| *row == y)
            .map(|(x, _)| usize::from(*x) + 1)
            .max()
            .unwrap_or(0);

        let text: String = (0..width)
            .map(|x| {
                u16::try_from(x)
                    .ok()
                    .and_then(|x| self.cell(x, y))
                    .map_or(' ', |(ch, _)| ch)
            })
            .collect();
        text.trim_end().to_string()
    }

    /// True if any row contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        let rows: std::collections::BTreeSet<u16> = self.cells.keys().map(|(_, y)| *y).collect();
        rows.into_iter().any(|y| self.row_text(y).contains(needle))
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl GridBackend for MemoryGrid {
    fn clear(&mut self) {
        self.cells.clear();
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.cells.insert((x, y), (ch, style));
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Key source replaying a fixed script, then reporting end of input
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: std::collections::VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        self.keys
            .pop_front()
            .map(Some)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
