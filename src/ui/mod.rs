// Module UI - Character grid rendering and key input

pub mod backend;
pub mod render;
pub mod terminal;

pub use backend::{CellStyle, Color, GridBackend, Key, KeySource, MemoryGrid, ScriptedKeys};
pub use render::{GridView, render};
pub use terminal::{CrosstermKeys, TerminalGrid};
