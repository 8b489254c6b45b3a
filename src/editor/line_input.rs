// Line input - Text typed into the cell edit box

use crate::editor::error::EditError;

/// Highest note number or velocity a cell accepts
pub const MAX_CELL_VALUE: u8 = 127;

/// Buffer for the edit box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    /// Remove the last character, if any
    pub fn erase(&mut self) {
        self.text.pop();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the buffer as a cell value
    pub fn parse(&self) -> Result<(u8, u8), EditError> {
        parse_cell(&self.text)
    }
}

/// Parse "NoteNumber Velocity"
///
/// Exactly two whitespace-separated integers, each in 0..=127.
pub fn parse_cell(input: &str) -> Result<(u8, u8), EditError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [note, velocity] = tokens.as_slice() else {
        return Err(EditError::Validation(format!(
            "Expected 'NoteNumber Velocity', got '{}'",
            input.trim()
        )));
    };

    Ok((parse_value(note, input)?, parse_value(velocity, input)?))
}

fn parse_value(token: &str, input: &str) -> Result<u8, EditError> {
    let value: u32 = token.parse().map_err(|_| {
        EditError::Validation(format!(
            "Could not use value '{}' from input '{}'",
            token,
            input.trim()
        ))
    })?;

    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_CELL_VALUE)
        .ok_or_else(|| {
            EditError::Validation(format!("Value {} out of range 0-{}", value, MAX_CELL_VALUE))
        })
}
