//! Cursor handling for the text fields of the TUI.
//!
//! The value itself lives in the application state; this only tracks where
//! the cursor sits and computes the edited value for a key press.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextInput {
    /// Position in chars, not bytes.
    cursor: usize,
    multiline: bool,
}

impl TextInput {
    pub fn single_line() -> Self {
        TextInput {
            cursor: 0,
            multiline: false,
        }
    }

    pub fn multi_line() -> Self {
        TextInput {
            cursor: 0,
            multiline: true,
        }
    }

    /// Cursor clamped to `value`, which may have been reset elsewhere.
    pub fn cursor(&self, value: &str) -> usize {
        self.cursor.min(value.chars().count())
    }

    pub fn move_to_end(&mut self, value: &str) {
        self.cursor = value.chars().count();
    }

    /// Applies `key` and returns the new value when the text changed.
    pub fn handle(&mut self, value: &str, key: KeyEvent) -> Option<String> {
        let mut chars: Vec<char> = value.chars().collect();
        let mut cursor = self.cursor(value);
        let mut changed = false;

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                chars.insert(cursor, c);
                cursor += 1;
                changed = true;
            }
            KeyCode::Enter if self.multiline => {
                chars.insert(cursor, '\n');
                cursor += 1;
                changed = true;
            }
            KeyCode::Backspace if cursor > 0 => {
                chars.remove(cursor - 1);
                cursor -= 1;
                changed = true;
            }
            KeyCode::Delete if cursor < chars.len() => {
                chars.remove(cursor);
                changed = true;
            }
            KeyCode::Left => cursor = cursor.saturating_sub(1),
            KeyCode::Right => cursor = (cursor + 1).min(chars.len()),
            KeyCode::Home => cursor = line_start(&chars, cursor),
            KeyCode::End => cursor = line_end(&chars, cursor),
            KeyCode::Up if self.multiline => {
                let start = line_start(&chars, cursor);
                if start > 0 {
                    let column = cursor - start;
                    let prev_start = line_start(&chars, start - 1);
                    let prev_len = start - 1 - prev_start;
                    cursor = prev_start + column.min(prev_len);
                }
            }
            KeyCode::Down if self.multiline => {
                let end = line_end(&chars, cursor);
                if end < chars.len() {
                    let column = cursor - line_start(&chars, cursor);
                    let next_start = end + 1;
                    let next_len = line_end(&chars, next_start) - next_start;
                    cursor = next_start + column.min(next_len);
                }
            }
            _ => {}
        }

        self.cursor = cursor;
        changed.then(|| chars.into_iter().collect())
    }

    /// Terminal column and row of the cursor inside `value`.
    pub fn screen_position(&self, value: &str) -> (u16, u16) {
        let byte = byte_index(value, self.cursor(value));
        let before = &value[..byte];
        let row = before.matches('\n').count();
        let line = before.rsplit('\n').next().unwrap_or("");
        (
            u16::try_from(line.width()).unwrap_or(u16::MAX),
            u16::try_from(row).unwrap_or(u16::MAX),
        )
    }
}

fn line_start(chars: &[char], cursor: usize) -> usize {
    chars[..cursor]
        .iter()
        .rposition(|c| *c == '\n')
        .map_or(0, |i| i + 1)
}

fn line_end(chars: &[char], cursor: usize) -> usize {
    chars[cursor..]
        .iter()
        .position(|c| *c == '\n')
        .map_or(chars.len(), |i| cursor + i)
}

fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or(value.len(), |(i, _)| i)
}
