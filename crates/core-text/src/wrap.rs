//! Greedy word wrap producing display lines lazily.
//!
//! Contract:
//! - Input is split on `\n` first; each piece is a paragraph. A trailing
//!   `\r` on a paragraph is ignored.
//! - Words (whitespace separated) are packed greedily: the next word joins
//!   the current line with a single space unless the measured candidate is
//!   wider than `max_width` *and* the line already holds a word, in which
//!   case the line is flushed and the word starts the next one.
//! - A single word wider than `max_width` is emitted on its own line,
//!   overflowing. Words are never split.
//! - Every paragraph yields at least one line, so blank lines survive.
//!
//! Invariants:
//! - No hidden state: the iterator depends only on `(text, max_width,
//!   measure)`, so calling [`wrap`] again replays the identical sequence.
//! - Lines never start or end with whitespace.

use crate::width::Measure;
use std::iter::Peekable;
use std::str::{Split, SplitWhitespace};

/// Lazy sequence of wrapped lines. Created by [`wrap`].
#[derive(Debug, Clone)]
pub struct WrapLines<'a, M> {
    paragraphs: Split<'a, char>,
    words: Option<Peekable<SplitWhitespace<'a>>>,
    emitted_in_paragraph: bool,
    max_width: f32,
    measure: M,
}

/// Wrap `text` to `max_width` using `measure` for widths.
pub fn wrap<M: Measure>(text: &str, max_width: f32, measure: M) -> WrapLines<'_, M> {
    WrapLines {
        paragraphs: text.split('\n'),
        words: None,
        emitted_in_paragraph: false,
        max_width,
        measure,
    }
}

/// Eager convenience over [`wrap`].
pub fn wrap_lines<M: Measure>(text: &str, max_width: f32, measure: M) -> Vec<String> {
    wrap(text, max_width, measure).collect()
}

impl<M: Measure> WrapLines<'_, M> {
    fn fits(&self, line: &str, word: &str) -> bool {
        let mut candidate = String::with_capacity(line.len() + 1 + word.len());
        candidate.push_str(line);
        candidate.push(' ');
        candidate.push_str(word);
        self.measure.measure(&candidate) <= self.max_width
    }
}

impl<M: Measure> Iterator for WrapLines<'_, M> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let Some(mut words) = self.words.take() else {
                let paragraph = self.paragraphs.next()?;
                let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
                self.words = Some(paragraph.split_whitespace().peekable());
                self.emitted_in_paragraph = false;
                continue;
            };

            let mut line = String::new();
            while let Some(&word) = words.peek() {
                if !line.is_empty() {
                    if !self.fits(&line, word) {
                        break;
                    }
                    line.push(' ');
                }
                line.push_str(word);
                words.next();
            }

            if line.is_empty() {
                // Paragraph exhausted; blank paragraphs still produce one line.
                if self.emitted_in_paragraph {
                    continue;
                }
                self.emitted_in_paragraph = true;
                return Some(line);
            }

            self.emitted_in_paragraph = true;
            self.words = Some(words);
            return Some(line);
        }
    }
}
