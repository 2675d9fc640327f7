//! Template tokenizer.
//!
//! Splits a template such as `{_}/hoge{num1}/fuga{name}piyo_{month}.csv`
//! into bracketed placeholders, splitter characters and the literal runs
//! between them. Literal runs become unused slots: the path has to contain
//! them, but they never produce a value.

use crate::error::{CompileError, Result};

/// Placeholder name that marks an ignored span.
pub const IGNORE_MARKER: &str = "_";

/// Placeholder name that stands in for an unbracketed literal run.
pub const UNUSED_MARKER: &str = "[UnuseToken]";

/// Returns `true` for characters that may delimit values in a path.
///
/// Splitters are the ASCII punctuation ranges `!-/`, `:-@`, `[-\``, `{-~`.
pub fn is_splitter_char(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Text between `{` and `}`.
    Placeholder(&'a str),
    /// A run of non-splitter characters outside braces.
    Literal(&'a str),
    /// A single splitter character outside braces.
    Splitter(char),
}

/// Tokenizer for path templates.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    separator: char,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, separator: char) -> Self {
        Self {
            input,
            pos: 0,
            separator,
        }
    }

    /// The separator splits like punctuation even when it is not ASCII.
    fn is_splitter(&self, c: char) -> bool {
        c == self.separator || is_splitter_char(c)
    }

    fn unbalanced(&mut self, position: usize) -> CompileError {
        self.pos = self.input.len();
        CompileError::UnbalancedBraces {
            template: self.input.to_string(),
            position,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let remaining = &self.input[start..];
        let first = remaining.chars().next()?;

        match first {
            '{' => {
                let body = &remaining[1..];
                match body.find(['{', '}']) {
                    Some(end) if body[end..].starts_with('}') => {
                        if end == 0 {
                            self.pos = self.input.len();
                            return Some(Err(CompileError::EmptyPlaceholder {
                                template: self.input.to_string(),
                                position: start,
                            }));
                        }
                        self.pos += end + 2;
                        Some(Ok(Token::Placeholder(&body[..end])))
                    }
                    _ => Some(Err(self.unbalanced(start))),
                }
            }
            '}' => Some(Err(self.unbalanced(start))),
            c if self.is_splitter(c) => {
                self.pos += c.len_utf8();
                Some(Ok(Token::Splitter(c)))
            }
            _ => {
                let end = remaining
                    .find(|c| self.is_splitter(c))
                    .unwrap_or(remaining.len());
                self.pos += end;
                Some(Ok(Token::Literal(&remaining[..end])))
            }
        }
    }
}

/// One value position in a template, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    /// A bracketed span; holds the text between the braces.
    Bracketed(String),
    /// A literal run that was not bracketed.
    Unused(String),
}

/// The result of scanning a template.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScannedTemplate {
    /// Value positions in appearance order.
    pub slots: Vec<Slot>,
    /// Distinct splitter characters found outside braces, first seen first.
    pub splitters: Vec<char>,
    /// Distinct unused literal runs, first seen first.
    pub unused: Vec<String>,
    /// The template with literal runs wrapped as unused placeholders and a
    /// separator between every pair of adjacent placeholders.
    pub rewritten: String,
}

/// Scans a template into slots, splitters and unused literals.
pub(crate) fn scan(template: &str, separator: char) -> Result<ScannedTemplate> {
    let mut scanned = ScannedTemplate::default();
    let mut previous_closed = false;

    for token in Tokenizer::new(template, separator) {
        match token? {
            Token::Placeholder(name) => {
                scanned.open_slot(separator, previous_closed);
                scanned.rewritten.push_str(name);
                scanned.rewritten.push('}');
                scanned.slots.push(Slot::Bracketed(name.to_string()));
                previous_closed = true;
            }
            Token::Literal(text) => {
                scanned.open_slot(separator, previous_closed);
                scanned.rewritten.push_str(UNUSED_MARKER);
                scanned.rewritten.push('}');
                scanned.slots.push(Slot::Unused(text.to_string()));
                if !scanned.unused.iter().any(|u| u == text) {
                    scanned.unused.push(text.to_string());
                }
                previous_closed = true;
            }
            Token::Splitter(c) => {
                scanned.rewritten.push(c);
                if !scanned.splitters.contains(&c) {
                    scanned.splitters.push(c);
                }
                previous_closed = false;
            }
        }
    }

    Ok(scanned)
}

impl ScannedTemplate {
    fn open_slot(&mut self, separator: char, previous_closed: bool) {
        if previous_closed {
            self.rewritten.push(separator);
        }
        self.rewritten.push('{');
    }
}
