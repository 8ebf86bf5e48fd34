//! Placeholder token scanning.
//!
//! A token is `{{`, one or more characters other than `}`, then `}}`. The
//! first `}}` after an opener closes it. Text that does not form a token is
//! simply not matched; scanning never fails.

use regex::Regex;
use std::sync::OnceLock;

/// The placeholder token pattern. Group 1 is the name.
pub const TOKEN_PATTERN: &str = r"\{\{([^}]+)\}\}";

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("placeholder pattern is valid"))
}

/// A placeholder occurrence in a block of text.
///
/// `start` and `end` are character (not byte) offsets; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSpan<'a> {
    /// Offset of the first `{`
    pub start: usize,
    /// Offset one past the last `}`
    pub end: usize,
    /// The full token, braces included
    pub token: &'a str,
    /// The name between the braces
    pub name: &'a str,
}

impl PlaceholderSpan<'_> {
    /// Length of the token in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no characters. Spans yielded by [`scan`] never do.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lazy left-to-right iterator over the placeholder spans of a text.
///
/// Cloning the iterator, or calling [`scan`] again, restarts scanning.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = PlaceholderSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = token_regex().captures_at(self.text, self.byte_pos)?;
            let whole = caps.get(0)?;
            let name = caps.get(1)?;

            let start = self.char_pos + self.text[self.byte_pos..whole.start()].chars().count();

            // `{{a{{b}}` would otherwise swallow the inner token into a name
            // containing an opener. Drop this opener and rescan one
            // character later so the innermost token is found instead.
            if name.as_str().contains("{{") {
                self.byte_pos = whole.start() + 1;
                self.char_pos = start + 1;
                continue;
            }

            let end = start + whole.as_str().chars().count();
            self.byte_pos = whole.end();
            self.char_pos = end;

            return Some(PlaceholderSpan {
                start,
                end,
                token: whole.as_str(),
                name: name.as_str(),
            });
        }
    }
}

/// Scan a text for placeholder tokens.
pub fn scan(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        byte_pos: 0,
        char_pos: 0,
    }
}

/// Build the literal token for a placeholder name.
pub fn token_for(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}
