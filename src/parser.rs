// src/parser.rs

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidSyntax(String),
}

/// Character cursor over a borrowed string.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn take_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if pred(c) {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        &self.s[start..self.i]
    }

    /// Everything up to (not including) `end`, which must be present.
    pub fn capture_until(&mut self, end: char) -> Result<&'a str, ParseError> {
        let start = self.i;
        let captured = self.take_while(|c| c != end);
        if self.peek_char() != Some(end) {
            self.i = start;
            return Err(ParseError::InvalidSyntax(format!("expected '{end}'")));
        }
        Ok(captured)
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
