/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The token scanner for RCS source
//!
//! A single left-to-right pass over the input bytes. Token classes per
//! `rcsfile(5)`: `num` (digits and dots), `id` (idchars and dots), `sym`
//! (idchars only), `@`-quoted strings with `@` doubled, and the `:` and `;`
//! separators. Whitespace between tokens is insignificant. `try_*` methods
//! consume a token if it is next and back off otherwise; `expect_*` methods
//! turn absence into a `ParseError` carrying the byte offset.

use error::{Result, LexError, ParseError};

fn is_white(b: u8) -> bool {
    b == b' ' || (b >= 0x08 && b <= 0x0D)
}

fn is_special(b: u8) -> bool {
    b == b'$' || b == b',' || b == b'.' || b == b':' || b == b';' || b == b'@'
}

// "visible" characters per rcsfile(5), minus the specials
fn is_idchar(b: u8) -> bool {
    ((b >= 0x21 && b <= 0x7E) || b >= 0xA0) && !is_special(b)
}

/// The scanner. Cheap to copy, which is how the parser looks ahead.
#[derive(Clone, Copy)]
pub struct Lexer<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a scanner over the given input
    pub fn new(buf: &'a [u8]) -> Lexer<'a> {
        Lexer { buf: buf, pos: 0 }
    }

    /// The current byte offset
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn skip_white(&mut self) {
        while self.pos < self.buf.len() && is_white(self.buf[self.pos]) {
            self.pos += 1;
        }
    }

    /// Skip whitespace and return the offset of the next token
    pub fn token_pos(&mut self) -> usize {
        self.skip_white();
        self.pos
    }

    /// Consume a num if one is next.
    ///
    /// A digit run directly followed by an idchar is the head of an id, not
    /// a num, and is left unconsumed.
    pub fn try_num(&mut self) -> Option<String> {
        self.skip_white();
        let start = self.pos;
        let mut end = start;
        while end < self.buf.len()
            && (self.buf[end].is_ascii_digit() || self.buf[end] == b'.')
        {
            end += 1;
        }
        if end == start {
            return None;
        }
        if end < self.buf.len() && is_idchar(self.buf[end]) {
            return None;
        }
        self.pos = end;
        Some(self.buf[start..end].iter().map(|&b| b as char).collect())
    }

    /// Consume a num or fail
    pub fn expect_num(&mut self) -> Result<String> {
        self.skip_white();
        match self.try_num() {
            Some(n) => Ok(n),
            None => {
                error!("expected <num> at offset {}", self.pos);
                ParseError::err("<num>", self.pos)
            }
        }
    }

    fn scan_word(&mut self, dots: bool) -> Result<Option<String>> {
        self.skip_white();
        let start = self.pos;
        let mut end = start;
        while end < self.buf.len()
            && (is_idchar(self.buf[end]) || (dots && self.buf[end] == b'.'))
        {
            end += 1;
        }
        if end == start {
            return Ok(None);
        }
        self.pos = end;
        match String::from_utf8(self.buf[start..end].to_vec()) {
            Ok(s) => Ok(Some(s)),
            Err(_) => {
                error!("identifier at offset {} is not valid UTF-8", start);
                LexError::err("identifier is not valid UTF-8", start)
            }
        }
    }

    /// Consume an id (idchars and dots) if one is next
    pub fn try_id(&mut self) -> Result<Option<String>> {
        self.scan_word(true)
    }

    /// Consume an id or fail
    pub fn expect_id(&mut self) -> Result<String> {
        self.skip_white();
        match self.try_id()? {
            Some(s) => Ok(s),
            None => {
                error!("expected <id> at offset {}", self.pos);
                ParseError::err("<id>", self.pos)
            }
        }
    }

    /// Consume a sym (idchars, no dots) if one is next
    pub fn try_sym(&mut self) -> Result<Option<String>> {
        self.scan_word(false)
    }

    /// Consume the given keyword if it is next, followed by whitespace, a
    /// special or the end of input (so `head` does not match `headstrong`)
    pub fn try_kw(&mut self, kw: &str) -> bool {
        self.skip_white();
        let k = kw.as_bytes();
        let end = self.pos + k.len();
        if end > self.buf.len() || &self.buf[self.pos..end] != k {
            return false;
        }
        if end < self.buf.len() && !is_white(self.buf[end]) && !is_special(self.buf[end]) {
            return false;
        }
        self.pos = end;
        true
    }

    /// Consume the given keyword or fail
    pub fn expect_kw(&mut self, kw: &'static str) -> Result<()> {
        self.skip_white();
        if self.try_kw(kw) {
            Ok(())
        } else {
            error!("expected '{}' at offset {}", kw, self.pos);
            ParseError::err(kw, self.pos)
        }
    }

    /// Consume an `@`-quoted string if one is next, returning its unescaped
    /// value. An opening `@` with no closing `@` is a hard error reported
    /// at the opening quote.
    pub fn try_string(&mut self) -> Result<Option<String>> {
        self.skip_white();
        if self.pos >= self.buf.len() || self.buf[self.pos] != b'@' {
            return Ok(None);
        }
        let start = self.pos;
        let mut value = Vec::new();
        let mut i = self.pos + 1;
        loop {
            if i >= self.buf.len() {
                error!("unterminated string opened at offset {}", start);
                return LexError::err("unterminated string", start);
            }
            let b = self.buf[i];
            if b == b'@' {
                if i + 1 < self.buf.len() && self.buf[i + 1] == b'@' {
                    value.push(b'@');
                    i += 2;
                } else {
                    i += 1;
                    break;
                }
            } else {
                value.push(b);
                i += 1;
            }
        }
        self.pos = i;
        match String::from_utf8(value) {
            Ok(s) => Ok(Some(s)),
            Err(_) => {
                error!("string at offset {} is not valid UTF-8", start);
                LexError::err("string is not valid UTF-8", start)
            }
        }
    }

    /// Consume a string or fail
    pub fn expect_string(&mut self) -> Result<String> {
        self.skip_white();
        match self.try_string()? {
            Some(s) => Ok(s),
            None => {
                error!("expected <string> at offset {}", self.pos);
                ParseError::err("<string>", self.pos)
            }
        }
    }

    /// Consume a colon if one is next
    pub fn try_colon(&mut self) -> bool {
        self.try_byte(b':')
    }

    /// Consume a colon or fail
    pub fn expect_colon(&mut self) -> Result<()> {
        if self.try_colon() {
            Ok(())
        } else {
            error!("expected ':' at offset {}", self.pos);
            ParseError::err("':'", self.pos)
        }
    }

    /// Consume a semicolon if one is next
    pub fn try_semi(&mut self) -> bool {
        self.try_byte(b';')
    }

    /// Consume a semicolon or fail
    pub fn expect_semi(&mut self) -> Result<()> {
        if self.try_semi() {
            Ok(())
        } else {
            error!("expected ';' at offset {}", self.pos);
            ParseError::err("';'", self.pos)
        }
    }

    fn try_byte(&mut self, b: u8) -> bool {
        self.skip_white();
        if self.pos < self.buf.len() && self.buf[self.pos] == b {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Require that nothing but whitespace remains and that the input ends
    /// with a newline, as the file format demands
    pub fn expect_final_newline(&mut self) -> Result<()> {
        self.skip_white();
        if self.pos != self.buf.len() {
            error!("trailing content at offset {}", self.pos);
            return ParseError::err("end of file", self.pos);
        }
        if self.buf.last() != Some(&b'\n') {
            error!("input does not end with a newline");
            return ParseError::err("file to end with a newline", self.buf.len());
        }
        Ok(())
    }
}

#[test]
fn tokens() {
    let mut lex = Lexer::new(b"head 1.2 ;\n sym-bol : @a@@b@");
    assert!(lex.try_kw("head"));
    assert_eq!(lex.try_num(), Some("1.2".to_string()));
    assert!(lex.expect_semi().is_ok());
    assert_eq!(lex.try_sym().unwrap(), Some("sym-bol".to_string()));
    assert!(lex.expect_colon().is_ok());
    assert_eq!(lex.expect_string().unwrap(), "a@b");
    assert!(lex.try_num().is_none());
}

#[test]
fn digit_runs_may_head_identifiers() {
    // "2fast" is an id, not the num 2 followed by junk
    let mut lex = Lexer::new(b"2fast");
    assert!(lex.try_num().is_none());
    assert_eq!(lex.try_id().unwrap(), Some("2fast".to_string()));

    // keywords do not match prefixes of longer words
    let mut lex = Lexer::new(b"headstrong");
    assert!(!lex.try_kw("head"));
    assert_eq!(lex.try_id().unwrap(), Some("headstrong".to_string()));
}

#[test]
fn strings_span_lines() {
    let mut lex = Lexer::new(b"@one\ntwo@@three\n@ tail");
    assert_eq!(lex.expect_string().unwrap(), "one\ntwo@three\n");
    assert_eq!(lex.try_id().unwrap(), Some("tail".to_string()));
}

#[test]
fn unterminated_string_reports_opening_quote() {
    let mut lex = Lexer::new(b"  @never closed");
    let err = lex.try_string().unwrap_err();
    let err = err.downcast_ref::<LexError>().unwrap();
    assert_eq!(err.offset(), 2);
}

#[test]
fn final_newline_required() {
    let mut lex = Lexer::new(b"x\n");
    assert_eq!(lex.try_id().unwrap(), Some("x".to_string()));
    assert!(lex.expect_final_newline().is_ok());

    let mut lex = Lexer::new(b"x");
    assert_eq!(lex.try_id().unwrap(), Some("x".to_string()));
    assert!(lex.expect_final_newline().is_err());
}
