/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Error structs used by the library

use std::{fmt, result};

use num::Num;

/// Our custom result type
pub type Result<T> = result::Result<T, Error>;

/// Our custom compound error type
pub type Error = Box<ErrorTrait>;

pub use std::error::Error as ErrorTrait;

/// A malformed token or an unterminated `@`-string.
///
/// The offset is a byte position into the input; for an unterminated string
/// it is the position of the opening `@`.
#[derive(PartialEq, Eq, Debug)]
pub struct LexError {
    msg: &'static str,
    offset: usize,
}

impl LexError {
    /// Create a lexing error at the given byte offset
    pub fn new(msg: &'static str, offset: usize) -> LexError {
        LexError { msg: msg, offset: offset }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(msg: &'static str, offset: usize) -> Result<T> {
        Err(Box::new(LexError::new(msg, offset)))
    }
    /// Byte offset of the offending input
    pub fn offset(&self) -> usize { self.offset }
}
impl ErrorTrait for LexError {
    fn description(&self) -> &str { self.msg }
}
impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "lex error at offset {}: {}", self.offset, self.msg)
    }
}

/// A violation of the `rcsfile(5)` grammar.
#[derive(PartialEq, Eq, Debug)]
pub struct ParseError {
    expected: &'static str,
    offset: usize,
}

impl ParseError {
    /// Create a parse error: `expected` names what the grammar required
    pub fn new(expected: &'static str, offset: usize) -> ParseError {
        ParseError { expected: expected, offset: offset }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(expected: &'static str, offset: usize) -> Result<T> {
        Err(Box::new(ParseError::new(expected, offset)))
    }
    /// Byte offset at which parsing failed
    pub fn offset(&self) -> usize { self.offset }
    /// What the grammar required at that point
    pub fn expected(&self) -> &'static str { self.expected }
}
impl ErrorTrait for ParseError {
    fn description(&self) -> &str { "parse error" }
}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "parse error at offset {}: expected {}", self.offset, self.expected)
    }
}

/// A revision-number shape mismatch or malformed dotted numeral.
#[derive(PartialEq, Eq, Debug)]
pub struct InvalidNum {
    msg: &'static str,
}

impl InvalidNum {
    /// Create an "invalid revision number" error
    pub fn new(msg: &'static str) -> InvalidNum {
        InvalidNum { msg: msg }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(msg: &'static str) -> Result<T> {
        Err(Box::new(InvalidNum::new(msg)))
    }
}
impl ErrorTrait for InvalidNum {
    fn description(&self) -> &str { self.msg }
}
impl fmt::Display for InvalidNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid revision number: {}", self.msg)
    }
}

/// A reference to a revision absent from the delta store.
#[derive(PartialEq, Eq, Debug)]
pub struct UnknownRevision {
    num: Num,
}

impl UnknownRevision {
    /// Create an "unknown revision" error
    pub fn new(num: Num) -> UnknownRevision {
        UnknownRevision { num: num }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(num: Num) -> Result<T> {
        Err(Box::new(UnknownRevision::new(num)))
    }
    /// The revision that could not be found
    pub fn num(&self) -> &Num { &self.num }
}
impl ErrorTrait for UnknownRevision {
    fn description(&self) -> &str { "revision not found" }
}
impl fmt::Display for UnknownRevision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "revision {} not found", self.num)
    }
}

/// An attempt to add a delta under a revision number already present.
#[derive(PartialEq, Eq, Debug)]
pub struct DuplicateRevision {
    num: Num,
}

impl DuplicateRevision {
    /// Create a "duplicate revision" error
    pub fn new(num: Num) -> DuplicateRevision {
        DuplicateRevision { num: num }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(num: Num) -> Result<T> {
        Err(Box::new(DuplicateRevision::new(num)))
    }
    /// The revision that was already present
    pub fn num(&self) -> &Num { &self.num }
}
impl ErrorTrait for DuplicateRevision {
    fn description(&self) -> &str { "revision already present" }
}
impl fmt::Display for DuplicateRevision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "revision {} already present", self.num)
    }
}

/// An ed-script command that cannot be parsed or applied.
#[derive(PartialEq, Eq, Debug)]
pub struct MalformedDiff {
    msg: &'static str,
    line: usize,
}

impl MalformedDiff {
    /// Create an ed-script error; `line` is the 1-based script line
    pub fn new(msg: &'static str, line: usize) -> MalformedDiff {
        MalformedDiff { msg: msg, line: line }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(msg: &'static str, line: usize) -> Result<T> {
        Err(Box::new(MalformedDiff::new(msg, line)))
    }
    /// Script line (1-based) of the offending command
    pub fn line(&self) -> usize { self.line }
}
impl ErrorTrait for MalformedDiff {
    fn description(&self) -> &str { self.msg }
}
impl fmt::Display for MalformedDiff {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed diff at script line {}: {}", self.line, self.msg)
    }
}

/// A mutation refused because it would break a file invariant.
#[derive(PartialEq, Eq, Debug)]
pub struct InvariantViolation {
    field: &'static str,
    msg: &'static str,
}

impl InvariantViolation {
    /// Create an "invariant violation" error for the named field
    pub fn new(field: &'static str, msg: &'static str) -> InvariantViolation {
        InvariantViolation { field: field, msg: msg }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(field: &'static str, msg: &'static str) -> Result<T> {
        Err(Box::new(InvariantViolation::new(field, msg)))
    }
    /// The field whose invariant would have been broken
    pub fn field(&self) -> &'static str { self.field }
}
impl ErrorTrait for InvariantViolation {
    fn description(&self) -> &str { self.msg }
}
impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invariant on {} violated: {}", self.field, self.msg)
    }
}

/// Any error where an invalid argument was supplied
#[derive(PartialEq, Eq, Debug)]
pub struct ArgError {
    msg: &'static str,
}

impl ArgError {
    /// Create an "invalid argument" error
    pub fn new(msg: &'static str) -> ArgError {
        ArgError { msg: msg }
    }
    /// New instance, wrapped with `Err`
    pub fn err<T>(msg: &'static str) -> Result<T> {
        Err(Box::new(ArgError::new(msg)))
    }
}
impl ErrorTrait for ArgError {
    fn description(&self) -> &str { self.msg }
}
impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid argument: {}", self.msg)
    }
}
