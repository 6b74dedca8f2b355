/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Revision numbers and their arithmetic
//!
//! An RCS revision number is a dotted sequence of decimal components, e.g.
//! `1.2` (a trunk revision) or `1.2.1.4` (a branch revision). An even number
//! of components names a revision, an odd number names a branch (`1.2.1` is
//! the first branch off `1.2`). The empty sequence is the "absent" marker
//! used for the `next` field of the trunk tail and for an unborn head.

use std::fmt;
use std::str::FromStr;

use error::{Error, Result, InvalidNum};

/// A dotted revision number, branch identifier or additive offset.
///
/// Ordering is lexicographic by component, so `1.9 < 1.10` and a number
/// sorts before any of its extensions.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Num {
    parts: Vec<u32>,
}

impl Num {
    /// The absent marker (no components)
    pub fn absent() -> Num {
        Num { parts: Vec::new() }
    }

    /// True for the absent marker
    pub fn is_absent(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// The components as a slice
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    /// True if this names a revision (even, non-zero component count)
    pub fn is_revision(&self) -> bool {
        !self.parts.is_empty() && self.parts.len() % 2 == 0
    }

    /// True if this names a branch (odd component count)
    pub fn is_branch(&self) -> bool {
        self.parts.len() % 2 == 1
    }

    /// The first `n` components as a new number
    pub fn prefix(&self, n: usize) -> Num {
        Num { parts: self.parts[0..n].to_vec() }
    }

    /// True if `other`'s components are a prefix of this number's
    pub fn starts_with(&self, other: &Num) -> bool {
        self.parts.len() >= other.parts.len()
            && self.parts[0..other.parts.len()] == other.parts[..]
    }

    /// Add `delta` to this number, component by component from the left.
    ///
    /// Components beyond `delta`'s length are copied through, so adding
    /// `0.1` to `1.4.2.3` gives `1.5.2.3`. `delta` must not have more
    /// components than `self`. The absent marker is returned unchanged.
    pub fn increment(&self, delta: &Num) -> Result<Num> {
        if self.is_absent() {
            return Ok(Num::absent());
        }
        if delta.parts.len() > self.parts.len() {
            return InvalidNum::err("offset has more components than the number");
        }
        let mut parts = self.parts.clone();
        for (i, d) in delta.parts.iter().enumerate() {
            parts[i] = match parts[i].checked_add(*d) {
                Some(v) => v,
                None => return InvalidNum::err("component overflow"),
            };
        }
        Ok(Num { parts: parts })
    }

    /// Subtract `delta` from this number, component by component from the
    /// left, producing the additive offset between two numbers on the same
    /// branch. Result components may be zero. Fails on component underflow
    /// or when `delta` has more components than `self`. The absent marker
    /// is returned unchanged.
    pub fn decrement(&self, delta: &Num) -> Result<Num> {
        if self.is_absent() {
            return Ok(Num::absent());
        }
        if delta.parts.len() > self.parts.len() {
            return InvalidNum::err("offset has more components than the number");
        }
        let mut parts = self.parts.clone();
        for (i, d) in delta.parts.iter().enumerate() {
            parts[i] = match parts[i].checked_sub(*d) {
                Some(v) => v,
                None => return InvalidNum::err("component underflow"),
            };
        }
        Ok(Num { parts: parts })
    }

    fn fmt_to(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, p) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

impl FromStr for Num {
    type Err = Error;

    /// Parse a dotted numeral. Leading zeros on a component are accepted
    /// (they never survive re-emission); an empty string or an empty
    /// component is an error.
    fn from_str(s: &str) -> Result<Num> {
        if s.is_empty() {
            return InvalidNum::err("empty numeral");
        }
        let mut parts = Vec::new();
        for comp in s.split('.') {
            if comp.is_empty() {
                return InvalidNum::err("empty component");
            }
            if !comp.bytes().all(|b| b >= b'0' && b <= b'9') {
                return InvalidNum::err("component is not a decimal integer");
            }
            match comp.parse::<u32>() {
                Ok(v) => parts.push(v),
                Err(_) => return InvalidNum::err("component too large"),
            }
        }
        Ok(Num { parts: parts })
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_to(f)
    }
}
impl fmt::Debug for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_to(f)
    }
}

#[test]
fn parse_and_display() {
    let n: Num = "1.2.1.4".parse().unwrap();
    assert_eq!(n.to_string(), "1.2.1.4");
    assert_eq!(n.len(), 4);
    assert!(n.is_revision());
    assert!(!n.is_branch());
    let b: Num = "1.2.1".parse().unwrap();
    assert!(b.is_branch());
    let canon: Num = "01.002".parse().unwrap();
    assert_eq!(canon.to_string(), "1.2");

    assert!("".parse::<Num>().is_err());
    assert!("1..2".parse::<Num>().is_err());
    assert!(".1".parse::<Num>().is_err());
    assert!("1.x".parse::<Num>().is_err());
}

#[test]
fn ordering() {
    let parse = |s: &str| s.parse::<Num>().unwrap();
    assert!(parse("1.2") < parse("1.10"));
    assert!(parse("1.2") < parse("1.2.1.1"));
    assert!(parse("1.3") > parse("1.2.1.1"));
    assert!(parse("2.1") > parse("1.9"));
    assert_eq!(parse("1.4"), parse("1.4"));
}

#[test]
fn arithmetic() {
    let parse = |s: &str| s.parse::<Num>().unwrap();
    assert_eq!(parse("1.4").increment(&parse("0.1")).unwrap(), parse("1.5"));
    assert_eq!(parse("1.4.2.3").increment(&parse("0.1")).unwrap(), parse("1.5.2.3"));
    assert_eq!(parse("1.4").decrement(&parse("1.1")).unwrap(), parse("0.3"));

    // increment and decrement are inverses when shapes match
    let a = parse("2.7.3.4");
    let b = parse("1.2.1.1");
    assert_eq!(a.decrement(&b).unwrap().increment(&b).unwrap(), a);

    // shape mismatch and underflow are errors, not truncations
    assert!(parse("1.4").increment(&parse("0.1.1")).is_err());
    assert!(parse("1.1").decrement(&parse("1.4")).is_err());

    // the absent marker passes through arithmetic untouched
    assert!(Num::absent().increment(&parse("0.1")).unwrap().is_absent());
    assert!(Num::absent().decrement(&parse("0.1")).unwrap().is_absent());
}

#[test]
fn prefixes() {
    let n: Num = "1.3.1.2".parse().unwrap();
    assert_eq!(n.prefix(2).to_string(), "1.3");
    assert!(n.starts_with(&"1.3.1".parse().unwrap()));
    assert!(!n.starts_with(&"1.3.2".parse().unwrap()));
}
