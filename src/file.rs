/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The in-memory model of one RCS `,v` file

use delta::{RcsDelta, Phrase};
use diff;
use error::{Result, InvalidNum, UnknownRevision, DuplicateRevision, InvariantViolation, ArgError};
use num::Num;

/// A complete RCS file: the admin section plus the delta store.
///
/// Values are created by `read_rcs` or synthesised field by field; they are
/// mutated through the methods here and serialised with `write_rcs`. The
/// delta store, the symbol table, the lock table and the access list all
/// iterate in insertion order, which for a parsed file is file order; the
/// emitter reproduces that order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rcs {
    pub(crate) head: Num,
    pub(crate) branch: Num,
    pub(crate) access: Vec<String>,
    pub(crate) symbols: Vec<(String, Num)>,
    pub(crate) locks: Vec<(String, Num)>,
    pub(crate) strict: bool,
    pub(crate) integrity: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) expand: Option<String>,
    pub(crate) phrases: Vec<Phrase>,
    pub(crate) desc: String,
    pub(crate) deltas: Vec<RcsDelta>,
}

impl Rcs {
    /// Create an empty file: no head, no deltas, empty description
    pub fn new() -> Rcs {
        Rcs {
            head: Num::absent(),
            branch: Num::absent(),
            access: Vec::new(),
            symbols: Vec::new(),
            locks: Vec::new(),
            strict: false,
            integrity: None,
            comment: None,
            expand: None,
            phrases: Vec::new(),
            desc: String::new(),
            deltas: Vec::new(),
        }
    }

    /// The newest trunk revision; the delta holding the snapshot
    pub fn head(&self) -> &Num { &self.head }

    /// Set the head. The new head must name an existing delta; the absent
    /// marker is only accepted while the delta store is empty.
    pub fn set_head(&mut self, head: Num) -> Result<()> {
        if head.is_absent() {
            if !self.deltas.is_empty() {
                return InvariantViolation::err("head", "cannot unset the head while deltas exist");
            }
        } else if self.delta(&head).is_none() {
            return InvariantViolation::err("head", "head must name an existing revision");
        }
        self.head = head;
        Ok(())
    }

    /// The default branch, possibly absent
    pub fn branch(&self) -> &Num { &self.branch }
    /// Set the default branch
    pub fn set_branch(&mut self, branch: Num) { self.branch = branch; }

    /// Users permitted to commit, in file order
    pub fn access(&self) -> &[String] { &self.access }
    /// Replace the access list
    pub fn set_access(&mut self, access: Vec<String>) { self.access = access; }

    /// Symbolic names and the revisions they tag, in file order
    pub fn symbols(&self) -> &[(String, Num)] { &self.symbols }
    /// Replace the symbol table
    pub fn set_symbols(&mut self, symbols: Vec<(String, Num)>) { self.symbols = symbols; }
    /// Look up a symbolic name
    pub fn symbol(&self, name: &str) -> Option<&Num> {
        self.symbols.iter().find(|&&(ref n, _)| n == name).map(|&(_, ref v)| v)
    }

    /// Held locks as user/revision pairs, in file order
    pub fn locks(&self) -> &[(String, Num)] { &self.locks }
    /// Replace the lock table
    pub fn set_locks(&mut self, locks: Vec<(String, Num)>) { self.locks = locks; }
    /// Look up the revision locked by a user
    pub fn lock(&self, user: &str) -> Option<&Num> {
        self.locks.iter().find(|&&(ref n, _)| n == user).map(|&(_, ref v)| v)
    }

    /// Whether strict locking is in force
    pub fn strict(&self) -> bool { self.strict }
    /// Set strict locking
    pub fn set_strict(&mut self, strict: bool) { self.strict = strict; }

    /// The integrity string, if any
    pub fn integrity(&self) -> Option<&str> { self.integrity.as_ref().map(|s| &s[..]) }
    /// Set or clear the integrity string
    pub fn set_integrity(&mut self, integrity: Option<String>) { self.integrity = integrity; }

    /// The comment leader, if any
    pub fn comment(&self) -> Option<&str> { self.comment.as_ref().map(|s| &s[..]) }
    /// Set or clear the comment leader
    pub fn set_comment(&mut self, comment: Option<String>) { self.comment = comment; }

    /// The keyword-expansion mode, if any
    pub fn expand(&self) -> Option<&str> { self.expand.as_ref().map(|s| &s[..]) }
    /// Set or clear the keyword-expansion mode
    pub fn set_expand(&mut self, expand: Option<String>) { self.expand = expand; }

    /// Captured unknown admin phrases
    pub fn phrases(&self) -> &[Phrase] { &self.phrases }
    /// Replace the captured admin phrases
    pub fn set_phrases(&mut self, phrases: Vec<Phrase>) { self.phrases = phrases; }

    /// The file description
    pub fn desc(&self) -> &str { &self.desc }
    /// Set the file description
    pub fn set_desc(&mut self, desc: String) { self.desc = desc; }

    /// All deltas in insertion order
    pub fn deltas(&self) -> &[RcsDelta] { &self.deltas }

    /// Find a delta by revision number
    pub fn delta(&self, revision: &Num) -> Option<&RcsDelta> {
        self.deltas.iter().find(|d| d.revision == *revision)
    }

    /// Find a delta by revision number, mutably
    pub fn delta_mut(&mut self, revision: &Num) -> Option<&mut RcsDelta> {
        self.deltas.iter_mut().find(|d| d.revision == *revision)
    }

    /// Append a delta, keyed by its own revision number
    pub fn add_delta(&mut self, delta: RcsDelta) -> Result<()> {
        if self.delta(&delta.revision).is_some() {
            return DuplicateRevision::err(delta.revision.clone());
        }
        self.deltas.push(delta);
        Ok(())
    }

    /// Remove and return the delta for the given revision
    pub fn remove_delta(&mut self, revision: &Num) -> Result<RcsDelta> {
        match self.deltas.iter().position(|d| d.revision == *revision) {
            Some(i) => Ok(self.deltas.remove(i)),
            None => UnknownRevision::err(revision.clone()),
        }
    }

    /// Apply `f` to every delta in insertion order.
    ///
    /// `f` may renumber deltas; the store is re-keyed afterwards and the
    /// whole update is refused if two deltas would end up with the same
    /// revision, leaving the file untouched.
    pub fn map_deltas<F: FnMut(&mut RcsDelta)>(&mut self, mut f: F) -> Result<()> {
        let mut updated = self.deltas.clone();
        for d in updated.iter_mut() {
            f(d);
        }
        for (i, d) in updated.iter().enumerate() {
            if updated[i + 1..].iter().any(|e| e.revision == d.revision) {
                return DuplicateRevision::err(d.revision.clone());
            }
        }
        self.deltas = updated;
        Ok(())
    }

    /// The earliest trunk revision, found by walking `next` from the head
    pub fn start_revision(&self) -> Result<Num> {
        if self.head.is_absent() {
            return ArgError::err("file has no revisions");
        }
        let mut cur = match self.delta(&self.head) {
            Some(d) => d,
            None => return UnknownRevision::err(self.head.clone()),
        };
        let mut steps = 0;
        while !cur.next.is_absent() {
            cur = match self.delta(&cur.next) {
                Some(d) => d,
                None => return UnknownRevision::err(cur.next.clone()),
            };
            steps += 1;
            if steps > self.deltas.len() {
                return InvariantViolation::err("next", "next links form a cycle");
            }
        }
        Ok(cur.revision.clone())
    }

    /// Reconstruct the text of any revision.
    ///
    /// Starting from the head snapshot, `next` links are followed down the
    /// trunk (each step applying the stored ed script) to the target's
    /// trunk ancestor, then outward along branches: at each fork the
    /// `branches` entry prefixed by the target's branch number selects the
    /// branch, whose `next` links walk toward the tip. Nothing is cached.
    pub fn revision_text(&self, revision: &Num) -> Result<String> {
        if !revision.is_revision() {
            return InvalidNum::err("not a revision number");
        }
        if self.delta(revision).is_none() {
            return UnknownRevision::err(revision.clone());
        }
        let mut cur = match self.delta(&self.head) {
            Some(d) => d,
            None => return InvariantViolation::err("head", "head revision is not in the delta store"),
        };
        if cur.diff {
            return InvariantViolation::err("head", "head does not hold a snapshot");
        }
        let mut text = cur.text.clone();
        let mut applied = 0;

        // down the trunk
        let trunk = revision.prefix(2);
        let mut steps = 0;
        while cur.revision != trunk {
            if cur.next.is_absent() {
                return UnknownRevision::err(trunk);
            }
            cur = match self.delta(&cur.next) {
                Some(d) => d,
                None => return UnknownRevision::err(cur.next.clone()),
            };
            text = diff::apply(&text, &cur.text)?;
            applied += 1;
            steps += 1;
            if steps > self.deltas.len() {
                return InvariantViolation::err("next", "next links form a cycle");
            }
        }

        // out along branches
        let mut level = 2;
        while level < revision.len() {
            let branch = revision.prefix(level + 1);
            let want = revision.prefix(level + 2);
            let first = cur.branches.iter().find(|b| b.starts_with(&branch));
            cur = match first.and_then(|b| self.delta(b)) {
                Some(d) => d,
                None => return UnknownRevision::err(branch),
            };
            text = diff::apply(&text, &cur.text)?;
            applied += 1;
            let mut steps = 0;
            while cur.revision != want {
                if cur.next.is_absent() {
                    return UnknownRevision::err(want);
                }
                cur = match self.delta(&cur.next) {
                    Some(d) => d,
                    None => return UnknownRevision::err(cur.next.clone()),
                };
                text = diff::apply(&text, &cur.text)?;
                applied += 1;
                steps += 1;
                if steps > self.deltas.len() {
                    return InvariantViolation::err("next", "next links form a cycle");
                }
            }
            level += 2;
        }

        trace!("reconstructed revision {} ({} scripts applied)", revision, applied);
        Ok(text)
    }

    /// Check every file invariant: the head/snapshot coupling, link and
    /// symbol targets, and reachability of every delta from the head.
    pub fn validate(&self) -> Result<()> {
        if self.deltas.is_empty() {
            if !self.head.is_absent() {
                return InvariantViolation::err("head", "head names a revision but there are no deltas");
            }
            return Ok(());
        }
        let head_delta = match self.delta(&self.head) {
            Some(d) => d,
            None => return InvariantViolation::err("head", "head revision is not in the delta store"),
        };
        if head_delta.diff {
            return InvariantViolation::err("head", "head does not hold a snapshot");
        }
        if self.deltas.iter().filter(|d| !d.diff).count() != 1 {
            return InvariantViolation::err("text", "exactly one delta may hold a snapshot");
        }

        for d in &self.deltas {
            if !d.next.is_absent() && self.delta(&d.next).is_none() {
                return UnknownRevision::err(d.next.clone());
            }
            for b in &d.branches {
                if self.delta(b).is_none() {
                    return UnknownRevision::err(b.clone());
                }
            }
        }
        for &(_, ref n) in &self.symbols {
            if self.delta(n).is_none() {
                return UnknownRevision::err(n.clone());
            }
        }
        for &(_, ref n) in &self.locks {
            if self.delta(n).is_none() {
                return UnknownRevision::err(n.clone());
            }
        }

        // every delta must be reachable from the head via next and branches
        let mut reached = vec![false; self.deltas.len()];
        let mut work = vec![self.head.clone()];
        while let Some(rev) = work.pop() {
            let i = match self.deltas.iter().position(|d| d.revision == rev) {
                Some(i) => i,
                None => continue,
            };
            if reached[i] {
                continue;
            }
            reached[i] = true;
            let d = &self.deltas[i];
            if !d.next.is_absent() {
                work.push(d.next.clone());
            }
            work.extend(d.branches.iter().cloned());
        }
        if reached.iter().any(|r| !r) {
            return InvariantViolation::err("deltas", "delta not reachable from the head");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_delta(rev: &str, next: &str, text: &str, diff: bool) -> RcsDelta {
    let mut d = RcsDelta::new(rev.parse().unwrap());
    d.set_date("2024.02.01.09.00.00".to_string());
    d.set_author("kr".to_string());
    d.set_state("Exp".to_string());
    if !next.is_empty() {
        d.set_next(next.parse().unwrap());
    }
    d.set_log(format!("commit {}\n", rev));
    d.set_text(text.to_string(), diff);
    d
}

#[cfg(test)]
pub(crate) fn sample_rcs() -> Rcs {
    // 1.3 -> 1.2 -> 1.1 with a branch 1.2.1.1 off 1.2
    let mut rcs = Rcs::new();
    rcs.deltas.push(sample_delta("1.3", "1.2", "one\ntwo\nthree\n", false));
    rcs.deltas.push(sample_delta("1.2", "1.1", "d3 1\n", true));
    rcs.deltas.push(sample_delta("1.1", "", "d2 1\n", true));
    rcs.deltas.push(sample_delta("1.2.1.1", "", "a2 1\nbranched\n", true));
    rcs.delta_mut(&"1.2".parse().unwrap()).unwrap()
        .set_branches(vec!["1.2.1.1".parse().unwrap()]);
    rcs.head = "1.3".parse().unwrap();
    rcs.desc = "sample\n".to_string();
    rcs
}

#[test]
fn walks() {
    let rcs = sample_rcs();
    let rev = |s: &str| s.parse::<Num>().unwrap();
    assert_eq!(rcs.revision_text(&rev("1.3")).unwrap(), "one\ntwo\nthree\n");
    assert_eq!(rcs.revision_text(&rev("1.2")).unwrap(), "one\ntwo\n");
    assert_eq!(rcs.revision_text(&rev("1.1")).unwrap(), "one\n");
    assert_eq!(rcs.revision_text(&rev("1.2.1.1")).unwrap(), "one\ntwo\nbranched\n");
    assert_eq!(rcs.start_revision().unwrap(), rev("1.1"));
    assert!(rcs.revision_text(&rev("1.4")).is_err());
    assert!(rcs.validate().is_ok());
}

#[test]
fn delta_store() {
    let mut rcs = sample_rcs();
    let rev = |s: &str| s.parse::<Num>().unwrap();

    let dup = sample_delta("1.3", "", "x\n", false);
    assert!(rcs.add_delta(dup).is_err());
    assert!(rcs.remove_delta(&rev("9.9")).is_err());

    let removed = rcs.remove_delta(&rev("1.2.1.1")).unwrap();
    assert_eq!(*removed.revision(), rev("1.2.1.1"));
    // 1.2 still lists the removed branch
    assert!(rcs.validate().is_err());
    rcs.delta_mut(&rev("1.2")).unwrap().set_branches(vec![]);
    assert!(rcs.validate().is_ok());
}

#[test]
fn setters_preserve_invariants() {
    let mut rcs = sample_rcs();
    let rev = |s: &str| s.parse::<Num>().unwrap();

    assert!(rcs.set_head(rev("9.9")).is_err());
    assert_eq!(*rcs.head(), rev("1.3"));
    assert!(rcs.set_head(rev("1.2")).is_ok());
    rcs.set_head(rev("1.3")).unwrap();

    rcs.set_symbols(vec![("start".to_string(), rev("1.1"))]);
    assert_eq!(rcs.symbol("start"), Some(&rev("1.1")));
    assert_eq!(rcs.symbol("missing"), None);
    rcs.set_locks(vec![("kr".to_string(), rev("1.3"))]);
    assert_eq!(rcs.lock("kr"), Some(&rev("1.3")));
    assert!(rcs.validate().is_ok());

    rcs.set_symbols(vec![("bad".to_string(), rev("8.8"))]);
    assert!(rcs.validate().is_err());
}

#[test]
fn map_deltas_renumber() {
    let mut rcs = sample_rcs();
    let rev = |s: &str| s.parse::<Num>().unwrap();
    let shift = rev("1.0");

    rcs.map_deltas(|d| {
        let n = d.revision().increment(&shift).unwrap();
        d.set_revision(n);
    }).unwrap();
    assert!(rcs.delta(&rev("2.3")).is_some());
    assert!(rcs.delta(&rev("1.3")).is_none());

    // a colliding callback leaves the store untouched
    let before = rcs.clone();
    let err = rcs.map_deltas(|d| d.set_revision(rev("3.1")));
    assert!(err.is_err());
    assert_eq!(rcs, before);
}
