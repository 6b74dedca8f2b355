/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Per-revision records

use chrono::NaiveDateTime;

use date;
use diff;
use error::{Result, ArgError};
use num::Num;

/// One value of a captured newphrase.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Word {
    /// An identifier
    Id(String),
    /// A dotted numeral, kept verbatim
    Num(String),
    /// An `@`-quoted string, stored unescaped
    Str(String),
    /// A bare colon
    Colon,
}

/// An unknown phrase (`id word* ;`) captured for round-tripping.
///
/// RCS added `newphrase` as a forward-compatibility mechanism: parsers must
/// accept phrases they do not understand and tools should preserve them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Phrase {
    name: String,
    words: Vec<Word>,
}

impl Phrase {
    /// Create a phrase from its name and values
    pub fn new(name: String, words: Vec<Word>) -> Phrase {
        Phrase { name: name, words: words }
    }
    /// The phrase's leading identifier
    pub fn name(&self) -> &str { &self.name }
    /// The phrase's values in order
    pub fn words(&self) -> &[Word] { &self.words }
}

/// One revision's record: metadata plus either a full snapshot of the
/// tracked file or an ed script against the neighbouring revision's text.
///
/// A delta does not know which `Rcs` owns it; operations that need a
/// sibling take it as an explicit argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RcsDelta {
    pub(crate) revision: Num,
    pub(crate) date: String,
    pub(crate) author: String,
    pub(crate) state: String,
    pub(crate) branches: Vec<Num>,
    pub(crate) next: Num,
    pub(crate) commitid: Option<String>,
    pub(crate) phrases: Vec<Phrase>,
    pub(crate) log: String,
    pub(crate) text_phrases: Vec<Phrase>,
    pub(crate) text: String,
    pub(crate) diff: bool,
}

impl RcsDelta {
    /// Create an empty record for the given revision. The caller is
    /// responsible for filling in the fields.
    pub fn new(revision: Num) -> RcsDelta {
        RcsDelta {
            revision: revision,
            date: String::new(),
            author: String::new(),
            state: String::new(),
            branches: Vec::new(),
            next: Num::absent(),
            commitid: None,
            phrases: Vec::new(),
            log: String::new(),
            text_phrases: Vec::new(),
            text: String::new(),
            diff: false,
        }
    }

    /// The revision number
    pub fn revision(&self) -> &Num { &self.revision }
    /// Set the revision number (the owning `Rcs` re-keys on `map_deltas`)
    pub fn set_revision(&mut self, revision: Num) { self.revision = revision; }

    /// The checkin date, verbatim (`YY.MM.DD.hh.mm.ss`)
    pub fn date(&self) -> &str { &self.date }
    /// Set the checkin date string
    pub fn set_date(&mut self, date: String) { self.date = date; }

    /// The checkin date in calendar form. The stored string is kept
    /// verbatim for round-tripping; this parses it on demand, applying the
    /// year-windowing and leap-second rules of the `date` module.
    pub fn date_time(&self) -> Result<NaiveDateTime> {
        date::parse_date(&self.date)
    }
    /// Set the checkin date from calendar form
    pub fn set_date_time(&mut self, when: &NaiveDateTime) -> Result<()> {
        self.date = date::format_date(when)?;
        Ok(())
    }

    /// The user who checked this revision in
    pub fn author(&self) -> &str { &self.author }
    /// Set the author
    pub fn set_author(&mut self, author: String) { self.author = author; }

    /// The state, e.g. `Exp` or `dead`; may be empty
    pub fn state(&self) -> &str { &self.state }
    /// Set the state
    pub fn set_state(&mut self, state: String) { self.state = state; }

    /// First revisions of the branches forking off here, in file order
    pub fn branches(&self) -> &[Num] { &self.branches }
    /// Replace the branch list
    pub fn set_branches(&mut self, branches: Vec<Num>) { self.branches = branches; }

    /// The next delta in the chain: the older neighbour on the trunk, the
    /// newer one on a branch; absent at the trunk tail and at branch tips
    pub fn next(&self) -> &Num { &self.next }
    /// Set the next link
    pub fn set_next(&mut self, next: Num) { self.next = next; }

    /// The commit identifier shared by files checked in together, if any
    pub fn commitid(&self) -> Option<&str> {
        self.commitid.as_ref().map(|s| &s[..])
    }
    /// Set or clear the commit identifier
    pub fn set_commitid(&mut self, commitid: Option<String>) { self.commitid = commitid; }

    /// Captured unknown phrases from the delta header
    pub fn phrases(&self) -> &[Phrase] { &self.phrases }
    /// Replace the captured delta-header phrases
    pub fn set_phrases(&mut self, phrases: Vec<Phrase>) { self.phrases = phrases; }

    /// The commit message
    pub fn log(&self) -> &str { &self.log }
    /// Set the commit message
    pub fn set_log(&mut self, log: String) { self.log = log; }

    /// Captured unknown phrases between `log` and `text`
    pub fn text_phrases(&self) -> &[Phrase] { &self.text_phrases }
    /// Replace the captured deltatext phrases
    pub fn set_text_phrases(&mut self, phrases: Vec<Phrase>) { self.text_phrases = phrases; }

    /// The stored text: a snapshot or an ed script, whichever this is
    pub fn text(&self) -> &str { &self.text }
    /// Replace the stored text, stating which form it is
    pub fn set_text(&mut self, text: String, diff: bool) {
        self.text = text;
        self.diff = diff;
    }
    /// True if the stored text is an ed script rather than a snapshot
    pub fn is_diff(&self) -> bool { self.diff }

    /// Demote this record's snapshot to the ed script from `succ`'s text to
    /// its own; used when a former head moves into the middle of a chain.
    /// Both records must currently hold snapshots. Called with itself (a
    /// clone), this stores the identity script.
    pub fn text_to_diff(&mut self, succ: &RcsDelta) -> Result<()> {
        if self.diff {
            return ArgError::err("revision is already a diff");
        }
        if succ.diff {
            return ArgError::err("successor revision is a diff");
        }
        self.text = diff::between(&succ.text, &self.text);
        self.diff = true;
        Ok(())
    }

    /// Promote this record's ed script to a snapshot by applying it to
    /// `succ`'s text; the inverse of `text_to_diff`.
    pub fn text_from_diff(&mut self, succ: &RcsDelta) -> Result<()> {
        if !self.diff {
            return ArgError::err("revision is not a diff");
        }
        if succ.diff {
            return ArgError::err("successor revision is a diff");
        }
        self.text = diff::apply(&succ.text, &self.text)?;
        self.diff = false;
        Ok(())
    }
}

#[test]
fn date_forms() {
    let mut d = RcsDelta::new("1.1".parse().unwrap());
    d.set_date("99.12.31.23.59.59".to_string());
    let when = d.date_time().unwrap();

    let mut e = RcsDelta::new("1.2".parse().unwrap());
    e.set_date_time(&when).unwrap();
    assert_eq!(e.date(), "99.12.31.23.59.59");

    d.set_date("not.a.date".to_string());
    assert!(d.date_time().is_err());
}

#[test]
fn text_form_changes() {
    let rev = |s: &str| s.parse::<Num>().unwrap();
    let mut newer = RcsDelta::new(rev("1.2"));
    newer.set_text("one\ntwo\n".to_string(), false);
    let mut older = RcsDelta::new(rev("1.1"));
    older.set_text("one\n".to_string(), false);

    older.text_to_diff(&newer).unwrap();
    assert!(older.is_diff());
    assert_eq!(diff::apply(newer.text(), older.text()).unwrap(), "one\n");

    older.text_from_diff(&newer).unwrap();
    assert!(!older.is_diff());
    assert_eq!(older.text(), "one\n");

    // demoting against itself stores the identity script
    let mut head = newer.clone();
    head.text_to_diff(&newer).unwrap();
    assert_eq!(head.text(), "");
}

#[test]
fn text_form_preconditions() {
    let rev = |s: &str| s.parse::<Num>().unwrap();
    let mut snap = RcsDelta::new(rev("1.2"));
    snap.set_text("x\n".to_string(), false);
    let mut scripted = RcsDelta::new(rev("1.1"));
    scripted.set_text("".to_string(), true);

    assert!(scripted.clone().text_to_diff(&snap).is_err());
    assert!(snap.clone().text_to_diff(&scripted).is_err());
    assert!(snap.clone().text_from_diff(&snap).is_err());
    let copy = scripted.clone();
    assert!(scripted.text_from_diff(&copy).is_err());
}
