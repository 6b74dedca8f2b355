/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Parsing RCS source into the in-memory model

use std::collections::HashSet;

use delta::{Phrase, RcsDelta, Word};
use error::{Result, ParseError};
use file::Rcs;
use num::Num;
use readwrite::lex::Lexer;

// Values of a newphrase, up to and including the terminating semicolon.
fn read_words(lex: &mut Lexer) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    loop {
        if lex.try_semi() {
            return Ok(words);
        }
        if lex.try_colon() {
            words.push(Word::Colon);
        } else if let Some(s) = lex.try_string()? {
            words.push(Word::Str(s));
        } else if let Some(n) = lex.try_num() {
            words.push(Word::Num(n));
        } else if let Some(id) = lex.try_id()? {
            words.push(Word::Id(id));
        } else {
            error!("phrase not terminated by ';' at offset {}", lex.pos());
            return ParseError::err("';'", lex.pos());
        }
    }
}

// Capture newphrases until the next token is a num (a new delta) or the
// given keyword. The keyword itself is not consumed.
fn read_phrases(lex: &mut Lexer, until: &str, out: &mut Vec<Phrase>) -> Result<()> {
    loop {
        let mut look = *lex;
        if look.try_num().is_some() {
            return Ok(());
        }
        let mut look = *lex;
        let name = match look.try_id()? {
            Some(name) => name,
            None => return Ok(()),
        };
        if name == until {
            return Ok(());
        }
        *lex = look;
        let words = read_words(lex)?;
        out.push(Phrase::new(name, words));
    }
}

/// Parse the bytes of an RCS `,v` file.
///
/// The returned value satisfies every model invariant; anything else is an
/// error carrying the byte offset of the offending input. Unknown phrases
/// in the admin, delta-header and deltatext positions are captured for
/// re-emission. The pre-5.9 newphrase grammar is not recognised.
pub fn read_rcs(data: &[u8]) -> Result<Rcs> {
    let mut lex = Lexer::new(data);
    let mut rcs = Rcs::new();

    lex.expect_kw("head")?;
    if let Some(n) = lex.try_num() {
        rcs.head = n.parse()?;
    }
    lex.expect_semi()?;

    if lex.try_kw("branch") {
        if let Some(n) = lex.try_num() {
            rcs.branch = n.parse()?;
        }
        lex.expect_semi()?;
    }

    lex.expect_kw("access")?;
    while let Some(id) = lex.try_id()? {
        rcs.access.push(id);
    }
    lex.expect_semi()?;

    lex.expect_kw("symbols")?;
    while let Some(sym) = lex.try_sym()? {
        lex.expect_colon()?;
        let num = lex.expect_num()?;
        rcs.symbols.push((sym, num.parse()?));
    }
    lex.expect_semi()?;

    lex.expect_kw("locks")?;
    while let Some(id) = lex.try_id()? {
        lex.expect_colon()?;
        let num = lex.expect_num()?;
        rcs.locks.push((id, num.parse()?));
    }
    lex.expect_semi()?;
    if lex.try_kw("strict") {
        rcs.strict = true;
        lex.expect_semi()?;
    }
    if lex.try_kw("integrity") {
        rcs.integrity = Some(lex.try_string()?.unwrap_or_default());
        lex.expect_semi()?;
    }
    if lex.try_kw("comment") {
        rcs.comment = Some(lex.try_string()?.unwrap_or_default());
        lex.expect_semi()?;
    }
    if lex.try_kw("expand") {
        rcs.expand = Some(lex.try_string()?.unwrap_or_default());
        lex.expect_semi()?;
    }
    let mut phrases = Vec::new();
    read_phrases(&mut lex, "desc", &mut phrases)?;
    rcs.phrases = phrases;

    // delta headers
    loop {
        let at = lex.token_pos();
        let rev: Num = match lex.try_num() {
            Some(n) => n.parse()?,
            None => break,
        };
        let mut delta = RcsDelta::new(rev);

        lex.expect_kw("date")?;
        delta.date = lex.expect_num()?;
        lex.expect_semi()?;

        lex.expect_kw("author")?;
        delta.author = lex.expect_id()?;
        lex.expect_semi()?;

        lex.expect_kw("state")?;
        if let Some(state) = lex.try_id()? {
            delta.state = state;
        }
        lex.expect_semi()?;

        lex.expect_kw("branches")?;
        while let Some(b) = lex.try_num() {
            delta.branches.push(b.parse()?);
        }
        lex.expect_semi()?;

        lex.expect_kw("next")?;
        if let Some(n) = lex.try_num() {
            delta.next = n.parse()?;
        }
        lex.expect_semi()?;

        if lex.try_kw("commitid") {
            delta.commitid = Some(lex.expect_id()?);
            lex.expect_semi()?;
        }
        let mut phrases = Vec::new();
        read_phrases(&mut lex, "desc", &mut phrases)?;
        delta.phrases = phrases;

        if rcs.delta(delta.revision()).is_some() {
            error!("duplicate delta for revision {} at offset {}", delta.revision(), at);
            return ParseError::err("an unseen revision number", at);
        }
        rcs.add_delta(delta)?;
    }

    lex.expect_kw("desc")?;
    rcs.desc = lex.expect_string()?;

    // deltatext records, merged into the deltas by revision number
    let head = rcs.head.clone();
    let mut seen: HashSet<Num> = HashSet::new();
    loop {
        let at = lex.token_pos();
        let rev: Num = match lex.try_num() {
            Some(n) => n.parse()?,
            None => break,
        };
        if !seen.insert(rev.clone()) {
            error!("duplicate delta-text for revision {} at offset {}", rev, at);
            return ParseError::err("a single delta-text per revision", at);
        }
        let delta = match rcs.delta_mut(&rev) {
            Some(d) => d,
            None => {
                error!("delta-text for unknown revision {} at offset {}", rev, at);
                return ParseError::err("a revision from the delta headers", at);
            }
        };

        lex.expect_kw("log")?;
        delta.log = lex.expect_string()?;
        loop {
            let mut look = lex;
            if look.try_kw("text") {
                lex = look;
                break;
            }
            let mut look = lex;
            match look.try_id()? {
                Some(name) => {
                    lex = look;
                    let words = read_words(&mut lex)?;
                    delta.text_phrases.push(Phrase::new(name, words));
                }
                None => {
                    error!("expected 'text' at offset {}", lex.pos());
                    return ParseError::err("text", lex.pos());
                }
            }
        }
        delta.text = lex.expect_string()?;
        delta.diff = rev != head;
    }
    if seen.len() != rcs.deltas.len() {
        error!("{} deltas lack a delta-text record", rcs.deltas.len() - seen.len());
        return ParseError::err("a delta-text record for every delta", lex.pos());
    }

    lex.expect_final_newline()?;
    rcs.validate()?;
    trace!("read RCS file: head {}, {} deltas", rcs.head, rcs.deltas.len());
    Ok(rcs)
}

#[cfg(test)]
const SMALL: &'static [u8] = b"\
head\t1.2;
access;
symbols;
locks; strict;

1.2
date\t2024.01.02.10.00.00;\tauthor ben;\tstate Exp;
branches;
next\t1.1;

1.1
date\t2024.01.01.10.00.00;\tauthor ben;\tstate Exp;
branches;
next\t;

desc
@@

1.2
log
@two
@
text
@a
b
@

1.1
log
@one
@
text
@d2 1
@
";

#[test]
fn parses_a_small_file() {
    let rcs = read_rcs(SMALL).unwrap();
    assert_eq!(rcs.head().to_string(), "1.2");
    assert!(rcs.strict());
    assert_eq!(rcs.deltas().len(), 2);
    let head = rcs.delta(&"1.2".parse().unwrap()).unwrap();
    assert!(!head.is_diff());
    assert_eq!(head.text(), "a\nb\n");
    assert_eq!(head.log(), "two\n");
    let tail = rcs.delta(&"1.1".parse().unwrap()).unwrap();
    assert!(tail.is_diff());
    assert_eq!(rcs.revision_text(&"1.1".parse().unwrap()).unwrap(), "a\n");
}

#[test]
fn missing_keyword_is_fatal() {
    let err = read_rcs(b"access;\n").unwrap_err();
    let err = err.downcast_ref::<ParseError>().unwrap();
    assert_eq!(err.expected(), "head");
    assert_eq!(err.offset(), 0);
}

#[test]
fn unknown_deltatext_revision_is_fatal() {
    let text = String::from_utf8_lossy(SMALL).replace("\n1.1\nlog", "\n1.9\nlog");
    assert!(read_rcs(text.as_bytes()).is_err());
}

#[test]
fn missing_deltatext_is_fatal() {
    let text = String::from_utf8_lossy(SMALL);
    let cut = match text.rfind("\n1.1\nlog") {
        Some(i) => &text[..i + 1],
        None => panic!("fixture changed"),
    };
    assert!(read_rcs(cut.as_bytes()).is_err());
}

#[test]
fn newphrases_are_captured() {
    let text = String::from_utf8_lossy(SMALL)
        .replace("locks; strict;\n", "locks; strict;\nhook\tsite : 42 @x@;\n")
        .replace("branches;\nnext\t1.1;\n", "branches;\nnext\t1.1;\ndeltatype\ttext;\n");
    let rcs = read_rcs(text.as_bytes()).unwrap();
    assert_eq!(rcs.phrases().len(), 1);
    let hook = &rcs.phrases()[0];
    assert_eq!(hook.name(), "hook");
    assert_eq!(hook.words(), &[
        Word::Id("site".to_string()),
        Word::Colon,
        Word::Num("42".to_string()),
        Word::Str("x".to_string()),
    ]);
    let head = rcs.delta(&"1.2".parse().unwrap()).unwrap();
    assert_eq!(head.phrases().len(), 1);
    assert_eq!(head.phrases()[0].name(), "deltatype");
}
