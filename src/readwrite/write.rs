/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Serialising the in-memory model back to RCS source
//!
//! The layout follows the output of the stock RCS tools: a tab after each
//! admin keyword, symbol and lock entries on indented lines of their own,
//! one blank line between delta headers and two before the description and
//! each deltatext. Parsing is whitespace-insensitive, so files written here
//! round-trip byte-for-byte.

use std::io::Write;

use delta::{Phrase, Word};
use error::Result;
use file::Rcs;

fn quoted(s: &str) -> String {
    format!("@{}@", s.replace("@", "@@"))
}

fn write_phrase(out: &mut Write, phrase: &Phrase) -> Result<()> {
    write!(out, "{}", phrase.name())?;
    let mut glue = true; // no separator wanted before or after a colon
    for (i, word) in phrase.words().iter().enumerate() {
        match *word {
            Word::Colon => {
                write!(out, ":")?;
                glue = true;
                continue;
            }
            _ => {}
        }
        let sep = if i == 0 { "\t" } else if glue { "" } else { " " };
        glue = false;
        match *word {
            Word::Id(ref s) => write!(out, "{}{}", sep, s)?,
            Word::Num(ref s) => write!(out, "{}{}", sep, s)?,
            Word::Str(ref s) => write!(out, "{}{}", sep, quoted(s))?,
            Word::Colon => unreachable!(),
        }
    }
    write!(out, ";\n")?;
    Ok(())
}

/// Write an RCS `,v` file.
///
/// Admin fields are emitted in canonical order, then delta headers, the
/// description and the deltatexts, each in delta insertion order; captured
/// newphrases are re-emitted in place; every user string is `@`-quoted with
/// `@` doubled.
pub fn write_rcs(rcs: &Rcs, out: &mut Write) -> Result<()> {
    write!(out, "head\t{};\n", rcs.head)?;
    if !rcs.branch.is_absent() {
        write!(out, "branch\t{};\n", rcs.branch)?;
    }
    write!(out, "access")?;
    for user in &rcs.access {
        write!(out, "\n\t{}", user)?;
    }
    write!(out, ";\n")?;
    write!(out, "symbols")?;
    for &(ref name, ref num) in &rcs.symbols {
        write!(out, "\n\t{}:{}", name, num)?;
    }
    write!(out, ";\n")?;
    write!(out, "locks")?;
    for &(ref user, ref num) in &rcs.locks {
        write!(out, "\n\t{}:{}", user, num)?;
    }
    write!(out, ";")?;
    if rcs.strict {
        write!(out, " strict;")?;
    }
    write!(out, "\n")?;
    if let Some(ref s) = rcs.integrity {
        write!(out, "integrity\t{};\n", quoted(s))?;
    }
    if let Some(ref s) = rcs.comment {
        write!(out, "comment\t{};\n", quoted(s))?;
    }
    if let Some(ref s) = rcs.expand {
        write!(out, "expand\t{};\n", quoted(s))?;
    }
    for phrase in &rcs.phrases {
        write_phrase(out, phrase)?;
    }

    write!(out, "\n")?;
    for d in &rcs.deltas {
        write!(out, "\n{}\n", d.revision)?;
        write!(out, "date\t{};\tauthor {};\tstate {};\n", d.date, d.author, d.state)?;
        write!(out, "branches")?;
        for b in &d.branches {
            write!(out, "\n\t{}", b)?;
        }
        write!(out, ";\n")?;
        write!(out, "next\t{};\n", d.next)?;
        if let Some(ref id) = d.commitid {
            write!(out, "commitid\t{};\n", id)?;
        }
        for phrase in &d.phrases {
            write_phrase(out, phrase)?;
        }
    }

    write!(out, "\n\ndesc\n{}\n", quoted(&rcs.desc))?;

    for d in &rcs.deltas {
        write!(out, "\n\n{}\nlog\n{}\n", d.revision, quoted(&d.log))?;
        for phrase in &d.text_phrases {
            write_phrase(out, phrase)?;
        }
        write!(out, "text\n{}\n", quoted(&d.text))?;
    }

    trace!("wrote RCS file: head {}, {} deltas", rcs.head, rcs.deltas.len());
    Ok(())
}

#[test]
fn canonical_form() {
    use file::sample_rcs;
    let mut rcs = sample_rcs();
    rcs.set_symbols(vec![("tip".to_string(), "1.3".parse().unwrap())]);
    rcs.set_strict(true);
    rcs.set_comment(Some("# ".to_string()));
    rcs.set_desc("at @ sign\n".to_string());

    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.starts_with("head\t1.3;\naccess;\nsymbols\n\ttip:1.3;\nlocks; strict;\ncomment\t@# @;\n"));
    assert!(text.contains("\n\n1.3\ndate\t2024.02.01.09.00.00;\tauthor kr;\tstate Exp;\nbranches;\nnext\t1.2;\n"));
    assert!(text.contains("\n\ndesc\n@at @@ sign\n@\n"));
    assert!(text.ends_with("@\n"));
}

#[test]
fn emit_then_parse_is_identity() {
    use file::sample_rcs;
    use readwrite::read_rcs;
    let rcs = sample_rcs();
    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf).unwrap();
    let reread = read_rcs(&buf).unwrap();
    assert_eq!(reread, rcs);

    let mut again = Vec::new();
    write_rcs(&reread, &mut again).unwrap();
    assert_eq!(again, buf);
}
