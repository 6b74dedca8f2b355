/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! End-to-end exercises over realistic `,v` histories

extern crate rcsfile;

use rcsfile::{read_rcs, write_rcs, join, pivot_branch, rename_author, diff, Num, Rcs, RcsDelta};
use rcsfile::error::{LexError, ParseError};

// A file in the emitter's canonical form: two trunk revisions, one branch
// revision, symbols, a lock, strict mode, a commitid and an unknown phrase.
const FIXTURE: &'static [u8] = b"head\t1.2;
access
\tben
\tkr;
symbols
\tstart:1.1
\tfix:1.1.1.1;
locks
\tben:1.2; strict;
comment\t@# @;
hook\tsite 42;


1.2
date\t2024.03.01.12.00.00;\tauthor ben;\tstate Exp;
branches;
next\t1.1;
commitid\ta1b2c3;

1.1
date\t2024.02.01.09.30.00;\tauthor kr;\tstate Exp;
branches
\t1.1.1.1;
next\t;

1.1.1.1
date\t2024.03.05.08.15.00;\tauthor kr;\tstate Exp;
branches;
next\t;


desc
@demo history
@


1.2
log
@third line added
@
text
@one
two
three
@


1.1
log
@first cut
@
text
@d2 1
@


1.1.1.1
log
@branch work
@
text
@a2 1
four
@
";

fn rev(s: &str) -> Num {
    s.parse().unwrap()
}

fn find(hay: &[u8], needle: &[u8]) -> usize {
    hay.windows(needle.len())
        .position(|w| w == needle)
        .expect("pattern present")
}

fn delta(revision: &str, next: &str, author: &str, text: &str, is_diff: bool) -> RcsDelta {
    let mut d = RcsDelta::new(rev(revision));
    d.set_date("2024.04.01.08.00.00".to_string());
    d.set_author(author.to_string());
    d.set_state("Exp".to_string());
    if !next.is_empty() {
        d.set_next(rev(next));
    }
    d.set_log(format!("rev {}\n", revision));
    d.set_text(text.to_string(), is_diff);
    d
}

#[test]
fn byte_round_trip() {
    let rcs = read_rcs(FIXTURE).unwrap();
    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        String::from_utf8_lossy(FIXTURE)
    );
}

#[test]
fn semantic_round_trip() {
    let rcs = read_rcs(FIXTURE).unwrap();
    assert_eq!(*rcs.head(), rev("1.2"));
    assert_eq!(rcs.access(), &["ben".to_string(), "kr".to_string()]);
    assert_eq!(rcs.symbol("fix"), Some(&rev("1.1.1.1")));
    assert_eq!(rcs.lock("ben"), Some(&rev("1.2")));
    assert!(rcs.strict());
    assert_eq!(rcs.comment(), Some("# "));
    assert_eq!(rcs.desc(), "demo history\n");
    assert_eq!(rcs.phrases().len(), 1);
    assert_eq!(rcs.phrases()[0].name(), "hook");
    let head = rcs.delta(&rev("1.2")).unwrap();
    assert_eq!(head.commitid(), Some("a1b2c3"));

    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf).unwrap();
    let reread = read_rcs(&buf).unwrap();
    assert_eq!(reread, rcs);
}

#[test]
fn checkout_start_walks_to_the_first_commit() {
    let rcs = read_rcs(FIXTURE).unwrap();
    assert_eq!(rcs.start_revision().unwrap(), rev("1.1"));
    assert_eq!(rcs.revision_text(&rev("1.2")).unwrap(), "one\ntwo\nthree\n");
    assert_eq!(rcs.revision_text(&rev("1.1")).unwrap(), "one\nthree\n");
    assert_eq!(rcs.revision_text(&rev("1.1.1.1")).unwrap(), "one\nthree\nfour\n");
}

#[test]
fn join_continues_a_history() {
    let older = read_rcs(FIXTURE).unwrap();

    // a second file whose first commit re-checked-in the older head's text
    let head_text = "one\ntwo\nthree\nfive\n";
    let start_text = "one\ntwo\nthree\n";
    let mut newer = Rcs::new();
    newer.add_delta(delta("1.2", "1.1", "mws", head_text, false)).unwrap();
    newer.add_delta(delta("1.1", "", "mws", &diff::between(head_text, start_text), true)).unwrap();
    newer.set_head(rev("1.2")).unwrap();
    newer.set_desc("continuation\n".to_string());
    newer.validate().unwrap();

    let joined = join(&older, &newer).unwrap();
    assert_eq!(*joined.head(), rev("1.4"));

    // the demoted head keeps its metadata and gains the identity script
    let former = joined.delta(&rev("1.2")).unwrap();
    assert!(former.is_diff());
    assert_eq!(former.text(), "");
    assert_eq!(former.author(), "ben");

    assert_eq!(joined.revision_text(&rev("1.1")).unwrap(), "one\nthree\n");
    assert_eq!(joined.revision_text(&rev("1.2")).unwrap(), "one\ntwo\nthree\n");
    assert_eq!(joined.revision_text(&rev("1.3")).unwrap(), "one\ntwo\nthree\n");
    assert_eq!(joined.revision_text(&rev("1.4")).unwrap(), head_text);
    assert_eq!(joined.revision_text(&rev("1.1.1.1")).unwrap(), "one\nthree\nfour\n");

    // the joined file survives a full write/read cycle
    let mut buf = Vec::new();
    write_rcs(&joined, &mut buf).unwrap();
    let reread = read_rcs(&buf).unwrap();
    assert_eq!(reread, joined);
    assert_eq!(reread.revision_text(&rev("1.4")).unwrap(), head_text);
}

#[test]
fn rename_user_touches_only_authors() {
    let mut rcs = read_rcs(FIXTURE).unwrap();
    let renamed = rename_author(&mut rcs, "kr", "mws").unwrap();
    assert_eq!(renamed, 2);
    assert_eq!(rcs.delta(&rev("1.2")).unwrap().author(), "ben");
    assert_eq!(rcs.delta(&rev("1.1")).unwrap().author(), "mws");
    assert_eq!(rcs.delta(&rev("1.1.1.1")).unwrap().author(), "mws");
    assert_eq!(rcs.delta(&rev("1.1")).unwrap().log(), "first cut\n");

    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf).unwrap();
    assert_eq!(read_rcs(&buf).unwrap(), rcs);
}

#[test]
fn pivot_preserves_every_text() {
    let t1 = "first\n";
    let t2 = "first\nsecond\n";
    let t3 = "first\nsecond\nthird\n";
    let b1 = "first\nsecond\nthird\nb1\n";
    let b2 = "first\nsecond\nthird\nb1\nb2\n";

    let mut rcs = Rcs::new();
    rcs.add_delta(delta("1.3", "1.2", "ben", t3, false)).unwrap();
    rcs.add_delta(delta("1.2", "1.1", "ben", &diff::between(t3, t2), true)).unwrap();
    rcs.add_delta(delta("1.1", "", "ben", &diff::between(t2, t1), true)).unwrap();
    rcs.add_delta(delta("1.3.1.1", "1.3.1.2", "kr", &diff::between(t3, b1), true)).unwrap();
    rcs.add_delta(delta("1.3.1.2", "", "kr", &diff::between(b1, b2), true)).unwrap();
    rcs.delta_mut(&rev("1.3")).unwrap().set_branches(vec![rev("1.3.1.1")]);
    rcs.set_head(rev("1.3")).unwrap();
    rcs.set_desc("pivot demo\n".to_string());
    rcs.validate().unwrap();

    let pivoted = pivot_branch(&rcs, &rev("1.3.1")).unwrap();
    assert_eq!(*pivoted.head(), rev("1.5"));
    assert_eq!(pivoted.revision_text(&rev("1.5")).unwrap(), b2);
    assert_eq!(pivoted.revision_text(&rev("1.4")).unwrap(), b1);
    assert_eq!(pivoted.revision_text(&rev("1.3")).unwrap(), t3);
    assert_eq!(pivoted.revision_text(&rev("1.2")).unwrap(), t2);
    assert_eq!(pivoted.revision_text(&rev("1.1")).unwrap(), t1);
    assert!(pivoted.delta(&rev("1.3")).unwrap().branches().is_empty());

    let mut buf = Vec::new();
    write_rcs(&pivoted, &mut buf).unwrap();
    let reread = read_rcs(&buf).unwrap();
    assert_eq!(reread, pivoted);
    assert_eq!(reread.revision_text(&rev("1.1")).unwrap(), t1);
}

#[test]
fn duplicate_deltatext_is_rejected_at_its_offset() {
    let mut bad = Vec::from(FIXTURE);
    bad.extend_from_slice(b"\n\n1.1\nlog\n@again\n@\ntext\n@@\n");
    let err = read_rcs(&bad).unwrap_err();
    let err = err.downcast_ref::<ParseError>().expect("a parse error");
    assert_eq!(err.offset(), FIXTURE.len() + 2);
}

#[test]
fn unterminated_string_is_rejected_at_the_opening_quote() {
    let at = find(FIXTURE, b"desc\n@demo") + 5;
    let cut = &FIXTURE[..at + 8];
    let err = read_rcs(cut).unwrap_err();
    let err = err.downcast_ref::<LexError>().expect("a lex error");
    assert_eq!(err.offset(), at);
}

#[test]
fn optional_admin_strings_round_trip() {
    let mut rcs = read_rcs(FIXTURE).unwrap();
    rcs.set_integrity(Some("4a5b6c".to_string()));
    rcs.set_expand(Some("kv".to_string()));

    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf).unwrap();
    let text = String::from_utf8_lossy(&buf).into_owned();
    assert!(text.contains("integrity\t@4a5b6c@;\ncomment\t@# @;\nexpand\t@kv@;\n"));
    assert_eq!(read_rcs(&buf).unwrap(), rcs);
}
