/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Ed-script diffs between revision texts
//!
//! Every non-head delta stores its text as an ed script: a sequence of
//! `d<n> <c>` (delete `<c>` lines starting at line `<n>`) and `a<n> <c>`
//! (append the following `<c>` script lines after line `<n>`) commands.
//! Line numbers refer to the unmodified source, so application keeps a
//! running offset to translate them into positions in the edited text.
//! Lines are `\n`-delimited; a trailing partial line is preserved.

use error::{Result, MalformedDiff};

// An `a` or `d` command: `([ad])([0-9]+)\s+([0-9]+)\s*`.
fn parse_command(s: &str) -> Option<(u8, usize, usize)> {
    let b = s.as_bytes();
    if b.is_empty() || (b[0] != b'a' && b[0] != b'd') {
        return None;
    }
    let mut i = 1;
    let mut start: usize = 0;
    let digits = i;
    while i < b.len() && b[i].is_ascii_digit() {
        start = start.saturating_mul(10).saturating_add((b[i] - b'0') as usize);
        i += 1;
    }
    if i == digits {
        return None;
    }
    let ws = i;
    while i < b.len() && (b[i] == b' ' || b[i] == b'\t') {
        i += 1;
    }
    if i == ws {
        return None;
    }
    let mut count: usize = 0;
    let digits = i;
    while i < b.len() && b[i].is_ascii_digit() {
        count = count.saturating_mul(10).saturating_add((b[i] - b'0') as usize);
        i += 1;
    }
    if i == digits {
        return None;
    }
    while i < b.len() && (b[i] == b' ' || b[i] == b'\t') {
        i += 1;
    }
    if i != b.len() {
        return None;
    }
    Some((b[0], start, count))
}

/// Apply an ed script to `source`, producing the edited text.
///
/// This is how every non-head revision is reconstructed: the script stored
/// in a delta, applied to its successor's text, yields that delta's text.
/// The empty script is the identity. A blank line terminates the script.
pub fn apply(source: &str, script: &str) -> Result<String> {
    let mut lines: Vec<&str> = source.split('\n').collect();
    let scr: Vec<&str> = script.split('\n').collect();
    // ed commands are 1-based
    let mut offset: isize = -1;
    let mut i = 0;

    while i < scr.len() {
        let lineno = i + 1;
        let cmd = scr[i];
        i += 1;
        if cmd.bytes().all(|b| b == b' ' || b == b'\t' || b == b'\r') {
            break;
        }
        let (op, start, count) = match parse_command(cmd) {
            Some(c) => c,
            None => return MalformedDiff::err("unrecognised ed command", lineno),
        };
        match op {
            b'd' => {
                let from = start as isize + offset;
                if from < 0 || count > lines.len() || (from as usize) > lines.len() - count {
                    return MalformedDiff::err("delete past end of text", lineno);
                }
                let from = from as usize;
                lines.drain(from..from + count);
                offset -= count as isize;
            }
            b'a' => {
                let from = start as isize + offset + 1;
                if from < 0 || from as usize > lines.len() {
                    return MalformedDiff::err("append past end of text", lineno);
                }
                if count > scr.len() - i {
                    return MalformedDiff::err("script ends inside an append block", lineno);
                }
                let from = from as usize;
                for (k, added) in scr[i..i + count].iter().enumerate() {
                    lines.insert(from + k, *added);
                }
                i += count;
                offset += count as isize;
            }
            _ => unreachable!(),
        }
    }

    Ok(lines.join("\n"))
}

/// Compute an ed script taking `a` to `b`: `apply(a, between(a, b)) == b`.
///
/// Common leading and trailing lines are skipped and the differing middle is
/// expressed as one delete plus one append. Equal inputs yield the empty
/// script. The result is not a minimal diff and does not try to be.
pub fn between(a: &str, b: &str) -> String {
    let av: Vec<&str> = a.split('\n').collect();
    let bv: Vec<&str> = b.split('\n').collect();
    let n = av.len();
    let m = bv.len();

    let mut p = 0;
    while p < n && p < m && av[p] == bv[p] {
        p += 1;
    }
    let mut s = 0;
    while s < n - p && s < m - p && av[n - 1 - s] == bv[m - 1 - s] {
        s += 1;
    }
    let da = n - p - s;
    let db = m - p - s;

    let mut script = String::new();
    if da > 0 {
        script.push_str(&format!("d{} {}\n", p + 1, da));
    }
    if db > 0 {
        script.push_str(&format!("a{} {}\n", p + da, db));
        for line in &bv[p..p + db] {
            script.push_str(line);
            script.push('\n');
        }
    }
    script
}

#[test]
fn identity() {
    assert_eq!(apply("a\nb\n", "").unwrap(), "a\nb\n");
    assert_eq!(apply("", "").unwrap(), "");
    assert_eq!(between("a\nb\n", "a\nb\n"), "");
}

#[test]
fn apply_commands() {
    // delete the first of two lines
    assert_eq!(apply("a\nb\n", "d1 1\n").unwrap(), "b\n");
    // append after the last full line
    assert_eq!(apply("a\n", "a1 1\nX\n").unwrap(), "a\nX\n");
    // append after line zero, i.e. prepend
    assert_eq!(apply("a\n", "a0 1\nX\n").unwrap(), "X\na\n");
    // replace the middle line; both commands count against the original
    assert_eq!(apply("a\nb\nc\n", "d2 1\na2 1\nB\n").unwrap(), "a\nB\nc\n");
    // inserted data is taken by count, not by content
    assert_eq!(apply("", "a0 1\nd1 1\n").unwrap(), "d1 1\n");
}

#[test]
fn apply_bounds() {
    let e = apply("a\nb\n", "d9 1\n").unwrap_err();
    let e = e.downcast_ref::<MalformedDiff>().unwrap();
    assert_eq!(e.line(), 1);

    assert!(apply("a\n", "a5 1\nX\n").is_err());
    assert!(apply("a\n", "a1 3\nX\n").is_err());
    assert!(apply("a\n", "q1 1\n").is_err());
    assert!(apply("a\n", "d1\n").is_err());
}

#[test]
fn round_trips() {
    let cases = [
        ("", ""),
        ("", "one\ntwo\n"),
        ("one\ntwo\n", ""),
        ("a\nb\nc\n", "a\nx\ny\nc\n"),
        ("shared\nold\n", "shared\nnew\n"),
        ("no terminator", "no terminator either"),
        ("ends\nwith partial", "ends\nwith partial\nnow terminated\n"),
        ("a\nb\nc\nd\ne\n", "c\n"),
    ];
    for &(a, b) in cases.iter() {
        let script = between(a, b);
        assert_eq!(apply(a, &script).unwrap(), b, "a={:?} b={:?}", a, b);
    }
}

#[test]
fn random_round_trips() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let words = ["fn", "let", "mut", "", "use std;", "d1 1", "a0 2", "@"];
    for _ in 0..200 {
        let mut make = |rng: &mut rand::rngs::ThreadRng| {
            let lines = rng.gen_range(0..8);
            let mut t = String::new();
            for _ in 0..lines {
                t.push_str(words[rng.gen_range(0..words.len())]);
                t.push('\n');
            }
            if rng.gen_range(0..3) == 0 {
                t.push_str("partial");
            }
            t
        };
        let a = make(&mut rng);
        let b = make(&mut rng);
        let script = between(&a, &b);
        assert_eq!(apply(&a, &script).unwrap(), b, "a={:?} b={:?}", a, b);
    }
}
