/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! History surgery: operations the stock RCS tools cannot perform

use diff;
use error::{Result, ArgError, UnknownRevision, InvariantViolation};
use file::Rcs;
use num::Num;

/// Concatenate two histories.
///
/// `newer`'s earliest trunk revision must re-commit exactly the text of
/// `older`'s head; the call fails otherwise. Every revision of `newer` is
/// shifted up by `older.head - newer.start + 0.1` so the two trunks form
/// one chain, the shifted start is linked down to `older`'s head, and the
/// former head's snapshot is demoted to the identity script against itself
/// (sound because its text equals its new successor's). `newer`'s symbols
/// and locks are shifted and merged, with `older`'s bindings winning on a
/// name clash; access lists are unioned. The result owns all its records;
/// neither input is touched.
pub fn join(older: &Rcs, newer: &Rcs) -> Result<Rcs> {
    if older.head().is_absent() || newer.head().is_absent() {
        return ArgError::err("cannot join an empty history");
    }
    let a_head = older.head().clone();
    let b_start = newer.start_revision()?;
    if older.revision_text(&a_head)? != newer.revision_text(&b_start)? {
        return ArgError::err("the newer history does not start from the older head's text");
    }

    let one: Num = "0.1".parse()?;
    let shift = a_head.decrement(&b_start)?.increment(&one)?;

    let mut joined = older.clone();

    let former = match joined.delta(&a_head) {
        Some(d) => d.clone(),
        None => return UnknownRevision::err(a_head.clone()),
    };
    if let Some(d) = joined.delta_mut(&a_head) {
        d.text_to_diff(&former)?;
    }

    for d in newer.deltas() {
        let mut moved = d.clone();
        moved.set_revision(d.revision().increment(&shift)?);
        if !d.next().is_absent() {
            moved.set_next(d.next().increment(&shift)?);
        } else if *d.revision() == b_start {
            // the old tail of the newer trunk continues into the older one
            moved.set_next(a_head.clone());
        }
        let branches = d.branches().iter()
            .map(|b| b.increment(&shift))
            .collect::<Result<Vec<Num>>>()?;
        moved.set_branches(branches);
        joined.add_delta(moved)?;
    }
    joined.set_head(newer.head().increment(&shift)?)?;

    for &(ref name, ref num) in newer.symbols() {
        if joined.symbol(name).is_none() {
            let shifted = num.increment(&shift)?;
            joined.symbols.push((name.clone(), shifted));
        }
    }
    for &(ref user, ref num) in newer.locks() {
        if joined.lock(user).is_none() {
            let shifted = num.increment(&shift)?;
            joined.locks.push((user.clone(), shifted));
        }
    }
    for user in newer.access() {
        if !joined.access.contains(user) {
            joined.access.push(user.clone());
        }
    }
    if !newer.branch().is_absent() {
        joined.set_branch(newer.branch().increment(&shift)?);
    }

    joined.validate()?;
    debug!("joined {} revisions above {} (shift {})",
        newer.deltas().len(), a_head, shift);
    Ok(joined)
}

/// Swap a branch hanging off the head with the top of the trunk.
///
/// `branch` is a branch identifier (odd component count) forking at the
/// current head, e.g. `1.3.1`. Its k-th revision becomes trunk revision
/// `head + 0.k`; the branch tip becomes the new head and takes over the
/// snapshot, while each displaced revision (the old head included) is
/// re-expressed as the ed script against its new successor's text, so
/// every original revision reconstructs to the same text afterwards.
/// Forks below the head and branch revisions carrying sub-branches are
/// not supported.
pub fn pivot_branch(rcs: &Rcs, branch: &Num) -> Result<Rcs> {
    if !branch.is_branch() || branch.len() < 3 {
        return ArgError::err("not a branch identifier");
    }
    let fork = branch.prefix(branch.len() - 1);
    if fork != *rcs.head() {
        return InvariantViolation::err("branch", "only a branch forking at the head can be pivoted");
    }
    let fork_delta = match rcs.delta(&fork) {
        Some(d) => d,
        None => return UnknownRevision::err(fork.clone()),
    };
    let first = match fork_delta.branches().iter().find(|b| b.starts_with(branch)) {
        Some(b) => b.clone(),
        None => return UnknownRevision::err(branch.clone()),
    };

    // walk the branch to its tip
    let mut chain: Vec<Num> = Vec::new();
    let mut cur = match rcs.delta(&first) {
        Some(d) => d,
        None => return UnknownRevision::err(first.clone()),
    };
    loop {
        if !cur.branches().is_empty() {
            return InvariantViolation::err("branches", "pivoted revisions may not carry branches of their own");
        }
        if !cur.revision().starts_with(branch) {
            return InvariantViolation::err("next", "branch walk left the branch");
        }
        chain.push(cur.revision().clone());
        if chain.len() > rcs.deltas().len() {
            return InvariantViolation::err("next", "next links form a cycle");
        }
        if cur.next().is_absent() {
            break;
        }
        cur = match rcs.delta(cur.next()) {
            Some(d) => d,
            None => return UnknownRevision::err(cur.next().clone()),
        };
    }

    let fork_text = rcs.revision_text(&fork)?;
    let mut texts = Vec::with_capacity(chain.len());
    for rev in &chain {
        texts.push(rcs.revision_text(rev)?);
    }
    let mut renumbered = Vec::with_capacity(chain.len());
    for k in 0..chain.len() {
        let off: Num = format!("0.{}", k + 1).parse()?;
        renumbered.push(fork.increment(&off)?);
    }

    let mut out = rcs.clone();
    let last = chain.len() - 1;
    for k in 0..chain.len() {
        let mut d = out.remove_delta(&chain[k])?;
        d.set_revision(renumbered[k].clone());
        d.set_next(if k == 0 { fork.clone() } else { renumbered[k - 1].clone() });
        if k == last {
            d.set_text(texts[k].clone(), false);
        } else {
            d.set_text(diff::between(&texts[k + 1], &texts[k]), true);
        }
        out.add_delta(d)?;
    }

    // the old head loses the fork entry and its snapshot
    if let Some(d) = out.delta_mut(&fork) {
        let branches = d.branches().iter()
            .filter(|b| !b.starts_with(branch))
            .cloned()
            .collect();
        d.set_branches(branches);
        d.set_text(diff::between(&texts[0], &fork_text), true);
    }
    out.set_head(renumbered[last].clone())?;

    for &mut (_, ref mut num) in out.symbols.iter_mut() {
        if let Some(k) = chain.iter().position(|c| c == num) {
            *num = renumbered[k].clone();
        }
    }
    for &mut (_, ref mut num) in out.locks.iter_mut() {
        if let Some(k) = chain.iter().position(|c| c == num) {
            *num = renumbered[k].clone();
        }
    }
    if out.branch.starts_with(branch) {
        out.set_branch(Num::absent());
    }

    out.validate()?;
    debug!("pivoted branch {} ({} revisions) onto the trunk at {}",
        branch, chain.len(), fork);
    Ok(out)
}

/// Rewrite the author of every delta checked in by `old` to `new`.
/// Returns how many deltas changed; nothing else is modified.
pub fn rename_author(rcs: &mut Rcs, old: &str, new: &str) -> Result<usize> {
    let mut renamed = 0;
    rcs.map_deltas(|d| {
        if d.author() == old {
            d.set_author(new.to_string());
            renamed += 1;
        }
    })?;
    Ok(renamed)
}

#[cfg(test)]
fn chain_rcs(texts: &[&str]) -> Rcs {
    // build a trunk 1.1..1.N from newest to oldest snapshot texts
    use file::sample_delta;
    let mut rcs = Rcs::new();
    let n = texts.len();
    for (i, text) in texts.iter().enumerate().rev() {
        let rev = format!("1.{}", i + 1);
        let next = if i == 0 { String::new() } else { format!("1.{}", i) };
        let d = if i == n - 1 {
            sample_delta(&rev, &next, text, false)
        } else {
            sample_delta(&rev, &next, &diff::between(texts[i + 1], text), true)
        };
        rcs.deltas.push(d);
    }
    rcs.head = format!("1.{}", n).parse().unwrap();
    rcs.desc = "chain\n".to_string();
    rcs
}

#[test]
fn join_histories() {
    let rev = |s: &str| s.parse::<Num>().unwrap();
    let mut older = chain_rcs(&["a\n", "a\nb\n", "a\nb\nc\n", "a\nb\nc\nd\n"]);
    older.set_symbols(vec![("start".to_string(), rev("1.1"))]);
    let mut newer = chain_rcs(&["a\nb\nc\nd\n", "a\nb\nc\nd\ne\n", "x\nb\nc\nd\ne\n"]);
    newer.set_symbols(vec![
        ("start".to_string(), rev("1.2")),
        ("fin".to_string(), rev("1.3")),
    ]);
    newer.set_locks(vec![("kr".to_string(), rev("1.3"))]);

    let joined = join(&older, &newer).unwrap();
    assert_eq!(*joined.head(), rev("1.7"));
    assert_eq!(joined.deltas().len(), 7);

    // the demoted head holds the identity script
    let former = joined.delta(&rev("1.4")).unwrap();
    assert!(former.is_diff());
    assert_eq!(former.text(), "");

    // every original text reconstructs
    assert_eq!(joined.revision_text(&rev("1.1")).unwrap(), "a\n");
    assert_eq!(joined.revision_text(&rev("1.4")).unwrap(), "a\nb\nc\nd\n");
    assert_eq!(joined.revision_text(&rev("1.5")).unwrap(), "a\nb\nc\nd\n");
    assert_eq!(joined.revision_text(&rev("1.6")).unwrap(), "a\nb\nc\nd\ne\n");
    assert_eq!(joined.revision_text(&rev("1.7")).unwrap(), "x\nb\nc\nd\ne\n");

    // older's symbol wins the name clash; newer's bindings are shifted
    assert_eq!(joined.symbol("start"), Some(&rev("1.1")));
    assert_eq!(joined.symbol("fin"), Some(&rev("1.7")));
    assert_eq!(joined.lock("kr"), Some(&rev("1.7")));

    // inputs are untouched
    assert_eq!(*older.head(), rev("1.4"));
    assert!(!older.delta(&rev("1.4")).unwrap().is_diff());
}

#[test]
fn join_requires_matching_texts() {
    let older = chain_rcs(&["a\n", "a\nb\n"]);
    let newer = chain_rcs(&["mismatch\n", "mismatch\nmore\n"]);
    assert!(join(&older, &newer).is_err());
}

#[test]
fn pivot_swaps_branch_and_trunk() {
    use file::sample_delta;
    let rev = |s: &str| s.parse::<Num>().unwrap();

    let mut rcs = chain_rcs(&["old\n", "base\n"]);
    // a two-revision branch off the head
    rcs.deltas.push(sample_delta("1.2.1.1", "1.2.1.2",
        &diff::between("base\n", "base\nb1\n"), true));
    rcs.deltas.push(sample_delta("1.2.1.2", "",
        &diff::between("base\nb1\n", "base\nb1\nb2\n"), true));
    rcs.delta_mut(&rev("1.2")).unwrap().set_branches(vec![rev("1.2.1.1")]);
    rcs.set_symbols(vec![("btag".to_string(), rev("1.2.1.2"))]);
    rcs.validate().unwrap();

    let out = pivot_branch(&rcs, &rev("1.2.1")).unwrap();
    assert_eq!(*out.head(), rev("1.4"));
    assert_eq!(out.revision_text(&rev("1.4")).unwrap(), "base\nb1\nb2\n");
    assert_eq!(out.revision_text(&rev("1.3")).unwrap(), "base\nb1\n");
    assert_eq!(out.revision_text(&rev("1.2")).unwrap(), "base\n");
    assert_eq!(out.revision_text(&rev("1.1")).unwrap(), "old\n");
    assert!(out.delta(&rev("1.2")).unwrap().branches().is_empty());
    assert_eq!(out.symbol("btag"), Some(&rev("1.4")));

    // the fork must be at the head
    let deeper = pivot_branch(&rcs, &rev("1.1.1"));
    assert!(deeper.is_err());
    assert!(pivot_branch(&rcs, &rev("1.2")).is_err());
}

#[test]
fn rename_author_rewrites_only_matches() {
    let mut rcs = chain_rcs(&["a\n", "a\nb\n"]);
    rcs.delta_mut(&"1.1".parse().unwrap()).unwrap().set_author("olduser".to_string());
    let renamed = rename_author(&mut rcs, "olduser", "newuser").unwrap();
    assert_eq!(renamed, 1);
    assert_eq!(rcs.delta(&"1.1".parse().unwrap()).unwrap().author(), "newuser");
    assert_eq!(rcs.delta(&"1.2".parse().unwrap()).unwrap().author(), "kr");
}
