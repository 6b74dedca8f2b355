/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! rcsfile library
//!
//! rcsfile reads, manipulates and writes the `,v` files kept by the
//! Revision Control System: the append-only text format holding a tracked
//! file's complete revision history, defined by the `rcsfile(5)` manpage.
//! It is meant for surgery the stock RCS tools refuse to perform — joining
//! the histories of two files, renaming committers, rewriting revision
//! numbers, pivoting a branch onto the trunk, reconstructing any revision's
//! text — and so it models the whole file rather than a working copy.
//!
//! A history is a [`Rcs`]: the admin section (head, default branch, access
//! list, symbols, locks, comment and expand strings) plus one [`RcsDelta`]
//! per revision. The head delta stores the file text outright; every other
//! delta stores an ed script against a neighbouring revision, applied on
//! demand by `Rcs::revision_text`. Revision numbers are [`Num`] values with
//! the positional arithmetic renumbering operations need.
//!
//! Reading and writing go through `read_rcs` and `write_rcs`, which work on
//! in-memory buffers; all I/O and locking is the caller's business. The
//! library is synchronous and keeps no global state: each `Rcs` is an
//! independent value, safe to hand to another thread.
//!
//! Terminology follows `rcsfile(5)`:
//!
//! *   **head** — the newest trunk revision; the one stored as a snapshot
//! *   **trunk** — the main chain of revisions, walked from the head by
//!     following `next` links back to the start (typically `1.1`)
//! *   **branch** — a fork named by an odd-length number such as `1.3.1`,
//!     whose revisions are walked forward from the fork point
//! *   **delta** — one revision's metadata plus its snapshot or ed script
//!
//! Known limitations: input must be UTF-8 (the format technically permits
//! bare high bytes), and the `newphrase` grammar of RCS 5.6 and earlier is
//! not recognised; unknown phrases in the 5.9 shape are captured and
//! re-emitted. Keyword expansion and lock enforcement are out of scope.

#![warn(missing_docs)]

#[macro_use]
extern crate log;
extern crate chrono;
extern crate regex;

#[cfg(test)]
extern crate rand;

pub use delta::{Phrase, RcsDelta, Word};
pub use edit::{join, pivot_branch, rename_author};
pub use file::Rcs;
pub use num::Num;
pub use readwrite::{read_rcs, write_rcs};

pub mod date;
pub mod diff;
pub mod error;

mod delta;
mod edit;
mod file;
mod num;
mod readwrite;

/// The revision of the `rcsfile(5)` manpage this library implements.
/// Files using the pre-5.9 `newphrase` grammar are not accepted.
pub const FORMAT_VERSION: &'static str = "5.9.2";
