/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Swap a branch at the head of an RCS file with the top of its trunk

extern crate docopt;
extern crate env_logger;
extern crate rcsfile;
extern crate serde;

use std::fs;
use std::io::{self, Write};
use std::process::exit;

use docopt::Docopt;
use serde::Deserialize;

use rcsfile::{read_rcs, write_rcs, pivot_branch, Num};
use rcsfile::error::Result;

const USAGE: &'static str = "
Turn a branch forking at the head revision into the top of the trunk,
renumbering its revisions and re-expressing the displaced deltas so that
every revision's text is preserved.

Usage:
  pivot_branch <rcsfile> <branch> [-o FILE]
  pivot_branch --help

Options:
  -o FILE       Write the pivoted history to FILE instead of stdout.
  -h --help     Show this message.

<branch> is a branch number such as 1.3.1.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_rcsfile: String,
    arg_branch: String,
    flag_o: Option<String>,
}

fn main() {
    env_logger::init();
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    if let Err(e) = run(&args) {
        let _ = writeln!(io::stderr(), "pivot_branch: {}", e);
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let rcs = read_rcs(&fs::read(&args.arg_rcsfile)?)?;
    let branch: Num = args.arg_branch.parse()?;
    let pivoted = pivot_branch(&rcs, &branch)?;

    let mut buf = Vec::new();
    write_rcs(&pivoted, &mut buf)?;
    match args.flag_o {
        Some(ref path) => fs::write(path, &buf)?,
        None => io::stdout().write_all(&buf)?,
    }
    Ok(())
}
