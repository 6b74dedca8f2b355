/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Rewrite the author recorded on every matching delta of an RCS file

extern crate docopt;
extern crate env_logger;
extern crate rcsfile;
extern crate serde;

use std::fs;
use std::io::{self, Write};
use std::process::exit;

use docopt::Docopt;
use serde::Deserialize;

use rcsfile::{read_rcs, write_rcs, rename_author};
use rcsfile::error::Result;

const USAGE: &'static str = "
Replace one committer name with another throughout an RCS file's history.
Only the author field of each delta changes.

Usage:
  rename_user <rcsfile> <old> <new> [-o FILE]
  rename_user --help

Options:
  -o FILE       Write the rewritten history to FILE instead of stdout.
  -h --help     Show this message.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_rcsfile: String,
    arg_old: String,
    arg_new: String,
    flag_o: Option<String>,
}

fn main() {
    env_logger::init();
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    if let Err(e) = run(&args) {
        let _ = writeln!(io::stderr(), "rename_user: {}", e);
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut rcs = read_rcs(&fs::read(&args.arg_rcsfile)?)?;
    let renamed = rename_author(&mut rcs, &args.arg_old, &args.arg_new)?;
    let _ = writeln!(io::stderr(), "rename_user: {} deltas updated", renamed);

    let mut buf = Vec::new();
    write_rcs(&rcs, &mut buf)?;
    match args.flag_o {
        Some(ref path) => fs::write(path, &buf)?,
        None => io::stdout().write_all(&buf)?,
    }
    Ok(())
}
