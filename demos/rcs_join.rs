/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Concatenate the histories of two RCS files

extern crate docopt;
extern crate env_logger;
extern crate rcsfile;
extern crate serde;

use std::fs;
use std::io::{self, Write};
use std::process::exit;

use docopt::Docopt;
use serde::Deserialize;

use rcsfile::{read_rcs, write_rcs, join};
use rcsfile::error::Result;

const USAGE: &'static str = "
Join two RCS histories into one file. The second file's earliest revision
must contain exactly the text of the first file's head revision; its
revisions are renumbered to continue the first file's trunk.

Usage:
  rcs_join <older> <newer> [-o FILE]
  rcs_join --help

Options:
  -o FILE       Write the joined history to FILE instead of stdout.
  -h --help     Show this message.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_older: String,
    arg_newer: String,
    flag_o: Option<String>,
}

fn main() {
    env_logger::init();
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    if let Err(e) = run(&args) {
        let _ = writeln!(io::stderr(), "rcs_join: {}", e);
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let older = read_rcs(&fs::read(&args.arg_older)?)?;
    let newer = read_rcs(&fs::read(&args.arg_newer)?)?;
    let joined = join(&older, &newer)?;

    let mut buf = Vec::new();
    write_rcs(&joined, &mut buf)?;
    match args.flag_o {
        Some(ref path) => fs::write(path, &buf)?,
        None => io::stdout().write_all(&buf)?,
    }
    Ok(())
}
