/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Print the text of the earliest trunk revision of an RCS file

extern crate docopt;
extern crate env_logger;
extern crate rcsfile;
extern crate serde;

use std::fs;
use std::io::{self, Write};
use std::process::exit;

use docopt::Docopt;
use serde::Deserialize;

use rcsfile::read_rcs;
use rcsfile::error::Result;

const USAGE: &'static str = "
Reconstruct the first commit stored in an RCS ,v file by walking the delta
chain down from the head and print it to standard output.

Usage:
  checkout_start <rcsfile>
  checkout_start --help

Options:
  -h --help     Show this message.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_rcsfile: String,
}

fn main() {
    env_logger::init();
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    if let Err(e) = run(&args) {
        let _ = writeln!(io::stderr(), "checkout_start: {}", e);
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let data = fs::read(&args.arg_rcsfile)?;
    let rcs = read_rcs(&data)?;
    let start = rcs.start_revision()?;
    if let Some(delta) = rcs.delta(&start) {
        match delta.date_time() {
            Ok(when) => {
                let _ = writeln!(io::stderr(), "checkout_start: revision {}, checked in {}",
                    start, when);
            }
            Err(_) => {
                let _ = writeln!(io::stderr(), "checkout_start: revision {}", start);
            }
        }
    }
    let text = rcs.revision_text(&start)?;
    print!("{}", text);
    Ok(())
}
