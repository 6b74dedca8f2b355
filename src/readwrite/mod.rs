/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Support for reading and writing RCS `,v` source
//!
//! `read_rcs` and `write_rcs` convert between raw bytes and the `Rcs`
//! model. Both operate on in-memory buffers; file handling belongs to the
//! caller.

mod lex;
mod read;
mod write;

pub use self::read::read_rcs;
pub use self::write::write_rcs;
