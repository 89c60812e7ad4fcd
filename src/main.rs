// This file is part of edn, an EDN reader.
// Copyright (C) 2026
//
// edn is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// edn is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with edn.  If not, see <http://www.gnu.org/licenses/>.

//! A thin CLI harness: read a file or stdin, parse it as EDN, and
//! print a debug rendering of the tree or the error.

use std::env::args;
use std::fs::File;
use std::io::{self, stderr, stdin, stdout, Read, Write};

use edn::{read, Arena, ParseOptions};

/// The name of the reader.
pub const PROGRAM_NAME: &str = "edn";

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(stderr)
        .init();

    let mut args = args();
    args.next();

    let mut buffer = String::new();

    if args.len() == 0 {
        writeln!(stderr(), "{}: reading stdin", PROGRAM_NAME)?;
        stdin().read_to_string(&mut buffer)?;
    } else {
        for arg in args {
            if arg == "-" {
                writeln!(stderr(), "{}: reading stdin", PROGRAM_NAME)?;
                stdin().read_to_string(&mut buffer)?;
            } else {
                writeln!(stderr(), "{}: reading {}", PROGRAM_NAME, arg)?;
                File::open(arg)?.read_to_string(&mut buffer)?;
            }
        }
    }

    let arena = Arena::new();
    match read(&arena, buffer.as_bytes(), &ParseOptions::new()) {
        Ok(doc) => {
            writeln!(stdout(), "{}", doc.root)?;
            writeln!(stdout(), "{:#?}", doc.root)?;
        }
        Err(e) => {
            writeln!(stderr(), "{}: {} at {}: {}", PROGRAM_NAME, e.kind, e.location, e.message)?;
            std::process::exit(1);
        }
    }

    Ok(())
}
