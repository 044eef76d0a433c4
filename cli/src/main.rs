//! beecs command line runner
//!
//! Reads a parameter document from a file argument (or stdin when the
//! argument is absent or `-`), runs the simulation in-process and prints
//! the result document. The exit code mirrors the FFI status codes:
//! 0 ok, 1 decode, 2 simulation, 3 encode.

use beecs_core_rs::{run, ResultDocument};
use std::io::Read;
use std::process;

const USAGE: &str = "usage: beecs [params.json | -]\n\
    Reads a JSON parameter document and prints the result document.";

fn read_params() -> Result<String, String> {
    match std::env::args().nth(1).as_deref() {
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            process::exit(0);
        }
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path, e)),
    }
}

fn main() {
    let params = match read_params() {
        Ok(params) => params,
        Err(err) => {
            eprintln!("beecs: {}", err);
            process::exit(4);
        }
    };

    let (document, code) = match run(&params) {
        Ok(doc) => (doc, 0),
        Err(err) => (ResultDocument::failure(err.kind(), &err.to_string()), err.code()),
    };

    match document.to_json() {
        Ok(json) => {
            println!("{}", json);
            process::exit(code);
        }
        Err(err) => {
            eprintln!("beecs: {}", err);
            process::exit(3);
        }
    }
}
