#[macro_use]
extern crate clap;

use clap::Arg;
use decomp::Error as DecompError;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum Error {
    Decomp(DecompError),
    Io(std::io::Error, PathBuf),
    /// The input has fewer than two functions, so there is no "second
    /// parsed function" to dump (§6).
    NoSecondFunction,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => write!(f, "reading file \"{}\" failed: {}", path.display(), err),
            Error::Decomp(err) => write!(f, "{}", err),
            Error::NoSecondFunction => write!(f, "input must contain at least two functions"),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("FILE")
                .help("Sets the MIPS assembly file to analyze")
                .required(true)
                .index(1),
        )
        .get_matches();

    let filename = matches.value_of("FILE").unwrap();

    if let Err(err) = run(filename) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(filename: &str) -> Result<(), Error> {
    let path = Path::new(filename);
    let file = File::open(path).map_err(|err| Error::Io(err, path.to_owned()))?;
    let mut input = String::new();
    BufReader::new(file)
        .read_to_string(&mut input)
        .map_err(|err| Error::Io(err, path.to_owned()))?;

    let program = decomp::assemble(filename, &input).map_err(Error::Decomp)?;
    let function = program.functions.get(1).ok_or(Error::NoSecondFunction)?;

    println!("{}", function);

    let analysis = decomp::analyze_function(function).map_err(Error::Decomp)?;
    println!("{}", analysis.describe());

    Ok(())
}
