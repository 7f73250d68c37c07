use std::{
    fs::File,
    io::{self, BufRead, BufReader},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Streams lines from a mix of file paths, `http(s)://` URLs and `-`
/// (stdin). No inputs at all means stdin.
pub fn read_lines<F>(inputs: &[String], mut f: F) -> Result<(), Error>
where
    F: FnMut(&str),
{
    if inputs.is_empty() {
        return read_stdin(&mut f);
    }
    for item in inputs {
        if item == "-" {
            read_stdin(&mut f)?;
        } else if item.starts_with("http://") || item.starts_with("https://") {
            let content = reqwest::blocking::get(item.as_str())?.text()?;
            for line in content.lines() {
                f(line);
            }
        } else {
            let file = File::open(item)?;
            for line in BufReader::new(file).lines() {
                f(&line?);
            }
        }
    }
    Ok(())
}

fn read_stdin<F>(f: &mut F) -> Result<(), Error>
where
    F: FnMut(&str),
{
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        f(&line?);
    }
    Ok(())
}
