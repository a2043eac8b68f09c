use log::debug;
use rev_buf_reader::RevBufReader;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::time::Instant;

/// Last `n` lines of a text file, oldest first.
pub fn simple_tail(path: &Path, n: usize) -> io::Result<Vec<String>> {
    let start = Instant::now();
    let file = File::open(path)?;

    let buf = RevBufReader::new(file);
    let mut lines = buf
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.is_empty()))
        .take(n)
        .collect::<io::Result<Vec<String>>>()?;
    lines.reverse();

    debug!("simple_tail took: {} ms", start.elapsed().as_millis());
    Ok(lines)
}
