use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read a small sysfs attribute with trailing whitespace removed.
pub fn read_trimmed(file: &Path) -> io::Result<String> {
    let mut reader = String::with_capacity(16);
    File::open(file)?.read_to_string(&mut reader)?;
    reader.truncate(reader.trim_end().len());
    Ok(reader)
}

/// Read a numeric sysfs attribute such as `brightness`.
pub fn read_number<N>(file: &Path) -> io::Result<N>
where
    N: std::str::FromStr,
{
    let mut reader = [0u8; 32];
    let n = File::open(file)?.read(&mut reader)?;
    // parse and trim would complain about `\0`.
    let number = std::str::from_utf8(&reader[..n])
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        .trim_matches(|c: char| c.is_whitespace() || c == '\0');
    number.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not a number: {:?}", file.display(), number),
        )
    })
}

/// Read a binary attribute. A missing file yields `None`.
pub fn read_bytes(file: &Path) -> io::Result<Option<Vec<u8>>> {
    match std::fs::read(file) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
