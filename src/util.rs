// util.rs

use std::io::{self, ErrorKind, Write};

/// Writes numbered history lines, treating a closed pipe as success.
pub fn write_listing<'a, W, I>(mut w: W, entries: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let result = entries
        .into_iter()
        .try_for_each(|(index, line)| writeln!(w, "{:>5}  {}", index, line))
        .and_then(|()| w.flush());
    match result {
        Err(ref e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
