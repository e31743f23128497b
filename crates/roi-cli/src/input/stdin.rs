use serde_json::Value;
use std::io::{self, Read};

/// Read a piped scenario (or sweep) document, e.g. `cat demos/managed_rental.json | roi project`.
///
/// Yields None on an interactive terminal or blank input, in which case the
/// command builds its input from flags instead.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(trimmed)?))
}
