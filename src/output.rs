//! Output naming and writing for rendered animations.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LissajousError;

/// Where a rendered animation goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// A file on disk.
    File(PathBuf),
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Generate an output filename with a unix timestamp.
#[must_use]
pub fn auto_filename() -> String {
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("lissajous-{timestamp}.gif")
}

/// Resolve the destination: `-` is stdout, otherwise the explicit path or an
/// auto-generated file name.
#[must_use]
pub fn resolve_destination(explicit: Option<&str>) -> Destination {
    match explicit {
        Some("-") => Destination::Stdout,
        Some(p) => Destination::File(PathBuf::from(p)),
        None => Destination::File(PathBuf::from(auto_filename())),
    }
}

/// Run `write` against the destination, flushing when it returns.
///
/// A file destination is removed again if `write` or the flush fails.
///
/// # Errors
///
/// Returns an error if the file cannot be created or `write` fails.
pub fn write_to<T, F>(destination: &Destination, write: F) -> Result<T, LissajousError>
where
    F: FnOnce(&mut dyn Write) -> Result<T, LissajousError>,
{
    match destination {
        Destination::Stdout => {
            let mut out = std::io::stdout().lock();
            let value = write(&mut out)?;
            out.flush()?;
            Ok(value)
        }
        Destination::File(path) => write_file(path, write),
    }
}

fn write_file<T, F>(path: &Path, write: F) -> Result<T, LissajousError>
where
    F: FnOnce(&mut dyn Write) -> Result<T, LissajousError>,
{
    let mut out = BufWriter::new(std::fs::File::create(path)?);
    let result = write(&mut out).and_then(|value| {
        out.flush()?;
        Ok(value)
    });
    if result.is_err() {
        drop(out);
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
        }
    }
    result
}
