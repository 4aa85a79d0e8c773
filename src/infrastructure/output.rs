use crate::domain::entities::{OutputTarget, Response};
use crate::domain::errors::CommandError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes a response body to the command's output stream or to a file.
///
/// The response is consumed, so its body is released on every path. Files
/// are opened without truncation: a shorter body overwrites only the start of
/// an existing file.
pub struct ResponseRouter;

impl ResponseRouter {
    pub fn route<W: Write + ?Sized>(
        response: Response,
        target: &OutputTarget,
        writer: &mut W,
    ) -> Result<u64, CommandError> {
        match target {
            OutputTarget::Stdout => {
                writer
                    .write_all(&response.body)
                    .and_then(|_| writer.flush())
                    .map_err(|e| CommandError::io("write", "<stdout>", e))?;
            }
            OutputTarget::File(path) => {
                let mut file = Self::open(path)?;
                file.write_all(&response.body)
                    .and_then(|_| file.flush())
                    .map_err(|e| CommandError::io("write", path, e))?;
                debug!(path = %path.display(), bytes = response.body.len(), "saved response");
            }
        }

        Ok(response.body.len() as u64)
    }

    fn open(path: &Path) -> Result<File, CommandError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        set_mode(&mut options);
        options
            .open(path)
            .map_err(|e| CommandError::io("open", path, e))
    }
}

#[cfg(unix)]
fn set_mode(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o644);
}

#[cfg(not(unix))]
fn set_mode(_options: &mut OpenOptions) {}
