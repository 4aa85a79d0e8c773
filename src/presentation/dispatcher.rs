use crate::domain::errors::CommandError;
use crate::infrastructure::config::Config;
use crate::presentation::cli::{self, HttpCommand};
use anyhow::Result;
use std::ffi::OsString;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid sub-command specified")]
    InvalidSubCommand,
}

pub fn print_usage<W: Write + ?Sized>(writer: &mut W) -> Result<()> {
    writeln!(writer, "Usage: mync [http] -h")?;
    writeln!(writer)?;
    writeln!(writer, "{}", cli::usage())?;
    Ok(())
}

/// Converts raw process arguments, replacing invalid Unicode with U+FFFD
/// instead of panicking.
pub fn args_lossy<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Routes `mync <sub-command> ...` to its handler. Invocation errors are
/// echoed to `writer` followed by the usage text before being returned.
pub async fn handle_command<W: Write + ?Sized>(
    writer: &mut W,
    args: &[String],
    config: &Config,
) -> Result<()> {
    let result = match args.split_first() {
        Some((command, rest)) if command == "http" => HttpCommand::new(config.clone())
            .run(writer, rest)
            .await
            .map_err(anyhow::Error::from),
        Some((flag, _)) if matches!(flag.as_str(), "-h" | "-help" | "--help") => print_usage(writer),
        _ => Err(DispatchError::InvalidSubCommand.into()),
    };

    if let Err(err) = &result {
        if wants_usage(err) {
            writeln!(writer, "{}", err)?;
            print_usage(writer)?;
        }
    }

    result
}

fn wants_usage(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DispatchError>().is_some()
        || err
            .downcast_ref::<CommandError>()
            .is_some_and(CommandError::wants_usage)
}
