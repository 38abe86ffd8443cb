use env_logger::{Builder, Logger, Target};
use std::fs::File;
use std::io;
use std::path::Path;

/// Where the terminal build writes its log while the alternate screen is up.
pub const LOG_FILE: &str = "flappybox.log";

/// Build a logger that writes to `path` instead of stderr.
pub fn file_logger(mut builder: Builder, path: &Path) -> io::Result<Logger> {
    let file = File::create(path)?;
    Ok(builder.target(Target::Pipe(Box::new(file))).build())
}

/// Install the file logger when `RUST_LOG` is set. Without it logging stays off,
/// so a plain run never touches the filesystem.
pub fn init() -> io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let logger = file_logger(Builder::from_default_env(), Path::new(LOG_FILE))?;
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log::set_max_level(max_level);
    Ok(())
}
