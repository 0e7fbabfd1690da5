use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong on the simulation side of the link.
///
/// All of these are unrecoverable for the current connection: there is no
/// reconnection or resync path once the GUI has been launched.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Failed to open pipe: {0}")]
    PipeCreation(std::io::Error),
    #[error("Unable to spawn the renderer GUI; tried '{}' and '{}'", local.display(), installed.display())]
    SpawnFailed { local: PathBuf, installed: PathBuf },
    #[error("Text overlay cannot be longer than 256 bytes (got {0})")]
    TextTooLong(usize),
    #[error("Mesh cannot have more than 65536 vertices (got {0})")]
    TooManyVertices(usize),
    #[error("Mesh cannot have more than 65536 triangles (got {0})")]
    TooManyTriangles(usize),
    #[error("Menu does not fit the wire format: {0}")]
    MenuTooLarge(String),
    #[error("Unexpected opcode {0:#04x} received from the renderer GUI")]
    ProtocolViolation(u8),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
