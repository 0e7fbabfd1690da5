// Unix backend: pipe(2) plus a detached std::process spawn.

use std::fs::File;
use std::io;
use std::os::unix::io::FromRawFd;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;

use super::GUI_APP_NAME;
use crate::pipe::{PipeReader, PipeWriter};

/// Descriptors from pipe(2) are not close-on-exec, so whichever ends are
/// still open at spawn time are inherited by the GUI.
pub(super) fn create_pipe_pair() -> io::Result<(PipeReader, PipeWriter)> {
    let mut fds = [0i32; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let reader = unsafe { File::from_raw_fd(fds[0]) };
    let writer = unsafe { File::from_raw_fd(fds[1]) };
    Ok((
        PipeReader::from_parts(reader, fds[0] as u64),
        PipeWriter::from_parts(writer, fds[1] as u64),
    ))
}

/// Spawn without waiting; argv[0] carries the bare app name.
pub(super) fn spawn_detached(path: &Path, args: &[String]) -> io::Result<()> {
    Command::new(path)
        .arg0(GUI_APP_NAME)
        .args(args)
        .spawn()
        .map(|_| ())
}
