// Windows backend: CreatePipe with inheritable handles plus a detached
// std::process spawn. The handle values travel to the GUI as decimal argv
// strings, so both must be marked inheritable before the spawn.

use std::fs::File;
use std::io;
use std::os::windows::io::FromRawHandle;
use std::path::Path;
use std::process::Command;

use windows::Win32::Foundation::HANDLE;
use windows::Win32::Security::SECURITY_ATTRIBUTES;
use windows::Win32::System::Pipes::CreatePipe;

use crate::pipe::{PipeReader, PipeWriter};

const PIPE_BUFFER_SIZE: u32 = 16384;

pub(super) fn create_pipe_pair() -> io::Result<(PipeReader, PipeWriter)> {
    let mut read_handle = HANDLE::default();
    let mut write_handle = HANDLE::default();
    let attributes = SECURITY_ATTRIBUTES {
        nLength: std::mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
        lpSecurityDescriptor: std::ptr::null_mut(),
        bInheritHandle: true.into(),
    };

    unsafe {
        CreatePipe(
            &mut read_handle,
            &mut write_handle,
            Some(&attributes),
            PIPE_BUFFER_SIZE,
        )
    }
    .map_err(io::Error::other)?;

    let reader = unsafe { File::from_raw_handle(read_handle.0 as _) };
    let writer = unsafe { File::from_raw_handle(write_handle.0 as _) };
    Ok((
        PipeReader::from_parts(reader, read_handle.0 as u64),
        PipeWriter::from_parts(writer, write_handle.0 as u64),
    ))
}

/// Spawn without waiting. Inheritable handles flow to the child.
pub(super) fn spawn_detached(path: &Path, args: &[String]) -> io::Result<()> {
    Command::new(path).args(args).spawn().map(|_| ())
}
