// Unidirectional byte channels between the simulation and the renderer GUI.
//
// There is no length prefix on the wire: message boundaries are implied by
// each opcode's fixed payload size, so reads must accumulate partial
// deliveries until the exact requested length has arrived. `read_exact`
// provides that loop and surfaces a closed pipe as `UnexpectedEof` instead
// of spinning on zero-length reads.

use std::fs::File;
use std::io::{self, Read, Write};

/// Read end of an anonymous pipe pair.
pub struct PipeReader {
    file: File,
    raw: u64,
}

/// Write end of an anonymous pipe pair.
pub struct PipeWriter {
    file: File,
    raw: u64,
}

impl PipeReader {
    pub(crate) fn from_parts(file: File, raw: u64) -> Self {
        Self { file, raw }
    }

    /// OS identifier handed to the GUI as a decimal argv string
    /// (fd number on unix, handle value on windows).
    pub(crate) fn raw_id(&self) -> u64 {
        self.raw
    }
}

impl PipeWriter {
    pub(crate) fn from_parts(file: File, raw: u64) -> Self {
        Self { file, raw }
    }

    pub(crate) fn raw_id(&self) -> u64 {
        self.raw
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
