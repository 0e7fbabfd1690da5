// Discovery and detached launch of the renderer GUI.
//
// The GUI is looked for beside the running executable first, then under the
// installation tree's bin directory. It is handed four positional arguments:
// its own name, the scene pipe's read end, the event pipe's write end (both
// as decimal strings) and the window title, quoted so embedded whitespace
// survives as a single argument.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as platform;

use log::{debug, info};
use std::env;
use std::path::PathBuf;

use crate::error::LinkError;
use crate::pipe::{PipeReader, PipeWriter};

/// File name of the companion renderer executable.
pub const GUI_APP_NAME: &str = "vizbridge-gui";

/// Environment override for the installation root searched second.
pub const INSTALL_DIR_ENV: &str = "VIZBRIDGE_INSTALL_DIR";

const INSTALL_IDENT: &str = "Vizbridge";

/// One anonymous pipe pair with endpoints the spawned GUI can inherit.
pub(crate) fn create_pipe_pair() -> Result<(PipeReader, PipeWriter), LinkError> {
    platform::create_pipe_pair().map_err(LinkError::PipeCreation)
}

/// Start the GUI detached, trying the local candidate then the installed
/// one. Both failing is fatal; there is no retry.
pub(crate) fn spawn_gui(
    scene_read: &PipeReader,
    event_write: &PipeWriter,
    title: &str,
) -> Result<(), LinkError> {
    let (local, installed) = candidate_paths();
    let args = [
        scene_read.raw_id().to_string(),
        event_write.raw_id().to_string(),
        quote_title(title),
    ];

    debug!("[LAUNCH] Trying '{}'", local.display());
    if let Err(first) = platform::spawn_detached(&local, &args) {
        debug!(
            "[LAUNCH] '{}' failed ({}), trying '{}'",
            local.display(),
            first,
            installed.display()
        );
        if platform::spawn_detached(&installed, &args).is_err() {
            return Err(LinkError::SpawnFailed { local, installed });
        }
    }

    info!("[LAUNCH] Renderer GUI started");
    Ok(())
}

/// Candidate paths: beside the running executable, then `<root>/bin/`.
fn candidate_paths() -> (PathBuf, PathBuf) {
    let local = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(GUI_APP_NAME)))
        .unwrap_or_else(|| PathBuf::from(GUI_APP_NAME));
    let installed = install_root().join("bin").join(GUI_APP_NAME);
    (local, installed)
}

fn install_root() -> PathBuf {
    if let Ok(dir) = env::var(INSTALL_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    #[cfg(windows)]
    {
        PathBuf::from(env::var("ProgramFiles").unwrap_or_else(|_| r"C:\Program Files".into()))
            .join(INSTALL_IDENT)
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/usr/local").join(INSTALL_IDENT)
    }
}

/// Quote a window title so it survives as a single command-line argument:
/// runs of whitespace are wrapped in quotes, and literal quote characters
/// are backslash-escaped while quoting is active.
pub(crate) fn quote_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len() + 2);
    let mut quoting = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !quoting {
                out.push('"');
                quoting = true;
            }
        } else {
            if quoting {
                out.push('"');
                quoting = false;
            }
            if ch == '"' {
                out.push('\\');
            }
        }
        out.push(ch);
    }
    out
}
