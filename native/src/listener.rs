// Inbound event decoding and listener dispatch.
//
// A single dedicated thread blocks on the event pipe for the life of the
// process: read one opcode byte, read that opcode's fixed payload, notify
// every registered listener in registration order, repeat. There is no
// shutdown signal; the loop ends only when the pipe closes or on a protocol
// violation.

use log::{debug, error};
use std::io::{ErrorKind, Read};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::error::LinkError;
use crate::logging;
use crate::protocol::event::GuiEvent;

/// Receives decoded GUI events. Implementations must tolerate being called
/// from the listener thread, not the thread that registered them.
pub trait SceneEventListener: Send + Sync {
    fn key_pressed(&self, key: u8, modifiers: u8);
    fn menu_selected(&self, item: i32);
}

/// Ordered, non-deduplicating listener registry. Owned by the link,
/// shared with the worker thread.
pub(crate) type ListenerSet = Arc<Mutex<Vec<Arc<dyn SceneEventListener>>>>;

/// What happens to the process when the decode loop stops.
#[derive(Debug, PartialEq, Eq)]
enum LoopExit {
    /// Renderer GUI went away; the thread ends quietly.
    PipeClosed,
    /// The inbound stream is corrupt and cannot be resynchronized;
    /// the whole process terminates.
    Fatal,
    /// Some other read failure; the thread ends after logging it.
    Failed,
}

/// Background worker draining the inbound pipe.
pub(crate) struct EventWorker;

impl EventWorker {
    /// Spawn the decode loop on a dedicated named thread.
    pub(crate) fn spawn(
        mut source: Box<dyn Read + Send>,
        listeners: ListenerSet,
    ) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("vizbridge-events".into())
            .spawn(move || {
                debug!("[EVENT] Listener thread started");
                let err = match Self::run(&mut *source, &listeners) {
                    Ok(()) => unreachable!("the decode loop has no normal exit"),
                    Err(err) => err,
                };
                match Self::classify(&err) {
                    LoopExit::PipeClosed => {
                        error!("[EVENT] Renderer GUI closed the event pipe; listener thread exiting");
                    }
                    LoopExit::Fatal => {
                        // A corrupt inbound stream has no resync strategy;
                        // the whole process dies, not just this thread.
                        logging::log_critical_error("Event decode", &err.to_string());
                        error!("[EVENT] {err}; aborting");
                        std::process::abort();
                    }
                    LoopExit::Failed => {
                        error!("[EVENT] Listener thread failed: {err}");
                    }
                }
            })
    }

    /// How a decode-loop exit is handled once `run` returns.
    fn classify(err: &LinkError) -> LoopExit {
        match err {
            LinkError::Io(io_err) if io_err.kind() == ErrorKind::UnexpectedEof => {
                LoopExit::PipeClosed
            }
            LinkError::ProtocolViolation(_) => LoopExit::Fatal,
            _ => LoopExit::Failed,
        }
    }

    fn run(source: &mut (dyn Read + Send), listeners: &ListenerSet) -> Result<(), LinkError> {
        let mut op = [0u8; 1];
        let mut payload = [0u8; 8];
        loop {
            source.read_exact(&mut op)?;
            let len = GuiEvent::payload_len(op[0])?;
            source.read_exact(&mut payload[..len])?;
            let event = GuiEvent::decode(op[0], &payload[..len])?;
            Self::dispatch(&event, listeners);
        }
    }

    fn dispatch(event: &GuiEvent, listeners: &ListenerSet) {
        let listeners = listeners.lock().unwrap();
        for listener in listeners.iter() {
            match *event {
                GuiEvent::KeyPressed { key, modifiers } => listener.key_pressed(key, modifiers),
                GuiEvent::MenuSelected { item } => listener.menu_selected(item),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Records every callback with a shared tag so ordering across multiple
    /// listeners is observable.
    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SceneEventListener for Recorder {
        fn key_pressed(&self, key: u8, modifiers: u8) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:key {} {}", self.tag, key, modifiers));
        }

        fn menu_selected(&self, item: i32) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:menu {}", self.tag, item));
        }
    }

    fn registry_with(log: &Arc<Mutex<Vec<String>>>, tags: &[&'static str]) -> ListenerSet {
        let listeners: Vec<Arc<dyn SceneEventListener>> = tags
            .iter()
            .map(|&tag| {
                Arc::new(Recorder {
                    tag,
                    log: Arc::clone(log),
                }) as Arc<dyn SceneEventListener>
            })
            .collect();
        Arc::new(Mutex::new(listeners))
    }

    #[test]
    fn test_events_dispatched_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listeners = registry_with(&log, &["a", "b"]);

        let mut stream = Vec::new();
        stream.extend(GuiEvent::KeyPressed { key: 27, modifiers: 1 }.encode());
        stream.extend(GuiEvent::MenuSelected { item: 7 }.encode());
        let mut source = Cursor::new(stream);

        // The loop ends with UnexpectedEof once the cursor is drained.
        let err = EventWorker::run(&mut source, &listeners).unwrap_err();
        assert!(matches!(err, LinkError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec!["a:key 27 1", "b:key 27 1", "a:menu 7", "b:menu 7"]
        );
    }

    #[test]
    fn test_unknown_opcode_stops_the_loop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listeners = registry_with(&log, &["a"]);

        let mut stream = GuiEvent::KeyPressed { key: 1, modifiers: 0 }.encode();
        stream.push(0xAB);
        let mut source = Cursor::new(stream);

        let err = EventWorker::run(&mut source, &listeners).unwrap_err();
        assert!(matches!(err, LinkError::ProtocolViolation(0xAB)));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_listener_is_notified_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listeners: ListenerSet = Arc::new(Mutex::new(Vec::new()));
        let listener: Arc<dyn SceneEventListener> = Arc::new(Recorder {
            tag: "dup",
            log: Arc::clone(&log),
        });
        listeners.lock().unwrap().push(Arc::clone(&listener));
        listeners.lock().unwrap().push(listener);

        EventWorker::dispatch(&GuiEvent::MenuSelected { item: 3 }, &listeners);
        assert_eq!(*log.lock().unwrap(), vec!["dup:menu 3", "dup:menu 3"]);
    }

    #[test]
    fn test_protocol_violation_takes_down_the_process() {
        // An unknown opcode must never be mistaken for a quiet thread exit
        // the way a closed pipe is.
        let violation = LinkError::ProtocolViolation(0xEE);
        assert_eq!(EventWorker::classify(&violation), LoopExit::Fatal);

        let eof = LinkError::Io(std::io::Error::from(ErrorKind::UnexpectedEof));
        assert_eq!(EventWorker::classify(&eof), LoopExit::PipeClosed);

        let broken = LinkError::Io(std::io::Error::from(ErrorKind::BrokenPipe));
        assert_eq!(EventWorker::classify(&broken), LoopExit::Failed);
    }
}
