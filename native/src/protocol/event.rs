// Inbound event messages (GUI → simulation).
//
// Both directions of this contract live here: the simulation only ever
// decodes, but the encode side pins down the exact layout a conformant GUI
// must produce.

use crate::error::LinkError;
use crate::protocol::opcode;
use crate::protocol::wire::{WireReader, WireWriter};

/// Events sent back by the renderer GUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiEvent {
    KeyPressed { key: u8, modifiers: u8 },
    MenuSelected { item: i32 },
}

impl GuiEvent {
    /// Payload size implied by an inbound opcode. Any opcode outside the
    /// inbound space is a protocol violation; there is no resync strategy.
    pub fn payload_len(op: u8) -> Result<usize, LinkError> {
        match op {
            opcode::KEY_PRESSED => Ok(2),
            opcode::MENU_SELECTED => Ok(4),
            other => Err(LinkError::ProtocolViolation(other)),
        }
    }

    /// Decode the payload of a previously read opcode byte.
    pub fn decode(op: u8, payload: &[u8]) -> Result<Self, LinkError> {
        let mut r = WireReader::new(payload);
        match op {
            opcode::KEY_PRESSED => Ok(GuiEvent::KeyPressed {
                key: r.take_u8()?,
                modifiers: r.take_u8()?,
            }),
            opcode::MENU_SELECTED => Ok(GuiEvent::MenuSelected {
                item: r.take_i32()?,
            }),
            other => Err(LinkError::ProtocolViolation(other)),
        }
    }

    /// Encode with leading opcode, exactly as the GUI writes it.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        match *self {
            GuiEvent::KeyPressed { key, modifiers } => {
                w.put_u8(opcode::KEY_PRESSED);
                w.put_u8(key);
                w.put_u8(modifiers);
            }
            GuiEvent::MenuSelected { item } => {
                w.put_u8(opcode::MENU_SELECTED);
                w.put_i32(item);
            }
        }
        w.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_round_trip() {
        let event = GuiEvent::KeyPressed {
            key: b'w',
            modifiers: 0b0101,
        };
        let bytes = event.encode();
        assert_eq!(bytes.len(), 3);
        let len = GuiEvent::payload_len(bytes[0]).unwrap();
        assert_eq!(len, 2);
        assert_eq!(GuiEvent::decode(bytes[0], &bytes[1..]).unwrap(), event);
    }

    #[test]
    fn test_menu_event_round_trip() {
        let event = GuiEvent::MenuSelected { item: -42_000 };
        let bytes = event.encode();
        assert_eq!(bytes.len(), 5);
        let len = GuiEvent::payload_len(bytes[0]).unwrap();
        assert_eq!(len, 4);
        assert_eq!(GuiEvent::decode(bytes[0], &bytes[1..]).unwrap(), event);
    }

    #[test]
    fn test_unknown_opcode_is_violation() {
        let err = GuiEvent::payload_len(0xEE).unwrap_err();
        assert!(matches!(err, LinkError::ProtocolViolation(0xEE)));
        let err = GuiEvent::decode(99, &[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, LinkError::ProtocolViolation(99)));
    }
}
