// Wire protocol shared with the renderer GUI.
//
// Unversioned and never negotiated: both executables bake in the same opcode
// table and payload layouts, and both run on the same host, so all multi-byte
// fields travel in native byte order.

pub mod command;
pub mod event;
pub mod wire;

pub use command::{Command, MeshPlacement};
pub use event::GuiEvent;

/// One-byte message tags. The outbound (simulation → GUI) and inbound
/// (GUI → simulation) spaces are disjoint and fixed at design time.
pub mod opcode {
    pub const BEGIN_SCENE: u8 = 1;
    pub const END_SCENE: u8 = 2;
    pub const DEFINE_MESH: u8 = 3;
    pub const ADD_POINT_MESH: u8 = 4;
    pub const ADD_WIREFRAME_MESH: u8 = 5;
    pub const ADD_SOLID_MESH: u8 = 6;
    pub const ADD_LINE: u8 = 7;
    pub const ADD_TEXT: u8 = 8;
    pub const ADD_FRAME: u8 = 9;
    pub const SET_CAMERA: u8 = 10;
    pub const ZOOM_CAMERA: u8 = 11;
    pub const SET_FIELD_OF_VIEW: u8 = 12;
    pub const SET_CLIP_PLANES: u8 = 13;
    pub const SET_GROUND_POSITION: u8 = 14;
    pub const DEFINE_MENU: u8 = 15;

    // Inbound events.
    pub const KEY_PRESSED: u8 = 16;
    pub const MENU_SELECTED: u8 = 17;
}
