// Outbound scene/control messages and their encodings.
//
// Each message is one opcode byte followed by a fixed-order payload; the only
// variable-length fields (mesh arrays, text, menu labels) carry an explicit
// count immediately before the data. Length invariants are validated here,
// before any bytes are produced.

use crate::error::LinkError;
use crate::protocol::opcode;
use crate::protocol::wire::WireWriter;

/// Longest text overlay the GUI accepts.
pub const MAX_TEXT_LEN: usize = 256;
/// 16-bit index space caps for user meshes.
pub const MAX_MESH_VERTICES: usize = 65536;
pub const MAX_MESH_TRIANGLES: usize = 65536;

/// Shared transform/scale/color payload for the three mesh representations.
/// Built-in shapes use reserved indices 0-3; user meshes start at 4.
#[derive(Debug, Clone, Copy)]
pub struct MeshPlacement {
    /// Body-fixed XYZ Euler angles, radians.
    pub rotation: [f32; 3],
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    pub color: [f32; 4],
    pub mesh_index: u16,
}

/// Every message the simulation can send to the GUI.
#[derive(Debug, Clone)]
pub enum Command {
    BeginScene,
    EndScene,
    DefineMesh {
        /// Flat positions, 3 floats per vertex.
        vertices: Vec<f32>,
        /// Flat connectivity, 3 indices per triangle.
        triangles: Vec<u16>,
    },
    AddPointMesh(MeshPlacement),
    AddWireframeMesh(MeshPlacement),
    AddSolidMesh(MeshPlacement),
    AddLine {
        /// Only the rgb components travel; line alpha is not part of the
        /// wire format.
        color: [f32; 4],
        thickness: f32,
        end1: [f32; 3],
        end2: [f32; 3],
    },
    AddText {
        position: [f32; 3],
        scale: f32,
        color: [f32; 4],
        text: String,
    },
    AddFrame {
        rotation: [f32; 3],
        translation: [f32; 3],
        axis_length: f32,
        color: [f32; 4],
    },
    SetCamera {
        rotation: [f32; 3],
        translation: [f32; 3],
    },
    ZoomCamera,
    SetFieldOfView {
        fov_radians: f32,
    },
    SetClipPlanes {
        near: f32,
        far: f32,
    },
    SetGroundPosition {
        height: f32,
        /// 0, 1 or 2 for the X, Y or Z axis.
        axis: i16,
    },
    DefineMenu {
        title: String,
        items: Vec<(String, i32)>,
    },
}

impl Command {
    /// Encode into one contiguous buffer so the message crosses the pipe in
    /// a single write. Validates all length invariants first.
    pub fn encode(&self) -> Result<Vec<u8>, LinkError> {
        let mut w = WireWriter::new();
        match self {
            Command::BeginScene => w.put_u8(opcode::BEGIN_SCENE),
            Command::EndScene => w.put_u8(opcode::END_SCENE),
            Command::DefineMesh {
                vertices,
                triangles,
            } => {
                let num_vertices = vertices.len() / 3;
                let num_triangles = triangles.len() / 3;
                if num_vertices > MAX_MESH_VERTICES {
                    return Err(LinkError::TooManyVertices(num_vertices));
                }
                if num_triangles > MAX_MESH_TRIANGLES {
                    return Err(LinkError::TooManyTriangles(num_triangles));
                }
                w = WireWriter::with_capacity(5 + vertices.len() * 4 + triangles.len() * 2);
                w.put_u8(opcode::DEFINE_MESH);
                w.put_u16(num_vertices as u16);
                w.put_u16(num_triangles as u16);
                w.put_f32_slice(vertices);
                w.put_u16_slice(triangles);
            }
            Command::AddPointMesh(placement) => {
                encode_placement(&mut w, opcode::ADD_POINT_MESH, placement);
            }
            Command::AddWireframeMesh(placement) => {
                encode_placement(&mut w, opcode::ADD_WIREFRAME_MESH, placement);
            }
            Command::AddSolidMesh(placement) => {
                encode_placement(&mut w, opcode::ADD_SOLID_MESH, placement);
            }
            Command::AddLine {
                color,
                thickness,
                end1,
                end2,
            } => {
                w.put_u8(opcode::ADD_LINE);
                w.put_f32_slice(&color[..3]);
                w.put_f32(*thickness);
                w.put_f32_slice(end1);
                w.put_f32_slice(end2);
            }
            Command::AddText {
                position,
                scale,
                color,
                text,
            } => {
                if text.len() > MAX_TEXT_LEN {
                    return Err(LinkError::TextTooLong(text.len()));
                }
                w.put_u8(opcode::ADD_TEXT);
                w.put_f32_slice(position);
                w.put_f32(*scale);
                w.put_f32_slice(&color[..3]);
                w.put_u16(text.len() as u16);
                w.put_bytes(text.as_bytes());
            }
            Command::AddFrame {
                rotation,
                translation,
                axis_length,
                color,
            } => {
                w.put_u8(opcode::ADD_FRAME);
                w.put_f32_slice(rotation);
                w.put_f32_slice(translation);
                w.put_f32(*axis_length);
                w.put_f32_slice(&color[..3]);
            }
            Command::SetCamera {
                rotation,
                translation,
            } => {
                w.put_u8(opcode::SET_CAMERA);
                w.put_f32_slice(rotation);
                w.put_f32_slice(translation);
            }
            Command::ZoomCamera => w.put_u8(opcode::ZOOM_CAMERA),
            Command::SetFieldOfView { fov_radians } => {
                w.put_u8(opcode::SET_FIELD_OF_VIEW);
                w.put_f32(*fov_radians);
            }
            Command::SetClipPlanes { near, far } => {
                w.put_u8(opcode::SET_CLIP_PLANES);
                w.put_f32(*near);
                w.put_f32(*far);
            }
            Command::SetGroundPosition { height, axis } => {
                w.put_u8(opcode::SET_GROUND_POSITION);
                w.put_f32(*height);
                w.put_i16(*axis);
            }
            Command::DefineMenu { title, items } => {
                if title.len() > u16::MAX as usize {
                    return Err(LinkError::MenuTooLarge(format!(
                        "title is {} bytes",
                        title.len()
                    )));
                }
                if items.len() > u16::MAX as usize {
                    return Err(LinkError::MenuTooLarge(format!(
                        "{} items",
                        items.len()
                    )));
                }
                w.put_u8(opcode::DEFINE_MENU);
                w.put_u16(title.len() as u16);
                w.put_bytes(title.as_bytes());
                w.put_u16(items.len() as u16);
                for (label, item_id) in items {
                    if label.len() > i32::MAX as usize {
                        return Err(LinkError::MenuTooLarge(format!(
                            "item label is {} bytes",
                            label.len()
                        )));
                    }
                    w.put_i32(*item_id);
                    w.put_i32(label.len() as i32);
                    w.put_bytes(label.as_bytes());
                }
            }
        }
        Ok(w.into_bytes())
    }
}

fn encode_placement(w: &mut WireWriter, op: u8, placement: &MeshPlacement) {
    w.put_u8(op);
    w.put_f32_slice(&placement.rotation);
    w.put_f32_slice(&placement.translation);
    w.put_f32_slice(&placement.scale);
    w.put_f32_slice(&placement.color);
    w.put_u16(placement.mesh_index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::wire::WireReader;

    #[test]
    fn test_solid_box_example_encoding() {
        // A unit box at the identity transform, solid red: opcode, then
        // rotation (0,0,0), translation (0,0,0), scale (1,1,1),
        // rgba (1,0,0,1), mesh index 0.
        let bytes = Command::AddSolidMesh(MeshPlacement {
            rotation: [0.0; 3],
            translation: [0.0; 3],
            scale: [1.0; 3],
            color: [1.0, 0.0, 0.0, 1.0],
            mesh_index: 0,
        })
        .encode()
        .unwrap();

        assert_eq!(bytes.len(), 1 + 13 * 4 + 2);
        let mut r = WireReader::new(&bytes);
        assert_eq!(r.take_u8().unwrap(), opcode::ADD_SOLID_MESH);
        let expected = [
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0,
        ];
        for value in expected {
            assert_eq!(r.take_f32().unwrap(), value);
        }
        assert_eq!(r.take_u16().unwrap(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_text_layout_and_length_cap() {
        let bytes = Command::AddText {
            position: [1.0, 2.0, 3.0],
            scale: 0.5,
            color: [0.1, 0.2, 0.3, 1.0],
            text: "hello".into(),
        }
        .encode()
        .unwrap();

        let mut r = WireReader::new(&bytes);
        assert_eq!(r.take_u8().unwrap(), opcode::ADD_TEXT);
        for _ in 0..7 {
            r.take_f32().unwrap();
        }
        let len = r.take_u16().unwrap() as usize;
        assert_eq!(len, 5);
        assert_eq!(r.take_bytes(len).unwrap(), b"hello");
        assert!(r.is_empty());

        let too_long = Command::AddText {
            position: [0.0; 3],
            scale: 1.0,
            color: [1.0; 4],
            text: "x".repeat(MAX_TEXT_LEN + 1),
        };
        assert!(matches!(
            too_long.encode(),
            Err(LinkError::TextTooLong(257))
        ));
    }

    #[test]
    fn test_define_mesh_rejects_oversized_geometry() {
        let vertices = vec![0.0f32; (MAX_MESH_VERTICES + 1) * 3];
        let result = Command::DefineMesh {
            vertices,
            triangles: vec![0, 1, 2],
        }
        .encode();
        assert!(matches!(result, Err(LinkError::TooManyVertices(_))));

        let triangles = vec![0u16; (MAX_MESH_TRIANGLES + 1) * 3];
        let result = Command::DefineMesh {
            vertices: vec![0.0f32; 9],
            triangles,
        }
        .encode();
        assert!(matches!(result, Err(LinkError::TooManyTriangles(_))));
    }

    #[test]
    fn test_define_menu_layout() {
        let bytes = Command::DefineMenu {
            title: "File".into(),
            items: vec![("Open".into(), 10), ("Quit".into(), -1)],
        }
        .encode()
        .unwrap();

        let mut r = WireReader::new(&bytes);
        assert_eq!(r.take_u8().unwrap(), opcode::DEFINE_MENU);
        let title_len = r.take_u16().unwrap() as usize;
        assert_eq!(r.take_bytes(title_len).unwrap(), b"File");
        assert_eq!(r.take_u16().unwrap(), 2);

        assert_eq!(r.take_i32().unwrap(), 10);
        let label_len = r.take_i32().unwrap() as usize;
        assert_eq!(r.take_bytes(label_len).unwrap(), b"Open");

        assert_eq!(r.take_i32().unwrap(), -1);
        let label_len = r.take_i32().unwrap() as usize;
        assert_eq!(r.take_bytes(label_len).unwrap(), b"Quit");
        assert!(r.is_empty());
    }

    #[test]
    fn test_bare_opcodes() {
        assert_eq!(
            Command::BeginScene.encode().unwrap(),
            vec![opcode::BEGIN_SCENE]
        );
        assert_eq!(Command::EndScene.encode().unwrap(), vec![opcode::END_SCENE]);
        assert_eq!(
            Command::ZoomCamera.encode().unwrap(),
            vec![opcode::ZOOM_CAMERA]
        );
    }

    #[test]
    fn test_ground_position_layout() {
        let bytes = Command::SetGroundPosition {
            height: -0.5,
            axis: 1,
        }
        .encode()
        .unwrap();
        let mut r = WireReader::new(&bytes);
        assert_eq!(r.take_u8().unwrap(), opcode::SET_GROUND_POSITION);
        assert_eq!(r.take_f32().unwrap(), -0.5);
        assert_eq!(r.take_i16().unwrap(), 1);
        assert!(r.is_empty());
    }
}
