// The protocol-instance object and the scene bracket.
//
// One mutex guards the outbound stream. A scene bracket is a guard that
// holds it from BeginScene to EndScene, so a whole batch of draw commands
// reaches the GUI as one atomic update; stand-alone control messages take
// the lock around their own single write and can never split a bracket.

use log::{info, warn};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use crate::error::LinkError;
use crate::launch;
use crate::listener::{EventWorker, ListenerSet, SceneEventListener};
use crate::mesh::{BuiltinShape, MeshCache, PolygonMesh};
use crate::protocol::command::{Command, MeshPlacement};

/// How a shape is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Points,
    Wireframe,
    Solid,
}

/// Ground-plane normal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Rigid transform already reduced to wire values: body-fixed XYZ Euler
/// angles in radians plus a Cartesian translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transform {
    pub rotation: [f32; 3],
    pub translation: [f32; 3],
}

type SceneWriter = Box<dyn Write + Send>;

/// Live connection to a separately launched renderer GUI.
///
/// Owns both pipe endpoints, the mesh index cache and the listener registry.
/// Lives for the rest of the process; there is no teardown or reconnection.
pub struct RendererLink {
    scene_pipe: Mutex<SceneWriter>,
    meshes: Mutex<MeshCache>,
    listeners: ListenerSet,
    _worker: JoinHandle<()>,
}

impl RendererLink {
    /// Launch the GUI, wire up both pipes and start the event worker.
    pub fn connect(title: &str) -> Result<Self, LinkError> {
        // Simulation → GUI scene stream.
        let (gui_scene_read, scene_write) = launch::create_pipe_pair()?;
        // GUI → simulation event stream.
        let (event_read, gui_event_write) = launch::create_pipe_pair()?;

        launch::spawn_gui(&gui_scene_read, &gui_event_write, title)?;
        // The GUI owns its two endpoints now; close our copies.
        drop(gui_scene_read);
        drop(gui_event_write);

        let listeners: ListenerSet = Arc::new(Mutex::new(Vec::new()));
        let worker = EventWorker::spawn(Box::new(event_read), Arc::clone(&listeners))?;
        info!("[SCENE] Connected to renderer GUI");

        Ok(Self {
            scene_pipe: Mutex::new(Box::new(scene_write)),
            meshes: Mutex::new(MeshCache::new()),
            listeners,
            _worker: worker,
        })
    }

    /// Register a GUI event listener. Notification order is registration
    /// order; the same listener may be registered more than once.
    pub fn add_listener(&self, listener: Arc<dyn SceneEventListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Open a scene bracket. The returned frame holds the outbound lock
    /// until it is ended or dropped.
    pub fn begin_scene(&self) -> Result<SceneFrame<'_>, LinkError> {
        let mut pipe = self.scene_pipe.lock().unwrap();
        write_command(&mut **pipe, &Command::BeginScene)?;
        Ok(SceneFrame {
            link: self,
            pipe,
            ended: false,
        })
    }

    pub fn set_camera(&self, transform: Transform) -> Result<(), LinkError> {
        self.send_locked(&Command::SetCamera {
            rotation: transform.rotation,
            translation: transform.translation,
        })
    }

    pub fn zoom_camera(&self) -> Result<(), LinkError> {
        self.send_locked(&Command::ZoomCamera)
    }

    pub fn set_field_of_view(&self, fov_radians: f32) -> Result<(), LinkError> {
        self.send_locked(&Command::SetFieldOfView { fov_radians })
    }

    pub fn set_clip_planes(&self, near: f32, far: f32) -> Result<(), LinkError> {
        self.send_locked(&Command::SetClipPlanes { near, far })
    }

    pub fn set_ground_position(&self, axis: Axis, height: f32) -> Result<(), LinkError> {
        self.send_locked(&Command::SetGroundPosition {
            height,
            axis: axis as i16,
        })
    }

    pub fn define_menu(&self, title: &str, items: &[(String, i32)]) -> Result<(), LinkError> {
        self.send_locked(&Command::DefineMenu {
            title: title.to_string(),
            items: items.to_vec(),
        })
    }

    /// Encode outside the lock, then hold it for exactly one write.
    fn send_locked(&self, command: &Command) -> Result<(), LinkError> {
        let bytes = command.encode()?;
        let mut pipe = self.scene_pipe.lock().unwrap();
        pipe.write_all(&bytes)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn with_scene_writer(writer: SceneWriter) -> Self {
        let listeners: ListenerSet = Arc::new(Mutex::new(Vec::new()));
        Self {
            scene_pipe: Mutex::new(writer),
            meshes: Mutex::new(MeshCache::new()),
            listeners,
            _worker: std::thread::spawn(|| {}),
        }
    }
}

fn write_command(pipe: &mut dyn Write, command: &Command) -> Result<(), LinkError> {
    let bytes = command.encode()?;
    pipe.write_all(&bytes)?;
    Ok(())
}

/// An open scene bracket.
///
/// Draw commands only exist on the frame, so they cannot be issued outside
/// a bracket, and brackets cannot nest or interleave by construction.
/// Dropping a frame without calling [`SceneFrame::end`] still closes the
/// bracket, best-effort.
pub struct SceneFrame<'a> {
    link: &'a RendererLink,
    pipe: MutexGuard<'a, SceneWriter>,
    ended: bool,
}

impl SceneFrame<'_> {
    pub fn draw_box(
        &mut self,
        transform: Transform,
        scale: [f32; 3],
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        self.draw_builtin(BuiltinShape::Box, transform, scale, color, representation)
    }

    pub fn draw_ellipsoid(
        &mut self,
        transform: Transform,
        scale: [f32; 3],
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        self.draw_builtin(
            BuiltinShape::Ellipsoid,
            transform,
            scale,
            color,
            representation,
        )
    }

    pub fn draw_cylinder(
        &mut self,
        transform: Transform,
        scale: [f32; 3],
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        self.draw_builtin(
            BuiltinShape::Cylinder,
            transform,
            scale,
            color,
            representation,
        )
    }

    pub fn draw_circle(
        &mut self,
        transform: Transform,
        scale: [f32; 3],
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        self.draw_builtin(
            BuiltinShape::Circle,
            transform,
            scale,
            color,
            representation,
        )
    }

    /// Draw a user mesh. First sight of an identity sends its triangulated
    /// geometry; afterwards the mesh is referenced purely by index.
    pub fn draw_mesh(
        &mut self,
        mesh: &PolygonMesh,
        transform: Transform,
        scale: f32,
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        let (index, define) = self.link.meshes.lock().unwrap().resolve(mesh)?;
        if let Some(define) = define {
            self.send(&define)?;
        }
        self.draw_indexed(index, transform, [scale; 3], color, representation)
    }

    pub fn draw_line(
        &mut self,
        end1: [f32; 3],
        end2: [f32; 3],
        color: [f32; 4],
        thickness: f32,
    ) -> Result<(), LinkError> {
        self.send(&Command::AddLine {
            color,
            thickness,
            end1,
            end2,
        })
    }

    pub fn draw_text(
        &mut self,
        position: [f32; 3],
        scale: f32,
        color: [f32; 4],
        text: &str,
    ) -> Result<(), LinkError> {
        self.send(&Command::AddText {
            position,
            scale,
            color,
            text: text.to_string(),
        })
    }

    pub fn draw_frame(
        &mut self,
        transform: Transform,
        axis_length: f32,
        color: [f32; 4],
    ) -> Result<(), LinkError> {
        self.send(&Command::AddFrame {
            rotation: transform.rotation,
            translation: transform.translation,
            axis_length,
            color,
        })
    }

    /// Close the bracket, releasing the outbound stream to other callers.
    pub fn end(mut self) -> Result<(), LinkError> {
        self.ended = true;
        write_command(&mut **self.pipe, &Command::EndScene)
    }

    fn draw_builtin(
        &mut self,
        shape: BuiltinShape,
        transform: Transform,
        scale: [f32; 3],
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        self.draw_indexed(shape.mesh_index(), transform, scale, color, representation)
    }

    fn draw_indexed(
        &mut self,
        mesh_index: u16,
        transform: Transform,
        scale: [f32; 3],
        color: [f32; 4],
        representation: Representation,
    ) -> Result<(), LinkError> {
        let placement = MeshPlacement {
            rotation: transform.rotation,
            translation: transform.translation,
            scale,
            color,
            mesh_index,
        };
        let command = match representation {
            Representation::Points => Command::AddPointMesh(placement),
            Representation::Wireframe => Command::AddWireframeMesh(placement),
            Representation::Solid => Command::AddSolidMesh(placement),
        };
        self.send(&command)
    }

    fn send(&mut self, command: &Command) -> Result<(), LinkError> {
        write_command(&mut **self.pipe, command)
    }
}

impl Drop for SceneFrame<'_> {
    fn drop(&mut self) {
        if !self.ended {
            // An abandoned frame must still close the bracket or the GUI
            // never applies the batch.
            if write_command(&mut **self.pipe, &Command::EndScene).is_err() {
                warn!("[SCENE] Failed to close an abandoned scene bracket");
            }
        }
    }
}
