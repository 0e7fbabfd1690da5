//! vizbridge drives a separately launched renderer GUI over a private,
//! unversioned binary protocol carried on two anonymous pipes.
//!
//! The simulation side never touches graphics APIs. It opens a
//! [`RendererLink`] (which spawns the GUI and wires up both pipes), batches
//! draw commands inside scene brackets, and hears key presses and menu picks
//! back through [`SceneEventListener`] callbacks on a dedicated thread.
//!
//! ```no_run
//! use vizbridge::{RendererLink, Representation, Transform};
//!
//! # fn main() -> Result<(), vizbridge::LinkError> {
//! vizbridge::logging::init_logger();
//! let link = RendererLink::connect("Pendulum")?;
//!
//! let mut frame = link.begin_scene()?;
//! frame.draw_box(
//!     Transform::default(),
//!     [1.0, 1.0, 1.0],
//!     [1.0, 0.0, 0.0, 1.0],
//!     Representation::Solid,
//! )?;
//! frame.end()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod launch;
pub mod listener;
pub mod logging;
pub mod mesh;
pub mod pipe;
pub mod protocol;
pub mod scene;

pub use error::LinkError;
pub use listener::SceneEventListener;
pub use mesh::{BuiltinShape, MeshId, PolygonMesh};
pub use protocol::{Command, GuiEvent, MeshPlacement};
pub use scene::{Axis, RendererLink, Representation, SceneFrame, Transform};
