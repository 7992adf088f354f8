//! # PetalStudio
//!
//! A handle-indexed lifecycle layer between a host scene graph and a
//! studio-style audio engine.
//!
//! Callers talk to PetalStudio in string handles (bank paths, event paths,
//! uuids). The world maps them to the engine's native objects, keeps
//! fire-and-forget instances alive until they finish, and moves attached
//! instances and the listener along with the scene once per tick.
//!
//! ## Quick Start
//!
//! ```no_run
//! use petalstudio::*;
//!
//! fn run<E: AudioEngine, S: SceneGraph>(
//!     engine: E,
//!     scene: &S,
//!     camera: SceneObjectId,
//!     barrel: SceneObjectId,
//! ) -> Result<()> {
//!     // Scene units are centimeters, the engine works in meters
//!     let desc = PetalStudioDesc::new().distance_scale(0.01);
//!     let mut world = PetalStudioWorld::new(engine, desc)?;
//!
//!     world.load_bank("res://banks/Master.bank", 0)?;
//!     world.add_listener(camera);
//!
//!     // Fire and forget; the world releases it when it ends
//!     world.play_one_shot_attached("event:/Explosion", scene, barrel)?;
//!
//!     // Handle-based instance the caller controls
//!     let music = world.create_event_instance(None, "event:/Music")?;
//!     world.start_event(&music)?;
//!     world.set_event_volume(&music, 0.8)?;
//!
//!     // Once per frame
//!     world.update(scene, 1.0 / 60.0);
//!     for event in world.poll_events() {
//!         if event.is_error() {
//!             eprintln!("audio: {:?}", event);
//!         }
//!     }
//!
//!     world.shutdown()
//! }
//! ```
//!
//! ## Key Components
//!
//! - **[`PetalStudioWorld`]**: Facade owning the engine, registry and trackers
//! - **[`AudioEngine`]**: Trait the host implements on top of its audio runtime
//! - **[`SceneGraph`]**: Trait the host implements to expose object poses
//! - **[`HandleRegistry`]**: Per-class handle to native id maps
//! - **[`PetalStudioEvent`]**: Diagnostics produced during updates

pub mod attachment;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod listener;
pub mod math;
pub mod one_shot;
pub mod registry;
pub mod scene;
pub mod world;

#[cfg(test)]
mod test_support;

pub use config::{PetalStudioDesc, SoftwareFormat, Sound3DSettings};
pub use engine::{AudioEngine, LoadingState, PlaybackState, StopMode};
pub use error::{EngineError, PetalStudioError, Result};
pub use events::{DetachReason, PetalStudioEvent};
pub use math::{Attributes3D, Transform, Vec3};
pub use registry::{HandleRegistry, ResourceClass};
pub use scene::{SceneGraph, SceneObjectId};
pub use world::{PetalStudioWorld, TickReport};
