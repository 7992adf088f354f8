//! Scene graph integration.
//!
//! PetalStudio reads object poses from the host's scene graph but never owns
//! scene objects. Hosts implement [`SceneGraph`] over their own node storage
//! and hand out [`SceneObjectId`] values that identify nodes; the id may
//! outlive the node, which is why every sweep checks [`SceneGraph::is_valid`]
//! before reading a transform.
//!
//! # Example
//!
//! ```
//! use petalstudio::math::{Transform, Vec3};
//! use petalstudio::scene::{SceneGraph, SceneObjectId};
//! use std::collections::HashMap;
//!
//! struct Nodes {
//!     positions: HashMap<SceneObjectId, Vec3>,
//! }
//!
//! impl SceneGraph for Nodes {
//!     fn is_valid(&self, object: SceneObjectId) -> bool {
//!         self.positions.contains_key(&object)
//!     }
//!
//!     fn world_transform(&self, object: SceneObjectId) -> Transform {
//!         Transform::from_position(self.positions.get(&object).copied().unwrap_or(Vec3::ZERO))
//!     }
//! }
//! ```

mod graph;

pub use graph::{SceneGraph, SceneObjectId};
