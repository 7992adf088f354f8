use crate::math::Transform;

/// Reference to a node in the host scene graph.
///
/// Not an ownership edge: the node may be destroyed while PetalStudio still
/// holds the id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneObjectId(u64);

impl SceneObjectId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SceneObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SceneObjectId({})", self.0)
    }
}

/// Trait for exposing host scene objects to the audio layer.
///
/// Queried once per attached emitter (and once for the listener) on every
/// world update, so implementations should be cheap lookups.
pub trait SceneGraph {
    /// Returns false once the object has been freed or removed from the scene.
    fn is_valid(&self, object: SceneObjectId) -> bool;

    /// World-space pose of the object.
    ///
    /// Only called after [`is_valid`](Self::is_valid) returned true for the
    /// same object within the same update. 2D scenes should map their plane
    /// into 3D here.
    fn world_transform(&self, object: SceneObjectId) -> Transform;
}
