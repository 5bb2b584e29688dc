//! Transform hierarchy stored as an arena of nodes
//!
//! Every node except the root has exactly one parent and appears in that
//! parent's child list exactly once. Nodes are addressed by generational
//! [`TransformId`] handles, so a stale handle is reported as an error instead
//! of pointing at a reused slot.
//!
//! Global position and rotation are computed on demand by walking up the
//! parent chain; nothing is cached, so a reparent or a local edit is visible
//! immediately. The root is the identity frame: its own position and
//! rotation are never applied to descendants.

use crate::foundation::math::{from_heading, Vec2, Vec2Ext};
use slotmap::{new_key_type, SlotMap};
use std::fmt::Write as _;
use thiserror::Error;

new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`]
    pub struct TransformId;
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Handle does not refer to a live node
    #[error("Unknown transform {0:?}")]
    UnknownTransform(TransformId),

    /// A non-root node must always have a parent
    #[error("Transform {0:?} was given a null parent; set a valid parent")]
    NullParent(TransformId),

    /// The root cannot be attached anywhere
    #[error("The root transform cannot be reparented")]
    RootReparent,

    /// The root is owned by the graph itself
    #[error("The root transform cannot be despawned")]
    RootDespawn,

    /// Attaching would make a node its own ancestor
    #[error("Attaching {node:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Node being moved
        node: TransformId,
        /// Requested parent
        parent: TransformId,
    },
}

#[derive(Debug, Clone)]
struct TransformNode {
    parent: Option<TransformId>,
    children: Vec<TransformId>,
    local_position: Vec2,
    local_rotation: f64,
    label: String,
}

impl TransformNode {
    fn new(parent: Option<TransformId>, local_position: Vec2, local_rotation: f64) -> Self {
        Self {
            parent,
            children: Vec::new(),
            local_position,
            local_rotation,
            label: String::from("transform"),
        }
    }
}

/// Arena-backed transform tree with a single root
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<TransformId, TransformNode>,
    root: TransformId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = TransformNode::new(None, Vec2::zeros(), 0.0);
        root_node.label = String::from("root");
        let root = nodes.insert(root_node);
        Self { nodes, root }
    }

    /// Handle of the root node
    pub fn root(&self) -> TransformId {
        self.root
    }

    /// Whether `id` is the root
    pub fn is_root(&self, id: TransformId) -> bool {
        id == self.root
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: TransformId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The graph always holds its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Create a node attached under `parent`
    pub fn spawn(
        &mut self,
        parent: TransformId,
        local_position: Vec2,
        local_rotation: f64,
    ) -> Result<TransformId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownTransform(parent));
        }
        let id = self.nodes.insert(TransformNode::new(Some(parent), local_position, local_rotation));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Move `id` under `new_parent`
    ///
    /// The node is removed from its current parent's children before being
    /// appended to the new parent's, so it is a member of exactly one child
    /// list at all times. Reattaching to the current parent moves it to the
    /// end of that parent's child order.
    pub fn set_parent(
        &mut self,
        id: TransformId,
        new_parent: Option<TransformId>,
    ) -> Result<(), SceneError> {
        let new_parent = new_parent.ok_or(SceneError::NullParent(id))?;
        if self.is_root(id) {
            return Err(SceneError::RootReparent);
        }
        let old_parent = self.node(id)?.parent;
        if !self.contains(new_parent) {
            return Err(SceneError::UnknownTransform(new_parent));
        }

        if new_parent == id || self.is_descendant_of(new_parent, id) {
            return Err(SceneError::Cycle { node: id, parent: new_parent });
        }

        if let Some(old_parent) = old_parent {
            self.node_mut(old_parent)?.children.retain(|&child| child != id);
        }
        self.node_mut(new_parent)?.children.push(id);
        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    /// Unlink `id` from its parent and remove it together with its subtree
    ///
    /// Returns the number of nodes removed.
    pub fn despawn(&mut self, id: TransformId) -> Result<usize, SceneError> {
        if self.is_root(id) {
            return Err(SceneError::RootDespawn);
        }
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|&child| child != id);
        }

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Whether `ancestor` lies strictly above `id` on its parent chain
    ///
    /// Unknown handles are never descendants of anything.
    pub fn is_descendant_of(&self, id: TransformId, ancestor: TransformId) -> bool {
        let mut cursor = self.nodes.get(id).and_then(|node| node.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|node| node.parent);
        }
        false
    }

    /// Parent of `id` (`None` only for the root)
    pub fn parent(&self, id: TransformId) -> Result<Option<TransformId>, SceneError> {
        Ok(self.node(id)?.parent)
    }

    /// Children of `id` in attachment order
    pub fn children(&self, id: TransformId) -> Result<&[TransformId], SceneError> {
        Ok(&self.node(id)?.children)
    }

    /// Local position relative to the parent frame
    pub fn local_position(&self, id: TransformId) -> Result<Vec2, SceneError> {
        Ok(self.node(id)?.local_position)
    }

    /// Set the local position
    pub fn set_local_position(&mut self, id: TransformId, position: Vec2) -> Result<(), SceneError> {
        self.node_mut(id)?.local_position = position;
        Ok(())
    }

    /// Local rotation in radians
    pub fn local_rotation(&self, id: TransformId) -> Result<f64, SceneError> {
        Ok(self.node(id)?.local_rotation)
    }

    /// Set the local rotation in radians
    pub fn set_local_rotation(&mut self, id: TransformId, rotation: f64) -> Result<(), SceneError> {
        self.node_mut(id)?.local_rotation = rotation;
        Ok(())
    }

    /// Add `angle` radians to the local rotation
    pub fn rotate(&mut self, id: TransformId, angle: f64) -> Result<(), SceneError> {
        self.node_mut(id)?.local_rotation += angle;
        Ok(())
    }

    /// Human-readable label used in hierarchy dumps
    pub fn label(&self, id: TransformId) -> Result<&str, SceneError> {
        Ok(&self.node(id)?.label)
    }

    /// Set the label used in hierarchy dumps
    pub fn set_label(&mut self, id: TransformId, label: impl Into<String>) -> Result<(), SceneError> {
        self.node_mut(id)?.label = label.into();
        Ok(())
    }

    /// Rotation in world space: the sum of local rotations below the root
    pub fn global_rotation(&self, id: TransformId) -> Result<f64, SceneError> {
        let node = self.node(id)?;
        match node.parent {
            None => Ok(0.0),
            Some(parent) if self.is_root(parent) => Ok(node.local_rotation),
            Some(parent) => Ok(node.local_rotation + self.global_rotation(parent)?),
        }
    }

    /// Position in world space
    ///
    /// Direct children of the root use their local position as is; deeper
    /// nodes rotate their local offset by the parent's global rotation and
    /// add the parent's global position.
    pub fn global_position(&self, id: TransformId) -> Result<Vec2, SceneError> {
        let node = self.node(id)?;
        match node.parent {
            None => Ok(Vec2::zeros()),
            Some(parent) if self.is_root(parent) => Ok(node.local_position),
            Some(parent) => {
                let parent_rotation = self.global_rotation(parent)?;
                let parent_position = self.global_position(parent)?;
                Ok(node.local_position.rotated(parent_rotation) + parent_position)
            }
        }
    }

    /// Map a point from `id`'s local frame into world space
    pub fn transform_point(&self, id: TransformId, local: Vec2) -> Result<Vec2, SceneError> {
        let rotation = self.global_rotation(id)?;
        let position = self.global_position(id)?;
        Ok(local.rotated(rotation) + position)
    }

    /// Map a list of local points into world space
    pub fn transform_points(&self, id: TransformId, local: &[Vec2]) -> Result<Vec<Vec2>, SceneError> {
        let rotation = self.global_rotation(id)?;
        let position = self.global_position(id)?;
        Ok(local.iter().map(|point| point.rotated(rotation) + position).collect())
    }

    /// Unit vector along the node's global rotation
    pub fn forward(&self, id: TransformId) -> Result<Vec2, SceneError> {
        Ok(from_heading(self.global_rotation(id)?))
    }

    /// Indented dump of the hierarchy, one node per line
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_node(self.root, 0, &mut out);
        out
    }

    fn describe_node(&self, id: TransformId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let _ = writeln!(
            out,
            "{}- {} ({:.2}, {:.2}) rot {:.2}",
            " ".repeat(depth * 2),
            node.label,
            node.local_position.x,
            node.local_position.y,
            node.local_rotation,
        );
        for &child in &node.children {
            self.describe_node(child, depth + 1, out);
        }
    }

    fn node(&self, id: TransformId) -> Result<&TransformNode, SceneError> {
        self.nodes.get(id).ok_or(SceneError::UnknownTransform(id))
    }

    fn node_mut(&mut self, id: TransformId) -> Result<&mut TransformNode, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownTransform(id))
    }
}
