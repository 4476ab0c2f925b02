//! Assembly tree of labeled, placed shapes.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. A node
//! stores its parent as an index, never as a second owner, so the tree
//! cannot form reference cycles. Every structural edit takes `&mut self`,
//! which keeps a node's parent link and its parent's child list in step.

use std::ops::{Index, IndexMut};

use log::debug;

use super::Shape;
use crate::toploc::Location;
use crate::{CadError, Result};

/// Stable handle to a node in an [`Assembly`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node {
    shape: Shape,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena of shapes linked into parent/child trees.
///
/// Each node has at most one parent, and appears in that parent's child
/// list exactly once.
#[derive(Clone, Debug, Default)]
pub struct Assembly {
    nodes: Vec<Node>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a parentless node.
    pub fn add(&mut self, shape: Shape) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            shape,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, shape: Shape) -> Result<NodeId> {
        self.check(parent)?;
        let id = self.add(shape);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.0 >= self.nodes.len() {
            return Err(CadError::OutOfRange(format!(
                "node {} not in assembly of {} nodes",
                id.0,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    /// Returns the shape at `id`, or `None` for a foreign id.
    pub fn get(&self, id: NodeId) -> Option<&Shape> {
        self.nodes.get(id.0).map(|n| &n.shape)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Shape> {
        self.nodes.get_mut(id.0).map(|n| &mut n.shape)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this assembly.
    pub fn label(&self, id: NodeId) -> &str {
        self[id].label()
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        self.check(id)?;
        self.nodes[id.0].shape.set_label(label);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this assembly.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this assembly.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.nodes[id.0].parent.is_none())
            .collect()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut current = self.nodes.get(id.0).and_then(|n| n.parent);
        while let Some(p) = current {
            found.push(p);
            current = self.nodes[p.0].parent;
        }
        found
    }

    /// Nodes below `id` in depth-first pre-order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(id.0)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        found
    }

    fn is_self_or_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        candidate == of || self.ancestors(of).contains(&candidate)
    }

    /// Detaches `child` from its current parent and appends it to `parent`.
    ///
    /// `None` leaves the node parentless. Fails with `InvalidValue` if the
    /// move would make `child` its own ancestor.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.check(child)?;
        if let Some(p) = parent {
            self.check(p)?;
            if self.is_self_or_ancestor(child, p) {
                return Err(CadError::InvalidValue(format!(
                    "node {} cannot be re-parented under its own descendant {}",
                    child.0, p.0
                )));
            }
        }
        self.detach(child);
        if let Some(p) = parent {
            self.nodes[p.0].children.push(child);
        }
        self.nodes[child.0].parent = parent;
        debug!("node {} re-parented to {:?}", child.0, parent.map(NodeId::index));
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
    }

    /// Replaces the children of `id`.
    ///
    /// Dropped children become parentless; new ones are detached from
    /// wherever they were.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) -> Result<()> {
        self.check(id)?;
        for (i, c) in children.iter().enumerate() {
            self.check(*c)?;
            if children[..i].contains(c) {
                return Err(CadError::InvalidValue(format!(
                    "node {} listed twice as a child",
                    c.0
                )));
            }
            if self.is_self_or_ancestor(*c, id) {
                return Err(CadError::InvalidValue(format!(
                    "node {} cannot be a child of its own descendant {}",
                    c.0, id.0
                )));
            }
        }
        for old in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[old.0].parent = None;
        }
        for c in &children {
            self.detach(*c);
            self.nodes[c.0].parent = Some(id);
        }
        debug!("node {} now has {} children", id.0, children.len());
        self.nodes[id.0].children = children;
        Ok(())
    }

    /// Removes `child` from `parent`'s children, leaving it parentless.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(parent)?;
        self.check(child)?;
        if self.nodes[child.0].parent != Some(parent) {
            return Err(CadError::InvalidValue(format!(
                "node {} is not a child of node {}",
                child.0, parent.0
            )));
        }
        self.set_parent(child, None)
    }

    /// Placement of `id` in world space: ancestors' locations composed root first.
    pub fn world_location(&self, id: NodeId) -> Result<Location> {
        self.check(id)?;
        let local = *self.nodes[id.0].shape.location();
        Ok(self
            .ancestors(id)
            .into_iter()
            .fold(local, |acc, p| self.nodes[p.0].shape.location() * &acc))
    }

    /// Builds a compound of the subtree at `id`.
    ///
    /// A leaf yields its own shape; an inner node yields a compound of its
    /// children carrying the node's label and location.
    pub fn to_compound(&self, id: NodeId) -> Result<Shape> {
        self.check(id)?;
        let node = &self.nodes[id.0];
        if node.children.is_empty() {
            return Ok(node.shape.clone());
        }
        let children = node
            .children
            .iter()
            .map(|c| self.to_compound(*c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Shape::compound(children)
            .located(node.shape.location())
            .with_label(node.shape.label()))
    }

    /// Renders the subtree at `id` one node per line.
    ///
    /// ```text
    /// assembly   Compound Location(p=(0.00, 0.00, 0.00), o=(0.00, 0.00, 0.00))
    /// ├── box    Solid    Location(p=(0.00, 0.00, 0.00), o=(45.00, 45.00, 0.00))
    /// └── sphere Solid    Location(p=(1.00, 2.00, 3.00), o=(0.00, 0.00, 0.00))
    /// ```
    pub fn show_topology(&self, id: NodeId) -> Result<String> {
        self.check(id)?;
        let mut rows: Vec<(String, NodeId)> = Vec::new();
        self.collect_rows(id, String::new(), None, &mut rows);

        let label_width = rows
            .iter()
            .map(|(prefix, n)| prefix.chars().count() + self.label(*n).chars().count())
            .max()
            .unwrap_or(0);
        let kind_width = rows
            .iter()
            .map(|(_, n)| self[*n].kind().name().len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (prefix, n) in &rows {
            let shape = &self[*n];
            let pad = label_width - prefix.chars().count();
            out.push_str(&format!(
                "{prefix}{label:<pad$} {kind:<kind_width$} Location{loc:?}\n",
                label = shape.label(),
                kind = shape.kind(),
                loc = shape.location(),
            ));
        }
        Ok(out)
    }

    fn collect_rows(
        &self,
        id: NodeId,
        indent: String,
        is_last: Option<bool>,
        rows: &mut Vec<(String, NodeId)>,
    ) {
        let (prefix, child_indent) = match is_last {
            None => (String::new(), String::new()),
            Some(true) => (format!("{indent}└── "), format!("{indent}    ")),
            Some(false) => (format!("{indent}├── "), format!("{indent}│   ")),
        };
        rows.push((prefix, id));
        let children = &self.nodes[id.0].children;
        for (i, c) in children.iter().enumerate() {
            self.collect_rows(*c, child_indent.clone(), Some(i + 1 == children.len()), rows);
        }
    }
}

impl Index<NodeId> for Assembly {
    type Output = Shape;

    fn index(&self, id: NodeId) -> &Shape {
        &self.nodes[id.0].shape
    }
}

impl IndexMut<NodeId> for Assembly {
    fn index_mut(&mut self, id: NodeId) -> &mut Shape {
        &mut self.nodes[id.0].shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::Vector;

    fn point(label: &str) -> Shape {
        Shape::vertex(Vector::ZERO).with_label(label)
    }

    #[test]
    fn test_add_child_links_both_ways() {
        let mut asm = Assembly::new();
        let root = asm.add(point("root"));
        let a = asm.add_child(root, point("a")).unwrap();
        assert_eq!(asm.parent(a), Some(root));
        assert_eq!(asm.children(root), &[a]);
        assert_eq!(asm.label(a), "a");
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_foreign_node_panics_in_accessors() {
        let mut other = Assembly::new();
        other.add(point("x"));
        let foreign = other.add(point("y"));
        let mut asm = Assembly::new();
        asm.add(point("only"));
        let _ = asm.children(foreign);
    }

    #[test]
    fn test_set_parent_moves_between_parents() {
        let mut asm = Assembly::new();
        let r1 = asm.add(point("r1"));
        let r2 = asm.add(point("r2"));
        let c = asm.add_child(r1, point("c")).unwrap();

        asm.set_parent(c, Some(r2)).unwrap();
        assert!(asm.children(r1).is_empty());
        assert_eq!(asm.children(r2), &[c]);
        assert_eq!(asm.parent(c), Some(r2));

        asm.set_parent(c, None).unwrap();
        assert!(asm.children(r2).is_empty());
        assert_eq!(asm.parent(c), None);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut asm = Assembly::new();
        let root = asm.add(point("root"));
        let mid = asm.add_child(root, point("mid")).unwrap();
        let leaf = asm.add_child(mid, point("leaf")).unwrap();
        assert!(matches!(
            asm.set_parent(root, Some(leaf)),
            Err(CadError::InvalidValue(_))
        ));
        assert!(asm.set_parent(root, Some(root)).is_err());
        assert_eq!(asm.descendants(root), vec![mid, leaf]);
    }

    #[test]
    fn test_foreign_id_is_out_of_range() {
        let mut asm = Assembly::new();
        let root = asm.add(point("root"));
        let stray = NodeId(7);
        assert!(matches!(
            asm.set_parent(stray, Some(root)),
            Err(CadError::OutOfRange(_))
        ));
        assert!(asm.get(stray).is_none());
    }

    #[test]
    fn test_world_location() {
        let mut asm = Assembly::new();
        let root = asm.add(point("root").located(&Location::from_position((1.0, 0.0, 0.0))));
        let child = asm
            .add_child(root, point("c").located(&Location::from_position((0.0, 2.0, 0.0))))
            .unwrap();
        let world = asm.world_location(child).unwrap();
        assert_eq!(world.position(), Vector::new(1.0, 2.0, 0.0));
    }
}
