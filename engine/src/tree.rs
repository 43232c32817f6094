//! Arena-backed binary tree of bracket nodes.
//!
//! Nodes refer to each other by index, so the engine owns one flat `Vec` instead
//! of a recursive ownership graph. Node `i` always wraps match index `i`, since
//! nodes and matches are created together.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub usize);

#[derive(Debug, Clone, Copy)]
pub(crate) struct BracketNode {
    /// Index into the engine's flat match list.
    pub match_index: usize,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BracketTree {
    nodes: Vec<BracketNode>,
}

impl BracketTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &BracketNode {
        &self.nodes[id.0]
    }

    pub fn push_leaf(&mut self, match_index: usize) -> NodeId {
        self.push(match_index, None, None)
    }

    /// Add a parent over `left` and an optional `right` sibling.
    pub fn push_parent(
        &mut self,
        match_index: usize,
        left: NodeId,
        right: Option<NodeId>,
    ) -> NodeId {
        let id = self.push(match_index, Some(left), right);
        self.nodes[left.0].parent = Some(id);
        if let Some(right) = right {
            self.nodes[right.0].parent = Some(id);
        }
        id
    }

    fn push(&mut self, match_index: usize, left: Option<NodeId>, right: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(BracketNode {
            match_index,
            left,
            right,
            parent: None,
        });
        id
    }

    /// Post-order walk from `root`: left subtree, right subtree, then the node.
    pub fn post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        // (node, children already pushed)
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            let node = self.node(id);
            stack.push((id, true));
            if let Some(right) = node.right {
                stack.push((right, false));
            }
            if let Some(left) = node.left {
                stack.push((left, false));
            }
        }

        order
    }

    /// Nodes from `id` up to and including the root.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            path.push(parent);
            current = parent;
        }
        path
    }
}
