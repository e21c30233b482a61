//! Arena-allocated search tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`], so the tree
//! is dropped in one step however deep it grows.

use uct_core::Oracle;

use crate::node::{Node, NodeId};

#[derive(Debug)]
pub struct Tree<O: Oracle> {
    nodes: Vec<Node<O>>,
}

impl<O: Oracle> Tree<O> {
    /// A tree holding only `root`.
    pub fn new(root: Node<O>) -> Self {
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<O> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<O> {
        &mut self.nodes[id.0]
    }

    /// Store `node` as the newest child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mv: O::Move, node: Node<O>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push((mv, id));
        id
    }

    #[inline]
    pub fn root(&self) -> &Node<O> {
        self.get(NodeId::ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in creation order; parents always precede their children.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uct_chess::{Chess, Position};

    #[test]
    fn test_tree_add_child() {
        let board = Position::startpos();
        let root: Node<Chess> = Node::new(&Chess, board.clone());
        let mut tree = Tree::new(root);
        assert_eq!(tree.len(), 1);

        let mv = board.legal_moves()[0];
        let child = Node::new(&Chess, board.make_move(mv));
        let id = tree.add_child(NodeId::ROOT, mv, child);

        assert_eq!(id, NodeId(1));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().children, vec![(mv, id)]);
        assert_eq!(tree.get(id).board, board.make_move(mv));
        assert_eq!(tree.ids().count(), 2);
    }
}
