//! MCTS node types for tree storage.

use std::collections::VecDeque;

use uct_core::{Oracle, Outcome};

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// Visit statistics, always updated together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeStats {
    pub visits: u32,

    /// Sum of rewards, from the point of view of the side to move at the node.
    pub reward_sum: f32,
}

impl NodeStats {
    /// Returns 0.0 if the node has never been visited.
    pub fn mean_reward(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward_sum / self.visits as f32
        }
    }

    pub fn record(&mut self, reward: f32) {
        self.visits += 1;
        self.reward_sum += reward;
    }
}

/// A searched position.
#[derive(Clone, Debug)]
pub struct Node<O: Oracle> {
    pub board: O::Board,

    pub stats: NodeStats,

    /// Legal moves without a child yet, in oracle order.
    pub untried: VecDeque<O::Move>,

    /// Children in the order they were expanded.
    pub children: Vec<(O::Move, NodeId)>,

    /// Cached terminal outcome of `board`.
    pub terminal: Option<Outcome>,
}

impl<O: Oracle> Node<O> {
    pub fn new(oracle: &O, board: O::Board) -> Self {
        let terminal = oracle.is_terminal(&board);
        let untried = match terminal {
            Some(_) => VecDeque::new(),
            None => oracle.legal_moves(&board).into(),
        };
        Self {
            board,
            stats: NodeStats::default(),
            untried,
            children: Vec::new(),
            terminal,
        }
    }

    /// No untried moves left and at least one child to descend into.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty() && !self.children.is_empty()
    }
}
