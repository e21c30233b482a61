//! Monte Carlo Tree Search with UCT selection.
//!
//! Each iteration runs four phases against a fresh tree rooted at the
//! searched position:
//!
//! 1. **Selection**: descend through fully expanded nodes, picking the child
//!    with the highest UCT score `-Q(child) + C * sqrt(ln N(parent) / N(child))`.
//! 2. **Expansion**: pop the first untried move and add its child.
//! 3. **Simulation**: score the new child with a random playout.
//! 4. **Backpropagation**: record the reward on every node of the path,
//!    flipping its sign at each level.
//!
//! Node statistics are kept from the point of view of the side to move at
//! the node, so a parent reads a child's mean reward negated.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, trace};
use uct_core::{ChessError, Oracle, Result, Reward};

use crate::config::{MctsConfig, SearchBudget};
use crate::node::{Node, NodeId, NodeStats};
use crate::playout::RandomPlayout;
use crate::tree::Tree;

/// Statistics of one root move after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats<M> {
    pub mv: M,
    pub visits: u32,

    /// Mean reward from the point of view of the side to move at the root.
    pub mean_reward: f32,
}

/// Result of an MCTS search.
#[derive(Clone, Debug)]
pub struct SearchReport<M> {
    /// Most visited root move, or the first legal move if nothing was searched.
    pub best_move: M,

    /// Iterations completed.
    pub iterations: u32,

    pub root_visits: u32,

    /// Nodes in the tree when the search stopped.
    pub tree_size: usize,

    pub elapsed: Duration,

    /// Root children in expansion order (which is oracle move order).
    pub children: Vec<ChildStats<M>>,
}

impl<M: Copy + PartialEq> SearchReport<M> {
    /// Stats of the chosen move, if it was expanded.
    pub fn best(&self) -> Option<&ChildStats<M>> {
        self.children.iter().find(|c| c.mv == self.best_move)
    }
}

/// Monte Carlo Tree Search over any [`Oracle`].
///
/// The random source is injected so that sequential searches are
/// reproducible. With `threads > 1` every worker draws its own seed from it,
/// but the interleaving of workers is not deterministic.
pub struct Mcts<R: Rng> {
    config: MctsConfig,
    rng: R,
}

impl Mcts<ChaCha8Rng> {
    /// Search driven by a `ChaCha8Rng` seeded with `seed`.
    pub fn seeded(config: MctsConfig, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Mcts<R> {
    pub fn new(config: MctsConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Pick a move for the side to move on `board`.
    ///
    /// # Errors
    /// `NoLegalMove` if the oracle reports no legal move for `board`.
    pub fn select_move<O: Oracle>(
        &mut self,
        oracle: &O,
        board: &O::Board,
        budget: SearchBudget,
    ) -> Result<O::Move> {
        self.search(oracle, board, budget).map(|report| report.best_move)
    }

    /// Search `board` until `budget` runs out and report the root statistics.
    ///
    /// # Errors
    /// `NoLegalMove` if the oracle reports no legal move for `board`.
    pub fn search<O: Oracle>(
        &mut self,
        oracle: &O,
        board: &O::Board,
        budget: SearchBudget,
    ) -> Result<SearchReport<O::Move>> {
        let start = Instant::now();
        let first = oracle
            .legal_moves(board)
            .first()
            .copied()
            .ok_or(ChessError::NoLegalMove)?;

        let (tree, iterations) = self.grow(oracle, board, budget, start);
        let report = summarize(&tree, first, iterations, start.elapsed());

        if iterations == 0 {
            debug!(mv = %first, "No search iterations ran, playing first legal move");
        } else {
            debug!(
                iterations,
                elapsed_ms = report.elapsed.as_millis() as u64,
                tree_size = report.tree_size,
                mv = %report.best_move,
                visits = report.best().map_or(0, |c| c.visits),
                "MCTS selected move"
            );
        }
        Ok(report)
    }

    /// Build a tree for `board` and return it with the number of completed iterations.
    fn grow<O: Oracle>(
        &mut self,
        oracle: &O,
        board: &O::Board,
        budget: SearchBudget,
        start: Instant,
    ) -> (Tree<O>, u32) {
        let mut tree = Tree::new(Node::new(oracle, board.clone()));
        let playout = RandomPlayout::from_config(&self.config);
        let exploration = self.config.exploration;

        if self.config.threads > 1 {
            let seeds: Vec<u64> = (0..self.config.threads).map(|_| self.rng.gen()).collect();
            let shared = Mutex::new(tree);
            let iterations = run_parallel(oracle, &shared, &seeds, budget, start, playout, exploration);
            let tree = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
            return (tree, iterations);
        }

        let mut iterations = 0;
        while !budget.is_exhausted(iterations, start.elapsed()) {
            let path = descend(&mut tree, oracle, exploration);
            let reward = leaf_reward(&tree, oracle, &path, &playout, &mut self.rng);
            backpropagate(&mut tree, &path, reward);
            trace!(iteration = iterations, depth = path.len(), %reward, "MCTS iteration");
            iterations += 1;
        }
        (tree, iterations)
    }
}

/// Run iterations on `seeds.len()` rayon workers sharing one tree.
///
/// The tree lock is held for selection with expansion and again for
/// backpropagation, never during a playout. Each iteration claims its slot
/// before starting, so iteration budgets are met exactly.
fn run_parallel<O: Oracle>(
    oracle: &O,
    tree: &Mutex<Tree<O>>,
    seeds: &[u64],
    budget: SearchBudget,
    start: Instant,
    playout: RandomPlayout,
    exploration: f32,
) -> u32 {
    let claimed = AtomicU32::new(0);
    let claim = || {
        claimed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (!budget.is_exhausted(n, start.elapsed())).then_some(n + 1)
            })
            .is_ok()
    };

    seeds.par_iter().for_each(|&seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        while claim() {
            let (path, board, terminal) = {
                let mut guard = tree.lock().unwrap_or_else(PoisonError::into_inner);
                let path = descend(&mut guard, oracle, exploration);
                let leaf = guard.get(*path.last().unwrap_or(&NodeId::ROOT));
                (path, leaf.board.clone(), leaf.terminal)
            };
            let reward = match terminal {
                Some(outcome) => outcome.reward_for(oracle.side_to_move(&board)),
                None => playout.run(oracle, &board, &mut rng),
            };
            let mut guard = tree.lock().unwrap_or_else(PoisonError::into_inner);
            backpropagate(&mut guard, &path, reward);
        }
    });

    claimed.into_inner()
}

/// UCT score of `child` as seen from its parent. Unvisited children score infinity.
fn uct_score(child: &NodeStats, ln_parent_visits: f32, exploration: f32) -> f32 {
    if child.visits == 0 {
        return f32::INFINITY;
    }
    let visits = child.visits as f32;
    -child.mean_reward() + exploration * (ln_parent_visits / visits).sqrt()
}

/// Highest scoring child of `id`; the first one wins ties.
fn select_child<O: Oracle>(tree: &Tree<O>, id: NodeId, exploration: f32) -> Option<NodeId> {
    let node = tree.get(id);
    let ln_parent = (node.stats.visits.max(1) as f32).ln();

    let mut best: Option<(NodeId, f32)> = None;
    for &(_, child_id) in &node.children {
        let score = uct_score(&tree.get(child_id).stats, ln_parent, exploration);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((child_id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Selection and expansion. Returns the path from the root to the leaf to score.
fn descend<O: Oracle>(tree: &mut Tree<O>, oracle: &O, exploration: f32) -> Vec<NodeId> {
    let mut path = vec![NodeId::ROOT];
    let mut id = NodeId::ROOT;

    loop {
        let node = tree.get(id);
        if node.terminal.is_some() {
            return path;
        }
        if !node.is_fully_expanded() {
            if let Some(mv) = tree.get_mut(id).untried.pop_front() {
                let board = oracle.apply_move(&tree.get(id).board, mv);
                let child = tree.add_child(id, mv, Node::new(oracle, board));
                path.push(child);
            }
            return path;
        }
        match select_child(tree, id, exploration) {
            Some(next) => {
                path.push(next);
                id = next;
            }
            None => return path,
        }
    }
}

/// Reward of the last node on `path` for its side to move.
fn leaf_reward<O: Oracle, R: Rng + ?Sized>(
    tree: &Tree<O>,
    oracle: &O,
    path: &[NodeId],
    playout: &RandomPlayout,
    rng: &mut R,
) -> Reward {
    let leaf = tree.get(*path.last().unwrap_or(&NodeId::ROOT));
    match leaf.terminal {
        Some(outcome) => outcome.reward_for(oracle.side_to_move(&leaf.board)),
        None => playout.run(oracle, &leaf.board, rng),
    }
}

/// Record `leaf` on the path, flipping perspective at every level.
fn backpropagate<O: Oracle>(tree: &mut Tree<O>, path: &[NodeId], leaf: Reward) {
    let mut reward = leaf;
    for &id in path.iter().rev() {
        tree.get_mut(id).stats.record(reward.get());
        reward = reward.negate();
    }
}

/// Most visited root child (first on ties), falling back to `first`.
fn summarize<O: Oracle>(
    tree: &Tree<O>,
    first: O::Move,
    iterations: u32,
    elapsed: Duration,
) -> SearchReport<O::Move> {
    let root = tree.root();
    let children: Vec<ChildStats<O::Move>> = root
        .children
        .iter()
        .map(|&(mv, id)| {
            let stats = tree.get(id).stats;
            ChildStats {
                mv,
                visits: stats.visits,
                mean_reward: -stats.mean_reward(),
            }
        })
        .collect();

    let mut best: Option<&ChildStats<O::Move>> = None;
    for child in &children {
        if best.map_or(true, |top| child.visits > top.visits) {
            best = Some(child);
        }
    }

    SearchReport {
        best_move: best.map_or(first, |c| c.mv),
        iterations,
        root_visits: root.stats.visits,
        tree_size: tree.len(),
        elapsed,
        children,
    }
}
