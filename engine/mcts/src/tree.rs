//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and reference each other by NodeId
//! indices. Parent links are plain indices rather than owning references, so
//! the arena owns every node and the whole tree is dropped as a unit after a
//! move decision.

use gomoku_core::{Board, Move};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::node::{NodeId, SearchNode};

/// Errors raised by [`SearchTree::expand`].
///
/// Both variants indicate a controller bug rather than a recoverable
/// condition: the search must check for terminal and fully expanded nodes
/// before expanding, so these abort the current search instead of being
/// silently swallowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExpandError {
    #[error("cannot expand a node with no legal moves (terminal state)")]
    TerminalNode,

    #[error("node is already fully expanded")]
    FullyExpanded,
}

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes
    nodes: Vec<SearchNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl SearchTree {
    /// Create a new tree rooted at the given board position.
    pub fn new(root_state: Board) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[SearchNode] {
        &self.nodes
    }

    /// Select the child of `node_id` maximizing the UCB1 score.
    ///
    /// Ties are broken uniformly at random among ALL maximal-scoring
    /// children, not first-found, to avoid a systematic bias toward
    /// move-enumeration order. Returns None if the node has no children.
    pub fn select_child(
        &self,
        node_id: NodeId,
        exploration: f32,
        rng: &mut ChaCha20Rng,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let parent_visits_ln = (node.visits.max(1) as f32).ln();

        let mut best_score = f32::NEG_INFINITY;
        let mut best: Vec<NodeId> = Vec::new();
        for &(_, child_id) in &node.children {
            let score = self.get(child_id).ucb_score(parent_visits_ln, exploration);
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(child_id);
            } else if score == best_score {
                best.push(child_id);
            }
        }

        if best.is_empty() {
            None
        } else {
            Some(best[rng.gen_range(0..best.len())])
        }
    }

    /// Expand `node_id` by its first untried move.
    ///
    /// Creates a child node whose state is the result of applying that move
    /// to this node's state, registers it, and returns its ID. The untried
    /// order matches `available_moves`, so expansion is deterministic.
    pub fn expand(&mut self, node_id: NodeId) -> Result<NodeId, ExpandError> {
        if self.get(node_id).is_terminal() {
            return Err(ExpandError::TerminalNode);
        }
        if self.get(node_id).is_fully_expanded() {
            return Err(ExpandError::FullyExpanded);
        }

        let node = self.get_mut(node_id);
        let (x, y) = node.untried.remove(0);
        let mut state = node.state.clone();
        state
            .place_stone(x, y)
            .expect("untried move is an empty in-bounds cell");

        let child_id = self.allocate(SearchNode::new_child(node_id, (x, y), state));
        self.get_mut(node_id).children.push(((x, y), child_id));
        Ok(child_id)
    }

    /// Backpropagate a simulation value from a leaf to the root.
    ///
    /// The value is negated at each step up: every ply flips which player
    /// the statistic is good for.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current = leaf_id;
        let mut value = value;

        while current.is_some() {
            let node = self.get_mut(current);
            node.visits += 1;
            node.value_sum += value;

            value = -value;
            current = node.parent;
        }
    }

    /// The root move with the highest visit count (robust-child policy),
    /// ties broken uniformly at random. None if the root has no children.
    pub fn best_move(&self, rng: &mut ChaCha20Rng) -> Option<Move> {
        let root = self.get(self.root);

        let mut best_visits = 0u32;
        let mut best: Vec<Move> = Vec::new();
        for &(mv, child_id) in &root.children {
            let visits = self.get(child_id).visits;
            if best.is_empty() || visits > best_visits {
                best_visits = visits;
                best.clear();
                best.push(mv);
            } else if visits == best_visits {
                best.push(mv);
            }
        }

        if best.is_empty() {
            None
        } else {
            Some(best[rng.gen_range(0..best.len())])
        }
    }

    /// Visit counts of the root's children, for drivers and diagnostics.
    pub fn root_visit_counts(&self) -> Vec<(Move, u32)> {
        let root = self.get(self.root);
        root.children
            .iter()
            .map(|&(mv, id)| (mv, self.get(id).visits))
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|&(_, id)| self.compute_max_depth(id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::Player;
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(seed)
    }

    fn won_board() -> Board {
        let mut board = Board::new(5);
        for &(x, y) in &[
            (0, 0),
            (1, 1),
            (0, 1),
            (1, 2),
            (0, 2),
            (1, 3),
            (0, 3),
            (1, 4),
            (0, 4),
        ] {
            board.place_stone(x, y).unwrap();
        }
        board
    }

    #[test]
    fn test_new_tree() {
        let tree = SearchTree::new(Board::new(3));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(!tree.is_empty());
        assert!(tree.get(tree.root()).parent.is_none());
    }

    #[test]
    fn test_expand_follows_move_order() {
        let mut tree = SearchTree::new(Board::new(3));

        let first = tree.expand(tree.root()).unwrap();
        let second = tree.expand(tree.root()).unwrap();

        assert_eq!(tree.get(first).mv, Some((0, 0)));
        assert_eq!(tree.get(second).mv, Some((0, 1)));
        assert_eq!(tree.get(tree.root()).children.len(), 2);
        assert_eq!(tree.get(tree.root()).untried.len(), 7);

        // The child's board reflects the move, the parent's does not.
        assert_eq!(tree.get(first).state.cell(0, 0), Some(Player::One));
        assert_eq!(tree.get(tree.root()).state.cell(0, 0), None);
    }

    #[test]
    fn test_expand_terminal_node_fails() {
        let mut tree = SearchTree::new(won_board());
        assert_eq!(tree.expand(tree.root()), Err(ExpandError::TerminalNode));
    }

    #[test]
    fn test_expand_fully_expanded_node_fails() {
        let mut tree = SearchTree::new(Board::new(3));
        for _ in 0..9 {
            tree.expand(tree.root()).unwrap();
        }
        assert!(tree.get(tree.root()).is_fully_expanded());
        assert_eq!(tree.expand(tree.root()), Err(ExpandError::FullyExpanded));
    }

    #[test]
    fn test_backpropagate_negates_up_the_chain() {
        let mut tree = SearchTree::new(Board::new(3));
        let child = tree.expand(tree.root()).unwrap();
        let grandchild = tree.expand(child).unwrap();

        tree.backpropagate(grandchild, 1.0);

        assert_eq!(tree.get(grandchild).visits, 1);
        assert_eq!(tree.get(child).visits, 1);
        assert_eq!(tree.get(tree.root()).visits, 1);

        assert!((tree.get(grandchild).value_sum - 1.0).abs() < 1e-6);
        assert!((tree.get(child).value_sum - (-1.0)).abs() < 1e-6);
        assert!((tree.get(tree.root()).value_sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unvisited_child_is_always_preferred() {
        let mut tree = SearchTree::new(Board::new(3));
        let visited = tree.expand(tree.root()).unwrap();
        let unvisited = tree.expand(tree.root()).unwrap();

        // Give the first child excellent statistics; the unvisited sibling
        // must still win selection via its infinite score.
        tree.get_mut(tree.root()).visits = 10;
        let node = tree.get_mut(visited);
        node.visits = 10;
        node.value_sum = 10.0;

        let mut rng = rng(7);
        for _ in 0..10 {
            assert_eq!(
                tree.select_child(tree.root(), 1.4, &mut rng),
                Some(unvisited)
            );
        }
    }

    #[test]
    fn test_select_child_breaks_ties_uniformly() {
        let mut tree = SearchTree::new(Board::new(3));
        let a = tree.expand(tree.root()).unwrap();
        let b = tree.expand(tree.root()).unwrap();
        let c = tree.expand(tree.root()).unwrap();
        tree.get_mut(tree.root()).visits = 3;

        // All three are unvisited, so all tie at infinity; every one must be
        // reachable rather than just the first in enumeration order.
        let mut seen = std::collections::HashSet::new();
        let mut rng = rng(42);
        for _ in 0..100 {
            seen.insert(tree.select_child(tree.root(), 1.4, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
        assert!(seen.contains(&a) && seen.contains(&b) && seen.contains(&c));
    }

    #[test]
    fn test_select_child_prefers_higher_mean() {
        let mut tree = SearchTree::new(Board::new(3));
        let worse = tree.expand(tree.root()).unwrap();
        let better = tree.expand(tree.root()).unwrap();

        tree.get_mut(tree.root()).visits = 200;
        let node = tree.get_mut(worse);
        node.visits = 100;
        node.value_sum = -20.0;
        let node = tree.get_mut(better);
        node.visits = 100;
        node.value_sum = 60.0;

        let mut rng = rng(3);
        assert_eq!(tree.select_child(tree.root(), 1.4, &mut rng), Some(better));
    }

    #[test]
    fn test_best_move_is_most_visited() {
        let mut tree = SearchTree::new(Board::new(3));
        let a = tree.expand(tree.root()).unwrap();
        let b = tree.expand(tree.root()).unwrap();

        tree.get_mut(a).visits = 30;
        // Give the less-visited child the better mean value: robust-child
        // selection must ignore it.
        tree.get_mut(a).value_sum = 0.0;
        tree.get_mut(b).visits = 7;
        tree.get_mut(b).value_sum = 7.0;

        let mut rng = rng(11);
        assert_eq!(tree.best_move(&mut rng), Some((0, 0)));
    }

    #[test]
    fn test_best_move_breaks_ties_uniformly() {
        let mut tree = SearchTree::new(Board::new(3));
        let a = tree.expand(tree.root()).unwrap();
        let b = tree.expand(tree.root()).unwrap();
        tree.get_mut(a).visits = 5;
        tree.get_mut(b).visits = 5;

        let mut seen = std::collections::HashSet::new();
        let mut rng = rng(9);
        for _ in 0..50 {
            seen.insert(tree.best_move(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_best_move_on_childless_root_is_none() {
        let tree = SearchTree::new(Board::new(3));
        let mut rng = rng(1);
        assert_eq!(tree.best_move(&mut rng), None);
    }

    #[test]
    fn test_root_visit_counts() {
        let mut tree = SearchTree::new(Board::new(3));
        let a = tree.expand(tree.root()).unwrap();
        tree.get_mut(a).visits = 4;

        assert_eq!(tree.root_visit_counts(), vec![((0, 0), 4)]);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = SearchTree::new(Board::new(3));
        let child = tree.expand(tree.root()).unwrap();
        tree.expand(child).unwrap();

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.max_depth, 2);
    }
}
