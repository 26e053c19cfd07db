//! Arena-based search tree.
//!
//! Uses a flat `Vec<SearchNode>` with index-based references. A node owns
//! its children through the id list in `children`; the `parent` id is only
//! followed upwards during backpropagation. Children are always allocated
//! after their parent, so arena order is a valid top-down order.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, SearchNode};
use super::stats::MoveStats;
use crate::core::{GameRng, PlayerId};
use crate::rules::{GameState, MoveError, Outcome};

/// Arena-based search tree for one move decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchTree<M> {
    /// All nodes in the tree.
    nodes: Vec<SearchNode<M>>,
}

/// Nodes preallocated per tree.
const INITIAL_CAPACITY: usize = 1024;

impl<M: Clone> SearchTree<M> {
    /// Create a tree whose root is a state with `to_move` to play and
    /// `moves` legal.
    pub fn new(to_move: PlayerId, moves: Vec<M>) -> Self {
        let mut nodes = Vec::with_capacity(INITIAL_CAPACITY);
        nodes.push(SearchNode::root(to_move, moves));
        Self { nodes }
    }

    /// Create a tree for a game state.
    pub fn for_state<S: GameState<Move = M>>(state: &S) -> Self {
        Self::new(state.player_to_move(), state.moves())
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode<M> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<M> {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &SearchNode<M> {
        self.get(self.root())
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty. A tree always has a root, so this is
    /// false for every constructed tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode<M>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Choose the child of `id` with the highest UCB1 score.
    ///
    /// Ties go to the first child in expansion order. Returns `None` for a
    /// node without children.
    #[must_use]
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;

        for &child in &node.children {
            let score = self.get(child).ucb1(node.visits, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child, score)),
            }
        }

        best.map(|(child, _)| child)
    }

    /// Expand one untried move of `id`.
    ///
    /// The move is removed from `untried_moves` (picked with `rng`), applied
    /// to `state`, and a new child for the resulting state is appended.
    /// Returns `None` if the node has no untried moves.
    pub fn expand<S: GameState<Move = M>>(
        &mut self,
        id: NodeId,
        state: &mut S,
        rng: &mut GameRng,
    ) -> Result<Option<NodeId>, MoveError> {
        let untried = self.get(id).untried_moves.len();
        if untried == 0 {
            return Ok(None);
        }

        let idx = rng.gen_range_usize(0..untried);
        let mv = self.get_mut(id).untried_moves.swap_remove(idx);

        let mover = state.player_to_move();
        state.do_move(&mv)?;

        let child = SearchNode::new(Some(mv), mover, Some(id), state.moves());
        let child_id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(id).children.push(child_id);

        Ok(Some(child_id))
    }

    /// Credit one simulation to `from` and all its ancestors.
    ///
    /// `outcome` is expressed from `perspective`'s point of view and is
    /// flipped into each node's `player_who_moved` perspective.
    pub fn backpropagate(&mut self, from: NodeId, outcome: Outcome, perspective: PlayerId) {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.update(outcome, perspective);
            current = node.parent;
        }
    }

    /// Statistics of the root's children, in expansion order.
    #[must_use]
    pub fn root_child_stats(&self) -> Vec<MoveStats<M>> {
        self.root_node()
            .children
            .iter()
            .filter_map(|&child| {
                let node = self.get(child);
                node.move_from_parent.clone().map(|mv| MoveStats {
                    mv,
                    visits: node.visits as u64,
                    wins: node.wins,
                })
            })
            .collect()
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut depths = vec![0u16; self.nodes.len()];
        let mut max_depth = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                depths[i] = depths[parent.0 as usize] + 1;
                max_depth = max_depth.max(depths[i]);
            }
        }

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal).count(),
            fully_expanded_count: self
                .nodes
                .iter()
                .filter(|n| !n.is_terminal && n.is_fully_expanded())
                .count(),
        }
    }
}

/// Statistics about the search tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached (root = 0).
    pub max_depth: u16,

    /// Number of terminal nodes.
    pub terminal_count: usize,

    /// Number of non-terminal nodes with every move expanded.
    pub fully_expanded_count: usize,
}
