//! Search tree nodes.
//!
//! Uses arena-based allocation with index references (NodeId) so that the
//! parent link is a plain, non-owning index and the tree stays serializable.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;
use crate::rules::Outcome;

/// Index into the SearchTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A node in the search tree: the state reached by `move_from_parent`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchNode<M> {
    /// Move that produced this node (None for root).
    pub move_from_parent: Option<M>,

    /// Player who made `move_from_parent`. For the root this is the
    /// opponent of the player to move.
    pub player_who_moved: PlayerId,

    /// Parent node (None for root). Only used to climb during
    /// backpropagation.
    pub parent: Option<NodeId>,

    /// Simulations that passed through this node.
    pub visits: u32,

    /// Sum of simulation outcomes from `player_who_moved`'s perspective.
    pub wins: f64,

    /// Legal moves not yet expanded into children.
    pub untried_moves: Vec<M>,

    /// Expanded children in expansion order.
    /// SmallVec keeps shallow, narrow subtrees allocation-free.
    pub children: SmallVec<[NodeId; 8]>,

    /// Is this a terminal game state?
    pub is_terminal: bool,
}

impl<M> SearchNode<M> {
    /// Create a node for the state reached by `mv`.
    ///
    /// `untried_moves` must be the legal moves of that state; an empty list
    /// makes the node terminal.
    pub fn new(
        mv: Option<M>,
        player_who_moved: PlayerId,
        parent: Option<NodeId>,
        untried_moves: Vec<M>,
    ) -> Self {
        let is_terminal = untried_moves.is_empty();
        Self {
            move_from_parent: mv,
            player_who_moved,
            parent,
            visits: 0,
            wins: 0.0,
            untried_moves,
            children: SmallVec::new(),
            is_terminal,
        }
    }

    /// Create a root node for a state where `to_move` is about to play.
    pub fn root(to_move: PlayerId, moves: Vec<M>) -> Self {
        Self::new(None, to_move.opponent(), None, moves)
    }

    /// Check if every legal move has been expanded.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Empirical win rate from `player_who_moved`'s perspective.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }

    /// UCB1 score of this node as a child of a node with `parent_visits`.
    ///
    /// Formula: win_rate + c * sqrt(ln(N) / n). Unvisited nodes score
    /// infinity.
    #[must_use]
    pub fn ucb1(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let ln_parent = (parent_visits.max(1) as f64).ln();
        self.win_rate() + exploration * (ln_parent / self.visits as f64).sqrt()
    }

    /// Record one simulation whose outcome is given for `perspective`.
    pub fn update(&mut self, outcome: Outcome, perspective: PlayerId) {
        self.visits += 1;
        self.wins += outcome.for_player(perspective, self.player_who_moved).value();
    }
}
