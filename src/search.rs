//! Depth-limited exhaustive search over joint actions.
//!
//! Every joint action of every node is expanded on its own cloned state.
//! Leaves are scored per player against the maxima of the whole roster and a
//! node keeps the joint action whose subtree has the greatest score summed
//! over all players: a cooperative maximum, not an adversarial one. Ties go
//! to the later-enumerated joint action.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use thiserror::Error;

use crate::error::GameError;
use crate::game::{check_invariants, combine_actions, update_clone, Action, InvariantViolation, PlayerState};

/// Configuration for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Turns to look ahead.
    pub depth: usize,
    /// Expand sibling subtrees on the rayon pool.
    pub parallel: bool,
    /// Stop expanding new siblings after this long.
    pub deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            parallel: true,
            deadline: None,
        }
    }
}

impl SearchConfig {
    /// Exhaustive search to `depth` without a deadline.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// Best joint plan found.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Leaf score of each player at the end of the plan.
    pub scores: Vec<f64>,
    /// `plan[i]` is player `i`'s action for each turn, first turn first.
    pub plan: Vec<Vec<Action>>,
    /// Leaves scored.
    pub nodes: u64,
    /// False when the deadline cut the enumeration short.
    pub complete: bool,
}

impl SearchResult {
    /// Sum of all players' scores.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }
}

/// Error during search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The starting roster breaks a game invariant.
    #[error("invalid starting state: {0}")]
    InvalidState(#[from] InvariantViolation),
    /// A speculative turn was rejected.
    #[error("simulation failed: {0}")]
    Game(#[from] GameError),
}

/// Standing of each player against the best of the whole roster.
///
/// Zero for a player leading on every resource, negative otherwise.
#[must_use]
pub fn leaf_scores(players: &[PlayerState]) -> Vec<f64> {
    let (max_obelisks, max_barracks, max_soldiers, max_walls) =
        players.iter().fold((0, 0, 0, 0), |max, p| {
            (
                max.0.max(p.obelisks),
                max.1.max(p.barracks),
                max.2.max(p.soldiers),
                max.3.max(p.walls),
            )
        });

    players
        .iter()
        .map(|p| {
            f64::from(p.obelisks - max_obelisks)
                + f64::from(p.barracks - max_barracks) / 10.0
                + f64::from(p.soldiers - max_soldiers) / 20.0
                + f64::from(p.walls - max_walls) / 10.0
        })
        .collect()
}

/// Search `config.depth` turns ahead from `players`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidState`] if `players` breaks a game invariant.
pub fn search(players: &[PlayerState], config: &SearchConfig) -> Result<SearchResult, SearchError> {
    if let Some(violation) = check_invariants(players).into_iter().next() {
        return Err(violation.into());
    }

    let searcher = Searcher {
        parallel: config.parallel,
        deadline: config.deadline.map(|d| Instant::now() + d),
        leaves: AtomicU64::new(0),
        expired: AtomicBool::new(false),
    };

    let node = searcher.expand(players, config.depth)?;
    let nodes = searcher.leaves.load(Ordering::Relaxed);
    let complete = !searcher.expired.load(Ordering::Relaxed);

    if complete {
        log::debug!("depth {}: {nodes} leaves, total {:.2}", config.depth, node.total());
    } else {
        log::warn!("depth {}: deadline reached after {nodes} leaves", config.depth);
    }

    Ok(SearchResult {
        scores: node.scores,
        plan: node.plan,
        nodes,
        complete,
    })
}

#[derive(Debug)]
struct Node {
    scores: Vec<f64>,
    plan: Vec<Vec<Action>>,
}

impl Node {
    fn leaf(players: &[PlayerState]) -> Self {
        Self {
            scores: leaf_scores(players),
            plan: vec![Vec::new(); players.len()],
        }
    }

    fn total(&self) -> f64 {
        self.scores.iter().sum()
    }
}

#[derive(Debug)]
struct Searcher {
    parallel: bool,
    deadline: Option<Instant>,
    leaves: AtomicU64,
    expired: AtomicBool,
}

impl Searcher {
    fn out_of_time(&self) -> bool {
        if self.expired.load(Ordering::Relaxed) {
            return true;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.expired.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    fn expand(&self, players: &[PlayerState], depth: usize) -> Result<Node, GameError> {
        if depth == 0 {
            self.leaves.fetch_add(1, Ordering::Relaxed);
            return Ok(Node::leaf(players));
        }

        let child = |joint: Vec<Action>| -> Result<Option<(Vec<Action>, Node)>, GameError> {
            if self.out_of_time() {
                return Ok(None);
            }
            let next = update_clone(players, &joint)?;
            Ok(Some((joint, self.expand(&next, depth - 1)?)))
        };

        let mut best: Option<(Vec<Action>, Node)> = None;
        let mut keep = |candidate: Option<(Vec<Action>, Node)>| {
            let Some((joint, node)) = candidate else {
                return;
            };
            if best.as_ref().is_none_or(|(_, b)| node.total() >= b.total()) {
                best = Some((joint, node));
            }
        };

        if self.parallel {
            let joints: Vec<Vec<Action>> = combine_actions(players).collect();
            let children: Vec<_> = joints
                .into_par_iter()
                .map(child)
                .collect::<Result<_, GameError>>()?;
            children.into_iter().for_each(&mut keep);
        } else {
            for joint in combine_actions(players) {
                keep(child(joint)?);
            }
        }

        let Some((joint, node)) = best else {
            // Deadline hit before any child: score this node as a leaf.
            self.leaves.fetch_add(1, Ordering::Relaxed);
            return Ok(Node::leaf(players));
        };

        let plan = joint
            .into_iter()
            .zip(node.plan)
            .map(|(action, rest)| std::iter::once(action).chain(rest).collect())
            .collect();

        Ok(Node {
            scores: node.scores,
            plan,
        })
    }
}
