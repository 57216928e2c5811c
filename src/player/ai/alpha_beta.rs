use super::config::AIConfig;
use super::eval;
use crate::core::{BoardState, Color, Move, Position, ScoredPlay};
use crate::logic::{is_king_lost, RulesEngine, SimulationGame};
use crate::player::controller::{MoveSelector, PendingPlay};

use log::{debug, error, info};
use std::cmp::Ordering;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Depth-bounded minimax with alpha-beta over a private scratch rules engine.
///
/// The scratch engine is reset to the node state before every trial move, so
/// nothing the search does is visible outside of it.
///
/// Ties go to the later move. Cutoffs are strict (`beta < alpha`, not
/// `beta <= alpha`), so the pruned answer is identical to plain
/// minimax under that tie rule.
pub struct SearchDriver<'a, R: RulesEngine> {
    scratch: R,
    ai: Color,
    config: &'a AIConfig,
    max_depth: u32,
    pruning: bool,
    checkmate_mode: bool,
    nodes: usize,
}

impl<'a, R: RulesEngine> SearchDriver<'a, R> {
    pub fn new(scratch: R, ai: Color, config: &'a AIConfig, max_depth: u32) -> Self {
        SearchDriver {
            scratch,
            ai,
            config,
            max_depth: max_depth.max(1),
            pruning: true,
            checkmate_mode: false,
            nodes: 0,
        }
    }

    /// Plain minimax. Same answer, more nodes.
    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn checkmate_mode(&self) -> bool {
        self.checkmate_mode
    }

    pub fn run(&mut self, root: &BoardState) -> ScoredPlay {
        self.nodes = 0;
        self.checkmate_mode = eval::is_checkmate_mode(root, self.ai, &self.config.evaluation);

        let (score, best) = self.search(root, 0, f64::NEG_INFINITY, f64::INFINITY);
        match best {
            Some(mv) => ScoredPlay::new(mv, score),
            None => ScoredPlay::empty(score),
        }
    }

    fn evaluate(&self, board: &BoardState) -> f64 {
        eval::evaluate(board, self.ai, self.checkmate_mode, &self.config.evaluation)
    }

    fn search(
        &mut self,
        node: &BoardState,
        ply: u32,
        mut alpha: f64,
        mut beta: f64,
    ) -> (f64, Option<Move>) {
        self.nodes += 1;

        // 決着済みの局面は展開しない
        if is_king_lost(node, Color::White) || is_king_lost(node, Color::Black) || ply >= self.max_depth {
            return (self.evaluate(node), None);
        }

        let mover = node.to_move;
        let maximizing = mover == self.ai;
        let good_enough = self.config.search.good_enough;

        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        let names: Vec<String> = node.pieces_of(mover).map(|p| p.name.clone()).collect();

        'pieces: for name in names {
            self.scratch.reset_to(node);
            let mut targets = self.scratch.allowed_moves(&name);
            if targets.is_empty() {
                continue;
            }
            self.order_targets(node, mover, &mut targets);

            for target in targets {
                self.scratch.reset_to(node);
                if !self.scratch.apply_move(&name, target) {
                    continue;
                }
                let child = self.scratch.state().clone();
                let heuristic = self.evaluate(&child);

                let settled = if maximizing {
                    heuristic > good_enough
                } else {
                    heuristic < -good_enough
                };
                let score = if settled || ply + 1 >= self.max_depth {
                    heuristic
                } else {
                    self.search(&child, ply + 1, alpha, beta).0
                };

                // 同点は後の手で置き換える
                if maximizing {
                    if score >= best_score {
                        best_score = score;
                        best_move = Some(Move::new(name.as_str(), target));
                    }
                    alpha = alpha.max(best_score);
                } else {
                    if score <= best_score {
                        best_score = score;
                        best_move = Some(Move::new(name.as_str(), target));
                    }
                    beta = beta.min(best_score);
                }

                // 同点の手もまだ読む
                if self.pruning && beta < alpha {
                    break 'pieces;
                }
            }
        }

        match best_move {
            Some(mv) => (best_score, Some(mv)),
            None => (0.0, None),
        }
    }

    /// Captures first (bigger victim first), then quiet moves onto the
    /// centre, then the rest. Stable within each class.
    fn order_targets(&self, node: &BoardState, mover: Color, targets: &mut [Position]) {
        let weights = &self.config.evaluation;
        let key = |to: Position| -> f64 {
            match eval::capture_value(node, mover, to, weights) {
                Some(value) => 100.0 + value,
                None if to.is_center() => 1.0,
                None => 0.0,
            }
        };
        targets.sort_by(|a, b| key(*b).partial_cmp(&key(*a)).unwrap_or(Ordering::Equal));
    }
}

/// In-process strategy: adaptive-depth alpha-beta with the heuristic evaluator.
#[derive(Clone)]
pub struct LocalSearchAI {
    color: Color,
    name: String,
    config: Arc<AIConfig>,
}

impl LocalSearchAI {
    pub fn new(color: Color, config: Arc<AIConfig>) -> Self {
        LocalSearchAI {
            color,
            name: format!("LocalSearchAI ({})", color),
            config,
        }
    }

    /// Depth for `board` from the piece-count table.
    pub fn depth_for(&self, board: &BoardState) -> u32 {
        self.config.search.depth_for(board.pieces.len())
    }

    /// Synchronous search at the adaptive depth.
    pub fn search_root(&self, board: &BoardState) -> ScoredPlay {
        self.search_with(board, self.depth_for(board), true).0
    }

    /// Search at a fixed depth; returns the result and the visited node count.
    pub fn search_with(&self, board: &BoardState, depth: u32, pruning: bool) -> (ScoredPlay, usize) {
        let mut root = board.clone();
        if root.to_move != self.color {
            debug!(
                "{}: board says {} to move, searching for {}",
                self.name, root.to_move, self.color
            );
            root.to_move = self.color;
        }

        let start = Instant::now();
        let mut driver = SearchDriver::new(SimulationGame::default(), self.color, &self.config, depth);
        if !pruning {
            driver = driver.without_pruning();
        }
        let result = driver.run(&root);

        info!(
            "{}: depth {} nodes {} checkmate_mode {} in {:?} -> {}",
            self.name,
            depth,
            driver.nodes(),
            driver.checkmate_mode(),
            start.elapsed(),
            result
        );
        (result, driver.nodes())
    }
}

/// Runs `search`, turning a panic into an empty result.
fn guarded(name: &str, search: impl FnOnce() -> ScoredPlay) -> ScoredPlay {
    catch_unwind(AssertUnwindSafe(search)).unwrap_or_else(|_| {
        error!("{}: search panicked", name);
        ScoredPlay::empty(0.0)
    })
}

impl MoveSelector for LocalSearchAI {
    fn play(&self, board: BoardState) -> PendingPlay {
        let (reply, pending) = PendingPlay::channel();
        let searcher = self.clone();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            // ランタイム外では専用スレッドで探索する
            std::thread::spawn(move || {
                let result = guarded(&searcher.name, || searcher.search_root(&board));
                let _ = reply.send(result);
            });
            return pending;
        };

        handle.spawn(async move {
            tokio::task::yield_now().await;
            let name = searcher.name.clone();
            let search = move || guarded(&searcher.name, || searcher.search_root(&board));
            let result = match tokio::task::spawn_blocking(search).await {
                Ok(result) => result,
                Err(e) => {
                    error!("{}: search aborted: {}", name, e);
                    ScoredPlay::empty(0.0)
                }
            };
            let _ = reply.send(result);
        });

        pending
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Color {
        self.color
    }
}
