//! 高级 AI：迭代加深 minimax
//!
//! - Alpha-Beta 剪枝
//! - 走法排序：离中心的曼哈顿距离升序，同距离按落子后的静态评估降序
//! - 置换表：每次顶层调用新建，带上下界标记
//! - 时间、节点数上限和外部取消：中断时返回最深一次完整迭代的结果

use super::eval::evaluate;
use super::tt::{Bound, TranspositionTable};
use super::{
    find_winning_move, simulate, AIConfig, AIStrategy, CancelToken, ScoredMove,
    SearchOutcome, SearchStats, WIN_SCORE,
};
use crate::board::{Board, Rules};
use crate::types::{Position, Side, BOARD_LEN};
use lazy_static::lazy_static;
use log::{debug, info, trace, warn};
use std::cmp::Reverse;
use std::time::{Duration, Instant};

/// 窗口边界，大于任何终局分
const INF: i32 = 1_000_000;

/// 迭代加深的起始深度
const MIN_DEPTH: u32 = 2;

/// 每隔多少节点检查一次时间
const TIME_CHECK_INTERVAL: u64 = 256;

lazy_static! {
    /// 每个格子到中心的曼哈顿距离
    static ref CENTER_DISTANCE: [u8; BOARD_LEN] = {
        let mut table = [0u8; BOARD_LEN];
        for (i, d) in table.iter_mut().enumerate() {
            *d = Position::from_index(i).center_distance();
        }
        table
    };
}

/// 根据空格数决定最大深度：空格越多越浅
pub fn depth_budget(empty_count: usize) -> u32 {
    if empty_count > 15 {
        4
    } else if empty_count > 10 {
        5
    } else {
        6
    }
}

/// 模拟后的子节点
struct Child {
    position: usize,
    board: Board,
    winner: Option<Side>,
}

/// 单次搜索的状态，搜索结束即丢弃
struct Searcher {
    cpu: Side,
    rules: Rules,
    tt: TranspositionTable,
    nodes: u64,
    deadline: Option<Instant>,
    /// 节点数到这里时再看一次时钟
    next_time_check: u64,
    node_limit: Option<u64>,
    cancel: Option<CancelToken>,
    aborted: bool,
}

impl Searcher {
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            self.aborted = true;
        } else if self.node_limit.is_some_and(|limit| self.nodes >= limit) {
            self.aborted = true;
        } else if let Some(deadline) = self.deadline {
            if self.nodes >= self.next_time_check {
                self.next_time_check = self.nodes + TIME_CHECK_INTERVAL;
                self.aborted = Instant::now() >= deadline;
            }
        }
        self.aborted
    }

    /// 生成并排序子节点
    fn ordered_children(&mut self, board: &Board, mover: Side) -> Vec<Child> {
        let mut children: Vec<(Child, i32)> = board
            .empty_cells()
            .into_iter()
            .map(|position| {
                let outcome = simulate(board, position, mover, self.rules);
                let eval = evaluate(&outcome.board, mover);
                let child = Child {
                    position,
                    board: outcome.board,
                    winner: outcome.winner,
                };
                (child, eval)
            })
            .collect();
        children.sort_by_key(|(child, eval)| (CENTER_DISTANCE[child.position], Reverse(*eval)));
        children.into_iter().map(|(child, _)| child).collect()
    }

    /// Minimax 搜索（带 Alpha-Beta 剪枝），分数始终从 CPU 视角计算
    fn minimax(
        &mut self,
        board: &Board,
        winner: Option<Side>,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        // 赢得越快分数越高，输得越快分数越低
        if let Some(w) = winner {
            let score = WIN_SCORE + depth as i32;
            return if w == self.cpu { score } else { -score };
        }
        if board.is_full() {
            return 0;
        }
        if depth == 0 {
            return evaluate(board, self.cpu);
        }
        if self.should_stop() {
            return 0;
        }

        if let Some(score) = self.tt.probe(board, maximizing, depth, alpha, beta) {
            return score;
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let mover = if maximizing {
            self.cpu
        } else {
            self.cpu.opposite()
        };

        let mut best = if maximizing { -INF } else { INF };
        for child in self.ordered_children(board, mover) {
            let score = self.minimax(&child.board, child.winner, depth - 1, alpha, beta, !maximizing);
            if self.aborted {
                return 0;
            }
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(board, maximizing, depth, best, bound);
        best
    }

    /// 根节点搜索一层深度
    ///
    /// 返回每个根走法的分数（按搜索顺序）；中断时只包含已完成的走法。
    /// 除最佳走法外，其余分数是上界。
    fn search_root(&mut self, children: &[Child], depth: u32) -> Vec<ScoredMove> {
        let mut alpha = -INF;
        let mut scores = Vec::with_capacity(children.len());
        for child in children {
            let score = self.minimax(&child.board, child.winner, depth - 1, alpha, INF, false);
            if self.aborted {
                break;
            }
            alpha = alpha.max(score);
            scores.push(ScoredMove {
                position: child.position,
                score,
            });
        }
        scores
    }
}

/// 高级 AI - 迭代加深 + Alpha-Beta + 置换表
pub struct HardAI {
    rules: Rules,
    max_depth: Option<u32>,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    cancel: Option<CancelToken>,
}

impl HardAI {
    pub fn new(config: &AIConfig) -> Self {
        HardAI {
            rules: config.rules,
            max_depth: config.max_depth,
            time_limit: config.time_limit.and_then(|secs| {
                Duration::try_from_secs_f64(secs)
                    .map_err(|e| warn!("hard: ignoring time limit {}: {}", secs, e))
                    .ok()
            }),
            node_limit: config.node_limit,
            cancel: config.cancel.clone(),
        }
    }

    /// 迭代加深搜索
    pub fn analyze(&self, board: &Board, side: Side) -> SearchOutcome {
        let start = Instant::now();
        let empties = board.empty_cells();
        if empties.is_empty() {
            return SearchOutcome::none();
        }

        let mut nodes = 0;
        if let Some(pos) = find_winning_move(board, side, self.rules, &empties, &mut nodes) {
            info!("hard: immediate win at {}", pos);
            return SearchOutcome {
                best: Some(pos),
                moves: vec![ScoredMove {
                    position: pos,
                    score: WIN_SCORE,
                }],
                stats: SearchStats {
                    nodes,
                    depth_reached: 1,
                    elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
                    ..Default::default()
                },
            };
        }

        let mut searcher = Searcher {
            cpu: side,
            rules: self.rules,
            tt: TranspositionTable::new(),
            nodes,
            // 超出 Instant 范围的时限等于没有时限
            deadline: self.time_limit.and_then(|limit| start.checked_add(limit)),
            next_time_check: 0,
            node_limit: self.node_limit,
            cancel: self.cancel.clone(),
            aborted: false,
        };

        let mut budget = depth_budget(empties.len());
        if let Some(max) = self.max_depth {
            budget = budget.min(max.max(1));
        }

        let mut children = searcher.ordered_children(board, side);
        let mut completed: Option<Vec<ScoredMove>> = None;
        let mut partial: Vec<ScoredMove> = Vec::new();
        let mut depth_reached = 0;

        for depth in MIN_DEPTH.min(budget)..=budget {
            let scores = searcher.search_root(&children, depth);
            if searcher.aborted {
                warn!(
                    "hard: search stopped during depth {} after {} nodes",
                    depth, searcher.nodes
                );
                partial = scores;
                break;
            }

            let mut ranked = scores;
            // 稳定排序：同分保持本轮的搜索顺序
            ranked.sort_by_key(|sm| Reverse(sm.score));
            debug!(
                "hard: depth {} best {} score {} nodes {}",
                depth, ranked[0].position, ranked[0].score, searcher.nodes
            );

            // 下一轮按本轮结果排序根走法
            let order: Vec<usize> = ranked.iter().map(|sm| sm.position).collect();
            children.sort_by_key(|child| order.iter().position(|&p| p == child.position));

            depth_reached = depth;
            completed = Some(ranked);
        }

        let moves = match completed {
            Some(ranked) => ranked,
            None => {
                // 第一轮都没完成：取部分结果里最好的，再退回排序后的第一个走法
                partial.sort_by_key(|sm| Reverse(sm.score));
                if partial.is_empty() {
                    children
                        .iter()
                        .map(|child| ScoredMove {
                            position: child.position,
                            score: 0,
                        })
                        .collect()
                } else {
                    partial
                }
            }
        };
        let best = moves.first().map(|sm| sm.position);

        trace!(
            "hard: tt entries {} hits {}",
            searcher.tt.len(),
            searcher.tt.hits()
        );
        let stats = SearchStats {
            nodes: searcher.nodes,
            depth_reached,
            tt_hits: searcher.tt.hits(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
            aborted: searcher.aborted,
        };
        info!(
            "hard: {} plays {:?} (depth {}, nodes {}, {:.1} ms)",
            side, best, stats.depth_reached, stats.nodes, stats.elapsed_ms
        );

        SearchOutcome { best, moves, stats }
    }
}

impl AIStrategy for HardAI {
    fn search(&self, board: &Board, side: Side, n: usize) -> SearchOutcome {
        let mut outcome = self.analyze(board, side);
        outcome.moves.truncate(n);
        outcome
    }
}
