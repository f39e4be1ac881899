//! CPU 对手
//!
//! 三个难度：初级（一步胜 + 随机）、中级（一步胜 + 防守 + 静态评估）、
//! 高级（迭代加深 minimax + alpha-beta + 置换表）。
//!
//! 所有模拟落子都通过规则引擎完成，AI 自身不持有跨调用的状态
//! （初级的随机数发生器除外）。

pub mod easy;
pub mod eval;
pub mod hard;
pub mod medium;
pub mod tt;

pub use easy::EasyAI;
pub use eval::evaluate;
pub use hard::{depth_budget, HardAI};
pub use medium::MediumAI;
pub use tt::{Bound, TTEntry, TranspositionTable};

use crate::board::{Board, MoveOutcome, Rules};
use crate::notation::parse_notation;
use crate::types::{Level, Side};
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

/// 胜负分（终局时再加上剩余深度）
pub const WIN_SCORE: i32 = 10000;

/// 中级 AI 的防守分，高于任何静态评估值
pub const BLOCK_SCORE: i32 = WIN_SCORE - 1000;

/// 取消标记
///
/// 可以跨线程克隆；搜索在每个节点检查一次。
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// AI 配置
#[derive(Debug, Clone, Default)]
pub struct AIConfig {
    /// 随机种子（初级）
    pub seed: Option<u64>,
    /// 时间限制（秒，高级）
    pub time_limit: Option<f64>,
    /// 节点数上限（高级）
    pub node_limit: Option<u64>,
    /// 最大深度上限（高级）
    pub max_depth: Option<u32>,
    /// 满盘规则
    pub rules: Rules,
    /// 外部取消（高级）
    pub cancel: Option<CancelToken>,
}

impl AIConfig {
    /// 检查来自外部输入的限制值
    pub fn validate(&self) -> Result<(), String> {
        if let Some(secs) = self.time_limit {
            if secs.is_nan() || secs < 0.0 {
                return Err(format!("Invalid time limit: {} (expected seconds >= 0)", secs));
            }
        }
        Ok(())
    }
}

/// 走法评分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredMove {
    pub position: usize,
    pub score: i32,
}

/// 搜索统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// 模拟过的局面数
    pub nodes: u64,
    /// 最后完成的迭代深度
    pub depth_reached: u32,
    pub tt_hits: u64,
    pub elapsed_ms: f64,
    /// 是否因时间、节点数或取消而提前结束
    pub aborted: bool,
}

/// 一次选点的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// 选中的格子，没有空格时为 None
    pub best: Option<usize>,
    /// 第一个元素就是 best，之后是候补
    pub moves: Vec<ScoredMove>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub(crate) fn none() -> Self {
        SearchOutcome {
            best: None,
            moves: Vec::new(),
            stats: SearchStats::default(),
        }
    }
}

/// AI 策略接口
pub trait AIStrategy: Send {
    /// 搜索并返回排好序的前 n 个走法
    fn search(&self, board: &Board, side: Side, n: usize) -> SearchOutcome;

    /// 选择走法（返回带评分的走法列表）
    fn select_moves(&self, board: &Board, side: Side, n: usize) -> Vec<ScoredMove> {
        self.search(board, side, n).moves
    }

    /// 选择最佳走法
    fn select_best_move(&self, board: &Board, side: Side) -> Option<usize> {
        self.search(board, side, 1).best
    }
}

/// 排序辅助函数：分数降序，同分保持枚举顺序
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by_key(|sm| Reverse(sm.score));
    scored.truncate(n);
}

/// 在已知为空的格子上模拟落子
///
/// 规则引擎拒绝说明空格枚举有错，直接 panic。
pub(crate) fn simulate(board: &Board, position: usize, side: Side, rules: Rules) -> MoveOutcome {
    board
        .apply_move_with(position as i64, side, rules)
        .unwrap_or_else(|e| panic!("simulated move at {} rejected: {}", position, e))
}

/// 按枚举顺序找第一个能让 side 立即获胜的格子
pub(crate) fn find_winning_move(
    board: &Board,
    side: Side,
    rules: Rules,
    empties: &[usize],
    nodes: &mut u64,
) -> Option<usize> {
    empties.iter().copied().find(|&pos| {
        *nodes += 1;
        simulate(board, pos, side, rules).winner == Some(side)
    })
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建初级 AI
    pub fn easy(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(EasyAI::new(config)),
        }
    }

    /// 创建中级 AI
    pub fn medium(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MediumAI::new(config)),
        }
    }

    /// 创建高级 AI
    pub fn hard(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(HardAI::new(config)),
        }
    }

    pub fn from_level(level: Level, config: &AIConfig) -> Self {
        match level {
            Level::Easy => Self::easy(config),
            Level::Medium => Self::medium(config),
            Level::Hard => Self::hard(config),
        }
    }

    /// 从难度名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        let level: Level = name.parse()?;
        Ok(Self::from_level(level, config))
    }

    pub fn search(&self, board: &Board, side: Side, n: usize) -> SearchOutcome {
        self.strategy.search(board, side, n)
    }

    pub fn select_move(&self, board: &Board, side: Side) -> Option<usize> {
        self.strategy.select_best_move(board, side)
    }

    pub fn select_moves(&self, board: &Board, side: Side, n: usize) -> Vec<ScoredMove> {
        self.strategy.select_moves(board, side, n)
    }

    /// 从文本局面选点；行动方取 `side`，否则取局面里的行动方
    pub fn select_move_notation(
        &self,
        notation: &str,
        side: Option<Side>,
    ) -> Result<Option<usize>, String> {
        let state = parse_notation(notation).map_err(|e| e.to_string())?;
        let side = side
            .or(state.turn)
            .ok_or_else(|| "Side to move is missing".to_string())?;
        Ok(self.select_move(&state.board, side))
    }
}

/// 对外入口：按难度为 side 选一个空格
///
/// 满盘时返回 None。
pub fn select_move(board: &Board, side: Side, level: Level) -> Option<usize> {
    AIEngine::from_level(level, &AIConfig::default()).select_move(board, side)
}
