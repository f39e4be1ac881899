//! 置换表
//!
//! 只在一次搜索调用内有效：每次顶层搜索新建，搜索结束即丢弃。
//! 键是棋盘的规范编码加行动方，不存在哈希碰撞。

use crate::board::Board;
use std::collections::HashMap;

/// 分数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// 精确值
    Exact,
    /// 下界（发生 beta 剪枝）
    Lower,
    /// 上界（所有子节点都不超过 alpha）
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub score: i32,
    pub depth: u32,
    pub bound: Bound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TTKey {
    board: u128,
    maximizing: bool,
}

/// 单次搜索的置换表
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<TTKey, TTEntry>,
    hits: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable {
            entries: HashMap::with_capacity(1 << 12),
            hits: 0,
        }
    }

    /// 查表
    ///
    /// 只有搜索深度不低于当前剩余深度、且分数能决定当前窗口的条目才可用。
    pub fn probe(
        &mut self,
        board: &Board,
        maximizing: bool,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let key = TTKey {
            board: board.encode(),
            maximizing,
        };
        let entry = self.entries.get(&key)?;
        if entry.depth < depth {
            return None;
        }
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        if usable {
            self.hits += 1;
            Some(entry.score)
        } else {
            None
        }
    }

    /// 存表：同一局面保留更深的结果
    pub fn store(&mut self, board: &Board, maximizing: bool, depth: u32, score: i32, bound: Bound) {
        let key = TTKey {
            board: board.encode(),
            maximizing,
        };
        let entry = TTEntry {
            score,
            depth,
            bound,
        };
        self.entries
            .entry(key)
            .and_modify(|old| {
                if depth >= old.depth {
                    *old = entry;
                }
            })
            .or_insert(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}
