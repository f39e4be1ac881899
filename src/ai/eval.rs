//! 静态评估
//!
//! 对 12 条线逐条打分：只有一方棋子的线按棋子数平方奖励，混色或空线不计分；
//! 控制中心额外加分。

use crate::board::{Board, LINES};
use crate::types::{owner_of, Side, CENTER};

/// 单线权重
pub const LINE_WEIGHT: i32 = 20;

/// 中心格加分
pub const CENTER_BONUS: i32 = 30;

/// 从 side 视角评估局面
pub fn evaluate(board: &Board, side: Side) -> i32 {
    let opponent = side.opposite();
    let mut score = 0;

    for line in LINES.iter() {
        let mut mine = 0;
        let mut theirs = 0;
        for &i in line {
            match owner_of(board.get(i)) {
                Some(s) if s == side => mine += 1,
                Some(s) if s == opponent => theirs += 1,
                _ => {}
            }
        }

        if theirs == 0 && mine > 0 {
            score += mine * mine * LINE_WEIGHT;
        }
        if mine == 0 && theirs > 0 {
            score -= theirs * theirs * LINE_WEIGHT;
        }
    }

    if board.owner_at(CENTER) == Some(side) {
        score += CENTER_BONUS;
    }

    score
}
