//! 中级 AI：一步胜 → 防守 → 静态评估

use super::eval::evaluate;
use super::{
    find_winning_move, simulate, sort_and_truncate, AIConfig, AIStrategy, ScoredMove,
    SearchOutcome, SearchStats, BLOCK_SCORE, WIN_SCORE,
};
use crate::board::{Board, Rules};
use crate::types::Side;
use std::time::Instant;

/// 中级 AI - 一层战术 + 评估函数
pub struct MediumAI {
    rules: Rules,
}

impl MediumAI {
    pub fn new(config: &AIConfig) -> Self {
        MediumAI {
            rules: config.rules,
        }
    }
}

impl AIStrategy for MediumAI {
    fn search(&self, board: &Board, side: Side, n: usize) -> SearchOutcome {
        let start = Instant::now();
        let empties = board.empty_cells();
        if empties.is_empty() {
            return SearchOutcome::none();
        }

        let mut nodes = 0;
        let win = find_winning_move(board, side, self.rules, &empties, &mut nodes);
        // 对手下在这里就赢，所以要抢先占住
        let block = match win {
            Some(_) => None,
            None => find_winning_move(board, side.opposite(), self.rules, &empties, &mut nodes),
        };

        let mut scored: Vec<ScoredMove> = empties
            .iter()
            .map(|&position| {
                let score = if Some(position) == win {
                    WIN_SCORE
                } else if Some(position) == block {
                    BLOCK_SCORE
                } else {
                    nodes += 1;
                    evaluate(&simulate(board, position, side, self.rules).board, side)
                };
                ScoredMove { position, score }
            })
            .collect();

        sort_and_truncate(&mut scored, n);
        SearchOutcome {
            best: scored.first().map(|sm| sm.position),
            moves: scored,
            stats: SearchStats {
                nodes,
                depth_reached: 1,
                elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_board;
    use crate::test_positions;

    fn medium() -> MediumAI {
        MediumAI::new(&AIConfig::default())
    }

    #[test]
    fn test_takes_win() {
        let board = parse_board(test_positions::B_WINS_AT_20).unwrap();
        assert_eq!(medium().select_best_move(&board, Side::B), Some(20));
    }

    #[test]
    fn test_blocks_opponent() {
        let board = parse_board(test_positions::B_MUST_BLOCK).unwrap();
        let moves = medium().select_moves(&board, Side::B, 2);
        assert_eq!(moves[0], ScoredMove { position: 12, score: BLOCK_SCORE });
        assert!(moves[1].score < BLOCK_SCORE);
    }

    #[test]
    fn test_prefers_win_over_block() {
        // 双方都有一步胜：B 在第 0 列，A 在第 4 列
        let board = parse_board("10002/30002/50002/10002/00000").unwrap();
        assert_eq!(medium().select_best_move(&board, Side::B), Some(20));
        assert_eq!(medium().select_best_move(&board, Side::A), Some(24));
    }

    #[test]
    fn test_center_on_empty_board() {
        // 空棋盘上中心的评估值最高（4 条线 + 中心加分）
        let board = Board::empty();
        let moves = medium().select_moves(&board, Side::A, 1);
        assert_eq!(moves[0].position, 12);
        assert_eq!(moves[0].score, 4 * 20 + 30);
    }

    #[test]
    fn test_tie_breaks_by_enumeration_order() {
        // 多个同分走法时取枚举顺序最靠前的
        let board = parse_board(test_positions::EARLY_2).unwrap();
        let moves = medium().select_moves(&board, Side::A, 25);
        let best = moves[0].score;
        let first_best = moves.iter().filter(|m| m.score == best).map(|m| m.position).min();
        assert_eq!(moves[0].position, first_best.unwrap());
    }
}
