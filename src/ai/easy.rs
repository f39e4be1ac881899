//! 初级 AI：一步胜，否则随机

use super::{
    find_winning_move, sort_and_truncate, AIConfig, AIStrategy, ScoredMove, SearchOutcome,
    SearchStats, WIN_SCORE,
};
use crate::board::{Board, Rules};
use crate::types::Side;
use rand::prelude::*;
use std::cell::RefCell;
use std::time::Instant;

/// 初级 AI - 能下一步胜，其余均匀随机
pub struct EasyAI {
    rng: RefCell<StdRng>,
    rules: Rules,
}

impl EasyAI {
    pub fn new(config: &AIConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        EasyAI {
            rng: RefCell::new(rng),
            rules: config.rules,
        }
    }
}

impl AIStrategy for EasyAI {
    fn search(&self, board: &Board, side: Side, n: usize) -> SearchOutcome {
        let start = Instant::now();
        let mut empties = board.empty_cells();
        if empties.is_empty() {
            return SearchOutcome::none();
        }

        let mut nodes = 0;
        let mut scored = Vec::with_capacity(empties.len());
        if let Some(pos) = find_winning_move(board, side, self.rules, &empties, &mut nodes) {
            scored.push(ScoredMove {
                position: pos,
                score: WIN_SCORE,
            });
            empties.retain(|&p| p != pos);
        }

        // 洗牌后按顺序排列，第一个就是均匀随机的选择
        empties.shuffle(&mut *self.rng.borrow_mut());
        scored.extend(empties.into_iter().map(|position| ScoredMove {
            position,
            score: 0,
        }));

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
    use std::collections::HashSet;

    fn seeded(seed: u64) -> EasyAI {
        EasyAI::new(&AIConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    #[test]
    fn test_takes_win() {
        let board = parse_board(test_positions::A_WINS_AT_12).unwrap();
        let ai = seeded(1);
        for _ in 0..10 {
            assert_eq!(ai.select_best_move(&board, Side::A), Some(12));
        }
        let moves = ai.select_moves(&board, Side::A, 3);
        assert_eq!(moves[0].score, WIN_SCORE);
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let board = parse_board(test_positions::EARLY_2).unwrap();
        let a = seeded(42);
        let b = seeded(42);
        for _ in 0..20 {
            assert_eq!(
                a.select_best_move(&board, Side::B),
                b.select_best_move(&board, Side::B)
            );
        }
    }

    #[test]
    fn test_random_spread() {
        // 没有一步胜时，多次调用应该覆盖很多不同的空格
        let board = Board::empty();
        let ai = seeded(7);
        let picks: HashSet<usize> = (0..200)
            .filter_map(|_| ai.select_best_move(&board, Side::A))
            .collect();
        assert!(picks.len() > 15, "only {} distinct picks", picks.len());
    }

    #[test]
    fn test_ranking_lists_every_empty_cell() {
        let board = parse_board(test_positions::MID_3).unwrap();
        let ai = seeded(3);
        let moves = ai.select_moves(&board, Side::A, 100);
        let mut cells: Vec<usize> = moves.iter().map(|m| m.position).collect();
        cells.sort_unstable();
        assert_eq!(cells, board.empty_cells());
    }

    #[test]
    fn test_full_board() {
        let board = parse_board(test_positions::FULL_NO_LINE).unwrap();
        assert_eq!(seeded(0).select_best_move(&board, Side::A), None);
    }
}
