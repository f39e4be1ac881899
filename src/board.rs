//! 5x5 棋盘与规则引擎
//!
//! 棋盘是 25 个格子的定长数组（行优先），每格一个强度值 0..=5。
//! 所有走法都返回新棋盘，旧棋盘保持不变，历史记录和搜索树节点可以直接持有快照。

use crate::types::{
    is_locked, owner_of, BoardError, CellChange, MoveError, Position, Side, BOARD_LEN, SIZE,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 8 个方向
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 胜利线数量：5 行 + 5 列 + 2 条对角线
pub const LINE_COUNT: usize = 2 * SIZE + 2;

pub type Line = [usize; SIZE];

fn build_lines() -> [Line; LINE_COUNT] {
    let mut lines = [[0usize; SIZE]; LINE_COUNT];
    for r in 0..SIZE {
        for c in 0..SIZE {
            lines[r][c] = r * SIZE + c;
            lines[SIZE + c][r] = r * SIZE + c;
        }
    }
    for i in 0..SIZE {
        lines[2 * SIZE][i] = i * SIZE + i;
        lines[2 * SIZE + 1][i] = i * SIZE + (SIZE - 1 - i);
    }
    lines
}

lazy_static! {
    /// 按 行 → 列 → 主对角线 → 副对角线 顺序排列
    pub static ref LINES: [Line; LINE_COUNT] = build_lines();
}

/// 满盘且无成线时的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullBoardRule {
    /// 平局（无胜者）
    #[default]
    Draw,
    /// 比较偶数格与奇数格数量，严格多者胜，否则 B 方胜
    ParityMajority,
}

/// 可配置规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rules {
    pub full_board: FullBoardRule,
}

impl Rules {
    pub fn with_parity_majority() -> Self {
        Rules {
            full_board: FullBoardRule::ParityMajority,
        }
    }
}

/// 一步落子的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    /// 第一个元素总是落子本身，之后是吃子
    pub changed: Vec<CellChange>,
    pub winner: Option<Side>,
}

/// 棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Board {
    cells: [u8; BOARD_LEN],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [0; BOARD_LEN],
        }
    }

    /// 从格子数组创建，值必须在 0..=5
    pub fn from_cells(cells: [u8; BOARD_LEN]) -> Result<Board, BoardError> {
        if let Some((index, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > 5) {
            return Err(BoardError::InvalidCell { index, value });
        }
        Ok(Board { cells })
    }

    #[inline]
    pub fn cells(&self) -> &[u8; BOARD_LEN] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.cells[index]
    }

    #[inline]
    pub fn owner_at(&self, index: usize) -> Option<Side> {
        owner_of(self.cells[index])
    }

    /// 所有空格（升序）
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..BOARD_LEN).filter(|&i| self.cells[i] == 0).collect()
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// 某方拥有的格子数
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|&&v| owner_of(v) == Some(side))
            .count()
    }

    /// 规范编码：每格 3 bit，共 75 bit
    #[inline]
    pub fn encode(&self) -> u128 {
        self.cells
            .iter()
            .fold(0u128, |acc, &v| (acc << 3) | v as u128)
    }

    /// 使用默认规则落子
    pub fn apply_move(&self, position: i64, side: Side) -> Result<MoveOutcome, MoveError> {
        self.apply_move_with(position, side, Rules::default())
    }

    /// 落子并结算吃子与胜负
    pub fn apply_move_with(
        &self,
        position: i64,
        side: Side,
        rules: Rules,
    ) -> Result<MoveOutcome, MoveError> {
        if position < 0 || position >= BOARD_LEN as i64 {
            return Err(MoveError::OutOfRange { position });
        }
        let pos = position as usize;
        if self.cells[pos] != 0 {
            return Err(MoveError::OccupiedCell {
                position: pos,
                value: self.cells[pos],
            });
        }

        let mut board = *self;
        let place_value = side.base_value();
        board.cells[pos] = place_value;

        let mut changed = Vec::with_capacity(8);
        changed.push(CellChange {
            index: pos,
            from: 0,
            to: place_value,
        });

        let start = Position::from_index(pos);
        let mut captured: Vec<usize> = Vec::with_capacity(SIZE);

        for (dr, dc) in DIRECTIONS {
            captured.clear();
            let mut cur = start.offset(dr, dc);
            let mut closed = false;

            while cur.is_valid() {
                let i = cur.to_index();
                let v = board.cells[i];
                match owner_of(v) {
                    // 空格：这个方向不成立
                    None => break,
                    // 己方棋子（含己方锁定格）夹住
                    Some(owner) if owner == side => {
                        closed = true;
                        break;
                    }
                    // 对方锁定格是墙
                    Some(_) if is_locked(v) => break,
                    Some(_) => captured.push(i),
                }
                cur = cur.offset(dr, dc);
            }

            if !closed {
                continue;
            }
            for &i in &captured {
                let before = board.cells[i];
                if is_locked(before) {
                    continue;
                }
                let after = (before + 1).min(5);
                board.cells[i] = after;
                changed.push(CellChange {
                    index: i,
                    from: before,
                    to: after,
                });
            }
        }

        let winner = board.winner(rules);
        Ok(MoveOutcome {
            board,
            changed,
            winner,
        })
    }

    /// 某条线是否被某方占满
    #[inline]
    fn line_owner(&self, line: &Line) -> Option<Side> {
        let first = owner_of(self.cells[line[0]])?;
        if line.iter().all(|&i| owner_of(self.cells[i]) == Some(first)) {
            Some(first)
        } else {
            None
        }
    }

    /// 只看成线的胜者（第一条成线的归属）
    pub fn line_winner(&self) -> Option<Side> {
        LINES.iter().find_map(|line| self.line_owner(line))
    }

    /// 判定胜负
    pub fn winner(&self, rules: Rules) -> Option<Side> {
        if let Some(side) = self.line_winner() {
            return Some(side);
        }
        if rules.full_board == FullBoardRule::ParityMajority && self.is_full() {
            let even = self.cells.iter().filter(|&&v| v % 2 == 0).count();
            let odd = BOARD_LEN - even;
            return Some(if even > odd { Side::A } else { Side::B });
        }
        None
    }

    /// 第一条成线
    pub fn winning_line(&self) -> Option<Line> {
        LINES
            .iter()
            .find(|line| self.line_owner(line).is_some())
            .copied()
    }

    /// 所有成线上的格子（按线的顺序，可能重复）
    pub fn all_winning_cells(&self) -> Vec<usize> {
        LINES
            .iter()
            .filter(|line| self.line_owner(line).is_some())
            .flat_map(|line| line.iter().copied())
            .collect()
    }
}

impl TryFrom<Vec<u8>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<u8>) -> Result<Self, Self::Error> {
        let cells: [u8; BOARD_LEN] = cells
            .try_into()
            .map_err(|v: Vec<u8>| BoardError::WrongLength(v.len()))?;
        Board::from_cells(cells)
    }
}

impl From<Board> for Vec<u8> {
    fn from(board: Board) -> Self {
        board.cells.to_vec()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(SIZE).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                match v {
                    0 => write!(f, ".")?,
                    _ => write!(f, "{}", v)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoveError;
    use rand::prelude::*;

    fn board_with(cells: &[(usize, u8)]) -> Board {
        let mut raw = [0u8; BOARD_LEN];
        for &(i, v) in cells {
            raw[i] = v;
        }
        Board::from_cells(raw).unwrap()
    }

    fn random_board(rng: &mut StdRng, fill: f64) -> Board {
        let mut raw = [0u8; BOARD_LEN];
        for v in raw.iter_mut() {
            if rng.gen_bool(fill) {
                *v = rng.gen_range(1..=5);
            }
        }
        Board::from_cells(raw).unwrap()
    }

    #[test]
    fn test_lines_table() {
        assert_eq!(LINES[0], [0, 1, 2, 3, 4]);
        assert_eq!(LINES[4], [20, 21, 22, 23, 24]);
        assert_eq!(LINES[5], [0, 5, 10, 15, 20]);
        assert_eq!(LINES[10], [0, 6, 12, 18, 24]);
        assert_eq!(LINES[11], [4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_basic_capture() {
        let board = board_with(&[(11, 1), (12, 1), (13, 1), (14, 2)]);
        let out = board.apply_move(10, Side::A).unwrap();

        assert_eq!(out.changed.len(), 4);
        for i in 11..=13 {
            assert_eq!(out.board.get(i), 2);
        }
        assert_eq!(out.board.get(10), 2);
        assert_eq!(out.board.get(14), 2);
        // 整行都是 A
        assert_eq!(out.winner, Some(Side::A));
    }

    #[test]
    fn test_opponent_lock_is_wall() {
        let board = board_with(&[(11, 5), (12, 1)]);
        let out = board.apply_move(10, Side::A).unwrap();
        assert_eq!(out.changed.len(), 1);
        assert_eq!(out.board.get(11), 5);
        assert_eq!(out.board.get(12), 1);
    }

    #[test]
    fn test_lock_wall_blocks_even_with_closing_stone() {
        // A . 1 5 1 A：锁定格在中间，不能越过
        let board = board_with(&[(11, 1), (12, 5), (13, 1), (14, 2)]);
        let out = board.apply_move(10, Side::A).unwrap();
        assert_eq!(out.changed.len(), 1);
        assert_eq!(out.board.get(11), 1);
    }

    #[test]
    fn test_own_lock_closes_line() {
        // B 方的 5 对 B 来说是己方棋子，可以夹住 A
        let board = board_with(&[(11, 2), (12, 4), (13, 5)]);
        let out = board.apply_move(10, Side::B).unwrap();
        assert_eq!(out.board.get(11), 3);
        assert_eq!(out.board.get(12), 5);
        assert_eq!(out.changed.len(), 3);
    }

    #[test]
    fn test_adjacent_own_stone_captures_nothing() {
        let board = board_with(&[(11, 2)]);
        let out = board.apply_move(10, Side::A).unwrap();
        assert_eq!(out.changed.len(), 1);
    }

    #[test]
    fn test_gap_breaks_capture() {
        let board = board_with(&[(11, 1), (13, 2)]);
        let out = board.apply_move(10, Side::A).unwrap();
        assert_eq!(out.changed.len(), 1);
        assert_eq!(out.board.get(11), 1);
    }

    #[test]
    fn test_edge_breaks_capture() {
        let board = board_with(&[(11, 1), (12, 1), (13, 1), (14, 1)]);
        let out = board.apply_move(10, Side::A).unwrap();
        assert_eq!(out.changed.len(), 1);
    }

    #[test]
    fn test_multi_direction_capture() {
        // 中心落子，东、南、东南三个方向同时夹住
        let board = board_with(&[
            (13, 3),
            (14, 2),
            (17, 1),
            (22, 4),
            (18, 1),
            (24, 2),
        ]);
        let out = board.apply_move(12, Side::A).unwrap();
        assert_eq!(out.board.get(13), 4);
        assert_eq!(out.board.get(17), 2);
        assert_eq!(out.board.get(18), 2);
        assert_eq!(out.changed.len(), 4);
        assert_eq!(out.changed[0].index, 12);
    }

    #[test]
    fn test_b_capture_promotes_to_lock() {
        let board = board_with(&[(11, 4), (12, 1)]);
        let out = board.apply_move(10, Side::B).unwrap();
        assert_eq!(out.board.get(11), 5);
        assert_eq!(
            out.changed[1],
            CellChange {
                index: 11,
                from: 4,
                to: 5
            }
        );
    }

    #[test]
    fn test_move_errors() {
        let board = board_with(&[(3, 2)]);
        assert_eq!(
            board.apply_move(-1, Side::A),
            Err(MoveError::OutOfRange { position: -1 })
        );
        assert_eq!(
            board.apply_move(25, Side::B),
            Err(MoveError::OutOfRange { position: 25 })
        );
        assert_eq!(
            board.apply_move(3, Side::B),
            Err(MoveError::OccupiedCell {
                position: 3,
                value: 2
            })
        );
    }

    #[test]
    fn test_apply_move_keeps_original() {
        let board = board_with(&[(11, 1), (12, 2)]);
        let before = board;
        let _ = board.apply_move(10, Side::A).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_random_placement_and_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let board = random_board(&mut rng, 0.6);
            let side = if rng.gen_bool(0.5) { Side::A } else { Side::B };
            for pos in 0..BOARD_LEN {
                let result = board.apply_move(pos as i64, side);
                if board.get(pos) != 0 {
                    assert!(matches!(result, Err(MoveError::OccupiedCell { .. })));
                    continue;
                }
                let out = result.unwrap();
                assert_eq!(
                    out.changed[0],
                    CellChange {
                        index: pos,
                        from: 0,
                        to: side.base_value()
                    }
                );
                for i in 0..BOARD_LEN {
                    if i != pos {
                        assert!(out.board.get(i) >= board.get(i));
                        assert!(out.board.get(i) <= 5);
                    }
                }
                for ch in &out.changed[1..] {
                    assert_eq!(ch.to, ch.from + 1);
                    assert_eq!(owner_of(ch.from), Some(side.opposite()));
                }
            }
        }
    }

    #[test]
    fn test_row_win() {
        let board = board_with(&[
            (10, 2),
            (11, 4),
            (12, 2),
            (13, 4),
            (14, 2),
            (0, 1),
            (1, 3),
        ]);
        assert_eq!(board.winner(Rules::default()), Some(Side::A));
        assert_eq!(board.winning_line(), Some([10, 11, 12, 13, 14]));
    }

    #[test]
    fn test_diagonal_and_column_win() {
        let diag = board_with(&[(4, 1), (8, 3), (12, 5), (16, 1), (20, 3)]);
        assert_eq!(diag.line_winner(), Some(Side::B));
        assert_eq!(diag.winning_line(), Some([4, 8, 12, 16, 20]));

        let col = board_with(&[(2, 4), (7, 2), (12, 2), (17, 4), (22, 2)]);
        assert_eq!(col.line_winner(), Some(Side::A));
    }

    #[test]
    fn test_first_line_wins_on_conflict() {
        // 第 0 行属于 B，第 4 行属于 A，按枚举顺序取第 0 行
        let mut raw = [0u8; BOARD_LEN];
        for i in 0..SIZE {
            raw[i] = 1;
            raw[4 * SIZE + i] = 2;
        }
        let board = Board::from_cells(raw).unwrap();
        assert_eq!(board.line_winner(), Some(Side::B));
        assert_eq!(board.winning_line(), Some([0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_all_winning_cells() {
        let mut raw = [0u8; BOARD_LEN];
        for i in 0..5 {
            raw[i] = 2;
            raw[i * SIZE] = 2;
        }
        let board = Board::from_cells(raw).unwrap();
        let cells = board.all_winning_cells();
        assert_eq!(cells, vec![0, 1, 2, 3, 4, 0, 5, 10, 15, 20]);
    }

    fn full_board_without_line() -> Board {
        // 所有线都混色；A 13 格，B 12 格
        Board::from_cells([
            2, 2, 1, 1, 2, //
            1, 1, 2, 2, 1, //
            2, 2, 1, 1, 2, //
            1, 1, 2, 2, 1, //
            2, 1, 2, 1, 2, //
        ])
        .unwrap()
    }

    #[test]
    fn test_full_board_rules() {
        let board = full_board_without_line();
        assert!(board.is_full());
        assert_eq!(board.line_winner(), None);
        assert_eq!(board.winner(Rules::default()), None);
        assert_eq!(board.winner(Rules::with_parity_majority()), Some(Side::A));
    }

    #[test]
    fn test_full_board_random_consistency() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let board = random_board(&mut rng, 1.0);
            let line = board.line_winner();
            let draw = board.winner(Rules::default());
            let parity = board.winner(Rules::with_parity_majority());
            assert_eq!(draw, line);
            if line.is_some() {
                assert_eq!(parity, line);
            } else {
                let even = board.cells().iter().filter(|&&v| v % 2 == 0).count();
                let expected = if even > BOARD_LEN - even { Side::A } else { Side::B };
                assert_eq!(parity, Some(expected));
            }
        }
    }

    #[test]
    fn test_encode_is_injective_on_cells() {
        let a = board_with(&[(0, 5)]);
        let b = board_with(&[(24, 5)]);
        assert_ne!(a.encode(), b.encode());
        assert_eq!(Board::empty().encode(), 0);
    }

    #[test]
    fn test_serde_board() {
        let board = board_with(&[(0, 2), (24, 5)]);
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with("[2,0,0"));
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert!(serde_json::from_str::<Board>("[1,2,3]").is_err());
        let bad = format!("[{}]", vec!["6"; BOARD_LEN].join(","));
        assert!(serde_json::from_str::<Board>(&bad).is_err());
    }
}
