//! 棋盘文本表示
//!
//! 格式: `<棋盘> [<行动方>]`
//!
//! - 棋盘：5 行，用 `/` 分隔，从上到下；每行 5 个数字 0-5
//! - 行动方：`a` 或 `b`，可省略
//!
//! 例：`00000/01210/00200/00000/00000 a`

use crate::board::Board;
use crate::types::{BoardError, Side, BOARD_LEN, SIZE};
use thiserror::Error;

/// 解析后的局面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotationState {
    pub board: Board,
    pub turn: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid notation: expected '<rows> [side]', got '{0}'")]
    Format(String),
    #[error("expected {expected} rows, got {got}")]
    RowCount { expected: usize, got: usize },
    #[error("row {row} has {got} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("invalid cell character '{ch}' in row {row}")]
    InvalidChar { row: usize, ch: char },
    #[error("invalid side to move: {0}")]
    InvalidSide(String),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// 解析文本局面
pub fn parse_notation(s: &str) -> Result<NotationState, NotationError> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let (board_str, turn) = match parts.as_slice() {
        [board] => (*board, None),
        [board, side] => {
            let mut chars = side.chars();
            let turn = match (chars.next().and_then(Side::from_char), chars.next()) {
                (Some(t), None) => t,
                _ => return Err(NotationError::InvalidSide(side.to_string())),
            };
            (*board, Some(turn))
        }
        _ => return Err(NotationError::Format(s.to_string())),
    };

    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != SIZE {
        return Err(NotationError::RowCount {
            expected: SIZE,
            got: rows.len(),
        });
    }

    let mut cells = [0u8; BOARD_LEN];
    for (r, row_str) in rows.iter().enumerate() {
        let len = row_str.chars().count();
        if len != SIZE {
            return Err(NotationError::RowLength {
                row: r,
                expected: SIZE,
                got: len,
            });
        }
        for (c, ch) in row_str.chars().enumerate() {
            let v = ch
                .to_digit(10)
                .ok_or(NotationError::InvalidChar { row: r, ch })?;
            cells[r * SIZE + c] = v as u8;
        }
    }

    let board = Board::from_cells(cells)?;
    Ok(NotationState { board, turn })
}

/// 只解析棋盘
pub fn parse_board(s: &str) -> Result<Board, NotationError> {
    parse_notation(s).map(|state| state.board)
}

/// 生成文本局面
pub fn to_notation(board: &Board, turn: Option<Side>) -> String {
    let rows: Vec<String> = board
        .cells()
        .chunks(SIZE)
        .map(|row| row.iter().map(|v| char::from(b'0' + v)).collect())
        .collect();
    let mut s = rows.join("/");
    if let Some(side) = turn {
        s.push(' ');
        s.push(side.to_char());
    }
    s
}

impl Board {
    pub fn from_notation(s: &str) -> Result<Board, NotationError> {
        parse_board(s)
    }

    pub fn to_notation(&self) -> String {
        to_notation(self, None)
    }
}
