//! 核心类型定义
//!
//! 5x5 棋盘、双方阵营、难度等级以及规则引擎的错误类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 棋盘边长
pub const SIZE: usize = 5;

/// 格子总数
pub const BOARD_LEN: usize = SIZE * SIZE;

/// 锁定值：到 5 后不再增长
pub const LOCKED: u8 = 5;

/// 中心格 (row 2, col 2)
pub const CENTER: usize = 12;

/// 阵营
///
/// A 方（先手）持偶数值 2/4，B 方（后手）持奇数值 1/3/5。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// 获取对方阵营
    pub fn opposite(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// 落子时放下的初始值
    #[inline]
    pub fn base_value(&self) -> u8 {
        match self {
            Side::A => 2,
            Side::B => 1,
        }
    }

    pub fn from_char(c: char) -> Option<Side> {
        match c.to_ascii_lowercase() {
            'a' => Some(Side::A),
            'b' => Some(Side::B),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Side::A => 'a',
            Side::B => 'b',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next().and_then(Side::from_char), chars.next()) {
            (Some(side), None) => Ok(side),
            _ => Err(format!("Invalid side: {} (expected a or b)", s)),
        }
    }
}

/// 格子的归属，完全由数值决定
#[inline]
pub fn owner_of(value: u8) -> Option<Side> {
    match value {
        0 => None,
        2 | 4 => Some(Side::A),
        _ => Some(Side::B),
    }
}

#[inline]
pub fn is_locked(value: u8) -> bool {
    value == LOCKED
}

/// 棋盘坐标
///
/// row: 0-4（从上到下），col: 0-4（从左到右）。
/// 文本坐标为 `a1`..`e5`：列字母 + 行号（1 起）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..SIZE as i8).contains(&self.row) && (0..SIZE as i8).contains(&self.col)
    }

    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Position {
        Position {
            row: (index / SIZE) as i8,
            col: (index % SIZE) as i8,
        }
    }

    /// 到中心的曼哈顿距离
    #[inline]
    pub fn center_distance(&self) -> u8 {
        let c = (SIZE / 2) as i8;
        ((self.row - c).abs() + (self.col - c).abs()) as u8
    }

    /// 从文本坐标解析（如 "c3"）
    pub fn from_coord_str(s: &str) -> Option<Position> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = match bytes[0].to_ascii_lowercase() {
            c @ b'a'..=b'e' => (c - b'a') as i8,
            _ => return None,
        };
        let row = match bytes[1] {
            r @ b'1'..=b'5' => (r - b'1') as i8,
            _ => return None,
        };
        Some(Position { row, col })
    }

    pub fn to_coord_str(&self) -> String {
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coord_str())
    }
}

/// 解析落子位置：接受文本坐标（"c3"）或格子索引（"12"）
///
/// 索引允许负数和越界值，交给规则引擎报告 `OutOfRange`。
pub fn parse_position(s: &str) -> Result<i64, String> {
    if let Some(pos) = Position::from_coord_str(s) {
        return Ok(pos.to_index() as i64);
    }
    s.trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid position: {} (expected index or coordinate like c3)", s))
}

/// 单个格子的变化（落子或吃子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub index: usize,
    pub from: u8,
    pub to: u8,
}

/// CPU 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            _ => Err(format!(
                "Unknown level: {}. Available: easy, medium, hard",
                s
            )),
        }
    }
}

/// 非法落子
///
/// 都是可预期的输入错误，调用方应提示玩家重新落子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position {position} is out of range (0..{len})", len = BOARD_LEN)]
    OutOfRange { position: i64 },
    #[error("cell {position} is occupied (value {value})")]
    OccupiedCell { position: usize, value: u8 },
}

/// 非法棋盘数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell {index} has invalid value {value} (expected 0..=5)")]
    InvalidCell { index: usize, value: u8 },
    #[error("board must have {len} cells, got {0}", len = BOARD_LEN)]
    WrongLength(usize),
}
