//! 对局与棋谱
//!
//! `Game` 负责轮流落子、历史记录和悔棋；`GameRecord` 是一局结束后保存的形状
//! （终局棋盘、胜者、逐手记录），可以重放校验。

use crate::board::{Board, Rules};
use crate::types::{CellChange, MoveError, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 一手棋的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 从 1 开始
    pub ply: u32,
    pub side: Side,
    pub pos: usize,
    /// 落子和吃子带来的格子变化
    pub diff: Vec<CellChange>,
    pub board_after: Board,
}

/// 保存的棋谱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub winner: Option<Side>,
    pub final_board: Board,
    pub moves: Vec<MoveRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is already over")]
    Finished,
    #[error(transparent)]
    Move(#[from] MoveError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("move {index}: expected ply {expected}, found {found}")]
    PlyMismatch {
        index: usize,
        expected: u32,
        found: u32,
    },
    #[error("ply {ply}: expected {expected} to move, found {found}")]
    SideMismatch { ply: u32, expected: Side, found: Side },
    #[error("ply {ply}: illegal move")]
    IllegalMove {
        ply: u32,
        #[source]
        source: MoveError,
    },
    #[error("ply {ply}: move played after the game ended")]
    MoveAfterEnd { ply: u32 },
    #[error("ply {ply}: recorded diff does not match")]
    DiffMismatch { ply: u32 },
    #[error("ply {ply}: recorded board does not match")]
    BoardMismatch { ply: u32 },
    #[error("final board does not match")]
    FinalBoardMismatch,
    #[error("winner mismatch: recorded {recorded:?}, replayed {replayed:?}")]
    WinnerMismatch {
        recorded: Option<Side>,
        replayed: Option<Side>,
    },
}

/// 一局对局
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    board: Board,
    turn: Side,
    winner: Option<Side>,
    history: Vec<MoveRecord>,
}

impl Game {
    /// 空棋盘，A 先手
    pub fn new(rules: Rules) -> Self {
        Game {
            rules,
            board: Board::empty(),
            turn: Side::A,
            winner: None,
            history: Vec::new(),
        }
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 轮到谁
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// 有胜者或满盘
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.board.is_full()
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.history
    }

    /// 行动方在 position 落子
    pub fn play(&mut self, position: i64) -> Result<&MoveRecord, GameError> {
        if self.is_over() {
            return Err(GameError::Finished);
        }
        let side = self.turn;
        let outcome = self.board.apply_move_with(position, side, self.rules)?;

        self.board = outcome.board;
        self.winner = outcome.winner;
        self.turn = side.opposite();
        self.history.push(MoveRecord {
            ply: self.history.len() as u32 + 1,
            side,
            pos: outcome.changed[0].index,
            diff: outcome.changed,
            board_after: outcome.board,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// 悔一手，返回被撤销的记录
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.board = self
            .history
            .last()
            .map(|r| r.board_after)
            .unwrap_or_else(Board::empty);
        self.turn = record.side;
        // 对局结束后不再接受落子，所以更早的局面都没有胜者
        self.winner = None;
        Some(record)
    }

    /// 悔棋直到轮到 side（最多两手），返回撤销的手数
    pub fn undo_to_side(&mut self, side: Side) -> usize {
        let mut undone = 0;
        while undone < 2 && self.undo().is_some() {
            undone += 1;
            if self.turn == side {
                break;
            }
        }
        undone
    }

    pub fn reset(&mut self) {
        *self = Game::new(self.rules);
    }

    /// 导出棋谱
    pub fn record(&self) -> GameRecord {
        GameRecord {
            winner: self.winner,
            final_board: self.board,
            moves: self.history.clone(),
        }
    }
}

impl GameRecord {
    /// 按规则重放并逐手校验
    pub fn replay(&self, rules: Rules) -> Result<Game, ReplayError> {
        let mut game = Game::new(rules);

        for (index, recorded) in self.moves.iter().enumerate() {
            let expected = index as u32 + 1;
            if recorded.ply != expected {
                return Err(ReplayError::PlyMismatch {
                    index,
                    expected,
                    found: recorded.ply,
                });
            }
            let ply = recorded.ply;
            if recorded.side != game.turn() {
                return Err(ReplayError::SideMismatch {
                    ply,
                    expected: game.turn(),
                    found: recorded.side,
                });
            }

            let replayed = game.play(recorded.pos as i64).map_err(|e| match e {
                GameError::Finished => ReplayError::MoveAfterEnd { ply },
                GameError::Move(source) => ReplayError::IllegalMove { ply, source },
            })?;
            if replayed.diff != recorded.diff {
                return Err(ReplayError::DiffMismatch { ply });
            }
            if replayed.board_after != recorded.board_after {
                return Err(ReplayError::BoardMismatch { ply });
            }
        }

        if game.board() != &self.final_board {
            return Err(ReplayError::FinalBoardMismatch);
        }
        if game.winner() != self.winner {
            return Err(ReplayError::WinnerMismatch {
                recorded: self.winner,
                replayed: game.winner(),
            });
        }
        Ok(game)
    }
}
