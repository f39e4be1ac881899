//! Strength Five
//!
//! 5x5 强度吃子棋引擎：规则引擎 + 三档 CPU 对手，支持文本局面输入输出

pub mod ai;
pub mod board;
pub mod game;
pub mod notation;
pub mod test_positions;
pub mod types;

pub use ai::{
    evaluate, select_move, AIConfig, AIEngine, AIStrategy, CancelToken, HardAI, ScoredMove,
    SearchOutcome, SearchStats, WIN_SCORE,
};
pub use board::{Board, FullBoardRule, MoveOutcome, Rules, LINES};
pub use game::{Game, GameError, GameRecord, MoveRecord, ReplayError};
pub use notation::{parse_board, parse_notation, to_notation, NotationError, NotationState};
pub use types::{
    parse_position, BoardError, CellChange, Level, MoveError, Position, Side, BOARD_LEN,
};
