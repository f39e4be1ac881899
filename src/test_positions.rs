//! 测试局面库
//!
//! 命名的棋盘文本局面，供单元测试和基准测试使用
//!
//! 命名规范:
//! - START / EARLY_n: 开局
//! - MID_n: 中局
//! - *_WINS_AT_n / *_MUST_BLOCK: 一步胜与防守
//! - FULL_*: 满盘
//! - CAPTURE_* / LOCK_*: 吃子规则

// =============================================================================
// 开局
// =============================================================================

/// 空棋盘
pub const START: &str = "00000/00000/00000/00000/00000";

/// A 占中心
pub const EARLY_1: &str = "00000/00000/00200/00000/00000";

/// A 占中心，B 贴边
pub const EARLY_2: &str = "00000/00100/00200/00000/00000";

/// 各下两手
pub const EARLY_3: &str = "00000/01100/00220/00000/00000";

// =============================================================================
// 中局
// =============================================================================

/// 双方各 4 子，有强化过的格子
pub const MID_1: &str = "21000/01200/00210/00030/00000";

/// 双方交错
pub const MID_2: &str = "10201/02010/20102/01020/00000";

/// 接近满盘（8 个空格）
pub const MID_3: &str = "21120/12012/20301/10212/02100";

// =============================================================================
// 一步胜与防守
// =============================================================================

/// A 在第 2 行有四子，12 号格落子即成线（A 唯一的一步胜）
pub const A_WINS_AT_12: &str = "10000/00100/22022/00000/00001";

/// A 在第 2 行有四子；轮到 B 时只能下 12 号格，或下 5 号格把 10 号格夹成 B 的子
pub const B_MUST_BLOCK: &str = "00000/00000/22022/10000/00100";

/// B 在第 0 列有四子（含锁定格），20 号格落子即成线
pub const B_WINS_AT_20: &str = "10000/30000/50000/10000/00020";

// =============================================================================
// 吃子规则
// =============================================================================

/// A 下 10 号格吃掉 11、12、13
pub const CAPTURE_ROW: &str = "00000/00000/01112/00000/00000";

/// 11 号格是 B 的锁定格，A 下 10 号格吃不到任何子
pub const LOCK_WALL: &str = "00000/00000/05100/00000/00000";

// =============================================================================
// 满盘
// =============================================================================

/// 满盘、没有成线；A 13 格，B 12 格
pub const FULL_NO_LINE: &str = "22112/11221/22112/11221/21212";

/// 所有局面
pub const ALL: [&str; 12] = [
    START,
    EARLY_1,
    EARLY_2,
    EARLY_3,
    MID_1,
    MID_2,
    MID_3,
    A_WINS_AT_12,
    B_MUST_BLOCK,
    B_WINS_AT_20,
    CAPTURE_ROW,
    FULL_NO_LINE,
];
