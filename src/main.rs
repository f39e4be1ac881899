//! Strength Five CLI
//!
//! 命令行界面，用于测试规则引擎和 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 逐行交换 JSON

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use strength_five::{
    evaluate, parse_notation, parse_position, to_notation, AIConfig, AIEngine, Board, CellChange,
    Game, Level, Position, Rules, ScoredMove, SearchStats, Side,
};

#[derive(Parser)]
#[command(name = "strength-five")]
#[command(about = "5x5 strength-capture board game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 落子并输出吃子变化和胜负
    Apply {
        /// 棋盘文本，如 "00000/01210/00200/00000/00000 a"
        #[arg(long)]
        board: String,

        /// 落子位置：格子编号 0-24 或坐标 a1-e5
        #[arg(long)]
        pos: String,

        /// 行动方 (a, b)，默认取棋盘文本里的行动方
        #[arg(long)]
        side: Option<Side>,

        /// 满盘按奇偶数量判胜
        #[arg(long)]
        parity_rule: bool,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 选择最佳走法
    Best {
        #[arg(long)]
        board: String,

        #[arg(long)]
        side: Option<Side>,

        /// 难度 (easy, medium, hard)
        #[arg(long, default_value = "hard")]
        level: Level,

        /// 返回的走法数量
        #[arg(long, default_value = "1")]
        n: usize,

        /// 随机种子（初级）
        #[arg(long)]
        seed: Option<u64>,

        /// 时间限制（秒）
        #[arg(long)]
        time_limit: Option<f64>,

        #[arg(long)]
        parity_rule: bool,

        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数
    Eval {
        #[arg(long)]
        board: String,

        #[arg(long)]
        side: Option<Side>,

        #[arg(long)]
        json: bool,
    },

    /// 判定胜负
    Winner {
        #[arg(long)]
        board: String,

        #[arg(long)]
        parity_rule: bool,

        #[arg(long)]
        json: bool,
    },

    /// CPU 对 CPU 对局，输出棋谱
    Selfplay {
        #[arg(long, default_value = "hard")]
        a_level: Level,

        #[arg(long, default_value = "hard")]
        b_level: Level,

        #[arg(long)]
        seed: Option<u64>,

        /// 每步时间限制（秒）
        #[arg(long)]
        time_limit: Option<f64>,

        #[arg(long)]
        parity_rule: bool,

        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

/// 落子位置：编号或坐标
#[derive(Deserialize)]
#[serde(untagged)]
enum PosArg {
    Index(i64),
    Coord(String),
}

impl PosArg {
    fn resolve(&self) -> Result<i64, String> {
        match self {
            PosArg::Index(i) => Ok(*i),
            PosArg::Coord(s) => parse_position(s),
        }
    }
}

// Server 模式的请求和响应结构
#[derive(Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    board: String,
    #[serde(default)]
    pos: Option<PosArg>,
    #[serde(default)]
    side: Option<Side>,
    #[serde(default)]
    level: Option<Level>,
    #[serde(default)]
    n: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    time_limit: Option<f64>,
    #[serde(default)]
    node_limit: Option<u64>,
    #[serde(default)]
    parity_rule: bool,
}

#[derive(Serialize, Default)]
struct ServerResponse {
    ok: bool,
    // apply 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<Vec<CellChange>>,
    /// "a"、"b" 或 "none"
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winning_cells: Option<Vec<usize>>,
    // best 命令的字段，满盘时为 -1
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<ScoredMove>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SearchStats>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn rules_for(parity_rule: bool) -> Rules {
    if parity_rule {
        Rules::with_parity_majority()
    } else {
        Rules::default()
    }
}

fn winner_str(winner: Option<Side>) -> String {
    winner.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// 解析棋盘文本；行动方优先取参数
fn load_board(notation: &str, side: Option<Side>) -> Result<(Board, Option<Side>), String> {
    let state = parse_notation(notation).map_err(|e| format!("Invalid board: {}", e))?;
    Ok((state.board, side.or(state.turn)))
}

fn require_side(side: Option<Side>) -> Result<Side, String> {
    side.ok_or_else(|| "Side to move is missing (use --side or append ' a'/' b')".to_string())
}

fn do_apply(
    notation: &str,
    position: i64,
    side: Option<Side>,
    rules: Rules,
) -> Result<ServerResponse, String> {
    let (board, side) = load_board(notation, side)?;
    let side = require_side(side)?;
    let outcome = board
        .apply_move_with(position, side, rules)
        .map_err(|e| e.to_string())?;
    let next = if outcome.winner.is_some() {
        None
    } else {
        Some(side.opposite())
    };
    Ok(ServerResponse {
        ok: true,
        board: Some(to_notation(&outcome.board, next)),
        changed: Some(outcome.changed),
        winner: Some(winner_str(outcome.winner)),
        ..Default::default()
    })
}

fn do_best(
    notation: &str,
    side: Option<Side>,
    level: Level,
    n: usize,
    config: &AIConfig,
) -> Result<ServerResponse, String> {
    config.validate()?;
    let (board, side) = load_board(notation, side)?;
    let side = require_side(side)?;
    let ai = AIEngine::from_level(level, config);
    let outcome = ai.search(&board, side, n.max(1));
    Ok(ServerResponse {
        ok: true,
        best: Some(outcome.best.map_or(-1, |p| p as i64)),
        moves: Some(outcome.moves),
        stats: Some(outcome.stats),
        ..Default::default()
    })
}

fn do_eval(notation: &str, side: Option<Side>) -> Result<ServerResponse, String> {
    let (board, side) = load_board(notation, side)?;
    let side = require_side(side)?;
    Ok(ServerResponse {
        ok: true,
        side: Some(side),
        eval: Some(evaluate(&board, side)),
        ..Default::default()
    })
}

fn do_winner(notation: &str, rules: Rules) -> Result<ServerResponse, String> {
    let (board, _) = load_board(notation, None)?;
    Ok(ServerResponse {
        ok: true,
        winner: Some(winner_str(board.winner(rules))),
        winning_cells: Some(board.all_winning_cells()),
        ..Default::default()
    })
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e))
}

fn exit_with_error(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn coord(index: usize) -> String {
    Position::from_index(index).to_coord_str()
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            board,
            pos,
            side,
            parity_rule,
            json,
        } => {
            let result = parse_position(&pos)
                .and_then(|p| do_apply(&board, p, side, rules_for(parity_rule)));
            match result {
                Ok(response) if json => println!("{}", to_json(&response, true)),
                Ok(response) => {
                    println!("Board: {}", response.board.unwrap_or_default());
                    for change in response.changed.unwrap_or_default() {
                        println!(
                            "  {} ({}): {} -> {}",
                            change.index,
                            coord(change.index),
                            change.from,
                            change.to
                        );
                    }
                    println!("Winner: {}", response.winner.unwrap_or_default());
                }
                Err(e) => exit_with_error(&e),
            }
        }

        Commands::Best {
            board,
            side,
            level,
            n,
            seed,
            time_limit,
            parity_rule,
            json,
        } => {
            let config = AIConfig {
                seed,
                time_limit,
                rules: rules_for(parity_rule),
                ..Default::default()
            };
            match do_best(&board, side, level, n, &config) {
                Ok(response) if json => println!("{}", to_json(&response, true)),
                Ok(response) => {
                    println!("Best move (level={}): {}", level, response.best.unwrap_or(-1));
                    for sm in response.moves.unwrap_or_default() {
                        println!(
                            "  {} ({}) (score: {})",
                            sm.position,
                            coord(sm.position),
                            sm.score
                        );
                    }
                    if let Some(stats) = response.stats {
                        println!(
                            "\nStats: depth={}, nodes={}, tt_hits={}, time={:.1}ms{}",
                            stats.depth_reached,
                            stats.nodes,
                            stats.tt_hits,
                            stats.elapsed_ms,
                            if stats.aborted { " (aborted)" } else { "" }
                        );
                    }
                }
                Err(e) => exit_with_error(&e),
            }
        }

        Commands::Eval { board, side, json } => match do_eval(&board, side) {
            Ok(response) if json => println!("{}", to_json(&response, true)),
            Ok(response) => {
                let side = response.side.map_or_else(String::new, |s| s.to_string());
                println!("局面评估 ({} 视角): {}", side, response.eval.unwrap_or(0));
            }
            Err(e) => exit_with_error(&e),
        },

        Commands::Winner {
            board,
            parity_rule,
            json,
        } => match do_winner(&board, rules_for(parity_rule)) {
            Ok(response) if json => println!("{}", to_json(&response, true)),
            Ok(response) => {
                println!("Winner: {}", response.winner.unwrap_or_default());
                let cells = response.winning_cells.unwrap_or_default();
                if !cells.is_empty() {
                    println!("Winning cells: {:?}", cells);
                }
            }
            Err(e) => exit_with_error(&e),
        },

        Commands::Selfplay {
            a_level,
            b_level,
            seed,
            time_limit,
            parity_rule,
            json,
        } => {
            let rules = rules_for(parity_rule);
            let limits = AIConfig {
                time_limit,
                ..Default::default()
            };
            if let Err(e) = limits.validate() {
                exit_with_error(&e);
            }
            let game = run_selfplay(a_level, b_level, seed, time_limit, rules);
            let record = game.record();
            if json {
                println!("{}", to_json(&record, true));
            } else {
                for mv in &record.moves {
                    println!(
                        "{:>2}. {} {} ({}) captures={}",
                        mv.ply,
                        mv.side,
                        mv.pos,
                        coord(mv.pos),
                        mv.diff.len() - 1
                    );
                }
                println!("\n{}", record.final_board);
                println!("Winner: {}", winner_str(record.winner));
            }
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// CPU 对 CPU 下完一局
fn run_selfplay(
    a_level: Level,
    b_level: Level,
    seed: Option<u64>,
    time_limit: Option<f64>,
    rules: Rules,
) -> Game {
    let config_for = |offset: u64| AIConfig {
        seed: seed.map(|s| s.wrapping_add(offset)),
        time_limit,
        rules,
        ..Default::default()
    };
    let engine_a = AIEngine::from_level(a_level, &config_for(0));
    let engine_b = AIEngine::from_level(b_level, &config_for(1));

    let mut game = Game::new(rules);
    while !game.is_over() {
        let side = game.turn();
        let engine = match side {
            Side::A => &engine_a,
            Side::B => &engine_b,
        };
        let Some(pos) = engine.select_move(game.board(), side) else {
            break;
        };
        if let Err(e) = game.play(pos as i64) {
            exit_with_error(&format!("engine chose an illegal move {}: {}", pos, e));
        }
    }
    game
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ServerRequest>(&line) {
            Ok(request) if request.cmd == "quit" => break,
            Ok(request) => handle_request(&request),
            Err(e) => ServerResponse::error(&format!("Invalid JSON: {}", e)),
        };

        println!("{}", to_json(&response, false));
        let _ = stdout.flush();
    }
}

fn handle_request(request: &ServerRequest) -> ServerResponse {
    let rules = rules_for(request.parity_rule);
    let result = match request.cmd.as_str() {
        "apply" => request
            .pos
            .as_ref()
            .ok_or_else(|| "Missing field: pos".to_string())
            .and_then(PosArg::resolve)
            .and_then(|pos| do_apply(&request.board, pos, request.side, rules)),
        "best" => {
            let config = AIConfig {
                seed: request.seed,
                time_limit: request.time_limit,
                node_limit: request.node_limit,
                rules,
                ..Default::default()
            };
            let level = request.level.unwrap_or(Level::Hard);
            do_best(&request.board, request.side, level, request.n.unwrap_or(1), &config)
        }
        "eval" => do_eval(&request.board, request.side),
        "winner" => do_winner(&request.board, rules),
        _ => Err(format!("Unknown command: {}", request.cmd)),
    };
    result.unwrap_or_else(|e| ServerResponse::error(&e))
}
