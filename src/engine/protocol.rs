//! UCI wire format: commands we send and the replies we care about.

use std::fmt;

/// Commands sent to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Uci,
    IsReady,
    SetOption { name: String, value: String },
    PositionFen(String),
    /// `position startpos moves ...`
    PositionStartpos { moves: Vec<String> },
    GoDepth(u32),
    Stop,
    Quit,
}

impl EngineCommand {
    pub fn set_option(name: impl Into<String>, value: impl ToString) -> Self {
        EngineCommand::SetOption {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineCommand::Uci => f.write_str("uci"),
            EngineCommand::IsReady => f.write_str("isready"),
            EngineCommand::SetOption { name, value } => {
                write!(f, "setoption name {} value {}", name, value)
            }
            EngineCommand::PositionFen(fen) => write!(f, "position fen {}", fen),
            EngineCommand::PositionStartpos { moves } if moves.is_empty() => {
                f.write_str("position startpos")
            }
            EngineCommand::PositionStartpos { moves } => {
                write!(f, "position startpos moves {}", moves.join(" "))
            }
            EngineCommand::GoDepth(depth) => write!(f, "go depth {}", depth),
            EngineCommand::Stop => f.write_str("stop"),
            EngineCommand::Quit => f.write_str("quit"),
        }
    }
}

/// Score reported in an `info` line, from the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineScore {
    Centipawns(i32),
    /// Negative when the side to move is getting mated.
    Mate(i32),
}

impl EngineScore {
    /// Pawns, with mates mapped onto the infinity sentinels.
    pub fn as_pawns(self) -> f64 {
        match self {
            EngineScore::Centipawns(cp) => cp as f64 / 100.0,
            EngineScore::Mate(n) if n > 0 => f64::INFINITY,
            EngineScore::Mate(_) => f64::NEG_INFINITY,
        }
    }
}

/// Replies from the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    UciOk,
    ReadyOk,
    /// `mv` is the raw move token, `None` for a missing token.
    BestMove {
        mv: Option<String>,
        ponder: Option<String>,
    },
    Info { score: Option<EngineScore> },
    /// Anything else (id lines, option lists, banners).
    Other(String),
}

impl EngineReply {
    pub fn parse(line: &str) -> EngineReply {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("uciok") => EngineReply::UciOk,
            Some("readyok") => EngineReply::ReadyOk,
            Some("bestmove") => {
                let mv = tokens.next().map(str::to_string);
                let ponder = match tokens.next() {
                    Some("ponder") => tokens.next().map(str::to_string),
                    _ => None,
                };
                EngineReply::BestMove { mv, ponder }
            }
            Some("info") => EngineReply::Info {
                score: parse_score(tokens),
            },
            _ => EngineReply::Other(line.trim().to_string()),
        }
    }
}

fn parse_score<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<EngineScore> {
    while let Some(token) = tokens.next() {
        if token != "score" {
            continue;
        }
        let kind = tokens.next()?;
        let value: i32 = tokens.next()?.parse().ok()?;
        return match kind {
            "cp" => Some(EngineScore::Centipawns(value)),
            "mate" => Some(EngineScore::Mate(value)),
            _ => None,
        };
    }
    None
}
