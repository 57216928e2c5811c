use chess_aho_ai::core::{standard_board, Color};
use chess_aho_ai::game::{Game, DEFAULT_MAX_PLIES};
use chess_aho_ai::player::{AIConfig, Backend};

use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Headless chess: two move selectors play from the standard position.
#[derive(Parser, Debug)]
#[command(name = "chess-aho-ai", version, about)]
struct Args {
    /// White player: `local` or `engine:<beginner|casual|intermediate|advanced|master>`
    #[arg(long, default_value = "local")]
    white: Backend,

    /// Black player
    #[arg(long, default_value = "engine:intermediate")]
    black: Backend,

    /// AI config file (defaults to ./ai_config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// UCI engine binary, overrides the config file
    #[arg(long)]
    engine: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
    max_plies: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AIConfig::load_from(path)?,
        None => AIConfig::load_or_default(),
    };
    if let Some(program) = args.engine {
        config.engine.program = program;
    }
    let config = Arc::new(config);

    let white = args.white.build(Color::White, &config);
    let black = args.black.build(Color::Black, &config);
    info!("=== {} vs {} ===", white.name(), black.name());

    let mut game = Game::new(standard_board()).with_max_plies(args.max_plies);
    let outcome = game
        .play(white.as_ref(), black.as_ref(), |mv, result| {
            if let Some(uci) = &result.uci_move {
                info!("    engine: {} ({})", uci, mv);
            }
        })
        .await;

    println!("{}", outcome);
    println!("moves: {}", game.history.join(" "));

    white.release().await;
    black.release().await;
    Ok(())
}
