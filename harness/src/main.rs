use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use minegym_core::{Game, GameConfig, Observation, Status};
use minegym_harness::{render_board, render_prompt, AgentKind, EpisodeConfig, EpisodeSession};

/// Scores automated Minesweeper agents on seeded, reproducible boards.
#[derive(Debug, Parser)]
#[command(name = "minegym", version, about)]
struct Args {
    /// Board rows
    #[arg(long, default_value_t = 9)]
    rows: u8,

    /// Board columns
    #[arg(long, default_value_t = 9)]
    cols: u8,

    /// Mines on the board
    #[arg(long, default_value_t = 10)]
    mines: u16,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Agent driving the game
    #[arg(long, value_enum, default_value_t = AgentKind::SinglePoint)]
    agent: AgentKind,

    /// Stop after this many moves even if the game is still going
    #[arg(long, default_value_t = 512)]
    max_moves: usize,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Render the board after every move
    #[arg(long)]
    show_board: bool,

    /// Print the opening prompt for this board and exit without playing
    #[arg(long)]
    show_prompt: bool,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = GameConfig::new(args.rows, args.cols, args.mines);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "seed {seed}, {}x{} board with {} mines",
        config.rows,
        config.cols,
        config.mines
    );

    if args.show_prompt {
        let game = Game::new(config, Some(seed))?;
        print!("{}", render_prompt(&Observation::from_game(&game)));
        return Ok(());
    }

    let episode = EpisodeConfig::new(config, seed).with_max_moves(args.max_moves);
    let mut agent = args.agent.create(seed);
    let mut session = EpisodeSession::new(episode)?;

    while let Some(record) = session.advance(agent.as_mut()) {
        if args.show_board {
            println!("move {}: {} -> {}", record.index, record.request, record.outcome);
            print!("{}", render_board(&session.observation()));
        }
    }
    let final_view = session.observation();
    let report = session.finish(agent.name());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let verdict = match report.status {
            Status::Success => "cleared the board",
            Status::Failed => "failed",
            Status::Ongoing => "hit the move cap",
        };
        println!(
            "{} {verdict} after {} moves (seed {})",
            report.agent, report.moves_played, report.seed
        );
        println!(
            "revealed {}/{} cells ({:.0}%), {} flags, last outcome: {}",
            report.cells_revealed,
            report.safe_cells,
            report.coverage() * 100.0,
            report.flags_placed,
            report
                .last_outcome
                .map_or("none", |outcome| outcome.as_str()),
        );
        if !args.show_board {
            print!("{}", render_board(&final_view));
        }
    }

    Ok(())
}
