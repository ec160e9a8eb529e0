use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use studydeck::modes::blocks::{BlocksAction, BlocksGame, BlocksPhase};
use studydeck::modes::learn::{AnswerState, LearnSession};
use studydeck::persist::load_high_score;
use studydeck::{
    builtin_deck, load_cards_from_json, load_config_from_json, Category, Deck, JsonFileStore,
    KvStore, MemoryStore, StudyConfig,
};

#[derive(Debug, Parser)]
#[command(name = "study", about = "Study deck games in the terminal")]
struct Args {
    /// Config JSON path (missing fields keep their defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cards JSON path (defaults to the built-in deck)
    #[arg(long, global = true)]
    cards: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate and list the deck
    Deck {
        /// Only list one category: github | claude | datefix | terminal | vercel
        #[arg(long)]
        category: Option<String>,
    },
    /// Multiple-choice run through the whole deck on stdin: 1-4 to answer, ? to reveal
    Learn {
        #[arg(long, default_value_t = 0x00C0FFEEu64)]
        seed: u64,
    },
    /// Autoplay a blocks session and report the score
    Blocks {
        #[arg(long, default_value_t = 0x00C0FFEEu64)]
        seed: u64,

        /// High-score store file (JSON); in-memory when omitted
        #[arg(long)]
        store: Option<PathBuf>,

        /// Stop after this many quiz rounds
        #[arg(long, default_value_t = 50)]
        max_rounds: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(p) => load_config_from_json(p).map_err(|e| format!("Config load error: {e}"))?,
        None => StudyConfig::default(),
    };
    let deck = match &args.cards {
        Some(p) => load_cards_from_json(p).map_err(|e| format!("Cards load error: {e}"))?,
        None => builtin_deck()?,
    };

    match args.command {
        Command::Deck { category } => list_deck(&deck, category.as_deref()),
        Command::Learn { seed } => run_learn(&deck, seed, &config),
        Command::Blocks {
            seed,
            store,
            max_rounds,
        } => match store {
            Some(path) => run_blocks(BlocksGame::new(deck, JsonFileStore::new(path), seed, config.blocks), max_rounds),
            None => run_blocks(BlocksGame::new(deck, MemoryStore::new(), seed, config.blocks), max_rounds),
        },
    }
}

fn list_deck(deck: &Deck, category: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match category {
        Some(s) => Some(Category::parse(s).ok_or_else(|| format!("Unknown category '{s}'"))?),
        None => None,
    };
    println!("Loaded {} cards.", deck.len());
    for card in deck.iter().filter(|c| filter.map_or(true, |f| c.category == f)) {
        println!(
            "{:>3} [{}] {}: {}",
            card.id,
            card.category.as_str(),
            card.term,
            card.short_def
        );
    }
    Ok(())
}

fn run_learn(deck: &Deck, seed: u64, config: &StudyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let delay = config.learn.answer_delay_ms.max(config.learn.reveal_delay_ms);
    let mut session = LearnSession::new(deck, seed, config.learn.clone());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut out = io::stdout();

    'questions: while let Some(card) = session.current().cloned() {
        writeln!(out, "Q{}/{}: {}", session.index() + 1, session.total(), card.question)?;
        for (i, o) in session.options().iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, o.text)?;
        }
        out.flush()?;

        loop {
            let Some(line) = lines.next() else {
                break 'questions;
            };
            let line = line?;
            let input = line.trim();
            let accepted = if input == "?" {
                session.dont_know()
            } else {
                match input.parse::<usize>() {
                    Ok(n) if (1..=session.options().len()).contains(&n) => {
                        let id = session.options()[n - 1].id;
                        session.select(id)
                    }
                    _ => false,
                }
            };
            if accepted {
                break;
            }
            writeln!(out, "Enter 1-{} or ?", session.options().len())?;
        }

        match session.answer_state() {
            AnswerState::Correct => writeln!(out, "Correct!")?,
            AnswerState::Wrong => writeln!(out, "Wrong. Answer: {}", card.answer)?,
            AnswerState::Revealed => writeln!(out, "Answer: {}", card.answer)?,
            AnswerState::Idle => {}
        }
        session.tick(delay);
    }

    writeln!(out, "Score: {}/{}", session.score(), session.total())?;
    if let Some(reaction) = session.reaction() {
        writeln!(out, "{}", reaction.label())?;
    }
    Ok(())
}

fn run_blocks<S: KvStore>(mut game: BlocksGame<S>, max_rounds: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut rounds = 0u32;
    loop {
        let state = game.state();
        match state.phase {
            BlocksPhase::GameOver => break,
            BlocksPhase::Quiz => {
                let correct = state
                    .quiz
                    .as_ref()
                    .and_then(|q| q.options.iter().find(|o| o.is_correct))
                    .map(|o| o.id);
                if let Some(id) = correct {
                    game.dispatch(BlocksAction::AnswerQuiz(id));
                }
                rounds += 1;
                if rounds >= max_rounds {
                    break;
                }
                game.dispatch(BlocksAction::ContinueFromQuiz);
            }
            BlocksPhase::Playing if state.clearing.is_some() => {
                let delay = state.config.clear_delay_ms;
                game.tick(delay);
            }
            BlocksPhase::Playing => {
                let Some((piece, (row, col))) = state
                    .pieces
                    .iter()
                    .find_map(|p| state.grid.find_fit(p.shape).map(|at| (p.id, at)))
                else {
                    break;
                };
                game.dispatch(BlocksAction::PlacePiece {
                    row,
                    col,
                    piece: Some(piece),
                });
            }
        }
    }

    let state = game.state();
    println!("Rounds: {rounds}");
    println!("Score: {}", state.score);
    println!("Lines: {}", state.lines_cleared);
    println!("Game over: {}", state.phase == BlocksPhase::GameOver);
    println!("High score: {}", load_high_score(game.store()));
    Ok(())
}
