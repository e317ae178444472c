use std::fs;
use std::io::{BufRead, BufReader};
use std::process;

use clap::{Parser, Subcommand};

use glide_engine::geometry::QwertyGrid;
use glide_engine::gesture::GestureTracker;
use glide_engine::suggest::{LexiconTables, SuggestionEngine, SuggestionRequest};
use glide_engine::swipe::SwipeDecoder;

#[derive(Parser)]
#[command(name = "gktool", about = "GlideKey engine diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank suggestions for a word and optional context
    Suggest {
        /// The word being typed (may be empty: "")
        word: String,
        /// Preceding context words, oldest first
        #[arg(long)]
        context: Vec<String>,
        /// Path to a tables JSON file (defaults to the built-in tables)
        #[arg(long)]
        tables: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode a swiped letter sequence through the pattern table
    Decode {
        /// Lowercase letter sequence, e.g. "helo"
        letters: String,
    },

    /// Replay a pointer log over the built-in QWERTY grid.
    /// Lines: "down X Y T_MS", "move X Y T_MS", "up X Y T_MS", "cancel"
    Replay {
        input_file: String,
        /// Grid width in units
        #[arg(long, default_value = "1000")]
        width: f32,
        /// Grid height in units
        #[arg(long, default_value = "300")]
        height: f32,
    },
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Suggest {
            word,
            context,
            tables,
            json,
        } => cmd_suggest(&word, &context, tables.as_deref(), json),
        Command::Decode { letters } => cmd_decode(&letters),
        Command::Replay {
            input_file,
            width,
            height,
        } => cmd_replay(&input_file, width, height),
    };
    process::exit(code);
}

fn load_tables(path: Option<&str>) -> Result<LexiconTables, String> {
    match path {
        None => Ok(LexiconTables::default()),
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            LexiconTables::from_json(&content).map_err(|e| format!("{path}: {e}"))
        }
    }
}

fn cmd_suggest(word: &str, context: &[String], tables: Option<&str>, json: bool) -> i32 {
    let tables = match load_tables(tables) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let engine = SuggestionEngine::new(std::sync::Arc::new(tables));
    let suggestions = engine.suggest(&SuggestionRequest {
        current_word: word.to_string(),
        preceding_context: context.to_vec(),
    });

    if json {
        let items: Vec<serde_json::Value> = suggestions
            .iter()
            .map(|s| {
                serde_json::json!({
                    "text": s.text,
                    "confidence": s.confidence,
                    "origin": format!("{:?}", s.origin),
                    "isCorrection": s.is_correction,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(items));
    } else {
        for (rank, s) in suggestions.iter().enumerate() {
            let marker = if s.is_correction { " *" } else { "" };
            println!(
                "{}. {} ({:.2}, {:?}){}",
                rank + 1,
                s.text,
                s.confidence,
                s.origin,
                marker
            );
        }
    }
    0
}

fn cmd_decode(letters: &str) -> i32 {
    let decoder = SwipeDecoder::default();
    let word = decoder.decode_letters(&letters.to_lowercase());
    if word.is_empty() {
        println!("(no decode)");
    } else {
        println!("{word}");
    }
    0
}

fn cmd_replay(input_file: &str, width: f32, height: f32) -> i32 {
    let file = match fs::File::open(input_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {input_file}: {e}");
            return 1;
        }
    };

    let grid = QwertyGrid::new(width, height);
    let decoder = SwipeDecoder::default();
    let mut tracker = GestureTracker::new();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error: {input_file}:{}: {e}", line_no + 1);
                return 1;
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match parse_event(&fields) {
            Some(PointerEvent::Down(x, y, t)) => {
                tracker.on_pointer_down(x, y, t);
            }
            Some(PointerEvent::Move(x, y, t)) => {
                tracker.on_pointer_move(x, y, t);
            }
            Some(PointerEvent::Up(x, y, t)) => {
                let resp = tracker.on_pointer_up(&grid, x, y, t);
                match resp.swipe {
                    Some(swipe) => {
                        let letters: String = swipe.keys.iter().map(|h| h.key).collect();
                        let word = decoder.decode(&swipe.keys);
                        println!(
                            "swipe: keys={letters} word={word:?} direction={:?} \
                             duration={}ms distance={:.0}",
                            swipe.direction, swipe.duration_ms, swipe.distance
                        );
                    }
                    None if resp.handled => println!("swipe: discarded (below thresholds)"),
                    None => println!("tap"),
                }
            }
            Some(PointerEvent::Cancel) => {
                tracker.on_pointer_cancel();
                println!("cancelled");
            }
            None => {
                eprintln!("error: {input_file}:{}: bad event: {line}", line_no + 1);
                return 1;
            }
        }
    }
    0
}

enum PointerEvent {
    Down(f32, f32, u64),
    Move(f32, f32, u64),
    Up(f32, f32, u64),
    Cancel,
}

fn parse_event(fields: &[&str]) -> Option<PointerEvent> {
    match fields {
        ["cancel"] => Some(PointerEvent::Cancel),
        [kind, x, y, t] => {
            let x = x.parse().ok()?;
            let y = y.parse().ok()?;
            let t = t.parse().ok()?;
            match *kind {
                "down" => Some(PointerEvent::Down(x, y, t)),
                "move" => Some(PointerEvent::Move(x, y, t)),
                "up" => Some(PointerEvent::Up(x, y, t)),
                _ => None,
            }
        }
        _ => None,
    }
}
