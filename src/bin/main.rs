use clap::Parser;
use crossterm::style::Stylize;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use taskboard_assistant::{
    AssistantConfig, AssistantEngine, Board, Column, ParseOutcome, TaskIntent,
};
use tracing_subscriber::EnvFilter;

/// Type task commands the way you would dictate them and see what the
/// assistant makes of them.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version)]
struct Args {
    /// Directory holding the learned vocabulary and entities.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep learning separate for this user.
    #[arg(long)]
    namespace: Option<String>,

    /// JSON file with the board catalog (array of boards with columns).
    #[arg(long)]
    boards: Option<PathBuf>,

    /// Board used when a command does not name one.
    #[arg(long)]
    active_board: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AssistantConfig::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if args.namespace.is_some() {
        config.namespace = args.namespace;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let boards = match &args.boards {
        Some(path) => serde_json::from_str::<Vec<Board>>(&std::fs::read_to_string(path)?)?,
        None => demo_boards(),
    };
    let mut active_board = args
        .active_board
        .or_else(|| boards.first().map(|b| b.id.clone()));

    let engine = AssistantEngine::from_config(&config);
    engine.inject_context(&boards);

    println!("{}", "Taskboard assistant. Type a command, ':help' for help, 'exit' to quit.".bold());
    println!("---------------------------------------------------------------");

    let mut pending: Option<TaskIntent> = None;
    loop {
        print!("\n> ");
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd {
            "exit" => break,
            "" => {}
            ":help" => print_help(),
            ":boards" => print_boards(&boards, active_board.as_deref()),
            ":entities" => {
                for entity in engine.entities.all() {
                    println!("  {}", entity);
                }
            }
            ":ok" => match pending.take() {
                Some(task) => {
                    engine.learn_entity(&task.title);
                    engine.learn_vocabulary(&task.comment);
                    println!("{} '{}'", "Created".green(), task.title);
                }
                None => println!("{}", "Nothing to confirm.".yellow()),
            },
            s if s.starts_with(":board ") => {
                let id = s[":board ".len()..].trim();
                if boards.iter().any(|b| b.id == id) {
                    active_board = Some(id.to_string());
                    println!("Active board: {}", id);
                } else {
                    println!("{} {}", "Unknown board".red(), id);
                }
            }
            s if s.starts_with(":word ") => {
                let word = s[":word ".len()..].trim();
                println!("{}: {}", word, engine.vocabulary.frequency(word));
            }
            s => {
                pending = None;
                match engine.parse_task_intent(s, &boards, active_board.as_deref()) {
                    Some(ParseOutcome::Task(task)) => {
                        print_task(&task, &boards);
                        println!("{}", "':ok' to create it, or type another command.".dim());
                        pending = Some(task);
                    }
                    Some(ParseOutcome::Unclear(_)) => {
                        println!("{}", UNCLEAR_HINT.yellow());
                    }
                    None => println!("{}", "Nothing to do.".dim()),
                }
            }
        }
    }
    Ok(())
}

const UNCLEAR_HINT: &str =
    "Not sure what the title is. Say who or what first, then a period, then the details.";

fn print_help() {
    println!("  <command>     parse a command, e.g. 'Crear tarea en Ventas: llamar al cliente'");
    println!("  :ok           create the last parsed task (and learn from it)");
    println!("  :boards       list boards and columns");
    println!("  :board <id>   change the active board");
    println!("  :entities     list remembered names");
    println!("  :word <w>     show how often a word has been seen");
    println!("  exit          quit");
}

fn print_boards(boards: &[Board], active: Option<&str>) {
    for board in boards {
        let marker = if Some(board.id.as_str()) == active { "*" } else { " " };
        println!("{} {} ({})", marker, board.title.clone().bold(), board.id);
        for column in &board.columns {
            println!("    - {} ({})", column.title, column.id);
        }
    }
}

fn print_task(task: &TaskIntent, boards: &[Board]) {
    let board = boards.iter().find(|b| b.id == task.board_id);
    let column = board.and_then(|b| {
        b.columns
            .iter()
            .find(|c| Some(&c.id) == task.column_id.as_ref())
    });

    println!("{} {}", "Title:  ".cyan(), task.title);
    if !task.comment.is_empty() {
        println!("{} {}", "Comment:".cyan(), task.comment);
    }
    println!(
        "{} {} / {}",
        "Where:  ".cyan(),
        board.map(|b| b.title.as_str()).unwrap_or("?"),
        column.map(|c| c.title.as_str()).unwrap_or("-")
    );
}

fn demo_boards() -> Vec<Board> {
    let columns = |prefix: &str| {
        ["Por hacer", "En curso", "Hecho"]
            .iter()
            .enumerate()
            .map(|(i, title)| Column {
                id: format!("{}-{}", prefix, i),
                title: title.to_string(),
            })
            .collect::<Vec<_>>()
    };
    vec![
        Board {
            id: "contabilidad".into(),
            title: "Contabilidad".into(),
            columns: columns("contabilidad"),
        },
        Board {
            id: "ventas".into(),
            title: "Ventas".into(),
            columns: columns("ventas"),
        },
    ]
}
