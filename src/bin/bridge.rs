// Line-oriented bridge for a host UI: one JSON request per line on stdin,
// one JSON reply per line on stdout. Logs go to stderr.
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use taskboard_assistant::{AssistantConfig, AssistantEngine, Board, ParseOutcome};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "taskboard-bridge", version)]
struct Args {
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long)]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Request {
    Parse {
        text: String,
        boards: Vec<Board>,
        #[serde(default, rename = "activeBoardId")]
        active_board_id: Option<String>,
    },
    LearnEntity {
        name: String,
    },
    LearnVocabulary {
        text: String,
    },
    InjectContext {
        boards: Vec<Board>,
    },
    Exit,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Reply {
    Parsed { result: Option<ParseOutcome> },
    Ack { ok: bool },
    Error { error: String },
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
        .with_writer(io::stderr)
        .init();

    let engine = AssistantEngine::from_config(&config);
    info!("taskboard bridge ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        debug!(request = %line, "bridge <-");

        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(Request::Exit) => break,
            Ok(request) => handle(&engine, request),
            Err(e) => {
                warn!("malformed request: {}", e);
                Reply::Error { error: e.to_string() }
            }
        };

        let out = serde_json::to_string(&reply)?;
        debug!(reply = %out, "bridge ->");
        writeln!(stdout, "{}", out)?;
        stdout.flush()?;
    }
    info!("taskboard bridge shutting down");
    Ok(())
}

fn handle(engine: &AssistantEngine, request: Request) -> Reply {
    match request {
        Request::Parse { text, boards, active_board_id } => Reply::Parsed {
            result: engine.parse_task_intent(&text, &boards, active_board_id.as_deref()),
        },
        Request::LearnEntity { name } => {
            engine.learn_entity(&name);
            Reply::Ack { ok: true }
        }
        Request::LearnVocabulary { text } => {
            engine.learn_vocabulary(&text);
            Reply::Ack { ok: true }
        }
        Request::InjectContext { boards } => {
            engine.inject_context(&boards);
            Reply::Ack { ok: true }
        }
        Request::Exit => Reply::Ack { ok: true },
    }
}
