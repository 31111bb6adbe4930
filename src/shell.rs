//! Command-line front end: an interactive loop plus one-shot subcommands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::assistant::ReportAssistant;
use crate::commands::settings::show_settings;
use crate::commands::{analysis, chat, document};
use crate::config::{ConfigArgs, Settings};
use crate::session::Session;

#[derive(Debug, Parser)]
#[command(name = "report-assistant", version, about = "Summarize a PDF report and ask questions about it")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session (default)
    Chat {
        /// PDF to load on start
        pdf: Option<PathBuf>,
    },
    /// Print the summary and keywords of a PDF
    Analyze { pdf: PathBuf },
    /// Answer one question about a PDF
    Ask { pdf: PathBuf, question: String },
}

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Open(PathBuf),
    Analyze,
    Summary,
    History,
    Status,
    Settings,
    Help,
    Quit,
    Question(String),
    Unknown(String),
    Empty,
}

pub const HELP: &str = "\
Commands:
  /open <file.pdf>  load a PDF (replaces the current document)
  /analyze          summarize the document and extract five keywords
  /summary          show the last analysis
  /history          show the chat transcript
  /status           show what is loaded
  /settings         show the model configuration
  /help             show this help
  /quit             exit
Anything else is sent as a question about the document.";

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Question(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "open" if !arg.is_empty() => Input::Open(PathBuf::from(arg)),
        "analyze" => Input::Analyze,
        "summary" => Input::Summary,
        "history" => Input::History,
        "status" => Input::Status,
        "settings" => Input::Settings,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

fn print_result(result: Result<String, String>) {
    match result {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: {}", e),
    }
}

fn prompt() {
    print!("> ");
    std::io::stdout().flush().ok();
}

pub async fn interactive(
    settings: &Settings,
    assistant: &ReportAssistant,
    initial: Option<&Path>,
) -> ExitCode {
    let mut session = Session::new();

    if !assistant.is_configured() {
        eprintln!("warning: {}", crate::assistant::NOT_CONFIGURED);
    }
    match initial {
        Some(path) => print_result(document::open_document(&mut session, path)),
        None => println!("Open a PDF with /open <file.pdf>. Type /help for commands."),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("error: failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::Open(path) => print_result(document::open_document(&mut session, &path)),
            Input::Analyze => {
                println!("Analyzing the report...");
                let result = analysis::analyze(&mut session, assistant).await;
                print_result(result.map(|r| analysis::render_analysis(&r)));
            }
            Input::Summary => print_result(analysis::show_summary(&session)),
            Input::History => println!("{}", chat::render_history(&session)),
            Input::Status => println!("{}", document::document_status(&session)),
            Input::Settings => println!("{}", show_settings(settings)),
            Input::Question(question) => {
                let result = chat::send_message(&mut session, assistant, &question).await;
                print_result(result.map(|turn| chat::render_turn(&turn)));
            }
            Input::Unknown(line) => eprintln!("Unknown command: {}. Type /help.", line),
        }
    }
    ExitCode::SUCCESS
}

/// Load `pdf` into a fresh session, or report why it failed.
fn load(pdf: &Path) -> Result<Session, String> {
    let mut session = Session::new();
    document::open_document(&mut session, pdf)?;
    Ok(session)
}

pub async fn analyze_once(assistant: &ReportAssistant, pdf: &Path) -> ExitCode {
    let result = match load(pdf) {
        Ok(mut session) => analysis::analyze(&mut session, assistant)
            .await
            .map(|r| analysis::render_analysis(&r)),
        Err(e) => Err(e),
    };
    finish(result)
}

pub async fn ask_once(assistant: &ReportAssistant, pdf: &Path, question: &str) -> ExitCode {
    let result = match load(pdf) {
        Ok(session) => match session.document() {
            Some(doc) => assistant
                .answer(question, &doc.content)
                .await
                .map_err(|e| e.to_string()),
            None => Err(crate::commands::NO_DOCUMENT.to_string()),
        },
        Err(e) => Err(e),
    };
    finish(result)
}

fn finish(result: Result<String, String>) -> ExitCode {
    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
