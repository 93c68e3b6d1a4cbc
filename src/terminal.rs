use askama::Template;
use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info};

use crate::controller::ControllerHandle;
use crate::languages::{self, catalog_line};
use crate::session::SessionState;

const HELP: &str = "\
Type text to translate it. Commands:
  /from <code>   source language
  /to <code>     target language
  /swap          swap languages
  /clear         clear the text
  /langs         list languages
  /help          show this help
  /quit          exit";

static COMMAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/(\w+)(?:\s+(\S+))?\s*$").unwrap());

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Text(String),
    From(String),
    To(String),
    Swap,
    Clear,
    Languages,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {0}, try /help")]
    Unknown(String),
    #[error("/{0} needs a language code")]
    MissingLanguage(String),
    #[error("Unknown language {0}, choose one of: {}", catalog_line())]
    UnknownLanguage(String),
}

#[derive(Template)]
#[template(path = "screen.txt")]
pub struct Screen<'a> {
    pub source_name: &'a str,
    pub target_name: &'a str,
    pub source_text: &'a str,
    pub translated_text: &'a str,
    pub is_loading: bool,
    pub year: i32,
}

impl<'a> Screen<'a> {
    pub fn new(state: &'a SessionState, year: i32) -> Self {
        Self {
            source_name: languages::display_name(&state.source_lang),
            target_name: languages::display_name(&state.target_lang),
            source_text: &state.source_text,
            translated_text: &state.translated_text,
            is_loading: state.is_loading,
            year,
        }
    }
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if !line.starts_with('/') {
        return Ok(Command::Text(line.to_string()));
    }

    let caps = COMMAND_RE
        .captures(line)
        .ok_or_else(|| CommandError::Unknown(line.to_string()))?;
    let name = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
    let arg = caps.get(2).map(|m| m.as_str());

    match name.as_str() {
        "from" | "to" => {
            let code = arg.ok_or_else(|| CommandError::MissingLanguage(name.clone()))?;
            let lang =
                languages::find(code).ok_or_else(|| CommandError::UnknownLanguage(code.to_string()))?;
            match name.as_str() {
                "from" => Ok(Command::From(lang.code.to_string())),
                _ => Ok(Command::To(lang.code.to_string())),
            }
        }
        "swap" => Ok(Command::Swap),
        "clear" => Ok(Command::Clear),
        "langs" => Ok(Command::Languages),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(line.to_string())),
    }
}

/// Reads commands from stdin until EOF or `/quit`, redrawing the screen on every state change.
pub async fn run(handle: ControllerHandle) -> anyhow::Result<()> {
    let renderer = tokio::spawn(render_loop(handle.subscribe()));
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Text(text)) => handle.set_source_text(&text)?,
            Ok(Command::Clear) => handle.set_source_text("")?,
            Ok(Command::From(code)) => handle.set_source_lang(&code)?,
            Ok(Command::To(code)) => handle.set_target_lang(&code)?,
            Ok(Command::Swap) => handle.swap()?,
            Ok(Command::Languages) => println!("{}", catalog_line()),
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => {
                info!("User quit at revision {}", handle.state().revision());
                break;
            }
            Err(e) => println!("{}", e),
        }
    }

    renderer.abort();
    Ok(())
}

async fn render_loop(mut snapshots: watch::Receiver<SessionState>) {
    let mut last: Option<String> = None;
    loop {
        let rendered = {
            let state = snapshots.borrow_and_update();
            Screen::new(&state, Local::now().year()).render()
        };
        match rendered {
            Ok(screen) => {
                if last.as_deref() != Some(screen.as_str()) {
                    println!("\n{}", screen);
                    last = Some(screen);
                }
            }
            Err(e) => error!("Failed to render screen: {:?}", e),
        }

        if snapshots.changed().await.is_err() {
            break;
        }
    }
}
