//! # Interactive Shell
//!
//! `storefront shell` keeps one [`AppState`] alive across many commands, so
//! the catalog query, the admin tables (sort, edits, deletions) and the
//! fetched data survive between lines.
//!
//! ```text
//! storefront> products --category laptops
//! storefront> products --page 2            (category still laptops)
//! storefront> admin users deactivate 3 --yes
//! storefront> exit
//! ```
//!
//! Each line is parsed with the same clap definitions as the command line.

use std::iter;

use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::cli::Cli;
use crate::commands::{self, Flags};
use crate::error::ApiError;
use crate::state::AppState;

const PROMPT: &str = "storefront> ";

/// Reads commands from stdin until `exit`, `quit` or end of input.
///
/// `flags` come from the command line that started the shell; a line may
/// add `--yes` or `--json` for itself.
pub async fn run(app: &AppState, flags: Flags) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Storefront shell. Type `help` for commands, `exit` to leave.");
    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let words = match split_words(&line) {
            Ok(words) => words,
            Err(err) => {
                eprintln!("error: {}", err);
                continue;
            }
        };

        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            Some("help") => {
                println!("{}", Cli::command().render_help());
                continue;
            }
            Some(_) => {}
        }

        let cli = match Cli::try_parse_from(iter::once("storefront".to_string()).chain(words)) {
            Ok(cli) => cli,
            Err(err) => {
                // clap renders its own usage text
                eprintln!("{}", err.render());
                continue;
            }
        };

        debug!(command = ?cli.command, "shell command");
        let line_flags = Flags {
            yes: flags.yes || cli.yes,
            json: flags.json || cli.json,
        };
        match commands::execute(app, cli.command, line_flags).await {
            Ok(output) => println!("{}", output),
            Err(err) => eprintln!("error: {}", err),
        }
    }
    Ok(())
}

/// Splits a line into words, honoring quotes and backslash escapes.
///
/// ```text
/// products --search "iphone 9"   →  ["products", "--search", "iphone 9"]
/// login -e 'a b'\'s              →  ["login", "-e", "a b's"]
/// ```
pub fn split_words(line: &str) -> Result<Vec<String>, ApiError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ApiError::validation("Unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
