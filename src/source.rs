use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::USER_AGENT;
use tracing::info;

pub const PASTE_TERMINATOR: &str = "END_HTML";

/// Where the catalog markup comes from.
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Url(String),
    Paste,
}

impl Source {
    pub fn read(&self, user_agent: &str) -> Result<String> {
        match self {
            Source::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path)),
            Source::Url(url) => fetch_url(url, user_agent),
            Source::Paste => {
                println!("Paste the page HTML, then a line containing only '{PASTE_TERMINATOR}':");
                read_until_terminator(io::stdin().lock())
            }
        }
    }
}

/// Single blocking GET. Transport errors and non-2xx statuses are returned as errors.
pub fn fetch_url(url: &str, user_agent: &str) -> Result<String> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Fetching {url}"));
    pb.enable_steady_tick(Duration::from_millis(100));

    let client = reqwest::blocking::Client::new();
    let result = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text());
    pb.finish_and_clear();

    let body = result.with_context(|| format!("Failed to fetch {url}"))?;
    info!(url, bytes = body.len(), "fetched course page");
    Ok(body)
}

/// Collect lines until the terminator line (or EOF), joined with `\n`.
pub fn read_until_terminator<R: BufRead>(reader: R) -> Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read pasted HTML")?;
        if line == PASTE_TERMINATOR {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Ask for a line on the terminal, trimmed of the trailing newline.
pub fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read from stdin")?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}
