mod bucket;
mod parser;
mod settings;
mod sheet;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use bucket::{BoundaryKind, Boundaries, BucketPolicy};
use parser::extract::{DurationMode, OutlineRecord};
use settings::Settings;
use sheet::Sheet;
use source::Source;

#[derive(Parser)]
#[command(
    name = "course_outline",
    about = "Turn a course catalog page into a spreadsheet of lectures grouped into study blocks"
)]
struct Cli {
    /// Course title (prompted for when omitted)
    #[arg(short, long)]
    title: Option<String>,
    /// Settings file (default: ./course_outline.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Block length in seconds
    #[arg(long)]
    threshold_seconds: Option<u64>,
    /// Keep duration cells that are not m:ss
    #[arg(long)]
    lenient: bool,
    /// Whether a trailing partial block is highlighted
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Output path (default: derived from the course title)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also print the extracted records as JSON
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    input: Option<Input>,
}

#[derive(Subcommand)]
enum Input {
    /// Read the page from a saved HTML file
    File { path: PathBuf },
    /// Fetch the page over HTTP
    Url { url: String },
    /// Paste the HTML on stdin, ending with a line containing END_HTML
    Paste,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Restart the total after each marked row; a short last block stays plain
    Reset,
    /// Also mark the last row of a short final block
    IncludeTail,
}

impl From<PolicyArg> for BucketPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reset => BucketPolicy::PerRecordReset,
            PolicyArg::IncludeTail => BucketPolicy::IncludeTail,
        }
    }
}

impl From<Input> for Source {
    fn from(input: Input) -> Self {
        match input {
            Input::File { path } => Source::File(path),
            Input::Url { url } => Source::Url(url),
            Input::Paste => Source::Paste,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(t) = cli.threshold_seconds {
        settings.threshold_seconds = t;
    }
    if cli.lenient {
        settings.duration_mode = DurationMode::Lenient;
    }
    if let Some(p) = cli.policy {
        settings.bucket_policy = p.into();
    }
    info!(settings = ?settings, "Starting course outline export");

    let title = match cli.title {
        Some(t) => t,
        None => source::prompt("Course title: ")?,
    };
    let source = match cli.input {
        Some(input) => Source::from(input),
        None => choose_source()?,
    };

    let html = source.read(&settings.user_agent)?;
    let records = parser::process_document(
        &html,
        &title,
        &settings.markers,
        settings.duration_mode,
    );

    println!("Parsed {} outline records.", records.len());
    if records.is_empty() {
        println!("No outline records found. Check the page markup.");
        return Ok(());
    }
    print_preview(&records, settings.preview_rows);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    let boundaries =
        bucket::mark_boundaries(&records, settings.threshold_seconds, settings.bucket_policy);
    print_boundaries(&boundaries, settings.threshold_seconds);

    let mut sheet = Sheet::from_records(&records);
    if let Err(e) = sheet.mark_boundary_rows(&boundaries) {
        warn!(error = %e, "boundary styling skipped");
        println!("Could not apply block styling: {e}");
    }

    let path = cli.output.unwrap_or_else(|| {
        PathBuf::from(sheet::output_file_name(&title, &settings.file_separator))
    });
    sheet::write_xlsx(&sheet, &path)?;
    println!("Saved {} rows to {}", sheet.rows.len(), path.display());
    println!("Styled {} block boundary rows.", sheet.styled_rows());
    Ok(())
}

fn choose_source() -> Result<Source> {
    let choice = source::prompt("Input: [1] HTML file  [2] URL  [3] paste HTML: ")?;
    let source = match choice.trim() {
        "1" => Source::File(PathBuf::from(source::prompt("HTML file path: ")?)),
        "2" => Source::Url(source::prompt("Course URL: ")?),
        _ => Source::Paste,
    };
    Ok(source)
}

fn print_preview(records: &[OutlineRecord], rows: usize) {
    if rows == 0 {
        return;
    }
    println!(
        "{:>4} | {:<28} | {:<32} | {:>8}",
        "#", "Section", "Item", "Duration"
    );
    println!("{}", "-".repeat(82));
    for r in records.iter().take(rows) {
        println!(
            "{:>4} | {:<28} | {:<32} | {:>8}",
            r.order,
            truncate(&r.section_title, 28),
            truncate(&r.item_title, 32),
            r.duration_text
        );
    }
    if records.len() > rows {
        println!("  ... {} more", records.len() - rows);
    }
}

fn print_boundaries(boundaries: &Boundaries, threshold_seconds: u64) {
    for e in &boundaries.events {
        // +2: header row, and spreadsheet rows are 1-based
        let row = e.index + 2;
        let minutes = e.cumulative_minutes();
        match e.kind {
            BoundaryKind::Threshold => println!(
                "Row {row}: block passes {} min ({minutes:.2} min)",
                threshold_seconds / 60
            ),
            BoundaryKind::Tail => println!("Row {row}: final block ({minutes:.2} min)"),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_width() {
        assert_eq!(truncate("short", 10), "short");
        let t = truncate("a much longer section title", 10);
        assert_eq!(t.chars().count(), 10);
        assert!(t.ends_with("..."));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "course_outline",
            "--title",
            "Intro to Rust",
            "--policy",
            "include-tail",
            "--lenient",
            "file",
            "page.html",
        ])
        .unwrap();
        assert_eq!(cli.title.as_deref(), Some("Intro to Rust"));
        assert_eq!(cli.policy.map(BucketPolicy::from), Some(BucketPolicy::IncludeTail));
        assert!(cli.lenient);
        assert!(matches!(cli.input, Some(Input::File { ref path }) if path == &PathBuf::from("page.html")));
    }

    #[test]
    fn cli_policy_names() {
        let cli = Cli::try_parse_from(["course_outline", "--policy", "reset", "paste"]).unwrap();
        assert_eq!(cli.policy.map(BucketPolicy::from), Some(BucketPolicy::PerRecordReset));
        assert!(Cli::try_parse_from(["course_outline", "--policy", "include_tail", "paste"]).is_err());
    }

    #[test]
    fn fixture_end_to_end() {
        let html = std::fs::read_to_string("tests/fixtures/course.html").unwrap();
        let settings = Settings::default();
        let records = parser::process_document(
            &html,
            "Practical Rust",
            &settings.markers,
            settings.duration_mode,
        );
        let boundaries =
            bucket::mark_boundaries(&records, settings.threshold_seconds, settings.bucket_policy);
        // 2:15 + 10:30 + 25:00 + 18:20 = 56:05, then 30:45 + 12:10 + 9:05 = 52:00
        assert_eq!(boundaries.indices().into_iter().collect::<Vec<_>>(), vec![3, 6]);

        let mut sheet = Sheet::from_records(&records);
        assert_eq!(sheet.mark_boundary_rows(&boundaries).unwrap(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(sheet::output_file_name("Practical Rust", "-"));
        sheet::write_xlsx(&sheet, &path).unwrap();
        assert!(path.ends_with("Practical-Rust.xlsx"));
        assert!(path.exists());
    }
}
