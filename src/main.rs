mod batch;
mod fetcher;
mod parser;
mod record;
mod season;
mod settings;
mod store;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use batch::{BatchStats, Outcome};
use fetcher::Fetcher;
use settings::Settings;
use store::{ReorgOutcome, Store};

#[derive(Parser)]
#[command(name = "jarchive_scraper", about = "J! Archive game scraper")]
struct Cli {
    /// Base output directory (default: $JARCHIVE_OUTPUT_DIR or "output")
    #[arg(short, long, global = true)]
    output_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a single game
    Game {
        game_id: u32,
        /// Output file (bare names go into the dated directory)
        output: Option<PathBuf>,
    },
    /// Scrape an inclusive range of game ids
    Range {
        start: u32,
        end: u32,
        /// Seconds between requests
        #[arg(short, long)]
        delay: Option<f64>,
    },
    /// Scrape specific game ids
    List {
        #[arg(required = true)]
        ids: Vec<u32>,
        /// Seconds between requests
        #[arg(short, long)]
        delay: Option<f64>,
    },
    /// Scrape every game on a season page (code like "42", "pcj", or a URL)
    Season {
        season: String,
        /// Seconds between requests
        #[arg(short, long)]
        delay: Option<f64>,
    },
    /// Move flat JSON files in the output directory into YYYY/MM folders
    Reorganize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }
    let store = Store::new(&settings.output_dir);

    let result = match cli.command {
        Commands::Game { game_id, output } => {
            let fetcher = Fetcher::new(&settings)?;
            println!("Scraping game {}...", game_id);
            match batch::scrape_one(&fetcher, &store, game_id, output.as_deref()).await {
                Outcome::Saved { path, record } => {
                    println!("Successfully scraped and saved to {}", path.display());
                    print_summary(&record);
                    Ok(())
                }
                Outcome::Empty => {
                    bail!("Failed to scrape data - game may not exist or page is empty")
                }
                Outcome::Failed(reason) => bail!("Failed to scrape game {}: {}", game_id, reason),
            }
        }
        Commands::Range { start, end, delay } => {
            if start > end {
                bail!("start id {} is greater than end id {}", start, end);
            }
            let delay = delay.unwrap_or(settings.delay_secs);
            println!(
                "Scraping games {} to {} with {}s delay between requests...",
                start, end, delay
            );
            let ids: Vec<u32> = (start..=end).collect();
            run_batch(&settings, &store, &ids, delay, "Batch scraping").await
        }
        Commands::List { ids, delay } => {
            let delay = delay.unwrap_or(settings.delay_secs);
            println!(
                "Scraping {} games with {}s delay between requests...",
                ids.len(),
                delay
            );
            run_batch(&settings, &store, &ids, delay, "Batch scraping").await
        }
        Commands::Season { season, delay } => {
            let fetcher = Fetcher::new(&settings)?;
            let ids = season::fetch_game_ids(&fetcher, &settings.season_url(&season)).await?;
            if ids.is_empty() {
                println!("No games found!");
                return Ok(());
            }
            let delay = delay.unwrap_or(settings.season_delay_secs);
            println!(
                "\nStarting to scrape {} games with {}s delay between requests...",
                ids.len(),
                delay
            );
            println!("Saving to: {}/", store.root().display());
            println!("{}", "=".repeat(60));
            run_batch(&settings, &store, &ids, delay, "Season scraping").await
        }
        Commands::Reorganize => reorganize(&store),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_batch(
    settings: &Settings,
    store: &Store,
    ids: &[u32],
    delay_secs: f64,
    label: &str,
) -> anyhow::Result<()> {
    let delay = Duration::try_from_secs_f64(delay_secs)
        .with_context(|| format!("Invalid delay: {}", delay_secs))?;
    let fetcher = Fetcher::new(settings)?;
    let stats = batch::run(&fetcher, store, ids, delay).await?;
    print_totals(label, &stats);
    Ok(())
}

fn print_summary(record: &record::GameRecord) {
    println!(
        "\nEpisode: #{} - {}",
        record.episode_number.as_deref().unwrap_or("N/A"),
        record.air_date.as_deref().unwrap_or("unknown date")
    );
    println!("Contestants: {}", record.contestants.len());
    println!(
        "Jeopardy Round: {} categories, {} clues",
        record.jeopardy_round.categories.len(),
        record.jeopardy_round.clues.len()
    );
    println!(
        "Double Jeopardy Round: {} categories, {} clues",
        record.double_jeopardy_round.categories.len(),
        record.double_jeopardy_round.clues.len()
    );
    println!(
        "Final Jeopardy: {}",
        record.final_jeopardy.category.as_deref().unwrap_or("N/A")
    );
}

fn print_totals(label: &str, stats: &BatchStats) {
    println!("\n{}", "=".repeat(60));
    println!("{} complete! ({} games)", label, stats.total);
    println!("✓ Successful: {}", stats.ok);
    if stats.failed > 0 {
        println!("✗ Failed: {}", stats.failed);
    }
    println!("{}", "=".repeat(60));
}

fn reorganize(store: &Store) -> anyhow::Result<()> {
    let outcomes = store.reorganize()?;
    if outcomes.is_empty() {
        println!("No JSON files found in output directory root.");
        return Ok(());
    }

    println!("Found {} files to reorganize...", outcomes.len());
    for outcome in &outcomes {
        match outcome {
            ReorgOutcome::Moved { file, to } => {
                println!("  ✓ Moved {} → {}", file, to.display())
            }
            ReorgOutcome::Duplicate { file, to } => {
                println!("  ⚠ Duplicate {} - saved as {}", file, to.display())
            }
            ReorgOutcome::NoDate { file } => {
                println!("  ⚠ Skipping {} - no air_date found", file)
            }
            ReorgOutcome::Failed { file, reason } => {
                println!("  ✗ Error processing {}: {}", file, reason)
            }
        }
    }

    let moved = outcomes.iter().filter(|o| o.is_moved()).count();
    let skipped = outcomes.len() - moved;
    println!("\n{}", "=".repeat(60));
    println!("Reorganization complete!");
    println!("✓ Moved: {} files", moved);
    if skipped > 0 {
        println!("⚠ Skipped: {} files", skipped);
    }
    println!("{}", "=".repeat(60));
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
