use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::fetcher::Fetcher;
use crate::parser;
use crate::record::GameRecord;
use crate::store::Store;

/// Counts returned after a batch completes.
pub struct BatchStats {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}

pub enum Outcome {
    Saved { path: PathBuf, record: GameRecord },
    /// The page parsed but yielded nothing worth saving.
    Empty,
    Failed(String),
}

/// Fetch, extract and save one game. Never returns early on extraction gaps;
/// only fetch and write failures are failures.
pub async fn scrape_one(
    fetcher: &Fetcher,
    store: &Store,
    game_id: u32,
    name: Option<&Path>,
) -> Outcome {
    let body = match fetcher.fetch_game(game_id).await {
        Ok(body) => body,
        Err(e) => {
            warn!(game_id, "fetch failed: {}", e);
            return Outcome::Failed(e.to_string());
        }
    };

    let record = parser::parse_game(game_id, &body);
    if !record.has_data() {
        return Outcome::Empty;
    }

    match store.save_as(&record, name) {
        Ok(path) => Outcome::Saved { path, record },
        Err(e) => Outcome::Failed(format!("{e:#}")),
    }
}

/// Scrape games one at a time, sleeping `delay` between requests.
pub async fn run(
    fetcher: &Fetcher,
    store: &Store,
    ids: &[u32],
    delay: Duration,
) -> Result<BatchStats> {
    let total = ids.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} (eta {eta})")?
            .progress_chars("=> "),
    );

    let mut ok = 0usize;
    let mut failed = 0usize;

    for (i, &game_id) in ids.iter().enumerate() {
        pb.println(format!("\n[{}/{}] Scraping game {}...", i + 1, total, game_id));

        let outcome = scrape_one(fetcher, store, game_id, None).await;
        match outcome {
            Outcome::Saved { .. } => ok += 1,
            _ => failed += 1,
        }
        for line in status_lines(game_id, &outcome) {
            pb.println(line);
        }
        pb.inc(1);

        if i + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }

    pb.finish_and_clear();
    info!("Scraped {} games ({} ok, {} failed)", total, ok, failed);

    Ok(BatchStats { total, ok, failed })
}

/// One-line status per game, plus the episode line when there is one.
pub fn status_lines(game_id: u32, outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Saved { path, record } => {
            let mut lines = vec![format!("  ✓ Saved to {}", path.display())];
            if let Some(episode) = &record.episode_number {
                lines.push(format!(
                    "  Episode #{} - {}",
                    episode,
                    record.air_date.as_deref().unwrap_or("unknown date")
                ));
            }
            lines
        }
        Outcome::Empty => vec![format!(
            "  ✗ Failed to scrape game {game_id} - no data found"
        )],
        Outcome::Failed(reason) => vec![format!("  ✗ Failed to scrape game {game_id}: {reason}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_lines_include_episode() {
        let html = std::fs::read_to_string("tests/fixtures/game_9416.html").unwrap();
        let record = parser::parse_game(9293, &html);
        let outcome = Outcome::Saved {
            path: PathBuf::from("output/2025/10/jeopardy_game_9293.json"),
            record,
        };
        assert_eq!(
            status_lines(9293, &outcome),
            vec![
                "  ✓ Saved to output/2025/10/jeopardy_game_9293.json".to_string(),
                "  Episode #9416 - Monday, October 20, 2025".to_string(),
            ]
        );
    }

    #[test]
    fn failure_lines() {
        assert_eq!(
            status_lines(5, &Outcome::Empty),
            vec!["  ✗ Failed to scrape game 5 - no data found".to_string()]
        );
        assert_eq!(
            status_lines(5, &Outcome::Failed("HTTP 404 Not Found".into())),
            vec!["  ✗ Failed to scrape game 5: HTTP 404 Not Found".to_string()]
        );
    }
}
