use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use tracing::debug;

use crate::record::{parse_air_date, GameRecord};

/// JSON files on disk, partitioned as `<root>/<YYYY>/<MM>/` by air date.
pub struct Store {
    root: PathBuf,
}

#[derive(Debug, PartialEq)]
pub enum ReorgOutcome {
    Moved { file: String, to: PathBuf },
    /// The target already existed; the file was saved as `*_dup.json`.
    Duplicate { file: String, to: PathBuf },
    NoDate { file: String },
    Failed { file: String, reason: String },
}

impl ReorgOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Duplicate { .. })
    }
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_name(game_id: u32) -> String {
        format!("jeopardy_game_{game_id}.json")
    }

    /// `<root>/<YYYY>/<MM>` when the air date parses, else `<root>`.
    pub fn partition_dir(&self, air_date: Option<&str>) -> PathBuf {
        match air_date.and_then(parse_air_date) {
            Some(date) => self.dated_dir(date),
            None => self.root.clone(),
        }
    }

    fn dated_dir(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(date.year().to_string())
            .join(format!("{:02}", date.month()))
    }

    pub fn save(&self, record: &GameRecord) -> Result<PathBuf> {
        self.save_as(record, None)
    }

    /// Save under an explicit name. A bare file name still goes into the
    /// partition directory; a path with a directory is used as given.
    pub fn save_as(&self, record: &GameRecord, name: Option<&Path>) -> Result<PathBuf> {
        let path = match name {
            Some(p) if has_dir(p) => p.to_path_buf(),
            Some(p) => self.partition_dir(record.air_date.as_deref()).join(p),
            None => self
                .partition_dir(record.air_date.as_deref())
                .join(Self::file_name(record.game_id)),
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(game_id = record.game_id, path = %path.display(), "saved game");
        Ok(path)
    }

    /// Move flat `*.json` files in the root into their dated directories.
    pub fn reorganize(&self) -> Result<Vec<ReorgOutcome>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read {}", self.root.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "json"))
            .collect();
        files.sort();

        // Reading is independent per file; moving stays sequential so that
        // duplicate detection sees earlier moves.
        let dated: Vec<(PathBuf, Result<Option<NaiveDate>>)> = files
            .into_par_iter()
            .map(|path| {
                let date = read_air_date(&path);
                (path, date)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(dated.len());
        for (path, date) in dated {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let outcome = match date {
                Ok(Some(date)) => self
                    .move_into(&path, &file, date)
                    .unwrap_or_else(|e| ReorgOutcome::Failed {
                        file,
                        reason: format!("{e:#}"),
                    }),
                Ok(None) => ReorgOutcome::NoDate { file },
                Err(e) => ReorgOutcome::Failed {
                    file,
                    reason: format!("{e:#}"),
                },
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn move_into(&self, path: &Path, file: &str, date: NaiveDate) -> Result<ReorgOutcome> {
        let dir = self.dated_dir(date);
        fs::create_dir_all(&dir)?;

        let target = dir.join(file);
        if target.exists() {
            let stem = file.strip_suffix(".json").unwrap_or(file);
            let dup = dir.join(format!("{stem}_dup.json"));
            fs::rename(path, &dup)?;
            return Ok(ReorgOutcome::Duplicate {
                file: file.to_string(),
                to: dup,
            });
        }
        fs::rename(path, &target)?;
        Ok(ReorgOutcome::Moved {
            file: file.to_string(),
            to: target,
        })
    }
}

fn has_dir(path: &Path) -> bool {
    path.parent().is_some_and(|p| !p.as_os_str().is_empty())
}

/// `Ok(None)` when the file has no air date; an error when it has one that
/// does not parse, or when the file is not JSON.
fn read_air_date(path: &Path) -> Result<Option<NaiveDate>> {
    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let Some(air_date) = value.get("air_date").and_then(|v| v.as_str()) else {
        return Ok(None);
    };
    match parse_air_date(air_date) {
        Some(date) => Ok(Some(date)),
        None => bail!("unparseable air_date {air_date:?}"),
    }
}
