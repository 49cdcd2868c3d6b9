//! Rename videos inside season folders to `<Series> SxxEyy<ext>`.
//!
//! Expected layout:
//! ```text
//! <root>/
//!   <Series Name>/
//!     Season 01/
//!       <video files>
//!     Season 02/
//!       <video files>
//! ```
//! A series folder without season folders gets a `Season 01` folder,
//! and all of its entries are moved there before renaming.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use serde::Serialize;

use crate::subtitle_rename::{FileKind, PatternSet};

/// Name of the season folder created for series without one.
pub const DEFAULT_SEASON_DIR: &str = "Season 01";

static RE_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)season\s*(\d{1,2})").expect("Failed to create regex pattern for season"));

#[derive(Debug, Clone, Default)]
pub struct OrganizeConfig {
    pub root: Option<PathBuf>,
    pub dryrun: bool,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct VideoOrganizer {
    root: PathBuf,
    dryrun: bool,
    verbose: bool,
    patterns: PatternSet,
}

/// Counts from an organize run. In a dry run `renamed` counts the previewed renames.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrganizeResult {
    pub renamed: usize,
    pub total: usize,
    pub failed: usize,
}

/// Videos of one season: where they are now and where they are renamed to.
#[derive(Debug)]
struct SeasonFolder {
    season: u32,
    source_dir: PathBuf,
    target_dir: PathBuf,
}

/// Parse the season number from a directory name like "Season 01" or "season1".
#[must_use]
pub fn parse_season(dir_name: &str) -> Option<u32> {
    RE_SEASON
        .captures(dir_name)
        .and_then(|captures| captures.get(1))
        .and_then(|season| season.as_str().parse().ok())
}

/// Format the target file name: `<Series> SxxEyy<ext>`.
#[must_use]
pub fn target_name(series: &str, season: u32, episode: u32, extension: &str) -> String {
    format!("{series} S{season:02}E{episode:02}{extension}")
}

impl VideoOrganizer {
    /// Create a new organizer for the given root directory.
    ///
    /// # Errors
    /// Returns an error if the root is not an existing, readable directory.
    pub fn new(config: OrganizeConfig) -> Result<Self> {
        let root = crate::resolve_input_directory(config.root.as_deref()).context("Invalid root directory")?;
        Ok(Self {
            root,
            dryrun: config.dryrun,
            verbose: config.verbose,
            patterns: PatternSet::defaults(),
        })
    }

    /// Walk series and season directories and rename videos in place.
    ///
    /// # Errors
    /// Returns an error if the root directory cannot be read.
    pub fn organize(&self) -> Result<OrganizeResult> {
        let mut result = OrganizeResult::default();
        for series_path in sorted_entries(&self.root)?.into_iter().filter(|path| path.is_dir()) {
            let series_name = crate::normalized_dir_name(&series_path);
            match self.season_folders(&series_path) {
                Ok(seasons) => {
                    for season in seasons {
                        self.rename_season(&series_name, &season, &mut result);
                    }
                }
                Err(error) => {
                    crate::print_error!("{error:#}");
                }
            }
        }

        if self.dryrun {
            println!("Dryrun: would have renamed {} of {} videos", result.renamed, result.total);
        } else {
            println!("{}", format!("Renamed {} of {} videos", result.renamed, result.total).green());
        }
        Ok(result)
    }

    /// Find the season folders of a series, creating `Season 01` if there are none.
    fn season_folders(&self, series_path: &Path) -> Result<Vec<SeasonFolder>> {
        let entries = sorted_entries(series_path)?;
        let seasons: Vec<SeasonFolder> = entries
            .iter()
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = crate::path_to_filename_string(path);
                match parse_season(&name) {
                    Some(season) => Some(SeasonFolder {
                        season,
                        source_dir: path.clone(),
                        target_dir: path.clone(),
                    }),
                    None => {
                        if self.verbose {
                            println!("Skip non-season folder: {}", self.relative(path));
                        }
                        None
                    }
                }
            })
            .collect();

        if !seasons.is_empty() || !entries.iter().any(|path| path.is_file()) {
            return Ok(seasons);
        }

        let season_dir = series_path.join(DEFAULT_SEASON_DIR);
        if self.dryrun {
            println!("Would create directory: {}", self.relative(&season_dir));
            for entry in &entries {
                println!(
                    "Would move: {} -> {}",
                    self.relative(entry),
                    self.relative(&season_dir.join(crate::path_to_filename_string(entry)))
                );
            }
            return Ok(vec![SeasonFolder {
                season: 1,
                source_dir: series_path.to_path_buf(),
                target_dir: season_dir,
            }]);
        }

        fs::create_dir_all(&season_dir)
            .with_context(|| format!("Failed to create directory: {}", season_dir.display()))?;
        for entry in &entries {
            let target = season_dir.join(entry.file_name().unwrap_or_default());
            if let Err(error) = fs::rename(entry, &target) {
                crate::print_error!("Failed to move {}: {error}", self.relative(entry));
            }
        }
        Ok(vec![SeasonFolder {
            season: 1,
            source_dir: season_dir.clone(),
            target_dir: season_dir,
        }])
    }

    fn rename_season(&self, series_name: &str, season: &SeasonFolder, result: &mut OrganizeResult) {
        let videos = match sorted_entries(&season.source_dir) {
            Ok(entries) => entries
                .into_iter()
                .filter(|path| path.is_file() && FileKind::from_path(path) == Some(FileKind::Video)),
            Err(error) => {
                crate::print_error!("{error:#}");
                return;
            }
        };

        for source in videos {
            result.total += 1;
            let Some(episode) = self
                .patterns
                .extract_from_path(&source)
                .and_then(|key| key.number())
            else {
                println!("Skipping (no episode found): {}", self.relative(&source));
                continue;
            };

            let extension = source
                .extension()
                .map(|ext| format!(".{}", crate::os_str_to_string(ext)))
                .unwrap_or_default();
            let destination = season
                .target_dir
                .join(target_name(series_name, season.season, episode, &extension));

            if destination == source {
                if self.verbose {
                    println!("Already correct: {}", self.relative(&source));
                }
                continue;
            }
            if destination.exists() {
                println!(
                    "{}",
                    format!("Skipping (exists): {}", self.relative(&destination)).yellow()
                );
                continue;
            }

            let old_str = self.relative(&source);
            let new_str = self.relative(&destination);
            if self.dryrun {
                println!("{}", "Dryrun:".bold().cyan());
                crate::show_diff(&old_str, &new_str);
                result.renamed += 1;
                continue;
            }

            println!("{}", "Rename:".bold().magenta());
            crate::show_diff(&old_str, &new_str);
            match fs::rename(&source, &destination) {
                Ok(()) => result.renamed += 1,
                Err(error) => {
                    crate::print_error!("Failed to rename {old_str}: {error}");
                    result.failed += 1;
                }
            }
        }
    }

    fn relative(&self, path: &Path) -> String {
        crate::get_relative_path_or_filename(path, &self.root)
    }
}

/// List non-hidden directory entries sorted by path.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| readable_entry(entry, dir))
        .filter(|entry| !entry.file_name().as_encoded_bytes().starts_with(b"."))
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

/// Unwrap a directory entry, warning about entries that cannot be read.
fn readable_entry(entry: io::Result<fs::DirEntry>, dir: &Path) -> Option<fs::DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(error) => {
            crate::print_warning!("Skipping unreadable entry in {}: {error}", dir.display());
            None
        }
    }
}
