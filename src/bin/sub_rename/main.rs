mod config;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use subtitle_renamer::organize::VideoOrganizer;
use subtitle_renamer::subtitle_rename::SubtitleRenamer;

use crate::config::Config;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Rename subtitle files to match the video file of the same episode"
)]
pub(crate) struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Optional video directory (default is current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    video_dir: Option<PathBuf>,

    /// Subtitle directory (default is the video directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    subtitle_dir: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Only print changes without renaming files
    #[arg(short, long, visible_alias = "dry-run")]
    print: bool,

    /// Copy subtitles to the new name and remove the originals
    #[arg(short = 'm', long)]
    remove_originals: bool,

    /// Do not overwrite existing subtitle files
    #[arg(short, long)]
    keep_existing: bool,

    /// Extra regex for extracting the episode number from video names
    #[arg(short = 'e', long, num_args = 1, action = clap::ArgAction::Append, value_name = "PATTERN")]
    video_pattern: Vec<String>,

    /// Extra regex for extracting the episode number from subtitle names
    #[arg(short = 't', long, num_args = 1, action = clap::ArgAction::Append, value_name = "PATTERN")]
    subtitle_pattern: Vec<String>,

    /// Print the result as JSON
    #[arg(short, long)]
    json: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rename videos inside season folders to "<Series> SxxEyy"
    #[command(name = "organize")]
    Organize {
        /// Root directory containing series folders
        #[arg(value_hint = clap::ValueHint::DirPath)]
        root: Option<PathBuf>,

        /// Only print changes without renaming files
        #[arg(short, long, visible_alias = "dry-run")]
        print: bool,

        /// Print verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return subtitle_renamer::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }

    match Config::from_args(args)? {
        Config::Organize(config) => {
            let organizer = VideoOrganizer::new(config)?;
            organizer.organize()?;
        }
        Config::Rename { config, json } => {
            let verbose = config.verbose;
            let renamer = SubtitleRenamer::new(config)?;
            if verbose && !json {
                println!("{renamer}");
            }
            let result = renamer.run();
            if json {
                subtitle_renamer::subtitle_rename::print_json(&result)?;
            } else {
                subtitle_renamer::subtitle_rename::print_run_result(&result, verbose);
            }
        }
    }
    Ok(())
}
