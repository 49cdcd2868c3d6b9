use std::fs;

use anyhow::Context;
use serde::Deserialize;

use subtitle_renamer::organize::OrganizeConfig;
use subtitle_renamer::subtitle_rename::RenameConfig;

use crate::{Args, Command};

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub enum Config {
    Rename { config: RenameConfig, json: bool },
    Organize(OrganizeConfig),
}

/// Subtitle rename config from the config file.
#[derive(Debug, Default, Deserialize)]
struct SubRenameConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    recurse: bool,
    #[serde(default)]
    remove_originals: bool,
    #[serde(default)]
    keep_existing: bool,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    video_patterns: Vec<String>,
    #[serde(default)]
    subtitle_patterns: Vec<String>,
}

/// Organize config from the config file.
#[derive(Debug, Default, Deserialize)]
struct OrganizeSection {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file sections.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    sub_rename: SubRenameConfig,
    #[serde(default)]
    organize: OrganizeSection,
}

impl UserConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = subtitle_renamer::config::CONFIG_PATH.as_deref() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<Self>(toml_str).context("Failed to parse sub_rename config TOML")
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let user_config = UserConfig::get_user_config()?;
        Ok(Self::from_args_and_user_config(args, user_config))
    }

    fn from_args_and_user_config(args: Args, user_config: UserConfig) -> Self {
        if let Some(Command::Organize { root, print, verbose }) = args.command {
            return Self::Organize(OrganizeConfig {
                root,
                dryrun: print || user_config.organize.dryrun,
                verbose: verbose || user_config.organize.verbose,
            });
        }

        let user_config = user_config.sub_rename;

        // CLI patterns first, then config patterns. Built-in defaults are added by the library.
        let video_patterns = args
            .video_pattern
            .into_iter()
            .chain(user_config.video_patterns)
            .collect();
        let subtitle_patterns = args
            .subtitle_pattern
            .into_iter()
            .chain(user_config.subtitle_patterns)
            .collect();

        Self::Rename {
            config: RenameConfig {
                video_dir: args.video_dir,
                subtitle_dir: args.subtitle_dir,
                dryrun: args.print || user_config.dryrun,
                recurse: args.recurse || user_config.recurse,
                remove_originals: args.remove_originals || user_config.remove_originals,
                keep_existing: args.keep_existing || user_config.keep_existing,
                verbose: args.verbose || user_config.verbose,
                video_patterns,
                subtitle_patterns,
            },
            json: args.json,
        }
    }
}

#[cfg(test)]
mod sub_rename_config_tests {
    use super::*;

    #[test]
    fn from_toml_str_parses_empty_config() {
        let config = UserConfig::from_toml_str("").unwrap();
        assert!(!config.sub_rename.dryrun);
        assert!(!config.sub_rename.keep_existing);
        assert!(config.sub_rename.video_patterns.is_empty());
        assert!(!config.organize.dryrun);
    }

    #[test]
    fn from_toml_str_parses_sub_rename_section() {
        let toml = r#"
[sub_rename]
dryrun = true
recurse = true
remove_originals = true
keep_existing = true
verbose = true
video_patterns = ["part\\.(\\d+)"]
subtitle_patterns = ["chapter (\\d+)", "ch(?P<episode>\\d+)"]
"#;
        let config = UserConfig::from_toml_str(toml).unwrap().sub_rename;
        assert!(config.dryrun);
        assert!(config.recurse);
        assert!(config.remove_originals);
        assert!(config.keep_existing);
        assert!(config.verbose);
        assert_eq!(config.video_patterns, vec![r"part\.(\d+)"]);
        assert_eq!(config.subtitle_patterns, vec![r"chapter (\d+)", r"ch(?P<episode>\d+)"]);
    }

    #[test]
    fn from_toml_str_parses_organize_section() {
        let toml = r"
[organize]
dryrun = true
";
        let config = UserConfig::from_toml_str(toml).unwrap();
        assert!(config.organize.dryrun);
        assert!(!config.organize.verbose);
        assert!(!config.sub_rename.dryrun);
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[other_section]
some_value = true

[sub_rename]
verbose = true
";
        let config = UserConfig::from_toml_str(toml).unwrap();
        assert!(config.sub_rename.verbose);
        assert!(!config.sub_rename.recurse);
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        let result = UserConfig::from_toml_str("this is not valid toml {{{");
        assert!(result.is_err());
    }

    #[test]
    fn from_toml_str_wrong_type_returns_error() {
        let toml = r#"
[sub_rename]
dryrun = "yes"
"#;
        assert!(UserConfig::from_toml_str(toml).is_err());
    }
}

#[cfg(test)]
mod config_from_args_tests {
    use super::*;

    use clap::Parser;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("subren").chain(args.iter().copied())).unwrap()
    }

    fn rename_config(config: Config) -> (RenameConfig, bool) {
        match config {
            Config::Rename { config, json } => (config, json),
            Config::Organize(_) => panic!("expected rename config"),
        }
    }

    #[test]
    fn from_args_defaults() {
        let config = Config::from_args_and_user_config(parse(&[]), UserConfig::default());
        let (config, json) = rename_config(config);
        assert!(config.video_dir.is_none());
        assert!(config.subtitle_dir.is_none());
        assert!(!config.dryrun);
        assert!(!config.keep_existing);
        assert!(!json);
    }

    #[test]
    fn from_args_cli_flags() {
        let args = parse(&["videos", "-s", "subs", "-r", "-p", "-m", "-k", "-v", "-j"]);
        let (config, json) = rename_config(Config::from_args_and_user_config(args, UserConfig::default()));
        assert_eq!(config.video_dir.as_deref(), Some(std::path::Path::new("videos")));
        assert_eq!(config.subtitle_dir.as_deref(), Some(std::path::Path::new("subs")));
        assert!(config.recurse);
        assert!(config.dryrun);
        assert!(config.remove_originals);
        assert!(config.keep_existing);
        assert!(config.verbose);
        assert!(json);
    }

    #[test]
    fn from_args_dry_run_alias() {
        let (config, _) = rename_config(Config::from_args_and_user_config(
            parse(&["--dry-run"]),
            UserConfig::default(),
        ));
        assert!(config.dryrun);
    }

    #[test]
    fn from_args_combines_user_config_flags() {
        let user_config = UserConfig::from_toml_str(
            r"
[sub_rename]
keep_existing = true
recurse = true
",
        )
        .unwrap();
        let (config, _) = rename_config(Config::from_args_and_user_config(parse(&["-p"]), user_config));
        assert!(config.dryrun);
        assert!(config.keep_existing);
        assert!(config.recurse);
        assert!(!config.remove_originals);
    }

    #[test]
    fn from_args_cli_patterns_come_before_config_patterns() {
        let user_config = UserConfig::from_toml_str(
            r#"
[sub_rename]
subtitle_patterns = ["config(\\d+)"]
"#,
        )
        .unwrap();
        let args = parse(&["-t", r"cli(\d+)", "-t", r"other(\d+)", "-e", r"video(\d+)"]);
        let (config, _) = rename_config(Config::from_args_and_user_config(args, user_config));
        assert_eq!(config.subtitle_patterns, vec![r"cli(\d+)", r"other(\d+)", r"config(\d+)"]);
        assert_eq!(config.video_patterns, vec![r"video(\d+)"]);
    }

    #[test]
    fn from_args_organize_subcommand() {
        let user_config = UserConfig::from_toml_str(
            r"
[organize]
verbose = true
",
        )
        .unwrap();
        let config = Config::from_args_and_user_config(parse(&["organize", "shows", "-p"]), user_config);
        match config {
            Config::Organize(config) => {
                assert_eq!(config.root.as_deref(), Some(std::path::Path::new("shows")));
                assert!(config.dryrun);
                assert!(config.verbose);
            }
            Config::Rename { .. } => panic!("expected organize config"),
        }
    }
}
