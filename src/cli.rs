//! Command-line interface definitions for LinkCraft.
//!
//! Credentials and client settings can be given as flags, environment
//! variables or in the secrets file (see [`crate::config`]). Without a
//! subcommand the interactive session starts.

use crate::config::Overrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for LinkCraft.
///
/// # Examples
///
/// ```sh
/// # Interactive session, keys from linkcraft.yaml
/// linkcraft
///
/// # Top headlines for one industry
/// NEWS_API_KEY=... OPENAI_API_KEY=... linkcraft headlines --industry healthcare
///
/// # Parse a saved slide outline without touching the network
/// linkcraft parse outline.txt --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML secrets file
    #[arg(short, long, env = "LINKCRAFT_CONFIG", default_value = "linkcraft.yaml", global = true)]
    pub config: PathBuf,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    pub news_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    /// Chat model used for generation
    #[arg(long, env = "LINKCRAFT_MODEL", global = true)]
    pub model: Option<String>,

    /// Sampling temperature used for generation
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Base URL of the news API
    #[arg(long, env = "NEWS_API_URL", global = true)]
    pub news_api_url: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_URL", global = true)]
    pub openai_api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the interactive session (default)
    Interactive,
    /// List the built-in news segments
    Industries,
    /// Print the top headlines for an industry and date range
    Headlines(HeadlineArgs),
    /// Generate a LinkedIn post for a headline
    Post(PostArgs),
    /// Generate a LinkedIn post and break it into slides
    Slides(SlidesArgs),
    /// Parse a slide outline from a file ("-" for stdin)
    Parse(ParseArgs),
}

#[derive(Args, Debug, PartialEq)]
pub struct HeadlineArgs {
    /// Industry keyword, e.g. "renewable energy"
    #[arg(short, long)]
    pub industry: String,

    /// First publication date (YYYY-MM-DD), defaults to a week ago
    #[arg(long)]
    pub from: Option<String>,

    /// Last publication date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args, Debug, PartialEq)]
pub struct PostArgs {
    /// Industry whose professionals the post targets
    #[arg(short, long)]
    pub industry: String,

    /// The news headline to write about
    #[arg(long)]
    pub headline: String,
}

#[derive(Args, Debug, PartialEq)]
pub struct SlidesArgs {
    #[command(flatten)]
    pub post: PostArgs,

    /// Print slides as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, PartialEq)]
pub struct ParseArgs {
    /// File containing generated slide text, or "-" for stdin
    pub input: PathBuf,

    /// Print slides as JSON instead of formatted text
    #[arg(long, conflicts_with = "normalize")]
    pub json: bool,

    /// Print the slides back in canonical outline form
    #[arg(long)]
    pub normalize: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            news_api_key: self.news_api_key.clone(),
            openai_api_key: self.openai_api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            news_api_url: self.news_api_url.clone(),
            openai_api_url: self.openai_api_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_subcommand() {
        let cli = Cli::parse_from(["linkcraft", "--config", "/tmp/secrets.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/tmp/secrets.yaml"));
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_cli_headlines() {
        let cli = Cli::parse_from([
            "linkcraft",
            "headlines",
            "--industry",
            "renewable energy",
            "--from",
            "2025-05-01",
        ]);
        assert_eq!(
            cli.command,
            Some(Command::Headlines(HeadlineArgs {
                industry: "renewable energy".to_string(),
                from: Some("2025-05-01".to_string()),
                to: None,
            }))
        );
    }

    #[test]
    fn test_cli_slides_with_global_flags() {
        let cli = Cli::parse_from([
            "linkcraft",
            "slides",
            "-i",
            "finance",
            "--headline",
            "Rates hold steady",
            "--json",
            "--model",
            "gpt-4o",
            "--temperature",
            "0.3",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.model.as_deref(), Some("gpt-4o"));
        assert_eq!(overrides.temperature, Some(0.3));
        match cli.command {
            Some(Command::Slides(args)) => {
                assert!(args.json);
                assert_eq!(args.post.industry, "finance");
                assert_eq!(args.post.headline, "Rates hold steady");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_stdin() {
        let cli = Cli::parse_from(["linkcraft", "parse", "-"]);
        assert_eq!(
            cli.command,
            Some(Command::Parse(ParseArgs {
                input: PathBuf::from("-"),
                json: false,
                normalize: false,
            }))
        );
    }
}
