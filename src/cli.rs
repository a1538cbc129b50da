use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "improvement-report",
    version,
    about = "Detect, validate and keep a history of code improvement reports"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "IMPROVEMENT_REPORT_HOME",
        help = "Data directory (default: ~/.improvement-report)"
    )]
    pub home: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "More log output (-v, -vv)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect improvements from a research-results JSON file
    Detect {
        #[arg(long, short)]
        input: PathBuf,
        #[arg(long, short, help = "Write the Markdown report here instead of stdout")]
        output: Option<PathBuf>,
        #[arg(long, help = "Also store the report in the history")]
        save: bool,
    },
    /// Check a Markdown report's structure
    Validate { file: PathBuf },
    /// Parse a Markdown report and print a summary
    Show { file: PathBuf },
    /// Parse a Markdown report and store it in the history
    Import { file: PathBuf },
    /// List recently stored reports
    Recent {
        #[arg(long, short, default_value_t = 10)]
        limit: i64,
    },
    /// Fuzzy-search stored improvements
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, short, default_value_t = 20)]
        limit: usize,
        #[arg(long, help = "Match the query as a literal substring")]
        exact: bool,
    },
    /// Render a stored report back to Markdown
    Export {
        id: i64,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete a stored report
    Delete { id: i64 },
    /// Show history statistics
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_detect() {
        let cli = Cli::try_parse_from([
            "improvement-report",
            "-vv",
            "detect",
            "--input",
            "results.json",
            "--save",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Detect { input, output, save } => {
                assert_eq!(input, PathBuf::from("results.json"));
                assert!(output.is_none());
                assert!(save);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_joins_words() {
        let cli =
            Cli::try_parse_from(["improvement-report", "--json", "search", "error", "handling"])
                .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Search {
                query,
                limit,
                exact,
            } => {
                assert_eq!(query, vec!["error", "handling"]);
                assert_eq!(limit, 20);
                assert!(!exact);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
