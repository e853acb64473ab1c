use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use cyk::parser::LoadOptions;
use log::LevelFilter;

// Words can double in length with every level of depth
pub const MAX_DEPTH: u64 = 16;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Words to test against the grammar
    pub words: Vec<String>,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<char>,

    /// Print the CYK table for every word
    #[arg(short, long)]
    pub table: bool,

    /// Amount of random words to generate
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Deepest derivation used when generating (at most 16)
    #[arg(long, value_name = "DEPTH", default_value_t = 8,
        value_parser = RangedU64ValueParser::<usize>::new().range(..=MAX_DEPTH))]
    pub max_depth: usize,

    /// Let the start symbol appear in the productions of other nonterminals
    #[arg(long)]
    pub allow_start_on_rhs: bool,

    /// Log more (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            start: self.start,
            restrict_start: !self.allow_start_on_rhs,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_arguments() {
        let cli = Cli::parse_from(["cyk", "toy.cnf", "ab", "ba", "-s", "A", "-t", "-vv", "--allow-start-on-rhs"]);
        assert_eq!(cli.file, PathBuf::from("toy.cnf"));
        assert_eq!(cli.words, vec!["ab".to_string(), "ba".to_string()]);
        assert!(cli.table);
        assert_eq!(cli.generate, None);
        assert_eq!(cli.max_depth, 8);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        assert_eq!(cli.load_options(), LoadOptions { start: Some('A'), restrict_start: false });
    }

    #[test]
    fn max_depth_is_capped() {
        let cli = Cli::parse_from(["cyk", "toy.cnf", "--max-depth", "16"]);
        assert_eq!(cli.max_depth, 16);

        assert!(Cli::try_parse_from(["cyk", "toy.cnf", "--max-depth", "17"]).is_err());
        assert!(Cli::try_parse_from(["cyk", "toy.cnf", "--max-depth", "200"]).is_err());
    }

    #[test]
    fn default_arguments() {
        let cli = Cli::parse_from(["cyk", "toy.cnf", "-n", "3"]);
        assert!(cli.words.is_empty());
        assert_eq!(cli.generate, Some(3));
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        assert_eq!(cli.load_options(), LoadOptions::default());
    }
}
