mod cli;

use std::process::ExitCode;

use clap::Parser;
use cyk::{generator, parser, recognizer, Grammar, GrammarErrorType};
use log::{info, LevelFilter};
use rand::thread_rng;

use cli::Cli;

fn init_logging(level: LevelFilter) {
    let result = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    if let Err(e) = result {
        eprintln!("Could not start logging: {}", e);
    }
}

// The verdict for `word`, followed by its table when `show_table` is set.
// Both come from the same table.
fn answer_word(grammar: &Grammar, word: &str, show_table: bool) -> Result<String, GrammarErrorType> {
    let table = recognizer::build_table(grammar, word)?;
    let start = grammar.start_symbol().ok_or(GrammarErrorType::MissingStartSymbol)?;

    let verdict = if table.accepts(start) { "accepted" } else { "rejected" };
    let mut answer = format!("{}: {}\n", word, verdict);
    if show_table {
        answer.push_str(&table.to_string());
    }
    Ok(answer)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let grammar = match parser::parse_file(&cli.file, &cli.load_options()) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} nonterminals and {} terminals from {}",
        grammar.nonterminals().len(), grammar.terminals().len(), cli.file.display());

    if cli.words.is_empty() && cli.generate.is_none() {
        print!("{}", grammar);
        return ExitCode::SUCCESS;
    }

    let mut failed = false;

    for word in &cli.words {
        match answer_word(&grammar, word, cli.table) {
            Ok(answer) => print!("{}", answer),
            Err(e) => {
                eprintln!("{}: {}", word, e);
                failed = true;
            }
        }
    }

    for _ in 0..cli.generate.unwrap_or(0) {
        match generator::generate(&grammar, &mut thread_rng(), cli.max_depth) {
            Ok(word) => println!("{}", word),
            Err(e) => {
                eprintln!("{}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn toy_grammar() -> Grammar {
        parser::parse_file(Path::new("example_data/toy.cnf"), &parser::LoadOptions::default()).unwrap()
    }

    #[test]
    fn answer_words() {
        let grammar = toy_grammar();
        assert_eq!(answer_word(&grammar, "ab", false), Ok("ab: accepted\n".to_string()));
        assert_eq!(answer_word(&grammar, "ba", false), Ok("ba: rejected\n".to_string()));
        assert_eq!(answer_word(&grammar, "", false), Err(GrammarErrorType::EmptyWord));
        assert_eq!(answer_word(&grammar, "abc", true), Err(GrammarErrorType::UnknownTerminal('c')));
    }

    #[test]
    fn answer_with_table() {
        let grammar = toy_grammar();
        assert_eq!(answer_word(&grammar, "ab", true), Ok("ab: accepted\n[A][B]\n[S]\n".to_string()));
        assert_eq!(answer_word(&grammar, "ba", true), Ok("ba: rejected\n[B][A]\n[-]\n".to_string()));

        // The verdict and the top cell of the table always agree
        for word in ["a", "ab", "ba", "abab", "bb"] {
            let answer = answer_word(&grammar, word, true).unwrap();
            let accepted = answer.lines().next().unwrap().ends_with("accepted");
            assert_eq!(accepted, answer.lines().last().unwrap().contains('S'), "{answer}");
        }
    }
}
