/*
    This module loads CNF grammar files

    ; comments start with a semicolon
    S ::= AB | BC
    A ::= BA | a
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use itertools::Itertools;
use log::debug;

use crate::error_handling::*;
use crate::grammar::*;
use lexer::*;
use verifier::verify_rules;

#[derive(Debug)]
pub enum LoadErrorType {
    // The second token of a rule is not `::=`
    MissingDefines,
    // A rule has more than one `::=`
    UnexpectedDefines,
    // A `:` that does not start `::=`
    IncompleteDefines,
    // The line starts with something other than a symbol
    MissingNonterminal,
    // Nothing between two bars, or after `::=`
    EmptyAlternative,
    // A nonterminal is used but never given a rule
    UndefinedNonterminal(char),
    // Somehow a full rule body was parsed as a single alternative
    // This is a problem with cyk, not the grammar
    UnsplitAlternatives,
    // A blank line got too deep into the parser
    // This is a problem with cyk, not the grammar
    UnexpectedBlankLine,
    // The rule was well formed, but the grammar rejected it
    Grammar(GrammarErrorType),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for LoadErrorType {}

impl PartialEq for LoadErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadErrorType::FileError(a), LoadErrorType::FileError(b)) => a.kind() == b.kind(),
            (LoadErrorType::UndefinedNonterminal(a), LoadErrorType::UndefinedNonterminal(b)) => a == b,
            (LoadErrorType::Grammar(a), LoadErrorType::Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for LoadErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadErrorType::MissingDefines => write!(f, "Expected `::=` after nonterminal"),
            LoadErrorType::UnexpectedDefines => write!(f, "Unexpected `::=` encountered"),
            LoadErrorType::IncompleteDefines => write!(f, "Expected `::=`"),
            LoadErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            LoadErrorType::EmptyAlternative => write!(f, "Empty alternative (productions are `a` or `BC`)"),
            LoadErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find definition for `{}`", nonterminal),
            LoadErrorType::UnsplitAlternatives => write!(f, "Alternatives were not fully split (this is a problem with cyk, not the grammar)"),
            LoadErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with cyk, not the grammar)"),
            LoadErrorType::Grammar(e) => write!(f, "{}", e),
            LoadErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type LoadError = Error<LoadErrorType>;
pub type LoadErrors = Errors<LoadErrorType>;

pub type Result<T> = std::result::Result<T, LoadErrorType>;
pub type LineResult<T> = std::result::Result<T, LoadError>;
pub type FileResult<T> = std::result::Result<T, LoadErrors>;

// How a grammar file is turned into a grammar
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    // Defaults to the first nonterminal with a rule
    pub start: Option<char>,
    pub restrict_start: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            start: None,
            restrict_start: true,
        }
    }
}

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: char,
    alternatives: Vec<String>,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<String> {
    if tokens.is_empty() {
        return Err(LoadErrorType::EmptyAlternative);
    }

    tokens.iter().map(|t| match t {
        Token::Defines => Err(LoadErrorType::UnexpectedDefines),
        Token::Or => Err(LoadErrorType::UnsplitAlternatives),
        Token::Symbol(c) => Ok(*c),
    }).collect()
}

fn parse_alternatives(tokens: &[Token]) -> Result<Vec<String>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let symbol = match tokens.first() {
        Some(Token::Symbol(c)) => Ok(*c),
        Some(_) => Err(LoadErrorType::MissingNonterminal),
        None => Err(LoadErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Defines) {
        return Err(LoadErrorType::MissingDefines);
    }

    let alternatives = parse_alternatives(&tokens[2..])?;

    Ok(Rule {
        symbol,
        alternatives,
        location
    })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| LoadError::at(location, error))
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with(';')
}

// Returns an iterator over the rule lines of a reader, numbered from 1, with
// the io errors wrapped in LoadError. Reading stops at the first io error.
fn numbered_rule_lines<'a>(reader: impl BufRead + 'a, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    reader
        .lines()
        .take_while_inclusive(|line| line.is_ok())
        .map(move |line| line.map_err(|e| LoadError::at(Location::file(path), LoadErrorType::FileError(e))))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn parse_rules(reader: impl BufRead, path: &Path) -> FileResult<Vec<Rule>> {
    let parsed_lines = numbered_rule_lines(reader, path).map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location::line(path, num)))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(rules)
}

// Collects grammar errors against the rule that caused them
struct Builder {
    grammar: Grammar,
    errors: LoadErrors,
}

impl Builder {
    fn record(&mut self, result: crate::grammar::Result<()>, location: &Location) {
        if let Err(error) = result {
            self.errors.push(LoadError::at(location.clone(), LoadErrorType::Grammar(error)));
        }
    }

    fn finish(&mut self) -> FileResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

fn grammar_from_rules(rules: &[Rule], path: &Path, options: &LoadOptions) -> FileResult<Grammar> {
    verify_rules(rules)?;

    let mut builder = Builder {
        grammar: Grammar::with_start_restriction(options.restrict_start),
        errors: Vec::new(),
    };

    // Every symbol has to be registered before a production can use it
    for rule in rules.iter().unique_by(|rule| rule.symbol) {
        let result = builder.grammar.add_nonterminal(rule.symbol);
        builder.record(result, &rule.location);
    }

    for rule in rules {
        for alternative in &rule.alternatives {
            if let Some(terminal) = alternative.chars().exactly_one().ok().filter(|c| c.is_lowercase()) {
                if !builder.grammar.is_terminal(terminal) {
                    let result = builder.grammar.add_terminal(terminal);
                    builder.record(result, &rule.location);
                }
            }
        }
    }

    builder.finish()?;

    match (options.start, rules.first()) {
        (Some(start), _) => {
            let result = builder.grammar.set_start_symbol(start);
            builder.record(result, &Location::file(path));
        }
        (None, Some(first)) => {
            let result = builder.grammar.set_start_symbol(first.symbol);
            builder.record(result, &first.location);
        }
        (None, None) => {}
    }
    builder.finish()?;

    for rule in rules {
        for alternative in &rule.alternatives {
            let result = builder.grammar.add_production(rule.symbol, alternative);
            builder.record(result, &rule.location);
        }
    }
    builder.finish()?;

    Ok(builder.grammar)
}

/// Loads a grammar from text, reporting errors against `path`
pub fn parse_str(text: &str, path: &Path, options: &LoadOptions) -> FileResult<Grammar> {
    let rules = parse_rules(text.as_bytes(), path)?;
    debug!("Parsed {} rules from {}", rules.len(), path.display());
    grammar_from_rules(&rules, path, options)
}

pub fn parse_file(path: &Path, options: &LoadOptions) -> FileResult<Grammar> {
    let file = File::open(path)
        .map_err(|e| vec![LoadError::at(Location::file(path), LoadErrorType::FileError(e))])?;
    let rules = parse_rules(std::io::BufReader::new(file), path)?;
    debug!("Parsed {} rules from {}", rules.len(), path.display());
    grammar_from_rules(&rules, path, options)
}
