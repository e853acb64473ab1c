/*
    This module generates random words from a grammar
*/

use std::fmt::Display;

use itertools::Itertools;
use rand::prelude::*;

use crate::error_handling::ErrorType;
use crate::grammar::{Grammar, Rhs, Symbol};

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    MissingStartSymbol,
    // A nonterminal that had to be expanded has no productions
    NoProductions(char),
    // The depth budget ran out on a nonterminal without terminal productions
    DepthExceeded(char),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::MissingStartSymbol => write!(f, "The grammar has no start symbol"),
            GenerateErrorType::NoProductions(nonterminal) => write!(f, "No productions for nonterminal `{}`", nonterminal),
            GenerateErrorType::DepthExceeded(nonterminal) => write!(f, "Ran out of depth while expanding `{}`", nonterminal),
        }
    }
}

pub type GenResult = Result<String, GenerateErrorType>;

/// Generates a random word derivable from the start symbol. Below
/// `max_depth` nested productions only terminal productions are chosen, so
/// a word has at most `2^max_depth` symbols.
pub fn generate<R: Rng + ?Sized>(grammar: &Grammar, rng: &mut R, max_depth: usize) -> GenResult {
    let start = grammar.start_symbol().ok_or(GenerateErrorType::MissingStartSymbol)?;
    generate_from(grammar, start, rng, max_depth)
}

// Generates a word in the given grammar starting with the given nonterminal
pub fn generate_from<R: Rng + ?Sized>(grammar: &Grammar, nonterminal: char, rng: &mut R, max_depth: usize) -> GenResult {
    let mut word = String::new();
    generate_symbol(Symbol::Nonterminal(nonterminal), grammar, rng, max_depth, &mut word)?;
    Ok(word)
}

fn choose_production<R: Rng + ?Sized>(grammar: &Grammar, nonterminal: char, rng: &mut R, depth_left: usize) -> Result<Rhs, GenerateErrorType> {
    let productions = grammar.productions(nonterminal);
    if productions.is_empty() {
        return Err(GenerateErrorType::NoProductions(nonterminal));
    }

    if depth_left > 0 {
        return productions.choose(rng).copied().ok_or(GenerateErrorType::NoProductions(nonterminal));
    }

    productions.iter()
        .copied()
        .filter(|rhs| matches!(rhs, Rhs::Terminal(_)))
        .collect_vec()
        .choose(rng)
        .copied()
        .ok_or(GenerateErrorType::DepthExceeded(nonterminal))
}

fn generate_symbol<R: Rng + ?Sized>(symbol: Symbol, grammar: &Grammar, rng: &mut R, depth_left: usize, word: &mut String) -> Result<(), GenerateErrorType> {
    let nonterminal = match symbol {
        Symbol::Terminal(t) => {
            word.push(t);
            return Ok(());
        }
        Symbol::Nonterminal(n) => n,
    };

    match choose_production(grammar, nonterminal, rng, depth_left)? {
        Rhs::Terminal(t) => generate_symbol(Symbol::Terminal(t), grammar, rng, depth_left, word),
        Rhs::Pair(left, right) => {
            generate_symbol(Symbol::Nonterminal(left), grammar, rng, depth_left - 1, word)?;
            generate_symbol(Symbol::Nonterminal(right), grammar, rng, depth_left - 1, word)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rand::rngs::StdRng;

    use super::*;
    use crate::grammar::tests::toy_grammar;
    use crate::parser::{parse_file, LoadOptions};
    use crate::recognizer::is_derived;

    fn textbook_grammar() -> Grammar {
        parse_file(Path::new("example_data/textbook.cnf"), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn generate_toy_word() {
        let grammar = toy_grammar();
        let mut rng = StdRng::seed_from_u64(7);
        for depth in 1..5 {
            assert_eq!(generate(&grammar, &mut rng, depth), Ok("ab".to_string()));
        }
    }

    #[test]
    fn generated_words_are_derived() {
        let grammar = textbook_grammar();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let word = generate(&grammar, &mut rng, 5).unwrap();
            assert_eq!(is_derived(&grammar, &word), Ok(true), "seed {seed}: {word}");
        }
    }

    #[test]
    fn generate_from_other_nonterminal() {
        let mut grammar = textbook_grammar();
        let mut rng = StdRng::seed_from_u64(3);
        let words = (0..20).map(|_| generate_from(&grammar, 'A', &mut rng, 4).unwrap()).collect_vec();

        grammar.set_start_symbol('A').unwrap();
        for word in words {
            assert_eq!(is_derived(&grammar, &word), Ok(true), "{word}");
        }
    }

    #[test]
    fn generate_failures() {
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(generate(&Grammar::new(), &mut rng, 4), Err(GenerateErrorType::MissingStartSymbol));

        // S -> AB only, so it cannot stop at depth 0
        assert_eq!(generate(&toy_grammar(), &mut rng, 0), Err(GenerateErrorType::DepthExceeded('S')));

        let mut grammar = Grammar::new();
        grammar.add_nonterminal('S').unwrap();
        grammar.set_start_symbol('S').unwrap();
        assert_eq!(generate(&grammar, &mut rng, 4), Err(GenerateErrorType::NoProductions('S')));
    }
}
