/*
    This module stores and validates grammars in Chomsky normal form
*/

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ErrorType;

// A single grammar symbol, classified by how it was registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
}

// The right-hand side of a CNF production: `A -> a` or `A -> BC`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rhs {
    Terminal(char),
    Pair(char, char),
}

impl Display for Rhs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rhs::Terminal(t) => write!(f, "{}", t),
            Rhs::Pair(left, right) => write!(f, "{}{}", left, right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GrammarErrorType {
    // The symbol is not in the lexical class of what it is registered as
    InvalidSymbolKind(Symbol),
    // The symbol is already registered as the same kind
    DuplicateSymbol(Symbol),
    UnknownNonterminal(char),
    UnknownTerminal(char),
    // A right-hand side with neither one nor two symbols
    MalformedProduction(String),
    DuplicateProduction(char, Rhs),
    // The start symbol was used inside another nonterminal's production
    StartSymbolMisuse(char),
    EmptyWord,
    MissingStartSymbol,
}

impl ErrorType for GrammarErrorType {}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::InvalidSymbolKind(Symbol::Terminal(c)) => write!(f, "`{}` is not a lowercase letter and cannot be a terminal", c),
            GrammarErrorType::InvalidSymbolKind(Symbol::Nonterminal(c)) => write!(f, "`{}` is not an uppercase letter and cannot be a nonterminal", c),
            GrammarErrorType::DuplicateSymbol(Symbol::Terminal(c)) => write!(f, "Terminal `{}` is already defined", c),
            GrammarErrorType::DuplicateSymbol(Symbol::Nonterminal(c)) => write!(f, "Nonterminal `{}` is already defined", c),
            GrammarErrorType::UnknownNonterminal(c) => write!(f, "`{}` is not a defined nonterminal", c),
            GrammarErrorType::UnknownTerminal(c) => write!(f, "`{}` is not a defined terminal", c),
            GrammarErrorType::MalformedProduction(rhs) => write!(f, "`{}` is not in Chomsky normal form (expected `a` or `BC`)", rhs),
            GrammarErrorType::DuplicateProduction(nonterminal, rhs) => write!(f, "Production `{}::={}` already exists", nonterminal, rhs),
            GrammarErrorType::StartSymbolMisuse(start) => write!(f, "Start symbol `{}` may only appear in its own productions", start),
            GrammarErrorType::EmptyWord => write!(f, "Cannot recognize the empty word"),
            GrammarErrorType::MissingStartSymbol => write!(f, "The grammar has no start symbol"),
        }
    }
}

pub type Result<T> = std::result::Result<T, GrammarErrorType>;

#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    // Both symbol lists keep registration order
    terminals: Vec<char>,
    nonterminals: Vec<char>,
    productions: HashMap<char, Vec<Rhs>>,
    start_symbol: Option<char>,
    restrict_start: bool,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::with_start_restriction(true)
    }

    /// With `restrict` off the start symbol may appear on the right-hand side
    /// of any production, as in plain CNF.
    pub fn with_start_restriction(restrict: bool) -> Self {
        Grammar {
            terminals: Vec::new(),
            nonterminals: Vec::new(),
            productions: HashMap::new(),
            start_symbol: None,
            restrict_start: restrict,
        }
    }

    pub fn add_nonterminal(&mut self, nonterminal: char) -> Result<()> {
        if !nonterminal.is_uppercase() {
            return Err(GrammarErrorType::InvalidSymbolKind(Symbol::Nonterminal(nonterminal)));
        }
        if self.is_nonterminal(nonterminal) {
            return Err(GrammarErrorType::DuplicateSymbol(Symbol::Nonterminal(nonterminal)));
        }

        self.nonterminals.push(nonterminal);
        self.productions.insert(nonterminal, Vec::new());
        Ok(())
    }

    pub fn add_terminal(&mut self, terminal: char) -> Result<()> {
        if !terminal.is_lowercase() {
            return Err(GrammarErrorType::InvalidSymbolKind(Symbol::Terminal(terminal)));
        }
        if self.is_terminal(terminal) {
            return Err(GrammarErrorType::DuplicateSymbol(Symbol::Terminal(terminal)));
        }

        self.terminals.push(terminal);
        Ok(())
    }

    pub fn set_start_symbol(&mut self, nonterminal: char) -> Result<()> {
        if !self.is_nonterminal(nonterminal) {
            return Err(GrammarErrorType::UnknownNonterminal(nonterminal));
        }

        self.start_symbol = Some(nonterminal);
        Ok(())
    }

    /// Adds `nonterminal ::= production`, where `production` is either a single
    /// terminal or two nonterminals. Nothing changes if this fails.
    pub fn add_production(&mut self, nonterminal: char, production: &str) -> Result<()> {
        if !self.is_nonterminal(nonterminal) {
            return Err(GrammarErrorType::UnknownNonterminal(nonterminal));
        }

        let symbols = production.chars().collect_vec();
        let rhs = match symbols[..] {
            [left, right] => self.check_pair(nonterminal, left, right)?,
            [terminal] => {
                if !self.is_terminal(terminal) {
                    return Err(GrammarErrorType::UnknownTerminal(terminal));
                }
                Rhs::Terminal(terminal)
            }
            _ => return Err(GrammarErrorType::MalformedProduction(production.to_string())),
        };

        let alternatives = self.productions.entry(nonterminal).or_default();
        if alternatives.contains(&rhs) {
            return Err(GrammarErrorType::DuplicateProduction(nonterminal, rhs));
        }
        alternatives.push(rhs);
        Ok(())
    }

    fn check_pair(&self, nonterminal: char, left: char, right: char) -> Result<Rhs> {
        for symbol in [left, right] {
            if !self.is_nonterminal(symbol) {
                return Err(GrammarErrorType::UnknownNonterminal(symbol));
            }
        }

        if let Some(start) = self.start_symbol {
            if self.restrict_start && nonterminal != start && (left == start || right == start) {
                return Err(GrammarErrorType::StartSymbolMisuse(start));
            }
        }

        Ok(Rhs::Pair(left, right))
    }

    // Forgets every symbol and production, but not the start symbol rule
    pub fn reset(&mut self) {
        self.terminals.clear();
        self.nonterminals.clear();
        self.productions.clear();
        self.start_symbol = None;
    }

    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[char] {
        &self.nonterminals
    }

    pub fn start_symbol(&self) -> Option<char> {
        self.start_symbol
    }

    pub fn restricts_start(&self) -> bool {
        self.restrict_start
    }

    pub fn is_terminal(&self, symbol: char) -> bool {
        self.terminals.contains(&symbol)
    }

    pub fn is_nonterminal(&self, symbol: char) -> bool {
        self.nonterminals.contains(&symbol)
    }

    pub fn classify(&self, symbol: char) -> Option<Symbol> {
        if self.is_terminal(symbol) {
            Some(Symbol::Terminal(symbol))
        } else if self.is_nonterminal(symbol) {
            Some(Symbol::Nonterminal(symbol))
        } else {
            None
        }
    }

    /// The productions of `nonterminal` in the order they were added
    pub fn productions(&self, nonterminal: char) -> &[Rhs] {
        self.productions
            .get(&nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Renders `N::=rhs1|rhs2`, or an empty string if `nonterminal` has no
    /// productions.
    pub fn productions_of(&self, nonterminal: char) -> String {
        let alternatives = self.productions(nonterminal);
        if alternatives.is_empty() {
            return String::new();
        }

        format!("{}::={}", nonterminal, alternatives.iter().join("|"))
    }

    /// One `productions_of` line per nonterminal with productions, in
    /// registration order.
    pub fn full_grammar(&self) -> String {
        self.nonterminals
            .iter()
            .map(|&nonterminal| self.productions_of(nonterminal))
            .filter(|line| !line.is_empty())
            .map(|line| line + "\n")
            .collect()
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_grammar())
    }
}
