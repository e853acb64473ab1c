/*
    This module decides whether a word belongs to a grammar's language using
    the Cocke-Younger-Kasami algorithm
*/

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use itertools::Itertools;
use log::{debug, trace};

use crate::grammar::*;

// The nonterminals that derive one span of the word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell(BTreeSet<char>);

impl Cell {
    pub fn contains(&self, nonterminal: char) -> bool {
        self.0.contains(&nonterminal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> + Clone + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<char> for Cell {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Cell(iter.into_iter().collect())
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "[-]")
        } else {
            write!(f, "[{}]", self.symbols().collect::<String>())
        }
    }
}

/// The triangular CYK table for one word. Row `r` holds the cells for spans
/// of length `r + 1`, one per start position.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivabilityTable {
    rows: Vec<Vec<Cell>>,
}

impl DerivabilityTable {
    // Length of the word the table was built for
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The cell for the span `[start, start + length)`
    pub fn cell(&self, start: usize, length: usize) -> Option<&Cell> {
        self.rows.get(length.checked_sub(1)?)?.get(start)
    }

    // Whether `symbol` derives the whole word
    pub fn accepts(&self, symbol: char) -> bool {
        self.cell(0, self.len()).is_some_and(|cell| cell.contains(symbol))
    }
}

impl Display for DerivabilityTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row.iter().join(""))?;
        }
        Ok(())
    }
}

// Checks everything that has to hold before any table work is done
fn check_word(grammar: &Grammar, word: &str) -> Result<Vec<char>> {
    if word.is_empty() {
        return Err(GrammarErrorType::EmptyWord);
    }
    if grammar.start_symbol().is_none() {
        return Err(GrammarErrorType::MissingStartSymbol);
    }

    word.chars()
        .map(|c| match grammar.is_terminal(c) {
            true => Ok(c),
            false => Err(GrammarErrorType::UnknownTerminal(c)),
        })
        .collect()
}

// Maps each pair `BC` to every `A` with the production `A -> BC`
fn pair_heads(grammar: &Grammar) -> HashMap<(char, char), Vec<char>> {
    let mut heads = HashMap::<(char, char), Vec<char>>::new();
    for &nonterminal in grammar.nonterminals() {
        for rhs in grammar.productions(nonterminal) {
            if let Rhs::Pair(left, right) = *rhs {
                heads.entry((left, right)).or_default().push(nonterminal);
            }
        }
    }
    heads
}

fn terminal_cell(grammar: &Grammar, terminal: char) -> Cell {
    grammar.nonterminals()
        .iter()
        .copied()
        .filter(|&nonterminal| grammar.productions(nonterminal).contains(&Rhs::Terminal(terminal)))
        .collect()
}

pub fn build_table(grammar: &Grammar, word: &str) -> Result<DerivabilityTable> {
    let symbols = check_word(grammar, word)?;
    let n = symbols.len();
    debug!("Building a {n}x{n} CYK table for `{word}`");

    let heads = pair_heads(grammar);
    let mut rows = Vec::with_capacity(n);
    rows.push(symbols.iter().map(|&t| terminal_cell(grammar, t)).collect_vec());

    for length in 2..=n {
        let row = (0..=n - length).map(|start| {
            let mut cell = Cell::default();
            for split in 1..length {
                let left = &rows[split - 1][start];
                let right = &rows[length - split - 1][start + split];
                for pair in left.symbols().cartesian_product(right.symbols()) {
                    if let Some(found) = heads.get(&pair) {
                        cell.0.extend(found.iter().copied());
                    }
                }
            }
            trace!("span [{}, {}) -> {}", start, start + length, cell);
            cell
        }).collect_vec();
        rows.push(row);
    }

    Ok(DerivabilityTable { rows })
}

pub fn is_derived(grammar: &Grammar, word: &str) -> Result<bool> {
    let table = build_table(grammar, word)?;
    let start = grammar.start_symbol().ok_or(GrammarErrorType::MissingStartSymbol)?;
    Ok(table.accepts(start))
}

/// Renders every cell of the table for `word`, shortest spans first
pub fn algorithm_state_to_string(grammar: &Grammar, word: &str) -> Result<String> {
    Ok(build_table(grammar, word)?.to_string())
}
