use std::collections::HashSet;

use super::LoadErrorType::UndefinedNonterminal;
use super::{FileResult, LoadError, LoadErrors, Rule};

fn get_alternative_undefined_symbols(alternative: &str, rule: &Rule, defined: &HashSet<char>) -> LoadErrors {
    // Only pairs name nonterminals. Single symbols are terminals, and every
    // other length is rejected later by the grammar itself.
    if alternative.chars().count() != 2 {
        return Vec::new();
    }

    alternative.chars()
        .filter(|symbol| !defined.contains(symbol))
        .map(|symbol| LoadError::at(rule.location.to_owned(), UndefinedNonterminal(symbol)))
        .collect()
}

fn get_undefined_symbols(rules: &[Rule], defined: &HashSet<char>) -> LoadErrors {
    // Get the undefined nonterminals in each alternative, while flattening
    // into all the undefined nonterminals in the file
    rules.iter()
        .flat_map(|rule| rule.alternatives.iter().map(move |alternative| (rule, alternative)))
        .flat_map(|(rule, alternative)| get_alternative_undefined_symbols(alternative, rule, defined))
        .collect()
}

pub fn verify_rules(rules: &[Rule]) -> FileResult<()> {
    let defined: HashSet<char> = rules.iter().map(|rule| rule.symbol).collect();
    let errors = get_undefined_symbols(rules, &defined);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::error_handling::Location;

    fn rule(symbol: char, alternatives: &[&str], line: usize) -> Rule {
        Rule {
            symbol,
            alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
            location: Location::line(Path::new("verify.cnf"), line)
        }
    }

    #[test]
    fn verify_defined_rules() {
        let rules = vec![
            rule('S', &["AB", "a"], 1),
            rule('A', &["AA", "a"], 2),
            rule('B', &["b"], 3),
        ];
        assert_eq!(verify_rules(&rules), Ok(()));
    }

    #[test]
    fn verify_undefined_rules() {
        let rules = vec![
            rule('S', &["AX", "a"], 1),
            rule('A', &["YZ"], 2),
            // Not a pair, so left to the grammar
            rule('B', &["Q", "QQQ"], 3),
        ];

        let errors = verify_rules(&rules).unwrap_err();
        assert_eq!(errors, vec![
            LoadError::at(Location::line(Path::new("verify.cnf"), 1), UndefinedNonterminal('X')),
            LoadError::at(Location::line(Path::new("verify.cnf"), 2), UndefinedNonterminal('Y')),
            LoadError::at(Location::line(Path::new("verify.cnf"), 2), UndefinedNonterminal('Z')),
        ]);
    }
}
