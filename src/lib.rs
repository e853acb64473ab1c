/*
    Membership testing for grammars in Chomsky normal form
*/

pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod recognizer;

pub use grammar::{Grammar, GrammarErrorType, Rhs, Symbol};
pub use recognizer::{algorithm_state_to_string, build_table, is_derived, DerivabilityTable};
