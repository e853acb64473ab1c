use itertools::Itertools;

use super::{LoadErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Defines,
    Or,
    Symbol(char)
}

pub fn lex_defines(line: &mut impl Iterator<Item = char>) -> Result<Token> {
    let text: String = line.take(3).collect();
    if text != "::=" {
        return Err(LoadErrorType::IncompleteDefines);
    }

    Ok(Token::Defines)
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == ':' {
            tokens.push(lex_defines(&mut line_chars)?);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if c.is_whitespace() {
            line_chars.peeking_take_while(|c| c.is_whitespace()).for_each(drop);
        } else {
            line_chars.next();
            tokens.push(Token::Symbol(c));
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_normal_defines() {
        let lines = vec![
            "::= AB",
            "::=a",
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Token::Defines, " AB"),
            (Token::Defines, "a"),
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars();
            assert_eq!(lex_defines(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_incomplete_defines() {
        for line in [":", "::", ":= a", ":::", "= a"] {
            let mut chars = line.chars();
            assert_eq!(lex_defines(&mut chars).unwrap_err(), LoadErrorType::IncompleteDefines);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S ::= AB | BC",
            "A::=BA|a",
            "  C ::=   A B  ",
        ];
        let answers = vec![
            vec![
                Token::Symbol('S'),
                Token::Defines,
                Token::Symbol('A'),
                Token::Symbol('B'),
                Token::Or,
                Token::Symbol('B'),
                Token::Symbol('C'),
            ],
            vec![
                Token::Symbol('A'),
                Token::Defines,
                Token::Symbol('B'),
                Token::Symbol('A'),
                Token::Or,
                Token::Symbol('a'),
            ],
            vec![
                Token::Symbol('C'),
                Token::Defines,
                Token::Symbol('A'),
                Token::Symbol('B'),
            ],
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }

    #[test]
    fn lex_malformed_line() {
        assert_eq!(lex_line("S := AB"), Err(LoadErrorType::IncompleteDefines));
        assert_eq!(lex_line("S ::= A:B"), Err(LoadErrorType::IncompleteDefines));
    }
}
