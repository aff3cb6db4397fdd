//! Recursive-descent parser for filter expressions.
//!
//! ```text
//! expr       := and_expr ( OR and_expr )*
//! and_expr   := comparison ( AND comparison )*
//! comparison := "(" expr ")" | field operator literal
//! ```
//!
//! `AND` binds tighter than `OR`; both are left-associative.

use crate::{Filter, GroupOperator, Operator, QueryError};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    OpenParen,
    CloseParen,
    Symbol(&'static str),
    Word(String),
    Quoted(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Symbol(s) => write!(f, "{}", s),
            Token::Word(w) => write!(f, "{}", w),
            Token::Quoted(q) => write!(f, "\"{}\"", q),
        }
    }
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn is_field_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_char(c: char) -> bool {
    is_field_char(c) || matches!(c, '.' | '-' | '/' | ':')
}

fn tokenize(input: &str) -> Result<Vec<Spanned>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '<' | '>' | '=' | '!' | '&' | '|' => {
                let next = chars.peek().map(|(_, n)| *n);
                let symbol = match (c, next) {
                    ('<', Some('=')) => "<=",
                    ('>', Some('=')) => ">=",
                    ('=', Some('=')) => "==",
                    ('!', Some('=')) => "!=",
                    ('&', Some('&')) => "&&",
                    ('|', Some('|')) => "||",
                    ('<', _) => "<",
                    ('>', _) => ">",
                    _ => {
                        return Err(QueryError::parse(format!(
                            "unexpected character '{}' at position {}",
                            c, offset
                        )))
                    }
                };
                if symbol.len() == 2 {
                    chars.next();
                }
                Token::Symbol(symbol)
            }
            '"' | '\'' => {
                let mut literal = String::new();
                let mut terminated = false;
                for (_, n) in chars.by_ref() {
                    if n == c {
                        terminated = true;
                        break;
                    }
                    literal.push(n);
                }
                if !terminated {
                    return Err(QueryError::parse(format!(
                        "unterminated quoted literal starting at position {}",
                        offset
                    )));
                }
                Token::Quoted(literal)
            }
            c if is_word_char(c) => {
                let mut word = c.to_string();
                while let Some((_, n)) = chars.peek() {
                    if !is_word_char(*n) {
                        break;
                    }
                    word.push(*n);
                    chars.next();
                }
                Token::Word(word)
            }
            other => {
                return Err(QueryError::parse(format!(
                    "unexpected character '{}' at position {}",
                    other, offset
                )))
            }
        };
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(found: Option<&Spanned>, expected: &str) -> QueryError {
        match found {
            Some(spanned) => QueryError::parse(format!(
                "expected {} but found '{}' at position {}",
                expected, spanned.token, spanned.offset
            )),
            None => QueryError::parse(format!("expected {} but found end of input", expected)),
        }
    }

    fn peek_group_operator(&self) -> Option<GroupOperator> {
        match &self.peek()?.token {
            Token::Symbol(s) => GroupOperator::from_str(s).ok(),
            Token::Word(w) => GroupOperator::from_str(w).ok(),
            _ => None,
        }
    }

    fn parse_expression(&mut self) -> Result<Filter, QueryError> {
        let filter = self.parse_or()?;
        match self.peek() {
            None => Ok(filter),
            found => Err(Self::unexpected(found, "AND, OR or end of input")),
        }
    }

    fn parse_or(&mut self) -> Result<Filter, QueryError> {
        let mut left = self.parse_and()?;
        while self.peek_group_operator() == Some(GroupOperator::Or) {
            self.next();
            let right = self.parse_and()?;
            left = Filter::group(left, GroupOperator::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Filter, QueryError> {
        let mut left = self.parse_atom()?;
        while self.peek_group_operator() == Some(GroupOperator::And) {
            self.next();
            let right = self.parse_atom()?;
            left = Filter::group(left, GroupOperator::And, right);
        }
        Ok(left)
    }

    fn parse_atom(&mut self) -> Result<Filter, QueryError> {
        if matches!(self.peek(), Some(Spanned { token: Token::OpenParen, .. })) {
            self.next();
            let inner = self.parse_or()?;
            return match self.next() {
                Some(Spanned {
                    token: Token::CloseParen,
                    ..
                }) => Ok(inner),
                found => Err(Self::unexpected(found.as_ref(), "')'")),
            };
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Filter, QueryError> {
        let field = match self.next() {
            Some(Spanned {
                token: Token::Word(word),
                ..
            }) if word.chars().all(is_field_char) => word,
            found => return Err(Self::unexpected(found.as_ref(), "a field name")),
        };

        let operator = match self.next() {
            Some(Spanned {
                token: Token::Symbol(symbol),
                ..
            }) if Operator::from_str(symbol).is_ok() => Operator::from_str(symbol)?,
            Some(Spanned {
                token: Token::Word(word),
                ..
            }) if word == "like" => Operator::Like,
            found => {
                let expected = format!("one of [{}]", Operator::supported().join(", "));
                return Err(Self::unexpected(found.as_ref(), &expected));
            }
        };

        let condition = match self.next() {
            Some(Spanned {
                token: Token::Word(literal) | Token::Quoted(literal),
                ..
            }) => literal,
            found => return Err(Self::unexpected(found.as_ref(), "a value")),
        };

        Ok(Filter::Comparison {
            field,
            operator,
            condition,
        })
    }
}

/// Parses a filter string such as `(is_hidden == true or path like /tmp/test_) && size >= 100`.
pub fn parse(raw_filter: &str) -> Result<Filter, QueryError> {
    let tokens = tokenize(raw_filter)?;
    let filter = Parser { tokens, pos: 0 }.parse_expression()?;
    debug!("Parsed filter [{}] as [{}]", raw_filter, filter);
    Ok(filter)
}

impl FromStr for Filter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
