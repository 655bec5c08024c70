//! Boolean keyword query parsing and evaluation.
//!
//! Queries combine bare words and quoted phrases with `AND`, `OR`, `NOT`
//! (case-insensitive) and parentheses. `NOT` binds tightest, then `AND`,
//! then `OR`; adjacent terms are an implicit `AND`. A term matches a file
//! iff it occurs case-insensitively as a substring of the file's content.

use thiserror::Error;

/// Errors raised while validating a query expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty query")]
    Empty,

    #[error("empty search term")]
    EmptyTerm,

    #[error("unterminated quoted phrase")]
    UnterminatedPhrase,

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("operator '{0}' is missing an operand")]
    DanglingOperator(String),
}

/// Parsed query expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Literal term, stored lowercased.
    Term(String),
    Not(Box<Query>),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
}

impl Query {
    /// Evaluate this query against a file's content.
    pub fn matches(&self, content: &str) -> bool {
        self.eval(&content.to_lowercase())
    }

    fn eval(&self, content_lower: &str) -> bool {
        match self {
            Query::Term(term) => content_lower.contains(term.as_str()),
            Query::Not(inner) => !inner.eval(content_lower),
            Query::And(lhs, rhs) => lhs.eval(content_lower) && rhs.eval(content_lower),
            Query::Or(lhs, rhs) => lhs.eval(content_lower) || rhs.eval(content_lower),
        }
    }
}

/// Parse a query expression into a [`Query`] tree.
///
/// Validation happens entirely here; a malformed expression never reaches
/// file scanning.
pub fn parse(input: &str) -> Result<Query, QueryError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(QueryError::Empty);
    }

    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
    };
    let query = parser.parse_or()?;
    match parser.tokens.next() {
        None => Ok(query),
        // The only token parse_or can leave behind is a stray ')'
        Some(Token::RParen) => Err(QueryError::UnbalancedParens),
        Some(token) => Err(QueryError::DanglingOperator(token.describe())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Term(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Term(t) => t.clone(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Not => "NOT".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }

    /// Whether this token can begin a primary expression.
    fn starts_operand(&self) -> bool {
        matches!(self, Token::Term(_) | Token::Not | Token::LParen)
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' => {
                chars.next();
                let mut phrase = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    phrase.push(c);
                }
                if !closed {
                    return Err(QueryError::UnterminatedPhrase);
                }
                if phrase.trim().is_empty() {
                    return Err(QueryError::EmptyTerm);
                }
                tokens.push(Token::Term(phrase.to_lowercase()));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                match word.to_uppercase().as_str() {
                    "AND" => tokens.push(Token::And),
                    "OR" => tokens.push(Token::Or),
                    "NOT" => tokens.push(Token::Not),
                    _ => tokens.push(Token::Term(word.to_lowercase())),
                }
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn parse_or(&mut self) -> Result<Query, QueryError> {
        let mut lhs = self.parse_and()?;
        while self.tokens.peek() == Some(&Token::Or) {
            self.tokens.next();
            let rhs = self.parse_and()?;
            lhs = Query::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Query, QueryError> {
        let mut lhs = self.parse_not()?;
        loop {
            match self.tokens.peek() {
                Some(Token::And) => {
                    self.tokens.next();
                    let rhs = self.parse_not()?;
                    lhs = Query::And(Box::new(lhs), Box::new(rhs));
                }
                // Adjacent operands without an operator are an implicit AND
                Some(token) if token.starts_operand() => {
                    let rhs = self.parse_not()?;
                    lhs = Query::And(Box::new(lhs), Box::new(rhs));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_not(&mut self) -> Result<Query, QueryError> {
        if self.tokens.peek() == Some(&Token::Not) {
            self.tokens.next();
            let inner = self.parse_not()?;
            return Ok(Query::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Query, QueryError> {
        match self.tokens.next() {
            Some(Token::Term(term)) => Ok(Query::Term(term)),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.tokens.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(QueryError::UnbalancedParens),
                }
            }
            Some(token @ (Token::And | Token::Or)) => {
                Err(QueryError::DanglingOperator(token.describe()))
            }
            Some(Token::RParen) => Err(QueryError::UnbalancedParens),
            Some(Token::Not) => Err(QueryError::DanglingOperator("NOT".to_string())),
            None => Err(QueryError::DanglingOperator("end of query".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(t: &str) -> Query {
        Query::Term(t.to_string())
    }

    #[test]
    fn test_single_term() {
        assert_eq!(parse("alpha").unwrap(), term("alpha"));
    }

    #[test]
    fn test_terms_are_lowercased() {
        assert_eq!(parse("Alpha").unwrap(), term("alpha"));
    }

    #[test]
    fn test_implicit_and() {
        assert_eq!(
            parse("alpha beta").unwrap(),
            Query::And(Box::new(term("alpha")), Box::new(term("beta")))
        );
    }

    #[test]
    fn test_operators_case_insensitive() {
        assert_eq!(
            parse("alpha and beta").unwrap(),
            Query::And(Box::new(term("alpha")), Box::new(term("beta")))
        );
        assert_eq!(
            parse("alpha oR beta").unwrap(),
            Query::Or(Box::new(term("alpha")), Box::new(term("beta")))
        );
    }

    #[test]
    fn test_not_binds_tighter_than_and() {
        assert_eq!(
            parse("alpha AND NOT beta").unwrap(),
            Query::And(
                Box::new(term("alpha")),
                Box::new(Query::Not(Box::new(term("beta"))))
            )
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse("alpha OR beta AND gamma").unwrap(),
            Query::Or(
                Box::new(term("alpha")),
                Box::new(Query::And(Box::new(term("beta")), Box::new(term("gamma"))))
            )
        );
    }

    #[test]
    fn test_parens_override_precedence() {
        assert_eq!(
            parse("(alpha OR beta) AND gamma").unwrap(),
            Query::And(
                Box::new(Query::Or(Box::new(term("alpha")), Box::new(term("beta")))),
                Box::new(term("gamma"))
            )
        );
    }

    #[test]
    fn test_quoted_phrase() {
        assert_eq!(
            parse(r#""alpha beta" OR gamma"#).unwrap(),
            Query::Or(Box::new(term("alpha beta")), Box::new(term("gamma")))
        );
    }

    #[test]
    fn test_double_not() {
        assert_eq!(
            parse("NOT NOT alpha").unwrap(),
            Query::Not(Box::new(Query::Not(Box::new(term("alpha")))))
        );
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse(""), Err(QueryError::Empty));
        assert_eq!(parse("   "), Err(QueryError::Empty));
    }

    #[test]
    fn test_empty_quoted_term() {
        assert_eq!(parse(r#""" AND alpha"#), Err(QueryError::EmptyTerm));
    }

    #[test]
    fn test_unterminated_phrase() {
        assert_eq!(parse(r#""alpha beta"#), Err(QueryError::UnterminatedPhrase));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert_eq!(parse("(alpha AND beta"), Err(QueryError::UnbalancedParens));
        assert_eq!(parse("alpha AND beta)"), Err(QueryError::UnbalancedParens));
        assert_eq!(parse(")alpha"), Err(QueryError::UnbalancedParens));
    }

    #[test]
    fn test_dangling_operators() {
        assert!(matches!(parse("alpha AND"), Err(QueryError::DanglingOperator(_))));
        assert!(matches!(parse("OR alpha"), Err(QueryError::DanglingOperator(_))));
        assert!(matches!(parse("NOT"), Err(QueryError::DanglingOperator(_))));
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let query = parse("Alpha").unwrap();
        assert!(query.matches("some ALPHAbetical text"));
        assert!(!query.matches("beta only"));
    }

    #[test]
    fn test_combined_queries_against_content() {
        let and_not = parse("alpha AND NOT gamma").unwrap();
        assert!(and_not.matches("alpha beta"));
        assert!(!and_not.matches("gamma"));
        assert!(!and_not.matches("alpha gamma"));

        let or = parse("alpha OR gamma").unwrap();
        assert!(or.matches("alpha beta"));
        assert!(or.matches("gamma"));
        assert!(!or.matches("delta"));
    }
}
