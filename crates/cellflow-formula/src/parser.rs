//! Formula tokenizer and validator
//!
//! Splits formula text into [`Token`]s and checks the grammar:
//!
//! 1. at least one token
//! 2. every span is a parenthesis, operator, variable or number
//! 3. parentheses balance, and no prefix closes more than it opens
//! 4. the formula starts with an operand or `(` and ends with an operand or `)`
//! 5. `(` and operators are followed by an operand or `(`
//! 6. operands and `)` are followed by an operator or `)`

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Operator, Token};
use cellflow_core::CellName;

/// Tokenize and validate formula text
///
/// # Example
/// ```rust
/// use cellflow_formula::tokenize;
///
/// let tokens = tokenize("(a1 + 2)").unwrap();
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[2].to_string(), "+");
///
/// assert!(tokenize("2 +").is_err());
/// ```
pub fn tokenize(formula: &str) -> FormulaResult<Vec<Token>> {
    let spanned = Tokenizer::new(formula).scan_all()?;
    validate(&spanned)?;
    Ok(spanned.into_iter().map(|(_, token)| token).collect())
}

/// A token and the byte offset where it starts
type Spanned = (usize, Token);

/// Formula tokenizer
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn scan_all(mut self) -> FormulaResult<Vec<Spanned>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek_char() else {
                return Ok(tokens);
            };
            let start = self.pos;
            let token = self.scan_token(c)?;
            tokens.push((start, token));
        }
    }

    fn scan_token(&mut self, c: char) -> FormulaResult<Token> {
        if let Some(op) = Operator::from_char(c) {
            self.advance();
            return Ok(Token::Operator(op));
        }

        match c {
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            _ if c.is_ascii_digit() || (c == '.' && self.is_digit_at(1)) => self.scan_number(),
            _ if c.is_ascii_alphabetic() => self.scan_variable(),
            _ => Err(self.invalid_from(self.pos)),
        }
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Fraction part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent, only when digits follow
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_char_at(1), Some('+' | '-'));
            let digit_offset = if signed { 2 } else { 1 };
            if self.is_digit_at(digit_offset) {
                for _ in 0..digit_offset {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];
        let value: f64 = text.parse().map_err(|_| FormulaError::InvalidToken {
            token: text.to_string(),
            position: start,
        })?;
        if !value.is_finite() {
            return Err(FormulaError::LiteralOutOfRange(text.to_string()));
        }
        Ok(Token::Number(value))
    }

    fn scan_variable(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        while self.peek_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let digits_start = self.pos;
        self.skip_digits();
        if self.pos == digits_start {
            // Letters must be followed by digits
            return Err(self.invalid_from(start));
        }

        let name = CellName::parse(&self.input[start..self.pos]).map_err(|_| {
            FormulaError::InvalidToken {
                token: self.input[start..self.pos].to_string(),
                position: start,
            }
        })?;
        Ok(Token::Variable(name))
    }

    /// Build an error for the unrecognized span starting at `start`.
    ///
    /// The span runs to the next whitespace, parenthesis or operator.
    fn invalid_from(&mut self, start: usize) -> FormulaError {
        self.pos = start;
        self.advance();
        while self
            .peek_char()
            .is_some_and(|c| !c.is_whitespace() && !is_delimiter(c))
        {
            self.advance();
        }
        FormulaError::InvalidToken {
            token: self.input[start..self.pos].to_string(),
            position: start,
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn is_digit_at(&self, offset: usize) -> bool {
        self.peek_char_at(offset).is_some_and(|c| c.is_ascii_digit())
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || Operator::from_char(c).is_some()
}

/// Check rules 1 and 3 through 6 on a classified token stream
fn validate(tokens: &[Spanned]) -> FormulaResult<()> {
    let (Some((_, first)), Some((_, last))) = (tokens.first(), tokens.last()) else {
        return Err(FormulaError::Empty);
    };

    let mut open = 0usize;
    for (position, token) in tokens {
        match token {
            Token::LeftParen => open += 1,
            Token::RightParen => {
                open = open
                    .checked_sub(1)
                    .ok_or(FormulaError::UnbalancedClose {
                        position: *position,
                    })?;
            }
            _ => {}
        }
    }
    if open > 0 {
        return Err(FormulaError::UnclosedParen { missing: open });
    }

    if !first.starts_operand() {
        return Err(FormulaError::InvalidStart(first.to_string()));
    }
    if !(last.is_operand() || matches!(last, Token::RightParen)) {
        return Err(FormulaError::InvalidEnd(last.to_string()));
    }

    for pair in tokens.windows(2) {
        let (current, next) = (&pair[0].1, &pair[1].1);
        let follows_operand = current.is_operand() || matches!(current, Token::RightParen);
        if follows_operand && !next.continues_operand() {
            return Err(FormulaError::ExpectedOperator {
                after: current.to_string(),
                found: next.to_string(),
            });
        }
        if !follows_operand && !next.starts_operand() {
            return Err(FormulaError::ExpectedOperand {
                after: current.to_string(),
                found: next.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canonical(formula: &str) -> Vec<String> {
        tokenize(formula)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_tokenize_number() {
        assert_eq!(tokenize("42").unwrap(), vec![Token::Number(42.0)]);
        assert_eq!(tokenize("4.5").unwrap(), vec![Token::Number(4.5)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(5.0)]);
        assert_eq!(tokenize("6e5").unwrap(), vec![Token::Number(600000.0)]);
        assert_eq!(tokenize("7E-4").unwrap(), vec![Token::Number(0.0007)]);
        assert_eq!(tokenize("2e+3").unwrap(), vec![Token::Number(2000.0)]);
    }

    #[test]
    fn test_tokenize_variable() {
        assert_eq!(
            tokenize("ab12").unwrap(),
            vec![Token::Variable(CellName::parse("AB12").unwrap())]
        );
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            canonical(" ( a1+2 ) *  3.0/x7 - 1 "),
            vec!["(", "A1", "+", "2", ")", "*", "3", "/", "X7", "-", "1"]
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(tokenize(""), Err(FormulaError::Empty));
        assert_eq!(tokenize("  \t\n"), Err(FormulaError::Empty));
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(
            tokenize("2 $x"),
            Err(FormulaError::InvalidToken {
                token: "$x".into(),
                position: 2
            })
        );
        // Letters without digits are not a variable
        assert_eq!(
            tokenize("A + 1"),
            Err(FormulaError::InvalidToken {
                token: "A".into(),
                position: 0
            })
        );
        // Dangling exponent
        assert_eq!(
            tokenize("5e"),
            Err(FormulaError::InvalidToken {
                token: "e".into(),
                position: 1
            })
        );
        assert!(matches!(
            tokenize("1 ^ 2"),
            Err(FormulaError::InvalidToken { .. })
        ));
        assert!(matches!(
            tokenize("1 % 2"),
            Err(FormulaError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_literal_out_of_range() {
        assert_eq!(
            tokenize("1e400"),
            Err(FormulaError::LiteralOutOfRange("1e400".into()))
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            tokenize("(1))"),
            Err(FormulaError::UnbalancedClose { position: 3 })
        );
        assert_eq!(
            tokenize(")1("),
            Err(FormulaError::UnbalancedClose { position: 0 })
        );
        assert_eq!(
            tokenize("((1)"),
            Err(FormulaError::UnclosedParen { missing: 1 })
        );
    }

    #[test]
    fn test_first_and_last_token() {
        assert_eq!(tokenize("+1"), Err(FormulaError::InvalidStart("+".into())));
        // Unary minus is not supported
        assert_eq!(tokenize("-1"), Err(FormulaError::InvalidStart("-".into())));
        assert_eq!(tokenize("1*"), Err(FormulaError::InvalidEnd("*".into())));
    }

    #[test]
    fn test_operand_following_rule() {
        assert_eq!(
            tokenize("1+*2"),
            Err(FormulaError::ExpectedOperand {
                after: "+".into(),
                found: "*".into()
            })
        );
        assert_eq!(
            tokenize("()"),
            Err(FormulaError::ExpectedOperand {
                after: "(".into(),
                found: ")".into()
            })
        );
        assert_eq!(
            tokenize("1-(-2)"),
            Err(FormulaError::ExpectedOperand {
                after: "(".into(),
                found: "-".into()
            })
        );
    }

    #[test]
    fn test_operator_following_rule() {
        // No implicit multiplication
        assert_eq!(
            tokenize("2(3)"),
            Err(FormulaError::ExpectedOperator {
                after: "2".into(),
                found: "(".into()
            })
        );
        assert_eq!(
            tokenize("a1 b2"),
            Err(FormulaError::ExpectedOperator {
                after: "A1".into(),
                found: "B2".into()
            })
        );
        assert_eq!(
            tokenize("(1)(2)"),
            Err(FormulaError::ExpectedOperator {
                after: ")".into(),
                found: "(".into()
            })
        );
        // A second decimal point starts a new literal
        assert!(matches!(
            tokenize("1.2.3"),
            Err(FormulaError::ExpectedOperator { .. })
        ));
    }
}
