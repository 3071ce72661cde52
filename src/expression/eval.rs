//! Expression tokenizer and evaluator.
//!
//! Hand-rolled: tokenize to a flat token list, then walk it with a
//! recursive descent evaluator. The grammar is deliberately small — this is
//! a computed-value language, not a query language:
//!
//! ```text
//! expr    := unary (('+' | '-') unary)*
//! unary   := '-' primary | primary
//! primary := literal | '#'ident | ident ('.' ident)* | '(' expr ')'
//! ```

use crate::mapping::PropertyHolder;
use crate::model::Value;
use crate::{Error, Result};
use super::EvaluationContext;

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    kind: TokenKind,
    pos: usize,
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    // Literals
    Integer, Float, StringLiteral,
    True, False, Null,

    // Identifiers and context variables
    Ident, Var,

    // Punctuation
    Plus, Minus, Dot, LParen, RParen,

    Eof,
}

fn keyword_or_ident(ident: &str) -> TokenKind {
    match ident {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Ident,
    }
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token { kind, pos, text: text.into() }
}

fn lex_error(pos: usize, message: impl Into<String>) -> Error {
    Error::ExpressionError { position: pos, message: message.into() }
}

/// Tokenize an expression string.
pub(super) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => { chars.next(); }

            // String literals
            '\'' | '"' => {
                let quote = ch;
                chars.next();
                let start = pos;
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => {
                            if let Some((_, escaped)) = chars.next() {
                                match escaped {
                                    'n' => s.push('\n'),
                                    't' => s.push('\t'),
                                    '\\' => s.push('\\'),
                                    c if c == quote => s.push(c),
                                    c => { s.push('\\'); s.push(c); }
                                }
                            }
                        }
                        Some((_, c)) if c == quote => {
                            tokens.push(Token { kind: TokenKind::StringLiteral, pos: start, text: s });
                            break;
                        }
                        Some((_, c)) => s.push(c),
                        None => return Err(lex_error(start, "Unterminated string literal")),
                    }
                }
            }

            // Numbers
            c if c.is_ascii_digit() => {
                let start = pos;
                let mut num = String::new();
                let mut is_float = false;
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() {
                        num.push(c);
                        chars.next();
                    } else if c == '.' && !is_float {
                        is_float = true;
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: if is_float { TokenKind::Float } else { TokenKind::Integer },
                    pos: start,
                    text: num,
                });
            }

            // Context variable: #name
            '#' => {
                let start = pos;
                chars.next();
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(lex_error(start, "Expected variable name after '#'"));
                }
                tokens.push(Token { kind: TokenKind::Var, pos: start, text: name });
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => {
                let start = pos;
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let kind = keyword_or_ident(&ident);
                tokens.push(Token { kind, pos: start, text: ident });
            }

            // Punctuation
            '+' => { chars.next(); tokens.push(punct(TokenKind::Plus, pos, "+")); }
            '-' => { chars.next(); tokens.push(punct(TokenKind::Minus, pos, "-")); }
            '.' => { chars.next(); tokens.push(punct(TokenKind::Dot, pos, ".")); }
            '(' => { chars.next(); tokens.push(punct(TokenKind::LParen, pos, "(")); }
            ')' => { chars.next(); tokens.push(punct(TokenKind::RParen, pos, ")")); }

            c => return Err(lex_error(pos, format!("Unexpected character '{c}'"))),
        }
    }

    tokens.push(Token { kind: TokenKind::Eof, pos: input.len(), text: String::new() });
    Ok(tokens)
}

// ============================================================================
// Evaluator — recursive descent over the token list
// ============================================================================

struct Evaluator<'t, 'a> {
    tokens: &'t [Token],
    pos: usize,
    root: &'a dyn PropertyHolder,
    context: &'a EvaluationContext,
}

/// Evaluate a token stream against a bound instance and variable context.
pub(super) fn evaluate(
    tokens: &[Token],
    root: &dyn PropertyHolder,
    context: &EvaluationContext,
) -> Result<Value> {
    let mut ev = Evaluator { tokens, pos: 0, root, context };
    let value = ev.expr()?;
    ev.expect(TokenKind::Eof)?;
    Ok(value)
}

impl Evaluator<'_, '_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        if self.peek_kind() == kind {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(self.error(format!("Expected {:?}, got {:?} '{}'", kind, tok.kind, tok.text)))
        }
    }

    fn error(&self, message: String) -> Error {
        Error::ExpressionError { position: self.peek().pos, message }
    }

    fn expr(&mut self) -> Result<Value> {
        let mut acc = self.unary()?;
        loop {
            let pos = self.peek().pos;
            if self.eat(TokenKind::Plus) {
                acc = add(acc, self.unary()?, pos)?;
            } else if self.eat(TokenKind::Minus) {
                acc = sub(acc, self.unary()?, pos)?;
            } else {
                break;
            }
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<Value> {
        let pos = self.peek().pos;
        if self.eat(TokenKind::Minus) {
            let value = self.primary()?;
            return match value.as_f64() {
                Some(_) => match value {
                    Value::Double(v) => Ok(Value::Double(-v)),
                    other => Ok(Value::Int64(-other.as_i64().unwrap_or_default())),
                },
                None => Err(lex_error(pos, format!("Cannot negate {}", value.type_name()))),
            };
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Value> {
        match self.peek_kind() {
            TokenKind::Integer => {
                let tok = self.advance();
                let pos = tok.pos;
                let text = tok.text.clone();
                let parsed: i64 = text
                    .parse()
                    .map_err(|_| lex_error(pos, format!("Integer out of range: {text}")))?;
                Ok(match i32::try_from(parsed) {
                    Ok(small) => Value::Int32(small),
                    Err(_) => Value::Int64(parsed),
                })
            }
            TokenKind::Float => {
                let tok = self.advance();
                let pos = tok.pos;
                let text = tok.text.clone();
                let parsed: f64 = text
                    .parse()
                    .map_err(|_| lex_error(pos, format!("Malformed number: {text}")))?;
                Ok(Value::Double(parsed))
            }
            TokenKind::StringLiteral => Ok(Value::String(self.advance().text.clone())),
            TokenKind::True => { self.advance(); Ok(Value::Bool(true)) }
            TokenKind::False => { self.advance(); Ok(Value::Bool(false)) }
            TokenKind::Null => { self.advance(); Ok(Value::Null) }

            TokenKind::Var => {
                let tok = self.advance();
                let pos = tok.pos;
                let name = tok.text.clone();
                self.context
                    .var(&name)
                    .cloned()
                    .ok_or_else(|| lex_error(pos, format!("Unknown variable '#{name}'")))
            }

            // Property path off the bound instance. Unset fields evaluate to
            // Null so a partially populated proxy can serve as the root.
            TokenKind::Ident => {
                let first = self.advance().text.clone();
                let mut value = self.root.get_field(&first).cloned().unwrap_or(Value::Null);
                while self.eat(TokenKind::Dot) {
                    let seg = self.expect(TokenKind::Ident)?;
                    let pos = seg.pos;
                    let name = seg.text.clone();
                    value = match value {
                        Value::Document(doc) => doc.get(&name).cloned().unwrap_or(Value::Null),
                        Value::Null => Value::Null,
                        other => {
                            return Err(lex_error(
                                pos,
                                format!("Cannot read field '{name}' of {}", other.type_name()),
                            ));
                        }
                    };
                }
                Ok(value)
            }

            TokenKind::LParen => {
                self.advance();
                let value = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(value)
            }

            _ => {
                let tok = self.peek();
                Err(self.error(format!("Expected expression, got {:?} '{}'", tok.kind, tok.text)))
            }
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Addition: integer arithmetic promotes to Int64, any Double makes the
/// result Double, two strings concatenate.
fn add(lhs: Value, rhs: Value, pos: usize) -> Result<Value> {
    match (&lhs, &rhs) {
        (Value::String(a), Value::String(b)) => {
            let mut s = a.clone();
            s.push_str(b);
            Ok(Value::String(s))
        }
        (Value::Double(_), _) | (_, Value::Double(_)) if lhs.is_numeric() && rhs.is_numeric() => {
            Ok(Value::Double(lhs.as_f64().unwrap_or_default() + rhs.as_f64().unwrap_or_default()))
        }
        _ if lhs.is_numeric() && rhs.is_numeric() => {
            Ok(Value::Int64(lhs.as_i64().unwrap_or_default() + rhs.as_i64().unwrap_or_default()))
        }
        _ => Err(lex_error(
            pos,
            format!("Cannot add {} and {}", lhs.type_name(), rhs.type_name()),
        )),
    }
}

/// Subtraction: numeric only.
fn sub(lhs: Value, rhs: Value, pos: usize) -> Result<Value> {
    match (&lhs, &rhs) {
        (Value::Double(_), _) | (_, Value::Double(_)) if lhs.is_numeric() && rhs.is_numeric() => {
            Ok(Value::Double(lhs.as_f64().unwrap_or_default() - rhs.as_f64().unwrap_or_default()))
        }
        _ if lhs.is_numeric() && rhs.is_numeric() => {
            Ok(Value::Int64(lhs.as_i64().unwrap_or_default() - rhs.as_i64().unwrap_or_default()))
        }
        _ => Err(lex_error(
            pos,
            format!("Cannot subtract {} from {}", rhs.type_name(), lhs.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("#prefix + 'x' - 1.5").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Var,
                TokenKind::Plus,
                TokenKind::StringLiteral,
                TokenKind::Minus,
                TokenKind::Float,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_path() {
        let tokens = tokenize("meta.owner").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_tokenize_rejects_unknown_char() {
        assert!(matches!(
            tokenize("a ? b"),
            Err(Error::ExpressionError { position: 2, .. })
        ));
    }
}
