//! Recursive-descent parser with precedence climbing over the token stream.

use crate::{
    ast::AstNode,
    config::{Associativity, Config},
    token::{Token, TokenKind},
    Code, CodeSpan, Error, ErrorKind,
};

/// Parses a token sequence into an AST.
///
/// Binary operators are matched level by level against
/// [`Config::precedence_table`]; an operator without a precedence entry is
/// invisible to the parser. An empty token sequence parses to the constant
/// `0`. Any token left unconsumed after the expression is a hard error.
///
/// # Errors
///
/// Fails with an [unexpected-token](ErrorKind::UnexpectedToken) error on the
/// first grammar mismatch; there is no recovery.
pub fn parse(code: &Code, tokens: &[Token], config: &Config) -> Result<AstNode, Error> {
    if tokens.is_empty() {
        return Ok(AstNode::Number {
            value: 0.0,
            span: CodeSpan::default(),
        });
    }

    let mut parser = Parser {
        code,
        tokens,
        config,
        pos: 0,
    };
    let node = parser.expr()?;

    if parser.pos != tokens.len() {
        return Err(parser.error_at_current("Unexpected tokens after expression"));
    }
    Ok(node)
}

struct Parser<'a> {
    code: &'a Code,
    tokens: &'a [Token],
    config: &'a Config,
    pos: usize,
}

impl Parser<'_> {
    /// Error at the current token, or at the last token when the input ended.
    fn error_at_current(&self, message: &str) -> Error {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        let span = self
            .tokens
            .get(index)
            .map_or(CodeSpan::default(), |token| token.span);
        Error::new(ErrorKind::UnexpectedToken(message.to_owned()), span, self.code)
    }

    fn expr(&mut self) -> Result<AstNode, Error> {
        self.conditional()
    }

    /// Conditional is the loosest construct: `cond ? a : b`, where both
    /// branches are full expressions (so conditionals right-nest without
    /// parentheses).
    fn conditional(&mut self) -> Result<AstNode, Error> {
        let levels = self.config.precedence_table().len();
        let condition = if levels == 0 {
            self.primary()?
        } else {
            self.binary(levels - 1)?
        };

        let span = match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Symbol && token.text == "?" => token.span,
            _ => return Ok(condition),
        };
        self.pos += 1;

        let true_branch = self.expr()?;

        match self.tokens.get(self.pos) {
            Some(token) if token.text == ":" => self.pos += 1,
            _ => return Err(self.error_at_current("Expected ':' in conditional expression")),
        }

        let false_branch = self.expr()?;

        Ok(AstNode::Conditional {
            condition: Box::new(condition),
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
            span,
        })
    }

    /// One binary level per precedence row; `level` counts from the loosest
    /// row down to row 0, which recurses into primaries.
    fn binary(&mut self, level: usize) -> Result<AstNode, Error> {
        let config = self.config;
        let mut left = if level == 0 {
            self.primary()?
        } else {
            self.binary(level - 1)?
        };

        let mut matched = true;
        while matched && self.pos < self.tokens.len() {
            matched = false;
            for symbol in &config.precedence_table()[level] {
                let token = &self.tokens[self.pos];
                if token.kind != TokenKind::Symbol || token.text != *symbol {
                    continue;
                }
                // A stale precedence entry whose operator was removed never
                // matches.
                let Some(op) = config.binary_op(symbol) else {
                    continue;
                };

                let assoc = op.assoc;
                let span = token.span;
                self.pos += 1;

                let right = if level == 0 {
                    self.primary()?
                } else if assoc == Associativity::Right {
                    self.binary(level)?
                } else {
                    self.binary(level - 1)?
                };

                left = AstNode::Operator {
                    symbol: symbol.clone(),
                    left: Some(Box::new(left)),
                    right: Some(Box::new(right)),
                    span,
                };
                matched = true;
                break;
            }
        }
        Ok(left)
    }

    /// Primary expression: prefix operators (right-associative via the
    /// recursion), then a number / variable / call / parenthesized
    /// expression, then any number of suffix operators.
    fn primary(&mut self) -> Result<AstNode, Error> {
        let config = self.config;
        if self.pos >= self.tokens.len() {
            return Err(self.error_at_current("Unexpected end of expression"));
        }

        let mut prefixed = None;
        let token = &self.tokens[self.pos];
        if token.kind == TokenKind::Symbol && config.has_unary_prefix_op(&token.text) {
            let symbol = token.text.clone();
            let span = token.span;
            self.pos += 1;

            let operand = self.primary()?;
            prefixed = Some(AstNode::Operator {
                symbol,
                left: None,
                right: Some(Box::new(operand)),
                span,
            });
        }

        let mut node = match prefixed {
            Some(node) => node,
            None => {
                let (kind, is_open_paren) = {
                    let token = &self.tokens[self.pos];
                    (token.kind, token.text == "(")
                };
                match kind {
                    TokenKind::Number => self.number()?,
                    TokenKind::Identifier => self.identifier()?,
                    TokenKind::Punctuation if is_open_paren => self.parenthesis()?,
                    _ => {
                        return Err(
                            self.error_at_current("Expected number, identifier or punctuation")
                        )
                    }
                }
            }
        };

        // Suffix operators wrap the result left to right.
        while let Some(token) = self.tokens.get(self.pos) {
            if token.kind != TokenKind::Symbol || !config.has_unary_suffix_op(&token.text) {
                break;
            }
            let symbol = token.text.clone();
            let span = token.span;
            self.pos += 1;

            node = AstNode::Operator {
                symbol,
                left: Some(Box::new(node)),
                right: None,
                span,
            };
        }
        Ok(node)
    }

    fn number(&mut self) -> Result<AstNode, Error> {
        let token = &self.tokens[self.pos];
        let value = token.text.parse::<f32>().map_err(|_| {
            Error::new(
                ErrorKind::UnexpectedToken("Invalid number literal".to_owned()),
                token.span,
                self.code,
            )
        })?;
        let span = token.span;
        self.pos += 1;
        Ok(AstNode::Number { value, span })
    }

    fn identifier(&mut self) -> Result<AstNode, Error> {
        let is_call = matches!(
            self.tokens.get(self.pos + 1),
            Some(next) if next.kind == TokenKind::Punctuation && next.text == "("
        );
        if is_call {
            self.function()
        } else {
            self.variable()
        }
    }

    fn variable(&mut self) -> Result<AstNode, Error> {
        let token = &self.tokens[self.pos];
        let node = AstNode::Variable {
            name: token.text.clone(),
            span: token.span,
        };
        self.pos += 1;
        Ok(node)
    }

    fn function(&mut self) -> Result<AstNode, Error> {
        let (name, span) = {
            let token = &self.tokens[self.pos];
            (token.text.clone(), token.span)
        };
        self.pos += 2; // Name and the `(` the caller already checked.

        let mut args = Vec::new();

        let closed_immediately = matches!(
            self.tokens.get(self.pos),
            Some(token) if token.kind == TokenKind::Punctuation && token.text == ")"
        );
        if closed_immediately {
            self.pos += 1;
            return Ok(AstNode::Function { name, args, span });
        }

        loop {
            args.push(self.expr()?);

            match self.tokens.get(self.pos) {
                Some(token) if token.kind == TokenKind::Punctuation && token.text == "," => {
                    self.pos += 1;
                }
                Some(token) if token.kind == TokenKind::Punctuation && token.text == ")" => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    return Err(self.error_at_current("Expected ',' or ')' in function arguments"))
                }
            }
        }

        Ok(AstNode::Function { name, args, span })
    }

    fn parenthesis(&mut self) -> Result<AstNode, Error> {
        self.pos += 1; // `(`
        let node = self.expr()?;

        match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Punctuation && token.text == ")" => {
                self.pos += 1;
                Ok(node)
            }
            _ => Err(self.error_at_current("Expected ')'")),
        }
    }
}
