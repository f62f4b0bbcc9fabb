//! Tokenizer for expression source text.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{multispace0, one_of},
    combinator::{map, recognize},
    sequence::pair,
    IResult,
};

use std::fmt;

use crate::{Code, CodeSpan, Error, ErrorKind};

/// Span over the raw input, with location tracking.
pub type InputSpan<'a> = nom_locate::LocatedSpan<&'a str>;
/// Parsing outcome generalized by the type returned on success.
type NomResult<'a, T> = IResult<InputSpan<'a>, T>;

/// Characters a [`TokenKind::Symbol`] token may consist of.
///
/// A maximal run of these characters is always one token, no matter how many
/// logical operators a configuration later reads out of it; this is what
/// makes multi-character custom operators possible.
pub const OPERATOR_CHARS: &str = "+-*/%^=!~&|<>?:[]";

const NUMBER_SEPARATORS: [char; 2] = ['\'', '_'];

/// Classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `[A-Za-z_]` followed by any number of `[A-Za-z0-9_]`.
    Identifier,
    /// Digits with optional digit-group separators (`'`, `_`) and at most
    /// one decimal point.
    Number,
    /// Maximal run of [`OPERATOR_CHARS`].
    Symbol,
    /// Exactly one of `(`, `)`, `,`.
    Punctuation,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::Symbol => "symbol",
            Self::Punctuation => "punctuation",
        })
    }
}

/// A single classified token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Token text. For numbers, digit-group separators are already
    /// stripped.
    pub text: String,
    /// Location of the token in the source.
    pub span: CodeSpan,
}

impl Token {
    /// Renders this token with a source preview, for debugging.
    pub fn dump(&self, code: &Code) -> String {
        format!(
            "Token: Type: {}, Value: {}, Location: {}:{}\n{}",
            self.kind,
            self.text,
            self.span.begin,
            self.span.length,
            self.span.preview(code, 0)
        )
    }
}

/// Renders all `tokens` with source previews, for debugging.
pub fn dump_tokens(code: &Code, tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.dump(code)).collect()
}

fn whitespace(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    multispace0(input)
}

fn identifier(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn number(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_digit() || c == '.' || NUMBER_SEPARATORS.contains(&c)),
    ))(input)
}

fn symbol(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    take_while1(|c| OPERATOR_CHARS.contains(c))(input)
}

fn punctuation(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(one_of("(),"))(input)
}

fn token(input: InputSpan<'_>) -> NomResult<'_, (TokenKind, InputSpan<'_>)> {
    alt((
        map(identifier, |raw| (TokenKind::Identifier, raw)),
        map(number, |raw| (TokenKind::Number, raw)),
        map(symbol, |raw| (TokenKind::Symbol, raw)),
        map(punctuation, |raw| (TokenKind::Punctuation, raw)),
    ))(input)
}

/// Splits the source into a flat token sequence.
///
/// Performs a single left-to-right scan with longest-match semantics per
/// token class; whitespace separates tokens and is not represented in the
/// output. Empty input produces an empty sequence.
///
/// # Errors
///
/// Fails with a tokenizer error on any character no token class accepts, on
/// a number ending with a digit-group separator, and on a number with more
/// than one decimal point.
pub fn tokenize(code: &Code) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut input = InputSpan::new(code.text());

    loop {
        if let Ok((rest, _)) = whitespace(input) {
            input = rest;
        }
        if input.fragment().is_empty() {
            break;
        }

        let (rest, (kind, raw)) = token(input).map_err(|_| {
            Error::new(
                ErrorKind::Tokenizer("Invalid character".to_owned()),
                CodeSpan::new(input.location_offset(), 1),
                code,
            )
        })?;

        let span = CodeSpan::new(raw.location_offset(), raw.fragment().len());
        let text = match kind {
            TokenKind::Number => number_value(raw.fragment(), span, code)?,
            _ => (*raw.fragment()).to_owned(),
        };
        tokens.push(Token { kind, text, span });
        input = rest;
    }

    Ok(tokens)
}

fn number_value(raw: &str, span: CodeSpan, code: &Code) -> Result<String, Error> {
    if raw.ends_with(&NUMBER_SEPARATORS[..]) {
        return Err(Error::new(
            ErrorKind::Tokenizer("Number cannot end with separator characters".to_owned()),
            span,
            code,
        ));
    }

    let value: String = raw
        .chars()
        .filter(|c| !NUMBER_SEPARATORS.contains(c))
        .collect();

    if value.matches('.').count() > 1 {
        return Err(Error::new(
            ErrorKind::Tokenizer("Number cannot contain multiple decimal points".to_owned()),
            span,
            code,
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn tokenize_str(text: &str) -> Result<Vec<Token>, Error> {
        tokenize(&Code::named(text, "test.fx"))
    }

    fn texts(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens
            .iter()
            .map(|token| (token.kind, token.text.as_str()))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert_eq!(tokenize_str("").unwrap(), []);
        assert_eq!(tokenize_str("  \t\n ").unwrap(), []);
    }

    #[test]
    fn basic_expression() {
        let tokens = tokenize_str("x + 42").unwrap();
        assert_eq!(
            texts(&tokens),
            [
                (TokenKind::Identifier, "x"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Number, "42"),
            ]
        );
        assert_eq!(tokens[2].span, CodeSpan::new(4, 2));
    }

    #[test]
    fn identifiers_may_contain_digits_and_underscores() {
        let tokens = tokenize_str("_foo2 bar_3x").unwrap();
        assert_eq!(
            texts(&tokens),
            [
                (TokenKind::Identifier, "_foo2"),
                (TokenKind::Identifier, "bar_3x"),
            ]
        );
    }

    #[test]
    fn number_separators_are_stripped() {
        let tokens = tokenize_str("1'000_000.25").unwrap();
        assert_eq!(texts(&tokens), [(TokenKind::Number, "1000000.25")]);
        // The span still covers the raw text.
        assert_eq!(tokens[0].span, CodeSpan::new(0, 12));
    }

    #[test]
    fn symbol_runs_are_grouped() {
        let tokens = tokenize_str("2+++3").unwrap();
        assert_eq!(
            texts(&tokens),
            [
                (TokenKind::Number, "2"),
                (TokenKind::Symbol, "+++"),
                (TokenKind::Number, "3"),
            ]
        );
    }

    #[test]
    fn punctuation_is_never_grouped() {
        let tokens = tokenize_str("f((),1)").unwrap();
        assert_eq!(
            texts(&tokens),
            [
                (TokenKind::Identifier, "f"),
                (TokenKind::Punctuation, "("),
                (TokenKind::Punctuation, "("),
                (TokenKind::Punctuation, ")"),
                (TokenKind::Punctuation, ","),
                (TokenKind::Number, "1"),
                (TokenKind::Punctuation, ")"),
            ]
        );
    }

    #[test]
    fn invalid_character() {
        let err = tokenize_str("1 + #").unwrap_err();
        assert_matches!(err.kind(), ErrorKind::Tokenizer(message) if message == "Invalid character");
        assert_eq!(err.span(), CodeSpan::new(4, 1));
    }

    #[test]
    fn number_with_trailing_separator() {
        let err = tokenize_str("1'23'").unwrap_err();
        assert_matches!(
            err.kind(),
            ErrorKind::Tokenizer(message) if message == "Number cannot end with separator characters"
        );
    }

    #[test]
    fn number_with_multiple_decimal_points() {
        let err = tokenize_str("1.2.3").unwrap_err();
        assert_matches!(
            err.kind(),
            ErrorKind::Tokenizer(message) if message == "Number cannot contain multiple decimal points"
        );
        assert_eq!(err.span(), CodeSpan::new(0, 5));
    }

    #[test]
    fn conditional_symbols() {
        let tokens = tokenize_str("a?b:c").unwrap();
        assert_eq!(
            texts(&tokens),
            [
                (TokenKind::Identifier, "a"),
                (TokenKind::Symbol, "?"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Symbol, ":"),
                (TokenKind::Identifier, "c"),
            ]
        );
    }
}
