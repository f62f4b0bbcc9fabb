//! Embeddable arithmetic expression engine: tokenizer, parser and evaluator
//! with configurable operators and inheritable symbol contexts.
//!
//! An expression string is tokenized, parsed into an AST and walked to a
//! single `f32` value. Parsing is driven by a [`Config`] (operator tables,
//! precedence, associativity) and evaluation by a [`Context`] (variable and
//! function bindings, composable through parents). Both are runtime data:
//! host applications can register their own operators — including
//! multi-character ones — and their own symbols.
//!
//! # Supported syntax
//!
//! - **Numbers**: decimal literals with optional digit-group separators
//!   (`1'000_000.25`).
//! - **Variables**: identifiers resolved through the context chain.
//! - **Function calls**: `min(a, b + 1)`; zero arguments are allowed.
//! - **Unary operators**: prefix `+ - * / ! ~` and suffix `!` (factorial)
//!   by default; both sets are configurable.
//! - **Binary operators**: see the default table below; fully configurable.
//! - **Conditional**: `cond ? a : b`, the loosest construct; only the
//!   selected branch is evaluated.
//! - **Parentheses** for explicit grouping.
//!
//! The default binary operators, tightest binding first:
//!
//! | Level | Operators |
//! |------:|-----------|
//! | 0 | `<<` `>>` |
//! | 1 | `^` |
//! | 2 | `&` `\|` |
//! | 3 | `!!` (absolute difference) |
//! | 4 | `<?` `>?` (min, max) |
//! | 5 | `??` (first nonzero; right-associative) |
//! | 6 | `**` (power; right-associative) |
//! | 7 | `//` (flooring division) |
//! | 8 | `%` `%%` (modulo, wrapping modulo) |
//! | 9 | `*` `/` |
//! | 10 | `+` `-` |
//! | 11 | `==` `!=` `<` `>` `<=` `>=` |
//! | 12 | `&&` `\|\|` |
//!
//! Comparisons and logical operators produce `0.0` / `1.0`; bitwise
//! operators truncate their operands toward zero first.
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use formula_engine::Expression;
//!
//! # fn main() -> Result<(), formula_engine::Error> {
//! let mut expr = Expression::new("2 * (3 + 4)");
//! assert_eq!(expr.get_value()?, 14.0);
//!
//! let mut conditional = Expression::new("x > 2 ? x : 0 - x");
//! conditional.set_variable("x", 5.0);
//! assert_eq!(conditional.get_value()?, 5.0);
//! # Ok(())
//! # }
//! ```
//!
//! Custom operators and a populated context:
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use formula_engine::{express, Associativity, BinaryOperator, Config, Context};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.add_binary_op(BinaryOperator::new(
//!     "<+>",
//!     Associativity::Left,
//!     |_, _, x, y| Ok((x + y) / 2.0),
//! ))?;
//! config.assign_least_precedence("<+>", true, false)?;
//! let config = Rc::new(RefCell::new(config));
//!
//! let mut context = Context::new();
//! context.populate();
//! context.set_variable("x", 4.0);
//! let context = Rc::new(RefCell::new(context));
//!
//! assert_eq!(express("x <+> sqrt(4)", Some(config), Some(context))?, 3.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! The pipeline is single-threaded and synchronous; configurations and
//! contexts are shared via `Rc<RefCell<_>>` and must not be mutated while a
//! parse or evaluation using them is in flight. An [`Expression`] is not
//! meant to be used from multiple threads.

mod ast;
mod builtins;
mod code;
mod config;
mod context;
mod error;
mod eval;
mod expression;
mod parser;
mod span;
mod token;

pub use crate::{
    ast::AstNode,
    code::Code,
    config::{Associativity, BinaryFn, BinaryOperator, Config, ConfigRef, UnaryFn, UnaryOperator},
    context::{check_arity, Context, ContextRef, NativeFn},
    error::{ConfigError, Error, ErrorKind, OutOfRange, SymbolKind},
    expression::{express, Expression},
    parser::parse,
    span::CodeSpan,
    token::{dump_tokens, tokenize, Token, TokenKind, OPERATOR_CHARS},
};
