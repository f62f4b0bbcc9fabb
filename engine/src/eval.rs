//! Tree-walking evaluation of parsed expressions.

use crate::{
    ast::AstNode,
    config::Config,
    context::Context,
    error::{Error, ErrorKind, SymbolKind},
    Code,
};

impl AstNode {
    /// Evaluates this node against a configuration and a context.
    ///
    /// Variables and functions resolve through the context chain; operators
    /// re-resolve *by symbol* against the configuration on every call, so
    /// evaluation observes operators added to or removed from the
    /// configuration after the expression was parsed.
    ///
    /// # Errors
    ///
    /// Fails with an [unresolved-reference](ErrorKind::UnresolvedReference)
    /// error when a symbol is not bound, and propagates any error raised by
    /// operator or function behavior (e.g. division by zero, arity checks).
    pub fn evaluate(&self, code: &Code, config: &Config, context: &Context) -> Result<f32, Error> {
        match self {
            Self::Number { value, .. } => Ok(*value),

            Self::Variable { name, span } => {
                context.resolve_variable(name).ok_or_else(|| {
                    Error::new(
                        ErrorKind::UnresolvedReference {
                            symbol: name.clone(),
                            kind: SymbolKind::Variable,
                        },
                        *span,
                        code,
                    )
                })
            }

            Self::Function { name, args, span } => {
                let function = context.resolve_function(name).ok_or_else(|| {
                    Error::new(
                        ErrorKind::UnresolvedReference {
                            symbol: name.clone(),
                            kind: SymbolKind::Function,
                        },
                        *span,
                        code,
                    )
                })?;

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.evaluate(code, config, context)?);
                }
                // Arity checking is up to the function itself.
                function(code, *span, &values)
            }

            Self::Operator {
                symbol,
                left,
                right,
                span,
            } => {
                let left_value = match left {
                    Some(node) => node.evaluate(code, config, context)?,
                    None => 0.0,
                };
                let right_value = match right {
                    Some(node) => node.evaluate(code, config, context)?,
                    None => 0.0,
                };

                let unresolved = |kind: SymbolKind| {
                    Error::new(
                        ErrorKind::UnresolvedReference {
                            symbol: symbol.clone(),
                            kind,
                        },
                        *span,
                        code,
                    )
                };

                match (left, right) {
                    (Some(_), Some(_)) => {
                        let op = config
                            .binary_op(symbol)
                            .ok_or_else(|| unresolved(SymbolKind::BinaryOperator))?;
                        (op.operate)(code, *span, left_value, right_value)
                    }
                    (Some(_), None) => {
                        let op = config
                            .unary_suffix_op(symbol)
                            .ok_or_else(|| unresolved(SymbolKind::UnarySuffixOperator))?;
                        (op.operate)(code, *span, left_value)
                    }
                    (None, Some(_)) => {
                        let op = config
                            .unary_prefix_op(symbol)
                            .ok_or_else(|| unresolved(SymbolKind::UnaryPrefixOperator))?;
                        (op.operate)(code, *span, right_value)
                    }
                    // Unreachable from a well-formed parse.
                    (None, None) => Err(Error::new(
                        ErrorKind::Eval("No operands for operator was specified".to_owned()),
                        *span,
                        code,
                    )),
                }
            }

            Self::Conditional {
                condition,
                true_branch,
                false_branch,
                ..
            } => {
                let condition_value = condition.evaluate(code, config, context)?;
                if condition_value != 0.0 {
                    true_branch.evaluate(code, config, context)
                } else {
                    false_branch.evaluate(code, config, context)
                }
            }
        }
    }
}
