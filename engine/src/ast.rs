//! Abstract syntax tree produced by the parser.

use crate::{Code, CodeSpan};

/// A node of a parsed expression.
///
/// The tree is uniquely owned by the expression that parsed it. Every node
/// carries the span it was parsed from, used for error reporting.
///
/// For an `Operator` node produced by the parser, exactly one of the
/// following holds: both operands are present (binary), only `left` (suffix
/// unary) or only `right` (prefix unary). A node with neither operand
/// cannot be produced by a parse and is rejected at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Number literal.
    Number {
        /// Literal value.
        value: f32,
        /// Source location.
        span: CodeSpan,
    },

    /// Variable reference.
    Variable {
        /// Variable name.
        name: String,
        /// Source location.
        span: CodeSpan,
    },

    /// Function call.
    Function {
        /// Function name.
        name: String,
        /// Arguments, in call order.
        args: Vec<AstNode>,
        /// Source location.
        span: CodeSpan,
    },

    /// Unary or binary operator application. The operator is stored by
    /// symbol and resolved against the configuration at evaluation time.
    Operator {
        /// Operator symbol.
        symbol: String,
        /// Left operand (present for binary and suffix application).
        left: Option<Box<AstNode>>,
        /// Right operand (present for binary and prefix application).
        right: Option<Box<AstNode>>,
        /// Source location of the operator symbol.
        span: CodeSpan,
    },

    /// Ternary conditional. Only the selected branch is evaluated.
    Conditional {
        /// Condition expression.
        condition: Box<AstNode>,
        /// Expression evaluated when the condition is nonzero.
        true_branch: Box<AstNode>,
        /// Expression evaluated when the condition is zero.
        false_branch: Box<AstNode>,
        /// Source location of the `?` symbol.
        span: CodeSpan,
    },
}

impl AstNode {
    /// Source location of this node.
    pub fn span(&self) -> CodeSpan {
        match self {
            Self::Number { span, .. }
            | Self::Variable { span, .. }
            | Self::Function { span, .. }
            | Self::Operator { span, .. }
            | Self::Conditional { span, .. } => *span,
        }
    }

    /// Renders this node and its children with source previews, for
    /// debugging.
    pub fn dump(&self, code: &Code, indent: usize) -> String {
        let padding = "  ".repeat(indent);
        let mut out = padding.clone();
        match self {
            Self::Number { value, span } => {
                out.push_str(&format!(
                    "Number: {value}, Location: {}:{}\n{}",
                    span.begin,
                    span.length,
                    span.preview(code, indent * 2)
                ));
            }

            Self::Variable { name, span } => {
                out.push_str(&format!(
                    "Variable: {name}, Location: {}:{}\n{}",
                    span.begin,
                    span.length,
                    span.preview(code, indent * 2)
                ));
            }

            Self::Function { name, args, span } => {
                out.push_str(&format!(
                    "Function: {name}, Location: {}:{}\n{}",
                    span.begin,
                    span.length,
                    span.preview(code, indent * 2)
                ));
                out.push_str(&padding);
                out.push_str("Arguments:\n");
                for arg in args {
                    out.push_str(&arg.dump(code, indent + 1));
                }
            }

            Self::Operator {
                symbol,
                left,
                right,
                span,
            } => {
                out.push_str(&format!(
                    "Operator: {symbol}, Location: {}:{}\n{}",
                    span.begin,
                    span.length,
                    span.preview(code, indent * 2)
                ));
                out.push_str(&padding);
                out.push_str(&format!(
                    "Has left: {}, has right: {}\n",
                    left.is_some(),
                    right.is_some()
                ));
                if let Some(left) = left {
                    out.push_str(&padding);
                    out.push_str("Left:\n");
                    out.push_str(&left.dump(code, indent + 1));
                }
                if let Some(right) = right {
                    out.push_str(&padding);
                    out.push_str("Right:\n");
                    out.push_str(&right.dump(code, indent + 1));
                }
            }

            Self::Conditional {
                condition,
                true_branch,
                false_branch,
                span,
            } => {
                out.push_str(&format!(
                    "Conditional: Location: {}:{}\n{}",
                    span.begin,
                    span.length,
                    span.preview(code, indent * 2)
                ));
                out.push_str(&padding);
                out.push_str("Condition:\n");
                out.push_str(&condition.dump(code, indent + 1));
                out.push_str(&padding);
                out.push_str("True value:\n");
                out.push_str(&true_branch.dump(code, indent + 1));
                out.push_str(&padding);
                out.push_str("False value:\n");
                out.push_str(&false_branch.dump(code, indent + 1));
            }
        }
        out
    }
}
