//! The top-level expression type tying the pipeline together.

use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::AstNode,
    config::{Config, ConfigRef},
    context::{Context, ContextRef},
    parser,
    token::{tokenize, Token},
    Code, CodeSpan, Error,
};

/// An expression: source text plus cached tokens, AST and value.
///
/// The configuration and context are optional shared handles; a default
/// configuration is used when none is attached, and an empty context is
/// created on demand.
///
/// Caching contract: [`parse`](Self::parse) re-tokenizes and re-parses from
/// the *current* source and configuration; [`evaluate`](Self::evaluate)
/// re-walks the cached AST against the *current* configuration and context.
/// Nothing is invalidated automatically — after changing the source, the
/// configuration or context bindings, call `parse` and/or `evaluate` again
/// to refresh the caches.
///
/// # Examples
///
/// ```
/// use formula_engine::Expression;
///
/// # fn main() -> Result<(), formula_engine::Error> {
/// let mut expr = Expression::new("2 * (3 + 4)");
/// assert_eq!(expr.get_value()?, 14.0);
///
/// let doubled = Expression::new("x * 2").set_variable("x", 21.0).get_value()?;
/// assert_eq!(doubled, 42.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Expression {
    code: Code,
    config: Option<ConfigRef>,
    context: Option<ContextRef>,
    tokens: Vec<Token>,
    ast: Option<AstNode>,
    value: f32,
}

impl Expression {
    /// Creates an expression from source text. An empty source parses to
    /// the constant `0`.
    pub fn new(code: impl Into<Code>) -> Self {
        Self {
            code: code.into(),
            config: None,
            context: None,
            tokens: Vec::new(),
            ast: None,
            value: 0.0,
        }
    }

    /// Attaches a shared configuration.
    #[must_use]
    pub fn with_config(mut self, config: ConfigRef) -> Self {
        self.config = Some(config);
        self
    }

    /// Attaches a shared context.
    #[must_use]
    pub fn with_context(mut self, context: ContextRef) -> Self {
        self.context = Some(context);
        self
    }

    /// Source buffer of this expression.
    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Replaces the source text. Cached tokens, AST and value are left
    /// untouched until the next [`parse`](Self::parse) /
    /// [`evaluate`](Self::evaluate).
    pub fn set_source(&mut self, code: impl Into<Code>) {
        self.code = code.into();
    }

    /// Attached configuration, if any.
    pub fn config(&self) -> Option<&ConfigRef> {
        self.config.as_ref()
    }

    /// This expression's context, created empty on first access.
    pub fn context(&mut self) -> &ContextRef {
        self.context
            .get_or_insert_with(|| Rc::new(RefCell::new(Context::new())))
    }

    /// Tokens cached by the last successful [`parse`](Self::parse).
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// AST cached by the last successful [`parse`](Self::parse).
    pub fn ast(&self) -> Option<&AstNode> {
        self.ast.as_ref()
    }

    /// Value cached by the last successful [`evaluate`](Self::evaluate).
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Tokenizes and parses the current source against the current
    /// configuration, refreshing the cached tokens and AST.
    pub fn parse(&mut self) -> Result<(), Error> {
        self.tokens = tokenize(&self.code)?;
        let ast = match &self.config {
            Some(config) => parser::parse(&self.code, &self.tokens, &config.borrow())?,
            None => parser::parse(&self.code, &self.tokens, &Config::default())?,
        };
        self.ast = Some(ast);
        Ok(())
    }

    /// Walks the cached AST against the current configuration and context,
    /// refreshing the cached value. Requires a successful
    /// [`parse`](Self::parse) beforehand.
    pub fn evaluate(&mut self) -> Result<f32, Error> {
        let Some(ast) = &self.ast else {
            return Err(Error::eval(
                "Expression is not parsed",
                CodeSpan::default(),
                &self.code,
            ));
        };
        let context = self
            .context
            .get_or_insert_with(|| Rc::new(RefCell::new(Context::new())));

        let value = match &self.config {
            Some(config) => ast.evaluate(&self.code, &config.borrow(), &context.borrow())?,
            None => ast.evaluate(&self.code, &Config::default(), &context.borrow())?,
        };
        self.value = value;
        Ok(value)
    }

    /// Returns the cached value, parsing and evaluating exactly once if no
    /// AST is cached yet. Does **not** re-parse or re-evaluate on later
    /// calls, even if the source, configuration or context changed since.
    pub fn get_value(&mut self) -> Result<f32, Error> {
        if self.ast.is_none() {
            self.parse()?;
            self.evaluate()?;
        }
        Ok(self.value)
    }

    /// Binds a variable in this expression's context, creating the context
    /// if absent.
    pub fn set_variable(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        self.context().borrow_mut().set_variable(name, value);
        self
    }

    /// Binds a function in this expression's context, creating the context
    /// if absent.
    pub fn set_function(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&Code, CodeSpan, &[f32]) -> Result<f32, Error> + 'static,
    ) -> &mut Self {
        self.context().borrow_mut().set_function(name, function);
        self
    }

    /// Inherits a parent context into this expression's context, creating
    /// the context if absent.
    pub fn inherit_context(&mut self, parent: ContextRef) -> &mut Self {
        self.context().borrow_mut().inherit(parent);
        self
    }
}

/// Evaluates an expression in one call, with an optional configuration and
/// context.
pub fn express(
    expr: &str,
    config: Option<ConfigRef>,
    context: Option<ContextRef>,
) -> Result<f32, Error> {
    let mut expression = Expression::new(expr);
    if let Some(config) = config {
        expression = expression.with_config(config);
    }
    if let Some(context) = context {
        expression = expression.with_context(context);
    }
    expression.get_value()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use assert_matches::assert_matches;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn evaluate_requires_parse() {
        let mut expr = Expression::new("1 + 1");
        let err = expr.evaluate().unwrap_err();
        assert_matches!(
            err.kind(),
            ErrorKind::Eval(message) if message == "Expression is not parsed"
        );
    }

    #[test]
    fn get_value_runs_the_pipeline_once() {
        let calls = Rc::new(Cell::new(0));
        let calls_in_fn = Rc::clone(&calls);

        let mut expr = Expression::new("probe()");
        expr.set_function("probe", move |_, _, _| {
            calls_in_fn.set(calls_in_fn.get() + 1);
            Ok(7.0)
        });

        assert_eq!(expr.get_value().unwrap(), 7.0);
        assert_eq!(expr.get_value().unwrap(), 7.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn value_is_cached_until_reevaluation() {
        let mut expr = Expression::new("x");
        expr.set_variable("x", 1.0);
        assert_eq!(expr.get_value().unwrap(), 1.0);

        expr.set_variable("x", 2.0);
        // The cache is stale by contract.
        assert_eq!(expr.get_value().unwrap(), 1.0);
        assert_eq!(expr.value(), 1.0);

        assert_eq!(expr.evaluate().unwrap(), 2.0);
        assert_eq!(expr.value(), 2.0);
    }

    #[test]
    fn failed_parse_keeps_the_previous_ast() {
        let mut expr = Expression::new("1 + 1");
        expr.parse().unwrap();
        assert_eq!(expr.evaluate().unwrap(), 2.0);

        expr.set_source("#");
        assert!(expr.parse().is_err());
        // The stale AST is still there; re-evaluation uses it.
        assert_eq!(expr.evaluate().unwrap(), 2.0);
    }

    #[test]
    fn chained_construction() {
        let value = Expression::new("a - b / 2")
            .set_variable("a", 10.0)
            .set_variable("b", 6.0)
            .get_value()
            .unwrap();
        assert_eq!(value, 7.0);
    }

    #[test]
    fn express_shorthand() {
        assert_eq!(express("1 + 1", None, None).unwrap(), 2.0);
        assert!(express("1 +", None, None).is_err());
    }
}
