//! Symbol contexts: variable and function bindings with inheritance.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{Code, CodeSpan, Error, ErrorKind};

/// Signature of a function callable from expressions.
///
/// The source buffer and the call-site span are provided so the function can
/// construct located [`Error`]s, e.g. via [`check_arity`] or
/// [`Error::eval`].
pub type NativeFn = Rc<dyn Fn(&Code, CodeSpan, &[f32]) -> Result<f32, Error>>;

/// Shared handle to a [`Context`].
pub type ContextRef = Rc<RefCell<Context>>;

/// Fails with an [invalid arity](ErrorKind::InvalidArity) error unless the
/// function received exactly `expected` arguments.
pub fn check_arity(
    function: &str,
    expected: usize,
    args: &[f32],
    code: &Code,
    span: CodeSpan,
) -> Result<(), Error> {
    if args.len() != expected {
        return Err(Error::new(
            ErrorKind::InvalidArity {
                function: function.to_owned(),
                expected,
                actual: args.len(),
            },
            span,
            code,
        ));
    }
    Ok(())
}

/// A set of variable and function bindings, composable through parent
/// contexts.
///
/// Resolution checks the context's own bindings first and then each parent
/// in declaration order, depth-first; the first match wins. A context's own
/// binding therefore shadows *any* parent binding of the same name,
/// regardless of inheritance depth.
///
/// Contexts are shared between expressions as [`ContextRef`]s. Making a
/// context (transitively) its own parent is a caller error: resolution of a
/// name bound nowhere in the cycle recurses until the stack is exhausted.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use formula_engine::{express, Context};
///
/// # fn main() -> Result<(), formula_engine::Error> {
/// let shared = Rc::new(RefCell::new(Context::new()));
/// shared.borrow_mut().set_variable("x", 5.0);
///
/// let mut local = Context::new();
/// local.set_variable("x", 10.0);
/// local.inherit(Rc::clone(&shared));
/// let local = Rc::new(RefCell::new(local));
///
/// // The local binding shadows the inherited one.
/// assert_eq!(express("x + 1", None, Some(local))?, 11.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Context {
    variables: HashMap<String, f32>,
    functions: HashMap<String, NativeFn>,
    parents: Vec<ContextRef>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables bound directly in this context.
    pub fn variables(&self) -> &HashMap<String, f32> {
        &self.variables
    }

    /// Names of functions bound directly in this context.
    pub fn function_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    /// Parent contexts, in resolution order.
    pub fn parents(&self) -> &[ContextRef] {
        &self.parents
    }

    /// Binds a variable, overriding any previous binding of the name.
    pub fn set_variable(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Binds a function, overriding any previous binding of the name.
    pub fn set_function(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&Code, CodeSpan, &[f32]) -> Result<f32, Error> + 'static,
    ) -> &mut Self {
        self.functions.insert(name.into(), Rc::new(function));
        self
    }

    /// Appends a parent context to inherit bindings from.
    pub fn inherit(&mut self, parent: ContextRef) -> &mut Self {
        self.parents.push(parent);
        self
    }

    /// Resolves a variable in this context or its parents.
    pub fn resolve_variable(&self, name: &str) -> Option<f32> {
        if let Some(value) = self.variables.get(name) {
            return Some(*value);
        }
        self.parents
            .iter()
            .find_map(|parent| parent.borrow().resolve_variable(name))
    }

    /// Resolves a function in this context or its parents.
    pub fn resolve_function(&self, name: &str) -> Option<NativeFn> {
        if let Some(function) = self.functions.get(name) {
            return Some(Rc::clone(function));
        }
        self.parents
            .iter()
            .find_map(|parent| parent.borrow().resolve_function(name))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<_> = self.functions.keys().collect();
        functions.sort_unstable();
        formatter
            .debug_struct("Context")
            .field("variables", &self.variables)
            .field("functions", &functions)
            .field("parents", &self.parents.len())
            .finish()
    }
}
