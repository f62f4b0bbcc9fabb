//! Parser / evaluator configuration: operator tables and precedence.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{Code, CodeSpan, ConfigError, Error, SymbolKind};

/// Behavior of a unary operator.
pub type UnaryFn = Rc<dyn Fn(&Code, CodeSpan, f32) -> Result<f32, Error>>;
/// Behavior of a binary operator.
pub type BinaryFn = Rc<dyn Fn(&Code, CodeSpan, f32, f32) -> Result<f32, Error>>;

/// Shared handle to a [`Config`].
pub type ConfigRef = Rc<RefCell<Config>>;

/// Grouping direction for a chain of same-precedence binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a + b + c` parses as `(a + b) + c`.
    Left,
    /// `a ** b ** c` parses as `a ** (b ** c)`.
    Right,
}

impl fmt::Display for Associativity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// A unary (prefix or suffix) operator: a symbol plus its behavior.
#[derive(Clone)]
pub struct UnaryOperator {
    /// Operator symbol. Must consist of [operator characters](crate::OPERATOR_CHARS).
    pub symbol: String,
    /// Applies the operator to its operand.
    pub operate: UnaryFn,
}

impl UnaryOperator {
    /// Creates an operator from a symbol and a behavior closure.
    pub fn new(
        symbol: impl Into<String>,
        operate: impl Fn(&Code, CodeSpan, f32) -> Result<f32, Error> + 'static,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            operate: Rc::new(operate),
        }
    }
}

impl fmt::Debug for UnaryOperator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UnaryOperator")
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

/// A binary operator: a symbol, its associativity and its behavior.
#[derive(Clone)]
pub struct BinaryOperator {
    /// Operator symbol. Must consist of [operator characters](crate::OPERATOR_CHARS).
    pub symbol: String,
    /// Grouping direction within a same-precedence chain.
    pub assoc: Associativity,
    /// Applies the operator to its operands.
    pub operate: BinaryFn,
}

impl BinaryOperator {
    /// Creates an operator from a symbol, associativity and behavior closure.
    pub fn new(
        symbol: impl Into<String>,
        assoc: Associativity,
        operate: impl Fn(&Code, CodeSpan, f32, f32) -> Result<f32, Error> + 'static,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            assoc,
            operate: Rc::new(operate),
        }
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BinaryOperator")
            .field("symbol", &self.symbol)
            .field("assoc", &self.assoc)
            .finish_non_exhaustive()
    }
}

/// Operator configuration driving the parser and the evaluator.
///
/// Holds the registered unary prefix, unary suffix and binary operators,
/// plus the binary-operator precedence table: one row per level, tightest
/// binding first. A binary operator with no row entry is invisible to the
/// parser (effectively disabled) while remaining resolvable by symbol.
///
/// [`Config::default()`] registers the standard operator set; see the crate
/// docs for the full table. A configuration is typically shared between
/// expressions via `Rc<RefCell<Config>>` and mutated between parses; it must
/// not be mutated while a parse or evaluation using it is in flight.
///
/// # Examples
///
/// ```
/// use formula_engine::{Associativity, BinaryOperator, Config};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.add_binary_op(BinaryOperator::new("<+>", Associativity::Left, |_, _, x, y| {
///     Ok((x + y) / 2.0)
/// }))?;
/// config.assign_least_precedence("<+>", true, false)?;
/// assert_eq!(config.precedence_of("<+>"), Some(13));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    unary_prefix_ops: Vec<UnaryOperator>,
    unary_suffix_ops: Vec<UnaryOperator>,
    binary_ops: Vec<BinaryOperator>,
    /// Rows of operator symbols; row 0 binds tightest.
    precedence: Vec<Vec<String>>,
}

impl Config {
    /// Registered unary prefix operators, in registration order.
    pub fn unary_prefix_ops(&self) -> &[UnaryOperator] {
        &self.unary_prefix_ops
    }

    /// Registered unary suffix operators, in registration order.
    pub fn unary_suffix_ops(&self) -> &[UnaryOperator] {
        &self.unary_suffix_ops
    }

    /// Registered binary operators, in registration order.
    pub fn binary_ops(&self) -> &[BinaryOperator] {
        &self.binary_ops
    }

    /// The precedence table: rows of binary-operator symbols, tightest
    /// binding first.
    pub fn precedence_table(&self) -> &[Vec<String>] {
        &self.precedence
    }

    /// Registers a unary prefix operator.
    pub fn add_unary_prefix_op(&mut self, op: UnaryOperator) -> Result<(), ConfigError> {
        if self.has_unary_prefix_op(&op.symbol) {
            return Err(ConfigError::DuplicateOperator {
                symbol: op.symbol,
                kind: SymbolKind::UnaryPrefixOperator,
            });
        }
        self.unary_prefix_ops.push(op);
        Ok(())
    }

    /// Removes a unary prefix operator.
    pub fn remove_unary_prefix_op(&mut self, symbol: &str) -> Result<(), ConfigError> {
        let index = self
            .unary_prefix_ops
            .iter()
            .position(|op| op.symbol == symbol)
            .ok_or_else(|| ConfigError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind: SymbolKind::UnaryPrefixOperator,
            })?;
        self.unary_prefix_ops.remove(index);
        Ok(())
    }

    /// Looks up a unary prefix operator by symbol.
    pub fn unary_prefix_op(&self, symbol: &str) -> Option<&UnaryOperator> {
        self.unary_prefix_ops.iter().find(|op| op.symbol == symbol)
    }

    /// Checks whether a unary prefix operator is registered.
    pub fn has_unary_prefix_op(&self, symbol: &str) -> bool {
        self.unary_prefix_op(symbol).is_some()
    }

    /// Registers a unary suffix operator.
    pub fn add_unary_suffix_op(&mut self, op: UnaryOperator) -> Result<(), ConfigError> {
        if self.has_unary_suffix_op(&op.symbol) {
            return Err(ConfigError::DuplicateOperator {
                symbol: op.symbol,
                kind: SymbolKind::UnarySuffixOperator,
            });
        }
        self.unary_suffix_ops.push(op);
        Ok(())
    }

    /// Removes a unary suffix operator.
    pub fn remove_unary_suffix_op(&mut self, symbol: &str) -> Result<(), ConfigError> {
        let index = self
            .unary_suffix_ops
            .iter()
            .position(|op| op.symbol == symbol)
            .ok_or_else(|| ConfigError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind: SymbolKind::UnarySuffixOperator,
            })?;
        self.unary_suffix_ops.remove(index);
        Ok(())
    }

    /// Looks up a unary suffix operator by symbol.
    pub fn unary_suffix_op(&self, symbol: &str) -> Option<&UnaryOperator> {
        self.unary_suffix_ops.iter().find(|op| op.symbol == symbol)
    }

    /// Checks whether a unary suffix operator is registered.
    pub fn has_unary_suffix_op(&self, symbol: &str) -> bool {
        self.unary_suffix_op(symbol).is_some()
    }

    /// Registers a binary operator. The operator is not parseable until a
    /// precedence level is [assigned](Self::assign_precedence) to it.
    pub fn add_binary_op(&mut self, op: BinaryOperator) -> Result<(), ConfigError> {
        if self.has_binary_op(&op.symbol) {
            return Err(ConfigError::DuplicateOperator {
                symbol: op.symbol,
                kind: SymbolKind::BinaryOperator,
            });
        }
        self.binary_ops.push(op);
        Ok(())
    }

    /// Removes a binary operator. Any precedence entry for it stops
    /// matching but stays in the table until
    /// [unassigned](Self::unassign_precedence).
    pub fn remove_binary_op(&mut self, symbol: &str) -> Result<(), ConfigError> {
        let index = self
            .binary_ops
            .iter()
            .position(|op| op.symbol == symbol)
            .ok_or_else(|| ConfigError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind: SymbolKind::BinaryOperator,
            })?;
        self.binary_ops.remove(index);
        Ok(())
    }

    /// Looks up a binary operator by symbol.
    pub fn binary_op(&self, symbol: &str) -> Option<&BinaryOperator> {
        self.binary_ops.iter().find(|op| op.symbol == symbol)
    }

    /// Checks whether a binary operator is registered. Registration does not
    /// imply that the operator has a precedence level.
    pub fn has_binary_op(&self, symbol: &str) -> bool {
        self.binary_op(symbol).is_some()
    }

    /// Assigns precedence `level` to a registered binary operator.
    ///
    /// With `insert_row`, a new row is inserted at `level` (shifting looser
    /// rows down) and the operator becomes its only occupant. With
    /// `replace`, an existing assignment is moved instead of being an error;
    /// if moving the operator empties its old row, that row is dropped and
    /// `level` is interpreted against the collapsed table.
    pub fn assign_precedence(
        &mut self,
        symbol: &str,
        level: usize,
        insert_row: bool,
        replace: bool,
    ) -> Result<(), ConfigError> {
        if !self.has_binary_op(symbol) {
            return Err(ConfigError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind: SymbolKind::BinaryOperator,
            });
        }

        let mut level = level;
        if let Some(row_idx) = self
            .precedence
            .iter()
            .position(|row| row.iter().any(|entry| entry == symbol))
        {
            if !replace {
                return Err(ConfigError::AlreadyAssigned {
                    symbol: symbol.to_owned(),
                    level: row_idx,
                });
            }

            let row = &mut self.precedence[row_idx];
            row.retain(|entry| entry != symbol);
            if row.is_empty() {
                self.precedence.remove(row_idx);
                if row_idx < level {
                    level -= 1;
                }
            }
        }

        if insert_row {
            if level > self.precedence.len() {
                return Err(ConfigError::PrecedenceOutOfRange {
                    level,
                    rows: self.precedence.len(),
                });
            }
            self.precedence.insert(level, Vec::new());
        }

        if level >= self.precedence.len() {
            return Err(ConfigError::PrecedenceOutOfRange {
                level,
                rows: self.precedence.len(),
            });
        }
        self.precedence[level].push(symbol.to_owned());
        Ok(())
    }

    /// Assigns the least precedence to a registered binary operator: the
    /// last existing row, or a fresh last row when `insert_row` is set.
    ///
    /// Assigning into the last row of an empty table is an error.
    pub fn assign_least_precedence(
        &mut self,
        symbol: &str,
        insert_row: bool,
        replace: bool,
    ) -> Result<(), ConfigError> {
        if insert_row {
            self.assign_precedence(symbol, self.precedence.len(), true, replace)
        } else if self.precedence.is_empty() {
            Err(ConfigError::PrecedenceOutOfRange { level: 0, rows: 0 })
        } else {
            self.assign_precedence(symbol, self.precedence.len() - 1, false, replace)
        }
    }

    /// Removes a binary operator's precedence entry, making it unreachable
    /// for the parser. A row left empty is dropped.
    pub fn unassign_precedence(&mut self, symbol: &str) -> Result<(), ConfigError> {
        if !self.has_binary_op(symbol) {
            return Err(ConfigError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind: SymbolKind::BinaryOperator,
            });
        }

        if let Some(row_idx) = self
            .precedence
            .iter()
            .position(|row| row.iter().any(|entry| entry == symbol))
        {
            let row = &mut self.precedence[row_idx];
            row.retain(|entry| entry != symbol);
            if row.is_empty() {
                self.precedence.remove(row_idx);
            }
        }
        Ok(())
    }

    /// Returns the precedence level of a binary operator, or `None` if the
    /// operator is unknown or has no assigned level.
    pub fn precedence_of(&self, symbol: &str) -> Option<usize> {
        self.precedence
            .iter()
            .position(|row| row.iter().any(|entry| entry == symbol))
    }
}

fn factorial(x: f32) -> f32 {
    if x < 0.0 {
        return 0.0;
    }
    let mut result = 1.0;
    for i in 1..=(x as i32) {
        result *= i as f32;
    }
    result
}

fn wrapping_modulo(x: f32, y: f32) -> f32 {
    let divisor = y as i32;
    let rem = (x as i32).wrapping_rem(divisor);
    if rem < 0 {
        (rem + divisor) as f32
    } else {
        rem as f32
    }
}

fn bool_to_float(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl Default for Config {
    /// The standard operator set.
    fn default() -> Self {
        let unary_prefix_ops = vec![
            UnaryOperator::new("+", |_, _, x| Ok(x)),
            UnaryOperator::new("-", |_, _, x| Ok(-x)),
            UnaryOperator::new("*", |_, _, x| Ok(x)),
            UnaryOperator::new("/", |code, span, x| {
                if x == 0.0 {
                    return Err(Error::eval("Division by zero", span, code));
                }
                Ok(1.0 / x)
            }),
            UnaryOperator::new("!", |_, _, x| Ok(bool_to_float(x == 0.0))),
            UnaryOperator::new("~", |_, _, x| Ok(!(x as i32) as f32)),
        ];

        // Factorial; yields 0 for negative operands.
        let unary_suffix_ops = vec![UnaryOperator::new("!", |_, _, x| Ok(factorial(x)))];

        use Associativity::{Left, Right};
        let binary_ops = vec![
            BinaryOperator::new("+", Left, |_, _, x, y| Ok(x + y)),
            BinaryOperator::new("-", Left, |_, _, x, y| Ok(x - y)),
            BinaryOperator::new("*", Left, |_, _, x, y| Ok(x * y)),
            BinaryOperator::new("/", Left, |code, span, x, y| {
                if y == 0.0 {
                    return Err(Error::eval("Division by zero", span, code));
                }
                Ok(x / y)
            }),
            BinaryOperator::new("%", Left, |code, span, x, y| {
                if y == 0.0 {
                    return Err(Error::eval("Modulo by zero", span, code));
                }
                Ok(x % y)
            }),
            BinaryOperator::new("%%", Left, |code, span, x, y| {
                if y as i32 == 0 {
                    return Err(Error::eval("Wrapping modulo by zero", span, code));
                }
                Ok(wrapping_modulo(x, y))
            }),
            BinaryOperator::new("**", Right, |_, _, x, y| Ok(x.powf(y))),
            BinaryOperator::new("//", Left, |code, span, x, y| {
                if y == 0.0 {
                    return Err(Error::eval("Flooring division by zero", span, code));
                }
                Ok((x / y).floor())
            }),
            BinaryOperator::new("==", Left, |_, _, x, y| Ok(bool_to_float(x == y))),
            BinaryOperator::new("!=", Left, |_, _, x, y| Ok(bool_to_float(x != y))),
            BinaryOperator::new("<", Left, |_, _, x, y| Ok(bool_to_float(x < y))),
            BinaryOperator::new(">", Left, |_, _, x, y| Ok(bool_to_float(x > y))),
            BinaryOperator::new("<=", Left, |_, _, x, y| Ok(bool_to_float(x <= y))),
            BinaryOperator::new(">=", Left, |_, _, x, y| Ok(bool_to_float(x >= y))),
            BinaryOperator::new("&&", Left, |_, _, x, y| {
                Ok(bool_to_float(x != 0.0 && y != 0.0))
            }),
            BinaryOperator::new("||", Left, |_, _, x, y| {
                Ok(bool_to_float(x != 0.0 || y != 0.0))
            }),
            BinaryOperator::new("&", Left, |_, _, x, y| {
                Ok(((x as i32) & (y as i32)) as f32)
            }),
            BinaryOperator::new("|", Left, |_, _, x, y| {
                Ok(((x as i32) | (y as i32)) as f32)
            }),
            BinaryOperator::new("^", Left, |_, _, x, y| {
                Ok(((x as i32) ^ (y as i32)) as f32)
            }),
            BinaryOperator::new("<<", Left, |_, _, x, y| {
                Ok((x as i32).wrapping_shl(y as u32) as f32)
            }),
            BinaryOperator::new(">>", Left, |_, _, x, y| {
                Ok((x as i32).wrapping_shr(y as u32) as f32)
            }),
            BinaryOperator::new("!!", Left, |_, _, x, y| Ok((x - y).abs())),
            BinaryOperator::new("??", Right, |_, _, x, y| {
                Ok(if x != 0.0 { x } else { y })
            }),
            BinaryOperator::new("<?", Left, |_, _, x, y| Ok(x.min(y))),
            BinaryOperator::new(">?", Left, |_, _, x, y| Ok(x.max(y))),
        ];

        // Tightest binding first.
        const PRECEDENCE: &[&[&str]] = &[
            &["<<", ">>"],
            &["^"],
            &["&", "|"],
            &["!!"],
            &["<?", ">?"],
            &["??"],
            &["**"],
            &["//"],
            &["%", "%%"],
            &["*", "/"],
            &["+", "-"],
            &["==", "!=", "<", ">", "<=", ">="],
            &["&&", "||"],
        ];
        let precedence = PRECEDENCE
            .iter()
            .map(|row| row.iter().map(|symbol| (*symbol).to_owned()).collect())
            .collect();

        Self {
            unary_prefix_ops,
            unary_suffix_ops,
            binary_ops,
            precedence,
        }
    }
}
