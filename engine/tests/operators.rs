//! Default operator set: functional evaluation, precedence and
//! associativity properties.

use formula_engine::{express, Associativity, Config, Error};

fn eval(expr: &str) -> f32 {
    express(expr, None, None).unwrap()
}

fn try_eval(expr: &str) -> Result<f32, Error> {
    express(expr, None, None)
}

#[test]
fn binary_operators() {
    assert_eq!(eval("1 + 2"), 3.0);
    assert_eq!(eval("5 - 3"), 2.0);
    assert_eq!(eval("4 * 2"), 8.0);
    assert_eq!(eval("8 / 2"), 4.0);
    assert_eq!(eval("7 % 4"), 3.0);
    assert_eq!(eval("-2 %% 5"), 3.0);
    assert_eq!(eval("2 ** 3"), 8.0);
    assert_eq!(eval("7 // 2"), 3.0);
    assert_eq!(eval("2 == 2"), 1.0);
    assert_eq!(eval("2 != 2"), 0.0);
    assert_eq!(eval("2 < 3"), 1.0);
    assert_eq!(eval("3 > 2"), 1.0);
    assert_eq!(eval("2 <= 2"), 1.0);
    assert_eq!(eval("2 >= 3"), 0.0);
    assert_eq!(eval("1 && 0"), 0.0);
    assert_eq!(eval("1 || 0"), 1.0);
    assert_eq!(eval("3 & 1"), 1.0);
    assert_eq!(eval("2 | 1"), 3.0);
    assert_eq!(eval("2 ^ 3"), 1.0);
    assert_eq!(eval("1 << 2"), 4.0);
    assert_eq!(eval("4 >> 1"), 2.0);
    assert_eq!(eval("3 !! 5"), 2.0);
    assert_eq!(eval("0 ?? 5"), 5.0);
    assert_eq!(eval("4 ?? 5"), 4.0);
    assert_eq!(eval("3 <? 5"), 3.0);
    assert_eq!(eval("3 >? 5"), 5.0);
}

#[test]
fn prefix_operators() {
    assert_eq!(eval("+5"), 5.0);
    assert_eq!(eval("-5"), -5.0);
    assert_eq!(eval("*5"), 5.0);
    assert_eq!(eval("/5"), 0.2);
    assert_eq!(eval("!0"), 1.0);
    assert_eq!(eval("!1"), 0.0);
    assert_eq!(eval("~1"), -2.0);
}

#[test]
fn suffix_operators() {
    assert_eq!(eval("4!"), 24.0);
    assert_eq!(eval("5!"), 120.0);
    assert_eq!(eval("0!"), 1.0);
    // Negative operands yield 0.
    assert_eq!(eval("(-3)!"), 0.0);
}

#[test]
fn conditional_operator() {
    assert_eq!(eval("1 ? 2 : 3"), 2.0);
    assert_eq!(eval("0 ? 2 : 3"), 3.0);
}

#[test]
fn nested_conditionals_without_parentheses() {
    // The branches are full expressions, so conditionals nest freely.
    for (flat, parenthesized) in [
        ("0 ? 0 ? 1 : 2 : 3", "0 ? (0 ? 1 : 2) : 3"),
        ("1 ? 0 ? 1 : 2 : 3", "1 ? (0 ? 1 : 2) : 3"),
        ("0 ? 1 : 0 ? 2 : 3", "0 ? 1 : (0 ? 2 : 3)"),
        ("0 ? 1 : 1 ? 2 : 3", "0 ? 1 : (1 ? 2 : 3)"),
        ("1 ? 0 ? 1 : 2 : 1 ? 3 : 4", "1 ? (0 ? 1 : 2) : (1 ? 3 : 4)"),
        ("0 ? 0 ? 1 : 2 : 1 ? 3 : 4", "0 ? (0 ? 1 : 2) : (1 ? 3 : 4)"),
    ] {
        assert_eq!(eval(flat), eval(parenthesized), "{flat}");
    }
}

/// Compares two expressions that must evaluate identically; combinations
/// whose reference form fails or is non-finite are skipped, mirroring how
/// not every operator pair is defined for the probe values.
fn assert_same_value(reference: &str, probe: &str) {
    let expected = match try_eval(reference) {
        Ok(value) if value.is_finite() => value,
        _ => return,
    };
    assert_eq!(try_eval(probe).unwrap(), expected, "{probe} vs {reference}");
}

#[test]
fn tighter_operators_bind_first_for_every_pair() {
    let config = Config::default();
    let (a, b, c, d) = (1, 2, 3, 4);

    for looser in config.binary_ops() {
        for tighter in config.binary_ops() {
            if looser.symbol == tighter.symbol {
                continue;
            }
            let (Some(looser_level), Some(tighter_level)) = (
                config.precedence_of(&looser.symbol),
                config.precedence_of(&tighter.symbol),
            ) else {
                continue;
            };
            // Tighter binding = smaller level.
            if looser_level <= tighter_level {
                continue;
            }
            let (lo, ti) = (&looser.symbol, &tighter.symbol);

            // Tighter pair on the left: a ti b lo c == (a ti b) lo c.
            assert_same_value(
                &format!("({a} {ti} {b}) {lo} {c}"),
                &format!("{a} {ti} {b} {lo} {c}"),
            );

            // Tighter pair on the right: a lo b ti c == a lo (b ti c).
            assert_same_value(
                &format!("{a} {lo} ({b} {ti} {c})"),
                &format!("{a} {lo} {b} {ti} {c}"),
            );

            // Tighter pairs on both sides.
            assert_same_value(
                &format!("({a} {ti} {b}) {lo} ({c} {ti} {d})"),
                &format!("{a} {ti} {b} {lo} {c} {ti} {d}"),
            );
        }
    }
}

#[test]
fn chains_group_according_to_associativity() {
    let config = Config::default();
    let (a, b, c) = (1, 2, 3);

    for op in config.binary_ops() {
        if config.precedence_of(&op.symbol).is_none() {
            continue;
        }
        let symbol = &op.symbol;
        let flat = format!("{a} {symbol} {b} {symbol} {c}");
        let grouped = match op.assoc {
            Associativity::Left => format!("({a} {symbol} {b}) {symbol} {c}"),
            Associativity::Right => format!("{a} {symbol} ({b} {symbol} {c})"),
        };
        assert_same_value(&grouped, &flat);
    }
}

#[test]
fn division_family_rejects_zero() {
    for expr in ["1 / 0", "1 % 0", "1 %% 0", "1 // 0", "/0"] {
        assert!(try_eval(expr).is_err(), "{expr} should fail");
    }
    // Messages distinguish the operations.
    let division = try_eval("1 / 0").unwrap_err();
    assert!(division.to_string().contains("Division by zero"));
    let modulo = try_eval("1 % 0").unwrap_err();
    assert!(modulo.to_string().contains("Modulo by zero"));
    let wrapping = try_eval("1 %% 0").unwrap_err();
    assert!(wrapping.to_string().contains("Wrapping modulo by zero"));
    let flooring = try_eval("1 // 0").unwrap_err();
    assert!(flooring.to_string().contains("Flooring division by zero"));
}

#[test]
fn prefix_operators_bind_tighter_than_binary() {
    assert_eq!(eval("-2 + 1"), -1.0);
    assert_eq!(eval("-2 ** 2"), 4.0);
    assert_eq!(eval("!0 + 1"), 2.0);
}

#[test]
fn mixed_unary_stacking() {
    assert_eq!(eval("--5"), 5.0);
    assert_eq!(eval("-3!"), -6.0);
    // Adjacent suffix `!`s need a separator, else they tokenize as the
    // binary `!!` operator.
    assert_eq!(eval("3! !"), 720.0);
    assert_eq!(eval("3 !! 3!"), 3.0);
}
