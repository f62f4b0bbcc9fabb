//! Standard variables and functions for populated contexts.

use std::{
    f32::consts,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    context::check_arity,
    error::{Error, ErrorKind},
    Context,
};

const CONSTANTS: &[(&str, f32)] = &[
    ("e", consts::E),
    ("log2e", consts::LOG2_E),
    ("log10e", consts::LOG10_E),
    ("pi", consts::PI),
    ("inv_pi", consts::FRAC_1_PI),
    ("inv_sqrtpi", 0.564_189_58),
    ("ln2", consts::LN_2),
    ("ln10", consts::LN_10),
    ("sqrt2", consts::SQRT_2),
    ("sqrt3", 1.732_050_8),
    ("inv_sqrt3", 0.577_350_26),
    ("egamma", 0.577_215_66),
    ("phi", 1.618_034),
];

fn unary(context: &mut Context, name: &'static str, f: fn(f32) -> f32) {
    context.set_function(name, move |code, span, args| {
        check_arity(name, 1, args, code, span)?;
        Ok(f(args[0]))
    });
}

fn binary(context: &mut Context, name: &'static str, f: fn(f32, f32) -> f32) {
    context.set_function(name, move |code, span, args| {
        check_arity(name, 2, args, code, span)?;
        Ok(f(args[0], args[1]))
    });
}

fn ternary(context: &mut Context, name: &'static str, f: fn(f32, f32, f32) -> f32) {
    context.set_function(name, move |code, span, args| {
        check_arity(name, 3, args, code, span)?;
        Ok(f(args[0], args[1], args[2]))
    });
}

/// Registers a function taking one or more arguments.
fn spread(context: &mut Context, name: &'static str, f: fn(&[f32]) -> f32) {
    context.set_function(name, move |code, span, args| {
        if args.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidArity {
                    function: name.to_owned(),
                    expected: 1,
                    actual: 0,
                },
                span,
                code,
            ));
        }
        Ok(f(args))
    });
}

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Context {
    /// Populates this context with the standard variables and functions:
    /// mathematical constants (`pi`, `e`, `phi`, …) and commonly used
    /// functions (`sin`, `sqrt`, `clamp`, `min`/`max`/`avg`, …), mostly
    /// wrapping the `f32` standard library.
    ///
    /// Existing bindings with the same names are overridden, so populate a
    /// context before adding custom symbols to it.
    pub fn populate(&mut self) {
        for &(name, value) in CONSTANTS {
            self.set_variable(name, value);
        }

        unary(self, "abs", f32::abs);
        unary(self, "acos", f32::acos);
        unary(self, "acosh", f32::acosh);
        unary(self, "asin", f32::asin);
        unary(self, "asinh", f32::asinh);
        unary(self, "atan", f32::atan);
        unary(self, "atanh", f32::atanh);
        unary(self, "cbrt", f32::cbrt);
        unary(self, "ceil", f32::ceil);
        unary(self, "cos", f32::cos);
        unary(self, "cosh", f32::cosh);
        unary(self, "exp", f32::exp);
        unary(self, "exp2", f32::exp2);
        unary(self, "expm1", f32::exp_m1);
        unary(self, "floor", f32::floor);
        unary(self, "log", f32::ln);
        unary(self, "log1p", f32::ln_1p);
        unary(self, "log10", f32::log10);
        unary(self, "log2", f32::log2);
        unary(self, "round", f32::round);
        unary(self, "sin", f32::sin);
        unary(self, "sinh", f32::sinh);
        unary(self, "sqrt", f32::sqrt);
        unary(self, "tan", f32::tan);
        unary(self, "tanh", f32::tanh);
        unary(self, "trunc", f32::trunc);

        binary(self, "atan2", f32::atan2);
        binary(self, "dim", |x, y| (x - y).max(0.0));
        binary(self, "gcd", |x, y| {
            gcd_i64(x.round() as i64, y.round() as i64) as f32
        });
        binary(self, "hypot", f32::hypot);
        binary(self, "lcm", |x, y| {
            let (a, b) = (x.round() as i64, y.round() as i64);
            let g = gcd_i64(a, b);
            if g == 0 {
                0.0
            } else {
                (a / g * b).abs() as f32
            }
        });
        binary(self, "midpoint", |x, y| (x + y) / 2.0);
        binary(self, "mod", |x, y| x % y);
        binary(self, "pow", f32::powf);

        // `clamp` tolerates an inverted range instead of panicking.
        ternary(self, "clamp", |x, lo, hi| x.max(lo).min(hi));
        ternary(self, "fma", f32::mul_add);
        ternary(self, "lerp", |a, b, t| a + t * (b - a));

        spread(self, "avg", |args| {
            args.iter().sum::<f32>() / args.len() as f32
        });
        spread(self, "max", |args| {
            args.iter().copied().fold(f32::NEG_INFINITY, f32::max)
        });
        spread(self, "min", |args| {
            args.iter().copied().fold(f32::INFINITY, f32::min)
        });

        self.set_function("rand", |code, span, args| {
            check_arity("rand", 0, args, code, span)?;
            Ok(rand::random::<f32>())
        });
        self.set_function("time", |code, span, args| {
            check_arity("time", 0, args, code, span)?;
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0.0, |elapsed| elapsed.as_secs_f32());
            Ok(now)
        });
    }
}
