//! Simple CLI / REPL for evaluating arithmetic expressions.

use clap::Parser;
use rustyline::{error::ReadlineError, DefaultEditor};

use std::{cell::RefCell, process, rc::Rc};

use formula_engine::{dump_tokens, Code, Config, ConfigRef, Context, ContextRef, Expression};

const ABOUT: &str = "CLI and REPL for parsing and evaluating arithmetic expressions.";

const ERROR_EXIT_CODE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "formula", about = ABOUT)]
struct Args {
    /// Print the token stream and AST instead of evaluating.
    #[arg(long)]
    ast: bool,
    /// Expression to evaluate. If omitted, an interactive REPL is started.
    expr: Option<String>,
}

enum Outcome {
    Value(f32),
    AstShown,
    Failed,
}

fn process_line(
    source: &str,
    name: &str,
    ast_only: bool,
    config: &ConfigRef,
    context: &ContextRef,
) -> Outcome {
    let mut expr = Expression::new(Code::named(source, name))
        .with_config(Rc::clone(config))
        .with_context(Rc::clone(context));

    if let Err(err) = expr.parse() {
        eprint!("{err}");
        return Outcome::Failed;
    }

    if ast_only {
        print!("{}", dump_tokens(expr.code(), expr.tokens()));
        if let Some(ast) = expr.ast() {
            print!("{}", ast.dump(expr.code(), 0));
        }
        return Outcome::AstShown;
    }

    match expr.evaluate() {
        Ok(value) => Outcome::Value(value),
        Err(err) => {
            eprint!("{err}");
            Outcome::Failed
        }
    }
}

fn run_once(source: &str, ast_only: bool, config: &ConfigRef, context: &ContextRef) {
    match process_line(source, "<input>", ast_only, config, context) {
        Outcome::Value(value) => println!("{value}"),
        Outcome::AstShown => {}
        Outcome::Failed => process::exit(ERROR_EXIT_CODE),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits REPL-level `name = expr` sugar. Comparison operators (`==`, `!=`,
/// `<=`, `>=`) are left to the expression grammar.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let idx = line.find('=')?;
    let (lhs, rest) = line.split_at(idx);
    let rhs = &rest[1..];
    if rhs.starts_with('=') {
        return None;
    }
    if matches!(lhs.trim_end().chars().last(), Some('!' | '<' | '>')) {
        return None;
    }

    let name = lhs.trim();
    if !is_identifier(name) {
        return None;
    }
    Some((name, rhs))
}

fn repl(ast_only: bool, config: &ConfigRef, context: &ContextRef) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Formula REPL. Type an expression, or `name = expr` to bind a variable.");
    println!("Press Ctrl-D to exit.");

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match split_assignment(&line) {
                    Some((name, source)) => {
                        if let Outcome::Value(value) =
                            process_line(source, "repl", ast_only, config, context)
                        {
                            context.borrow_mut().set_variable(name, value);
                            println!("{name} = {value}");
                        }
                    }
                    None => {
                        if let Outcome::Value(value) =
                            process_line(&line, "repl", ast_only, config, context)
                        {
                            println!("{value}");
                        }
                    }
                }
            }

            Err(ReadlineError::Interrupted) => {
                println!("Bye");
                break Ok(());
            }

            Err(ReadlineError::Eof) => {
                break Ok(());
            }

            Err(err) => break Err(err.into()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Rc::new(RefCell::new(Config::default()));
    let mut context = Context::new();
    context.populate();
    let context = Rc::new(RefCell::new(context));

    match args.expr {
        Some(expr) => {
            run_once(&expr, args.ast, &config, &context);
            Ok(())
        }
        None => repl(args.ast, &config, &context),
    }
}
