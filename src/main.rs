//! Formula Engine CLI entry point.
//!
//! Behavior summary:
//! - With **no args**, start an interactive REPL.
//! - With `-h`/`--help`, print usage.
//! - With `-v`/`--version`, print the version.
//! - Otherwise, the first argument is the expression and any further
//!   `name=value` arguments bind its variables; it is parsed, evaluated
//!   once, and the result (or a diagnostic) is printed.

use std::env;

mod repl;

use repl::repl_interpret;

const VERSION: &str = "0.1.0";

fn usage() -> String {
    format!(
        r#"formula-engine v{0}

Usage:
    formula-engine '<expr>' [name=value ...]

Arguments:
    <expr>
        A mathematical expression, e.g. 'sqrt(x^2+y^2)'.
    name=value
        Bindings for each variable name referenced by <expr>, in any order.

With no arguments, starts an interactive REPL instead.

Options:
    -h, --help
        Show this help message and exit.
    -v, --version
        Show the version."#,
        VERSION
    )
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() == 1 {
        repl_interpret();
        return;
    }

    if args[1] == "-h" || args[1] == "--help" {
        println!("{}", usage());
        return;
    }

    if args[1] == "-v" || args[1] == "--version" {
        println!("formula-engine v{}", VERSION);
        return;
    }

    let expr = &args[1];
    let (names, values) = match parse_bindings(&args[2..]) {
        Ok(pair) => pair,
        Err(bad) => {
            eprintln!("malformed binding {:?}; expected name=value", bad);
            std::process::exit(2);
        }
    };

    let mut registry = formula_engine::Registry::new(1);
    if let Err(err) = registry.parse(1, expr, &names) {
        eprintln!("{}", formula_engine::explain(expr, &err));
        std::process::exit(1);
    }

    match registry.evaluate(1, &values) {
        Ok(result) => println!("{}", result),
        Err(err) => {
            eprintln!("evaluation error: {}", err);
            std::process::exit(1);
        }
    }
}

/// Parse `name=value` arguments into parallel `(names, values)` vectors,
/// preserving the order they were given in (which becomes each variable's
/// 0-based index).
fn parse_bindings(args: &[String]) -> Result<(Vec<String>, Vec<f64>), String> {
    let mut names = Vec::with_capacity(args.len());
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        let (name, value) = arg.split_once('=').ok_or_else(|| arg.clone())?;
        let value: f64 = value.parse().map_err(|_| arg.clone())?;
        names.push(name.to_string());
        values.push(value);
    }
    Ok((names, values))
}
