//! # Formula Engine REPL
//!
//! An interactive Read-Eval-Print loop over a single [`Registry`] slot.
//! Accepts `let name = expr` bindings, which extend the running variable
//! table, and bare expressions, evaluated immediately against it.
//!
//! Unlike the teacher's REPL — which accumulated source into a temp file
//! and re-invoked itself as a subprocess to execute it — this one evaluates
//! in-process against the `Registry` directly: there is no separate script
//! file or external interpreter to hand a block off to here, so the extra
//! process hop would only add latency.
//!
//! Exits cleanly on EOF (Ctrl+D) or `exit`/`quit`.

use std::io::{self, Write};

use formula_engine::{explain, Registry};

/// Run the REPL on stdin/stdout until EOF or an exit command.
pub fn repl_interpret() {
    println!("formula-engine REPL — `let name = expr` to bind a variable, or type a bare expression.");
    println!("Type `exit` or `quit` to leave.");

    let mut names: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut registry = Registry::new(1);

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("input error: {}", e);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        if let Some(binding) = line.strip_prefix("let ") {
            handle_binding(binding, &mut registry, &mut names, &mut values);
            continue;
        }

        match evaluate_once(line, &mut registry, &names, &values) {
            Ok(result) => println!("{}", result),
            Err(message) => println!("{}", message),
        }
    }
}

fn handle_binding(binding: &str, registry: &mut Registry, names: &mut Vec<String>, values: &mut Vec<f64>) {
    let Some((name, expr)) = binding.split_once('=') else {
        println!("expected `let name = expr`");
        return;
    };
    let name = name.trim();
    let expr = expr.trim();
    if name.is_empty() {
        println!("expected a variable name before `=`");
        return;
    }

    match evaluate_once(expr, registry, names, values) {
        Ok(result) => {
            if let Some(pos) = names.iter().position(|n| n == name) {
                values[pos] = result;
            } else {
                names.push(name.to_string());
                values.push(result);
            }
            println!("{} = {}", name, result);
        }
        Err(message) => println!("{}", message),
    }
}

fn evaluate_once(expr: &str, registry: &mut Registry, names: &[String], values: &[f64]) -> Result<f64, String> {
    let vars = names.to_vec();
    if let Err(err) = registry.parse(1, expr, &vars) {
        return Err(explain(expr, &err));
    }
    registry.evaluate(1, values).map_err(|e| format!("evaluation error: {}", e))
}
