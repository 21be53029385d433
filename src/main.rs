use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use atlast::runtime::error::Status;
use atlast::runtime::interpreter::atlast_interpreter::AtlastInterpreter;

/// Run a script file through `load`, printing the diagnostic `load` already emitted and returning
/// its status.
fn run_file(interp: &mut AtlastInterpreter, path: &str) -> Status {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("atlast: cannot read {}: {}", path, error);
            return Status::Application;
        }
    };

    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    interp.load(path, &lines)
}

/// A minimal read-eval-print loop: one line in, one status line out. There is no `std.f`-equivalent
/// bootstrap script to load first — every word a script can use is already registered by `init()`.
fn repl(interp: &mut AtlastInterpreter) {
    let stdin = io::stdin();
    print!("atlast> ");
    io::stdout().flush().ok();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        let status = interp.eval(&line);
        if status == Status::Normal {
            println!("ok");
        } else {
            println!("{}", status);
        }

        print!("atlast> ");
        io::stdout().flush().ok();
    }
    println!();
}

fn main() {
    let mut interp = AtlastInterpreter::new();
    if let Err(error) = interp.init() {
        eprintln!("atlast: failed to initialize: {}", error);
        std::process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first() {
        Some(path) => {
            if run_file(&mut interp, path) != Status::Normal {
                std::process::exit(1);
            }
        }
        None => repl(&mut interp),
    }
}
