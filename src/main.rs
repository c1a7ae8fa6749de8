use hypno_lang::diagnostics::{emit_syntax_errors, report_io_error, report_runtime_error};
use hypno_lang::language::parser::parse_module;
use hypno_lang::runtime::Interpreter;
use std::path::Path;
use std::{env, fs, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: hypno-lang <filename.hy>");
        process::exit(1);
    }
    let filename = &args[1];

    if !filename.ends_with(".hy") {
        eprintln!("Invalid file extension. Only .hy files are allowed.");
        process::exit(1);
    }

    let source = match fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            report_io_error(Path::new(filename), &err);
            process::exit(1);
        }
    };

    let module = match parse_module(&source) {
        Ok(module) => module,
        Err(errors) => {
            emit_syntax_errors(filename, &source, &errors.errors);
            process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new();
    if let Err(err) = interpreter.run(&module) {
        report_runtime_error(&err);
        process::exit(1);
    }
}
