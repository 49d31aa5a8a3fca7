use std::{fs, io, process::ExitCode};

use clap::Parser;
use finlite::{
    Context,
    ast::printer::print_program,
    interpreter::{lexer::scan, parser::parse},
    repl, run_source,
};
use tracing_subscriber::EnvFilter;

/// finlite runs FinLite scripts: ledgers, portfolios, cashflows and
/// time-value-of-money calculations in a small indentation-aware language.
///
/// Without CONTENTS an interactive session is started.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells finlite to read CONTENTS as a path to a script file.
    #[arg(short, long)]
    file: bool,

    /// Prints the syntax tree instead of running the script.
    #[arg(long)]
    dump_ast: bool,

    /// Prints the token stream instead of running the script.
    #[arg(long)]
    tokens: bool,

    /// Source code to run, or a script path with `--file`.
    contents: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finlite=info"));
    tracing_subscriber::fmt().with_writer(io::stderr)
                             .with_env_filter(filter)
                             .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let Some(contents) = args.contents else {
        println!("FinLite {}. Enter an empty line to finish a block.", env!("CARGO_PKG_VERSION"));
        let mut context = Context::new();
        return match repl::run(&mut context, io::stdin().lock(), &mut io::stdout()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            },
        };
    };

    let script = if args.file {
        match fs::read_to_string(&contents) {
            Ok(script) => script,
            Err(_) => {
                eprintln!("Failed to read the input file '{contents}'. Perhaps this file does not exist?");
                return ExitCode::FAILURE;
            },
        }
    } else {
        contents
    };

    if args.tokens {
        for token in scan(&script) {
            println!("{token}");
        }
        return ExitCode::SUCCESS;
    }

    if args.dump_ast {
        let (program, errors) = parse(&scan(&script));
        for err in &errors {
            eprintln!("{err}");
        }
        print!("{}", print_program(&program));
        return if errors.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    match run_source(&script, &mut Context::new()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        },
    }
}
