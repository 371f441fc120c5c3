use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
};

use anyhow::anyhow;
use clap::Parser;

use interpreter::InterpretError;

#[derive(clap::Parser)]
#[command(about = "Evaluates flow expressions from a file or an interactive prompt")]
struct Args {
    file: Option<PathBuf>,

    /// Print the parsed expression tree before its value
    #[arg(long)]
    print_ast: bool,
}

fn run_file(path: PathBuf, args: &Args) -> anyhow::Result<()> {
    log::debug!("Running {}", path.display());
    run(&std::fs::read_to_string(path)?, args)
}

fn run_prompt(args: &Args) -> anyhow::Result<()> {
    println!("Welcome to the flow interpreter!");
    println!("Type 'exit' to quit.");

    for line_number in 1.. {
        print!("{line_number} |> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        if let Err(e) = run(&line, args) {
            println!("{}", e);
        }
    }
    Ok(())
}

fn run(source: &str, args: &Args) -> anyhow::Result<()> {
    if args.print_ast {
        print_ast(source);
    }

    match interpreter::run_source(source, &mut stdout()) {
        Ok(_) => Ok(()),
        Err(InterpretError::Io(e)) => Err(e.into()),
        Err(e) => Err(anyhow!("{e}")),
    }
}

fn print_ast(source: &str) {
    let Ok(tokens) = scanner::scan(source) else {
        // run_source reports the scan error
        return;
    };
    if let Some(expr) = parser::parse(tokens, |_| ()) {
        println!("Parsed expression: {}", expr);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.file {
        Some(file) => run_file(file.clone(), &args),
        None => run_prompt(&args),
    }
}
