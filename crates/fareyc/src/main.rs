//! The Farey compiler CLI.
//!
//! Provides the `fareyc` command with the following subcommands:
//!
//! - `fareyc tokens <file>` - print the token stream
//! - `fareyc parse <file>` - print the canonical AST
//! - `fareyc check <file>` - translate to IR, print the IR and final scope
//! - `fareyc run <file>` - interpret, print the final value and scope

mod diagnostics;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fareyc", version, about = "The Farey toolchain CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream
    Tokens {
        file: PathBuf,
        /// Emit the token stream as a JSON array instead of one line per token
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical AST
    Parse { file: PathBuf },
    /// Translate to IR and print it alongside the final type scope
    Check { file: PathBuf },
    /// Interpret the program and print its final value and scope
    Run { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tokens { file, json } => run_tokens(&file, json),
        Commands::Parse { file } => run_parse(&file),
        Commands::Check { file } => run_check(&file),
        Commands::Run { file } => run_interp(&file),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn read_source(file: &PathBuf) -> Result<String, i32> {
    std::fs::read_to_string(file).map_err(|e| {
        eprintln!("error: failed to read '{}': {e}", file.display());
        1
    })
}

fn run_tokens(file: &PathBuf, json: bool) -> Result<(), i32> {
    let source = read_source(file)?;
    let tokens = farey_lexer::Tokenizer::new(&source).tokenize_all().map_err(|e| {
        diagnostics::report_tokenizer_error(&source, &e);
        1
    })?;
    if json {
        let rendered = serde_json::to_string_pretty(&tokens).map_err(|e| {
            eprintln!("error: failed to serialize tokens: {e}");
            1
        })?;
        println!("{rendered}");
    } else {
        for token in &tokens {
            println!("{:?} {:?} @{}:{}", token.kind, token.text, token.line_number, token.line_position);
        }
    }
    Ok(())
}

fn run_parse(file: &PathBuf) -> Result<(), i32> {
    let source = read_source(file)?;
    let ast = farey_parser::parse(&source).map_err(|e| {
        diagnostics::report_parse_error(&source, &e);
        1
    })?;
    println!("{}", ast.to_canonical_string());
    Ok(())
}

fn run_check(file: &PathBuf) -> Result<(), i32> {
    let source = read_source(file)?;
    let ast = farey_parser::parse(&source).map_err(|e| {
        diagnostics::report_parse_error(&source, &e);
        1
    })?;
    let ops = farey_ops::with_builtins();
    let (scope, ir) = farey_ir::translate(&ast, None, &ops).map_err(|e| {
        diagnostics::report_translate_error(&e);
        1
    })?;
    println!("{}", ir.to_indented_string());
    print!("{}", farey_scope::to_string_indented(&scope, 0));
    Ok(())
}

fn run_interp(file: &PathBuf) -> Result<(), i32> {
    let source = read_source(file)?;
    let ast = farey_parser::parse(&source).map_err(|e| {
        diagnostics::report_parse_error(&source, &e);
        1
    })?;
    let ops = farey_ops::with_builtins();
    let state = farey_interp::State::root();
    let (value, final_state) = farey_interp::interpret(&ast, &state, &ops).map_err(|e| {
        diagnostics::report_interp_error(&source, &e);
        1
    })?;
    println!("{value}");
    print!("{}", farey_scope::to_string_indented(&final_state.scope, 0));
    Ok(())
}
