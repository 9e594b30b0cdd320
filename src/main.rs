use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;

use slate::checker::Checker;
use slate::pretty;
use slate::source::{load_program, LoadedProgram};
use slate::tokenizer::Tokenizer;

#[derive(ClapParser)]
#[command(name = "slate", about = "The Slate language front-end")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a program (following includes) and run the semantic checker
    Check { file: PathBuf },
    /// Dump the token stream of a single file
    Tokens { file: PathBuf },
    /// Pretty-print the parsed top-level declarations
    Ast { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check { file } => cmd_check(&file),
        Commands::Tokens { file } => cmd_tokens(&file),
        Commands::Ast { file } => cmd_ast(&file),
    }
}

fn load_or_exit(file: &Path) -> LoadedProgram {
    match load_program(file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            process::exit(1);
        }
    }
}

fn cmd_check(file: &Path) {
    let mut loaded = load_or_exit(file);
    println!("Check: {}", file.display().to_string().cyan());

    let mut checker = Checker::new(&mut loaded.ast, &loaded.program, &loaded.tokenizers);
    let ok = checker.check();
    let errors = std::mem::take(&mut checker.errors);
    drop(checker);

    if ok {
        println!("{}", "No errors found.".green());
        return;
    }
    for error in &errors {
        eprintln!("{}", error.render(&loaded.tokenizers, &loaded.ast).red());
    }
    eprintln!(
        "{}",
        format!(
            "{} error{} found.",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        )
        .red()
    );
    process::exit(1);
}

fn cmd_tokens(file: &Path) {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{}", format!("cannot read '{}': {}", file.display(), e).red());
            process::exit(1);
        }
    };
    let mut tokenizer = Tokenizer::new(0, file, content);
    for token in tokenizer.tokenize_all() {
        let pos = tokenizer.token_position_info(token);
        println!(
            "{}:{}\t{:?}\t'{}'",
            pos.line,
            pos.column,
            token.kind,
            tokenizer.extract_token(token)
        );
    }
}

fn cmd_ast(file: &Path) {
    let loaded = load_or_exit(file);
    for &dec in &loaded.program.decs {
        match pretty::struct_signature(&loaded.ast, &loaded.tokenizers, dec) {
            Some(full) => println!("{}", full),
            None => println!(
                "{}",
                pretty::declaration_signature(&loaded.ast, &loaded.tokenizers, dec)
            ),
        }
    }
}
