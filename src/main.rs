use clap::{Arg, Command};
use modl::runner;
use std::fs;
use std::path::Path;

fn main() {
    let matches = Command::new("modl")
        .about("Interpreter for a small model teaching language")
        .arg(
            Arg::new("file")
                .help("The program file to run")
                .value_name("FILE")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the token stream after lexing")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let show_tokens = matches.get_flag("tokens");
    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path, show_tokens);
    }
}

fn run_file(path: &str, show_tokens: bool) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            if !runner::run(&source, path.to_str(), show_tokens) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
