use crate::error::ModlError;
use crate::interpreter::{Environment, Interpreter, Value};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantics::SemanticAnalyzer;

/// Everything a successful pipeline run produces: the ordered write
/// events and the final variable snapshot.
pub struct Execution {
    pub output: Vec<Value>,
    pub environment: Environment,
}

/// A failed run. Semantic violations arrive as a batch (the analyzer
/// walks the whole tree), every other stage aborts on its first error.
/// Callers must keep the two categories user-visibly distinct.
#[derive(Debug)]
pub enum RunFailure {
    Error(ModlError),
    Violations(Vec<ModlError>),
}

impl From<ModlError> for RunFailure {
    fn from(error: ModlError) -> Self {
        RunFailure::Error(error)
    }
}

/// Front-to-back pipeline over in-memory source. The interpreter only
/// runs when validation reported zero violations; this is the single
/// validate-then-run gate.
pub fn execute(source: &str) -> Result<Execution, RunFailure> {
    let tokens = Lexer::new(source.to_string()).scan_tokens()?;
    let (program, symbols) = Parser::new(tokens).parse()?;

    let violations = SemanticAnalyzer::new(&symbols).analyze(&program);
    if !violations.is_empty() {
        return Err(RunFailure::Violations(violations));
    }

    let mut interpreter = Interpreter::new(&symbols);
    match interpreter.run(&program) {
        Ok(()) => Ok(Execution {
            output: interpreter.output().to_vec(),
            environment: interpreter.environment().clone(),
        }),
        Err(error) => Err(RunFailure::Error(error)),
    }
}

/// Runs a source file end to end and renders every outcome to the
/// terminal. Returns false when any stage failed.
pub fn run(source: &str, filename: Option<&str>, show_tokens: bool) -> bool {
    let tokens = match Lexer::new(source.to_string()).scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename);
            return false;
        }
    };

    if show_tokens {
        for token in &tokens {
            println!(
                "{:?}: {} (line {}, column {})",
                token.kind, token.text, token.line, token.column
            );
        }
        println!();
    }

    let (program, symbols) = match Parser::new(tokens).parse() {
        Ok(parsed) => parsed,
        Err(error) => {
            error.report(source, filename);
            return false;
        }
    };

    let violations = SemanticAnalyzer::new(&symbols).analyze(&program);
    if !violations.is_empty() {
        eprintln!("Found {} semantic violation(s); not executing.", violations.len());
        for violation in &violations {
            violation.report(source, filename);
        }
        return false;
    }

    let mut interpreter = Interpreter::new(&symbols);
    let result = interpreter.run(&program);

    // Writes emitted before a runtime abort stay observable.
    for value in interpreter.output() {
        println!("WRITE: {}", value);
    }

    match result {
        Ok(()) => {
            println!();
            println!("Final variable values:");
            for (name, value) in interpreter.environment().iter() {
                println!("{} = {}", name, value);
            }
            true
        }
        Err(error) => {
            error.report(source, filename);
            false
        }
    }
}
