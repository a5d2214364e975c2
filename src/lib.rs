// modl — interpreter for a small model teaching language.
//
// Four synchronous stages over immutable inputs: lexing, recursive
// descent into an AST plus a symbol table, semantic validation that
// collects every violation in one walk, and tree-walking execution
// behind a single validate-then-run gate.

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runner;
pub mod semantics;
pub mod symbol;

pub use ast::{ArithOp, Assign, CmpOp, Condition, Expr, Program, Stmt, VarDecl, VarType};
pub use error::{ErrorKind, ModlError, Span};
pub use interpreter::{Environment, Interpreter, Value};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use runner::{execute, run, Execution, RunFailure};
pub use semantics::{InferredType, SemanticAnalyzer};
pub use symbol::SymbolTable;
