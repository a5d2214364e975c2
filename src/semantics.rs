use crate::ast::{Assign, Condition, Expr, Program, Stmt, VarDecl, VarType};
use crate::error::ModlError;
use crate::symbol::SymbolTable;
use std::collections::HashSet;

/// Result of static type inference over an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    Int,
    Float,
    Bool,
    Unknown,
}

impl InferredType {
    pub fn name(&self) -> &'static str {
        match self {
            InferredType::Int => "int",
            InferredType::Float => "float",
            InferredType::Bool => "bool",
            InferredType::Unknown => "unknown",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, InferredType::Int | InferredType::Float)
    }
}

impl From<VarType> for InferredType {
    fn from(declared: VarType) -> Self {
        match declared {
            VarType::Int => InferredType::Int,
            VarType::Float => InferredType::Float,
            VarType::Bool => InferredType::Bool,
        }
    }
}

/// Walks the whole tree against the symbol table and collects every
/// violation it finds; it never stops at the first one. The caller
/// decides what "has violations" means (the runner refuses to execute).
pub struct SemanticAnalyzer<'a> {
    symbols: &'a SymbolTable,
    violations: Vec<ModlError>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            violations: Vec::new(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> Vec<ModlError> {
        self.check_declarations(&program.declarations);
        for statement in &program.body {
            self.check_statement(statement);
        }
        self.violations
    }

    fn check_declarations(&mut self, declarations: &[VarDecl]) {
        let mut seen = HashSet::new();
        for decl in declarations {
            if !seen.insert(decl.name.as_str()) {
                self.violations.push(ModlError::semantic_error(
                    decl.span.clone(),
                    format!("Variable '{}' is declared more than once", decl.name),
                ));
            }
        }
    }

    fn check_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Assign(assign) => self.check_assignment(assign),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                // Only a real comparison is checked here; a bare
                // expression condition surfaces at runtime instead.
                if let Condition::Comparison {
                    left, right, span, ..
                } = condition
                {
                    let left_type = self.infer(left);
                    let right_type = self.infer(right);
                    if !left_type.is_numeric() || !right_type.is_numeric() {
                        self.violations.push(ModlError::semantic_error(
                            span.clone(),
                            format!(
                                "Cannot compare values of type {} and {}",
                                left_type.name(),
                                right_type.name()
                            ),
                        ));
                    }
                }

                self.check_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_statement(else_branch);
                }
            }
            Stmt::For {
                init, limit, body, ..
            } => {
                self.check_assignment(init);

                let limit_type = self.infer(limit);
                if !limit_type.is_numeric() {
                    self.violations.push(ModlError::semantic_error(
                        limit.span().clone(),
                        format!(
                            "Loop limit must be numeric, found type {}",
                            limit_type.name()
                        ),
                    ));
                }

                self.check_statement(body);
            }
            Stmt::While {
                condition, body, ..
            } => {
                let condition_type = self.infer(condition);
                if condition_type != InferredType::Bool {
                    self.violations.push(ModlError::semantic_error(
                        condition.span().clone(),
                        format!(
                            "While condition must be bool, found type {}",
                            condition_type.name()
                        ),
                    ));
                }

                self.check_statement(body);
            }
            Stmt::Write { value, .. } => {
                let value_type = self.infer(value);
                if value_type == InferredType::Unknown {
                    self.violations.push(ModlError::semantic_error(
                        value.span().clone(),
                        format!(
                            "Invalid type for write(): {}. Allowed: int, float, bool",
                            value_type.name()
                        ),
                    ));
                }
            }
            Stmt::Block { statements, .. } => {
                for statement in statements {
                    self.check_statement(statement);
                }
            }
        }
    }

    fn check_assignment(&mut self, assign: &Assign) {
        let Some(declared) = self.symbols.get(&assign.name) else {
            self.violations.push(ModlError::semantic_error(
                assign.span.clone(),
                format!("Undeclared variable '{}'", assign.name),
            ));
            return;
        };

        let expression_type = self.infer(&assign.value);
        if !is_compatible(declared, expression_type) {
            self.violations.push(ModlError::semantic_error(
                assign.span.clone(),
                format!(
                    "Incompatible types in assignment: variable '{}' is {}, expression is {}",
                    assign.name,
                    declared.name(),
                    expression_type.name()
                ),
            ));
        }
    }

    /// infer(node) -> {int, float, bool, unknown}. Undeclared names
    /// and ill-typed operations infer unknown, which then fails the
    /// enclosing compatibility check.
    fn infer(&self, expression: &Expr) -> InferredType {
        match expression {
            Expr::Number { is_float, .. } => {
                if *is_float {
                    InferredType::Float
                } else {
                    InferredType::Int
                }
            }
            Expr::Boolean { .. } => InferredType::Bool,
            Expr::Variable { name, .. } => self
                .symbols
                .get(name)
                .map(InferredType::from)
                .unwrap_or(InferredType::Unknown),
            Expr::Binary { left, right, .. } => {
                let left_type = self.infer(left);
                let right_type = self.infer(right);

                if left_type.is_numeric() && right_type.is_numeric() {
                    if left_type == InferredType::Float || right_type == InferredType::Float {
                        InferredType::Float
                    } else {
                        InferredType::Int
                    }
                } else {
                    InferredType::Unknown
                }
            }
        }
    }
}

/// int <- {int}, float <- {int, float}, bool <- {bool}.
fn is_compatible(declared: VarType, expression: InferredType) -> bool {
    match declared {
        VarType::Int => expression == InferredType::Int,
        VarType::Float => expression.is_numeric(),
        VarType::Bool => expression == InferredType::Bool,
    }
}
