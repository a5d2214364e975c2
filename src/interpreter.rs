use crate::ast::{ArithOp, Assign, CmpOp, Condition, Expr, Program, Stmt, VarType};
use crate::error::{ModlError, Span};
use crate::symbol::SymbolTable;
use std::fmt;

/// Runtime value. `int` and `float` share one numeric domain; the
/// declared type is only enforced statically, never at this level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // Whole numbers print without a fractional part, so an
            // int-typed counter writes as 1, 2, 3 rather than 1.0, ...
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Identifier -> current value, in declaration order. Owned by exactly
/// one interpreter run; created empty, populated with per-type defaults
/// when the declarations block executes, mutated only by assignments
/// and loop increments afterwards.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: Vec<(String, Value)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(entry) = self.values.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.values.push((name.to_string(), value));
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

/// Tree-walking executor. Must only run after the semantic analyzer
/// reported zero violations; it does not re-validate.
pub struct Interpreter<'a> {
    symbols: &'a SymbolTable,
    environment: Environment,
    output: Vec<Value>,
}

impl<'a> Interpreter<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            environment: Environment::new(),
            output: Vec::new(),
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), ModlError> {
        self.initialize_variables();
        for statement in &program.body {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    /// Ordered `write` events emitted so far. On a runtime error the
    /// events emitted before the abort remain observable here.
    pub fn output(&self) -> &[Value] {
        &self.output
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Defaults come from the declared types, so after this runs the
    /// environment's key set equals the symbol table's key set.
    fn initialize_variables(&mut self) {
        let symbols = self.symbols;
        for (name, declared_type) in symbols.iter() {
            let default = match declared_type {
                VarType::Int | VarType::Float => Value::Number(0.0),
                VarType::Bool => Value::Bool(false),
            };
            self.environment.set(name, default);
        }
    }

    fn execute_statement(&mut self, statement: &Stmt) -> Result<(), ModlError> {
        match statement {
            Stmt::Assign(assign) => self.execute_assignment(assign),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_statement(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(else_branch)?;
                }
                Ok(())
            }
            Stmt::For {
                init, limit, body, ..
            } => {
                self.execute_assignment(init)?;

                loop {
                    let counter = self
                        .environment
                        .get(&init.name)
                        .ok_or_else(|| unassigned(&init.name, &init.span))?;
                    let counter = as_number(counter, &init.span)?;
                    // The limit tracks the current environment, so a
                    // body that mutates its operands moves the bound.
                    let bound = self.evaluate_expression(limit)?;
                    let bound = as_number(bound, limit.span())?;

                    if counter > bound {
                        break;
                    }

                    self.execute_statement(body)?;

                    // The body may assign to the counter itself; the
                    // increment applies to whatever value it left behind,
                    // not to the value read for the comparison above.
                    let counter = self
                        .environment
                        .get(&init.name)
                        .ok_or_else(|| unassigned(&init.name, &init.span))?;
                    let counter = as_number(counter, &init.span)?;
                    self.environment.set(&init.name, Value::Number(counter + 1.0));
                }
                Ok(())
            }
            Stmt::While {
                condition, body, ..
            } => {
                loop {
                    let value = self.evaluate_expression(condition)?;
                    if !as_bool(value, condition.span())? {
                        break;
                    }
                    self.execute_statement(body)?;
                }
                Ok(())
            }
            Stmt::Write { value, .. } => {
                let value = self.evaluate_expression(value)?;
                self.output.push(value);
                Ok(())
            }
            Stmt::Block { statements, .. } => {
                for statement in statements {
                    self.execute_statement(statement)?;
                }
                Ok(())
            }
        }
    }

    fn execute_assignment(&mut self, assign: &Assign) -> Result<(), ModlError> {
        let value = self.evaluate_expression(&assign.value)?;
        self.environment.set(&assign.name, value);
        Ok(())
    }

    fn evaluate_condition(&mut self, condition: &Condition) -> Result<bool, ModlError> {
        match condition {
            Condition::Comparison {
                left,
                operator,
                right,
                ..
            } => {
                let left_value = self.evaluate_expression(left)?;
                let left_value = as_number(left_value, left.span())?;
                let right_value = self.evaluate_expression(right)?;
                let right_value = as_number(right_value, right.span())?;

                Ok(match operator {
                    CmpOp::Gt => left_value > right_value,
                    CmpOp::Lt => left_value < right_value,
                    CmpOp::Eq => left_value == right_value,
                    CmpOp::Ge => left_value >= right_value,
                    CmpOp::Le => left_value <= right_value,
                    CmpOp::Ne => left_value != right_value,
                })
            }
            Condition::Bare(expr) => {
                let value = self.evaluate_expression(expr)?;
                as_bool(value, expr.span())
            }
        }
    }

    fn evaluate_expression(&mut self, expression: &Expr) -> Result<Value, ModlError> {
        match expression {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Boolean { value, .. } => Ok(Value::Bool(*value)),
            Expr::Variable { name, span } => self
                .environment
                .get(name)
                .ok_or_else(|| unassigned(name, span)),
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_value = self.evaluate_expression(left)?;
                let left_value = as_number(left_value, left.span())?;
                let right_value = self.evaluate_expression(right)?;
                let right_value = as_number(right_value, right.span())?;

                match operator {
                    ArithOp::Plus => Ok(Value::Number(left_value + right_value)),
                    ArithOp::Min => Ok(Value::Number(left_value - right_value)),
                    ArithOp::Mult => Ok(Value::Number(left_value * right_value)),
                    ArithOp::Div => {
                        if right_value == 0.0 {
                            Err(ModlError::runtime_error(
                                span.clone(),
                                "Division by zero".to_string(),
                            ))
                        } else {
                            Ok(Value::Number(left_value / right_value))
                        }
                    }
                }
            }
        }
    }
}

fn unassigned(name: &str, span: &Span) -> ModlError {
    ModlError::runtime_error(span.clone(), format!("Unassigned variable '{}'", name))
}

fn as_number(value: Value, span: &Span) -> Result<f64, ModlError> {
    match value {
        Value::Number(n) => Ok(n),
        Value::Bool(_) => Err(ModlError::runtime_error(
            span.clone(),
            format!("Expected a number, found {}", value.type_name()),
        )),
    }
}

fn as_bool(value: Value, span: &Span) -> Result<bool, ModlError> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Number(_) => Err(ModlError::runtime_error(
            span.clone(),
            format!("Condition must be a boolean, found {}", value.type_name()),
        )),
    }
}
