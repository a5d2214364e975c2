use crate::error::Span;
use std::fmt;

/// Closed sum types per grammar rule; the tree is built once by the
/// parser and only read by the analyzer and the interpreter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Int,
    Float,
    Bool,
}

impl VarType {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(VarType::Int),
            "float" => Some(VarType::Float),
            "bool" => Some(VarType::Bool),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::Float => "float",
            VarType::Bool => "bool",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Program {
    pub declarations: Vec<VarDecl>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub declared_type: VarType,
    pub span: Span,
}

/// Assignment appears both as a statement and as a `for` initializer,
/// so it gets its own struct instead of living only inside `Stmt`.
#[derive(Debug, Clone)]
pub struct Assign {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Assign(Assign),
    If {
        condition: Condition,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    For {
        init: Assign,
        limit: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Write {
        value: Expr,
        span: Span,
    },
    Block {
        statements: Vec<Stmt>,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::Assign(assign) => &assign.span,
            Stmt::If { span, .. } => span,
            Stmt::For { span, .. } => span,
            Stmt::While { span, .. } => span,
            Stmt::Write { span, .. } => span,
            Stmt::Block { span, .. } => span,
        }
    }
}

/// Comparisons are a disjoint category from arithmetic expressions:
/// they appear only in `if` heads, never nested inside an `Expr`.
#[derive(Debug, Clone)]
pub enum Condition {
    Comparison {
        left: Expr,
        operator: CmpOp,
        right: Expr,
        span: Span,
    },
    Bare(Expr),
}

impl Condition {
    pub fn span(&self) -> &Span {
        match self {
            Condition::Comparison { span, .. } => span,
            Condition::Bare(expr) => expr.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number {
        value: f64,
        is_float: bool,
        span: Span,
    },
    Boolean {
        value: bool,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    /// The left operand is always a variable: a literal on the left
    /// terminates the expression production before any operator is
    /// considered. Chained operators bind right-to-left uniformly,
    /// with no precedence distinction.
    Binary {
        left: Box<Expr>,
        operator: ArithOp,
        right: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Number { span, .. } => span,
            Expr::Boolean { span, .. } => span,
            Expr::Variable { span, .. } => span,
            Expr::Binary { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Plus,
    Min,
    Mult,
    Div,
}

impl ArithOp {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "plus" => Some(ArithOp::Plus),
            "min" => Some(ArithOp::Min),
            "mult" => Some(ArithOp::Mult),
            "div" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn word(&self) -> &'static str {
        match self {
            ArithOp::Plus => "plus",
            ArithOp::Min => "min",
            ArithOp::Mult => "mult",
            ArithOp::Div => "div",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Lt,
    Eq,
    Ge,
    Le,
    Ne,
}

impl CmpOp {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "GT" => Some(CmpOp::Gt),
            "LT" => Some(CmpOp::Lt),
            "EQ" => Some(CmpOp::Eq),
            "GE" => Some(CmpOp::Ge),
            "LE" => Some(CmpOp::Le),
            "NE" => Some(CmpOp::Ne),
            _ => None,
        }
    }

    pub fn word(&self) -> &'static str {
        match self {
            CmpOp::Gt => "GT",
            CmpOp::Lt => "LT",
            CmpOp::Eq => "EQ",
            CmpOp::Ge => "GE",
            CmpOp::Le => "LE",
            CmpOp::Ne => "NE",
        }
    }
}
