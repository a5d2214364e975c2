use crate::ast::{ArithOp, Assign, CmpOp, Condition, Expr, Program, Stmt, VarDecl, VarType};
use crate::error::{ModlError, Span};
use crate::lexer::{Token, TokenKind};
use crate::symbol::SymbolTable;

/// Recursive-descent parser over the token sequence. Maintains a single
/// cursor; the first mismatch aborts the whole parse with an
/// expected-vs-actual error. Declarations populate the symbol table as
/// they are parsed.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    symbols: SymbolTable,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            symbols: SymbolTable::new(),
        }
    }

    /// Program := 'program' 'var' VarDecls 'begin' StmtBlock 'end.'
    pub fn parse(mut self) -> Result<(Program, SymbolTable), ModlError> {
        self.consume_keyword("program")?;
        self.consume_keyword("var")?;

        let declarations = self.variable_declarations()?;

        self.consume_keyword("begin")?;
        let body = self.statement_block()?;
        self.consume_keyword("end.")?;

        Ok((Program { declarations, body }, self.symbols))
    }

    /// VarDecls := (IDENT ('int'|'float'|'bool') ';')*
    fn variable_declarations(&mut self) -> Result<Vec<VarDecl>, ModlError> {
        let mut declarations = Vec::new();

        while self.check(TokenKind::Identifier) {
            let name_token = self.consume(TokenKind::Identifier, "an identifier")?;
            let type_token = self.consume(TokenKind::Keyword, "a type keyword")?;

            let declared_type = VarType::from_keyword(&type_token.text).ok_or_else(|| {
                ModlError::parse_error_with_help(
                    type_token.span.clone(),
                    format!("Expected a type keyword, found '{}'", type_token.text),
                    "Declarations use one of 'int', 'float' or 'bool'. Example: A int;"
                        .to_string(),
                )
            })?;
            self.consume_delimiter(";")?;

            // A re-declared name is recorded anyway; the duplicate is a
            // semantic violation, not a parse error.
            self.symbols.declare(&name_token.text, declared_type);

            declarations.push(VarDecl {
                name: name_token.text,
                declared_type,
                span: Span::new(name_token.span.start, type_token.span.end),
            });
        }

        Ok(declarations)
    }

    /// StmtBlock := Stmt (';' Stmt)*, stopping at 'end.' or at the
    /// first statement not followed by ';'.
    fn statement_block(&mut self) -> Result<Vec<Stmt>, ModlError> {
        let mut statements = Vec::new();

        while !self.check_keyword("end.") {
            statements.push(self.statement()?);

            if self.check_delimiter(";") {
                self.advance();
            } else {
                break;
            }
        }

        Ok(statements)
    }

    /// Block := '[' Stmt (';' Stmt)* ']'
    fn block(&mut self) -> Result<Stmt, ModlError> {
        let open = self.consume_delimiter("[")?;
        let mut statements = Vec::new();

        while !self.check_delimiter("]") {
            statements.push(self.statement()?);

            if self.check_delimiter(";") {
                self.advance();
            }
        }

        let close = self.consume_delimiter("]")?;

        Ok(Stmt::Block {
            statements,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    fn statement(&mut self) -> Result<Stmt, ModlError> {
        if self.check_keyword("write") {
            return self.write_statement();
        }
        if self.check_keyword("if") {
            return self.conditional();
        }
        if self.check(TokenKind::Identifier) {
            return Ok(Stmt::Assign(self.assignment()?));
        }
        if self.check_keyword("for") {
            return self.for_loop();
        }
        if self.check_keyword("while") {
            return self.while_loop();
        }
        if self.check_delimiter("[") {
            return self.block();
        }

        let token = self.peek()?;
        Err(ModlError::parse_error_with_help(
            token.span.clone(),
            format!("Unexpected token '{}'", token.text),
            "A statement is an assignment, 'if', 'for', 'while', 'write(...)' or a '[...]' block."
                .to_string(),
        ))
    }

    /// Assignment := IDENT 'as' Expr
    fn assignment(&mut self) -> Result<Assign, ModlError> {
        let name_token = self.consume(TokenKind::Identifier, "an identifier")?;
        self.consume_operator("as")?;
        let value = self.expression()?;
        let span = Span::new(name_token.span.start, value.span().end);

        Ok(Assign {
            name: name_token.text,
            value,
            span,
        })
    }

    /// Conditional := 'if' Comparison 'then' Stmt ('else' Stmt)?
    fn conditional(&mut self) -> Result<Stmt, ModlError> {
        let if_token = self.consume_keyword("if")?;
        let condition = self.comparison()?;
        self.consume_keyword("then")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.check_keyword("else") {
            self.advance();
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        let end = else_branch
            .as_ref()
            .map(|stmt| stmt.span().end)
            .unwrap_or(then_branch.span().end);

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            span: Span::new(if_token.span.start, end),
        })
    }

    /// Comparison := Expr (CMP_OP Expr)?
    ///
    /// Only reachable from an 'if' head; a comparison never nests
    /// inside an arithmetic expression.
    fn comparison(&mut self) -> Result<Condition, ModlError> {
        let left = self.expression()?;

        if let Some(operator) = self.peek_operator_word(CmpOp::from_word) {
            self.advance();
            let right = self.expression()?;
            let span = Span::new(left.span().start, right.span().end);

            return Ok(Condition::Comparison {
                left,
                operator,
                right,
                span,
            });
        }

        Ok(Condition::Bare(left))
    }

    /// ForLoop := 'for' Assignment 'to' Expr 'do' Stmt
    fn for_loop(&mut self) -> Result<Stmt, ModlError> {
        let for_token = self.consume_keyword("for")?;
        let init = self.assignment()?;
        self.consume_keyword("to")?;
        let limit = self.expression()?;
        self.consume_keyword("do")?;
        let body = Box::new(self.statement()?);
        let span = Span::new(for_token.span.start, body.span().end);

        Ok(Stmt::For {
            init,
            limit,
            body,
            span,
        })
    }

    /// WhileLoop := 'while' Expr 'do' Stmt
    fn while_loop(&mut self) -> Result<Stmt, ModlError> {
        let while_token = self.consume_keyword("while")?;
        let condition = self.expression()?;
        self.consume_keyword("do")?;
        let body = Box::new(self.statement()?);
        let span = Span::new(while_token.span.start, body.span().end);

        Ok(Stmt::While {
            condition,
            body,
            span,
        })
    }

    /// WriteStmt := 'write' '(' Expr ')'
    fn write_statement(&mut self) -> Result<Stmt, ModlError> {
        let write_token = self.consume_keyword("write")?;
        self.consume_delimiter("(")?;
        let value = self.expression()?;
        let close = self.consume_delimiter(")")?;

        Ok(Stmt::Write {
            value,
            span: Span::new(write_token.span.start, close.span.end),
        })
    }

    /// Expr := 'true' | 'false' | NUMBER | IDENT (ARITH_OP Expr)?
    ///
    /// A binary operation only forms when the left operand is an
    /// identifier; a literal terminates the production immediately even
    /// if an operator token follows. The right operand is a full Expr,
    /// so chains associate to the right with no precedence levels.
    fn expression(&mut self) -> Result<Expr, ModlError> {
        let token = self.peek()?.clone();

        match token.kind {
            TokenKind::Boolean => {
                self.advance();
                Ok(Expr::Boolean {
                    value: token.text == "true",
                    span: token.span,
                })
            }
            TokenKind::Number => {
                self.advance();
                let value = token.text.parse::<f64>().map_err(|_| {
                    ModlError::parse_error(
                        token.span.clone(),
                        format!("Invalid number '{}'", token.text),
                    )
                })?;

                Ok(Expr::Number {
                    value,
                    is_float: token.text.contains('.'),
                    span: token.span,
                })
            }
            TokenKind::Identifier => {
                self.advance();
                let left = Expr::Variable {
                    name: token.text,
                    span: token.span,
                };

                if let Some(operator) = self.peek_operator_word(ArithOp::from_word) {
                    self.advance();
                    let right = self.expression()?;
                    let span = Span::new(left.span().start, right.span().end);

                    return Ok(Expr::Binary {
                        left: Box::new(left),
                        operator,
                        right: Box::new(right),
                        span,
                    });
                }

                Ok(left)
            }
            _ => Err(ModlError::parse_error_with_help(
                token.span,
                format!("Expected an expression, found '{}'", token.text),
                "An expression starts with a number, 'true'/'false', or an identifier."
                    .to_string(),
            )),
        }
    }

    fn peek(&self) -> Result<&Token, ModlError> {
        self.tokens.get(self.current).ok_or_else(|| {
            ModlError::parse_error(
                Span::single(self.end_position()),
                "Unexpected end of input".to_string(),
            )
        })
    }

    fn end_position(&self) -> usize {
        self.tokens.last().map(|t| t.span.end).unwrap_or(0)
    }

    fn advance(&mut self) {
        self.current += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.current)
            .is_some_and(|t| t.kind == kind)
    }

    fn check_exact(&self, kind: TokenKind, text: &str) -> bool {
        self.tokens
            .get(self.current)
            .is_some_and(|t| t.kind == kind && t.text == text)
    }

    fn check_keyword(&self, word: &str) -> bool {
        self.check_exact(TokenKind::Keyword, word)
    }

    fn check_delimiter(&self, text: &str) -> bool {
        self.check_exact(TokenKind::Delimiter, text)
    }

    /// Matches an Operator token whose text converts through `from_word`,
    /// without consuming it.
    fn peek_operator_word<T>(&self, from_word: fn(&str) -> Option<T>) -> Option<T> {
        self.tokens
            .get(self.current)
            .filter(|t| t.kind == TokenKind::Operator)
            .and_then(|t| from_word(&t.text))
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ModlError> {
        let token = self.peek()?;
        if token.kind == kind {
            let token = token.clone();
            self.advance();
            Ok(token)
        } else {
            Err(ModlError::parse_error(
                token.span.clone(),
                format!("Expected {}, found '{}'", expected, token.text),
            ))
        }
    }

    fn consume_exact(&mut self, kind: TokenKind, text: &str) -> Result<Token, ModlError> {
        let token = self.peek()?;
        if token.kind == kind && token.text == text {
            let token = token.clone();
            self.advance();
            Ok(token)
        } else {
            Err(ModlError::parse_error(
                token.span.clone(),
                format!("Expected '{}', found '{}'", text, token.text),
            ))
        }
    }

    fn consume_keyword(&mut self, word: &str) -> Result<Token, ModlError> {
        self.consume_exact(TokenKind::Keyword, word)
    }

    fn consume_operator(&mut self, word: &str) -> Result<Token, ModlError> {
        self.consume_exact(TokenKind::Operator, word)
    }

    fn consume_delimiter(&mut self, text: &str) -> Result<Token, ModlError> {
        self.consume_exact(TokenKind::Delimiter, text)
    }
}
