use crate::error::{ModlError, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    Operator,
    Delimiter,
    Boolean,
}

/// Minimal lexical unit. `line` is 1-based, `column` is the 0-based
/// character column within that line; `span` is the global character
/// range used for diagnostics.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: String, line: usize, column: usize, span: Span) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            span,
        }
    }
}

const KEYWORDS: &[&str] = &[
    "program", "var", "begin", "end", "int", "float", "bool", "if", "then", "else", "for", "to",
    "do", "while", "write",
];

/// Checked before alphabetic scanning, so an operator word that
/// prefixes a longer identifier still splits off as its own token
/// ("minute" lexes as `min` + `ute`). This is accepted language
/// surface, not something to fix in the lexer.
const MULTI_CHAR_OPS: &[&str] = &[
    "plus", "min", "mult", "div", "and", "or", "NE", "EQ", "LT", "LE", "GT", "GE", "as",
];

const DELIMITERS: &[char] = &['(', ')', ':', ';', '[', ']'];
const SINGLE_CHAR_OPS: &[char] = &['+', '-', '*', '/'];

pub struct Lexer {
    source: String,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: String) -> Self {
        Self {
            source,
            tokens: Vec::new(),
        }
    }

    /// Tokenizes the whole source, line by line. No token spans a line
    /// break, so a `{...}` comment must close on the line it opened on.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>, ModlError> {
        let source = std::mem::take(&mut self.source);
        let mut line_offset = 0;

        for (line_idx, line) in source.split('\n').enumerate() {
            let line_num = line_idx + 1;
            let chars: Vec<char> = line.chars().collect();
            self.scan_line(&chars, line_num, line_offset)?;
            line_offset += chars.len() + 1;
        }

        Ok(self.tokens)
    }

    fn scan_line(
        &mut self,
        chars: &[char],
        line: usize,
        line_offset: usize,
    ) -> Result<(), ModlError> {
        let mut column = 0;

        while column < chars.len() {
            let c = chars[column];

            if c.is_whitespace() {
                column += 1;
                continue;
            }

            // Comments are discarded entirely.
            if c == '{' {
                match chars[column..].iter().position(|&ch| ch == '}') {
                    Some(rel) => {
                        column += rel + 1;
                        continue;
                    }
                    None => {
                        return Err(ModlError::lex_error(
                            Span::new(line_offset + column, line_offset + chars.len()),
                            format!("Unterminated comment on line {}", line),
                        ));
                    }
                }
            }

            // The program terminator is one token, ahead of everything
            // else (otherwise `end` + `.` would never recombine).
            if starts_with(chars, column, "end.") {
                self.add_token(TokenKind::Keyword, "end.", line, column, line_offset);
                column += 4;
                continue;
            }

            if let Some(op) = MULTI_CHAR_OPS
                .iter()
                .find(|op| starts_with(chars, column, op))
            {
                self.add_token(TokenKind::Operator, op, line, column, line_offset);
                column += op.chars().count();
                continue;
            }

            if c.is_alphabetic() {
                let start = column;
                while column < chars.len() && chars[column].is_alphanumeric() {
                    column += 1;
                }
                let text: String = chars[start..column].iter().collect();
                let kind = if text == "true" || text == "false" {
                    TokenKind::Boolean
                } else if KEYWORDS.contains(&text.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                self.add_token(kind, &text, line, start, line_offset);
                continue;
            }

            if c.is_ascii_digit()
                || (c == '.' && column + 1 < chars.len() && chars[column + 1].is_ascii_digit())
            {
                let start = column;
                let mut has_dot = false;
                while column < chars.len()
                    && (chars[column].is_ascii_digit() || (chars[column] == '.' && !has_dot))
                {
                    if chars[column] == '.' {
                        has_dot = true;
                    }
                    column += 1;
                }
                let text: String = chars[start..column].iter().collect();
                self.add_token(TokenKind::Number, &text, line, start, line_offset);
                continue;
            }

            if DELIMITERS.contains(&c) {
                self.add_token(TokenKind::Delimiter, &c.to_string(), line, column, line_offset);
                column += 1;
                continue;
            }

            if SINGLE_CHAR_OPS.contains(&c) {
                self.add_token(TokenKind::Operator, &c.to_string(), line, column, line_offset);
                column += 1;
                continue;
            }

            return Err(ModlError::lex_error(
                Span::single(line_offset + column),
                format!("Unknown character '{}' at line {}, column {}", c, line, column),
            ));
        }

        Ok(())
    }

    fn add_token(
        &mut self,
        kind: TokenKind,
        text: &str,
        line: usize,
        column: usize,
        line_offset: usize,
    ) {
        let len = text.chars().count();
        let start = line_offset + column;
        self.tokens.push(Token::new(
            kind,
            text.to_string(),
            line,
            column,
            Span::new(start, start + len),
        ));
    }
}

fn starts_with(chars: &[char], pos: usize, pattern: &str) -> bool {
    let mut i = pos;
    for pc in pattern.chars() {
        if i >= chars.len() || chars[i] != pc {
            return false;
        }
        i += 1;
    }
    true
}
