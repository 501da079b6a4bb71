//! Minimal Cypher tokenizer
//!
//! Just enough lexical structure for static checks: identifiers, parameters,
//! literals and single-character symbols. String contents and comments are
//! skipped so that keywords or labels inside them are never inspected.

/// Kind of lexical token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Identifier or keyword (backtick-quoted identifiers are unquoted)
    Ident(String),
    /// `$name` parameter reference
    Param(String),
    /// String literal (contents dropped)
    Str,
    /// Numeric literal
    Number(String),
    /// Any other single character
    Symbol(char),
}

/// A token and its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_symbol(&self, c: char) -> bool {
        self.kind == TokenKind::Symbol(c)
    }

    /// Case-insensitive keyword comparison
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.ident().is_some_and(|name| name.eq_ignore_ascii_case(keyword))
    }
}

/// Lexical failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LexError {
    /// A quote was opened but never closed
    UnterminatedString { offset: usize },
    /// A backtick identifier was opened but never closed
    UnterminatedIdentifier { offset: usize },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnterminatedString { offset } => {
                write!(f, "unterminated string literal starting at offset {}", offset)
            }
            LexError::UnterminatedIdentifier { offset } => {
                write!(f, "unterminated quoted identifier starting at offset {}", offset)
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split Cypher text into tokens
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Line comment
        if c == '/' && chars.get(i + 1).is_some_and(|&(_, n)| n == '/') {
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
            continue;
        }

        // Block comment
        if c == '/' && chars.get(i + 1).is_some_and(|&(_, n)| n == '*') {
            i += 2;
            while i < chars.len() && !(chars[i].1 == '*' && chars.get(i + 1).is_some_and(|&(_, n)| n == '/')) {
                i += 1;
            }
            i = (i + 2).min(chars.len());
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = c;
            i += 1;
            let mut closed = false;
            while i < chars.len() {
                match chars[i].1 {
                    '\\' => i += 2,
                    ch if ch == quote => {
                        closed = true;
                        i += 1;
                        break;
                    }
                    _ => i += 1,
                }
            }
            if !closed {
                return Err(LexError::UnterminatedString { offset });
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                offset,
            });
            continue;
        }

        if c == '`' {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i].1 != '`' {
                i += 1;
            }
            if i >= chars.len() {
                return Err(LexError::UnterminatedIdentifier { offset });
            }
            let name: String = chars[start..i].iter().map(|&(_, ch)| ch).collect();
            i += 1;
            tokens.push(Token {
                kind: TokenKind::Ident(name),
                offset,
            });
            continue;
        }

        if c == '$' && chars.get(i + 1).is_some_and(|&(_, n)| is_ident_start(n)) {
            i += 1;
            let start = i;
            while i < chars.len() && is_ident_char(chars[i].1) {
                i += 1;
            }
            let name: String = chars[start..i].iter().map(|&(_, ch)| ch).collect();
            tokens.push(Token {
                kind: TokenKind::Param(name),
                offset,
            });
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].1.is_ascii_digit() {
                i += 1;
            }
            // Decimal part only when a digit follows the dot, so `1..3` stays a range
            if i + 1 < chars.len() && chars[i].1 == '.' && chars[i + 1].1.is_ascii_digit() {
                i += 1;
                while i < chars.len() && chars[i].1.is_ascii_digit() {
                    i += 1;
                }
            }
            let text: String = chars[start..i].iter().map(|&(_, ch)| ch).collect();
            tokens.push(Token {
                kind: TokenKind::Number(text),
                offset,
            });
            continue;
        }

        if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_char(chars[i].1) {
                i += 1;
            }
            let name: String = chars[start..i].iter().map(|&(_, ch)| ch).collect();
            tokens.push(Token {
                kind: TokenKind::Ident(name),
                offset,
            });
            continue;
        }

        tokens.push(Token {
            kind: TokenKind::Symbol(c),
            offset,
        });
        i += 1;
    }

    Ok(tokens)
}
