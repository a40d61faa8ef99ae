//! CSS tokenizer.
//!
//! Splits stylesheet text into punctuation, identifier, and string tokens,
//! tracking the current line number. Identifiers are greedy: a punctuation
//! character that terminates an in-progress identifier is held in a
//! one-slot pushback buffer and re-offered as the start of the next token.

use std::fmt;

use memchr::{memchr2_iter, memmem};

use crate::error::{Error, Result};

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Bar,
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Caret,
    Colon,
    Comma,
    Dollar,
    Equals,
    GreaterThan,
    Identifier,
    ParenOpen,
    ParenClose,
    Plus,
    Semicolon,
    Star,
    Tilde,
    String,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Bar => "|",
            TokenKind::BraceOpen => "{",
            TokenKind::BraceClose => "}",
            TokenKind::BracketOpen => "[",
            TokenKind::BracketClose => "]",
            TokenKind::Caret => "^",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dollar => "$",
            TokenKind::Equals => "=",
            TokenKind::GreaterThan => ">",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::ParenOpen => "(",
            TokenKind::ParenClose => ")",
            TokenKind::Plus => "+",
            TokenKind::Semicolon => ";",
            TokenKind::Star => "*",
            TokenKind::Tilde => "~",
            TokenKind::String => "STRING",
        };
        f.write_str(s)
    }
}

/// One lexical token. Identifier and string tokens carry their accumulated
/// text; punctuation tokens carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

/// Streaming tokenizer over a complete stylesheet held in memory.
///
/// The scan offset, line counter, and one-character pushback are owned by
/// the tokenizer instance, so concurrent parses over different inputs are
/// independent.
pub struct Tokenizer<'a> {
    input: &'a str,
    offset: usize,
    line: u32,
    pushback: Option<char>,
    prev: char,
}

fn punctuation(c: char) -> Option<TokenKind> {
    let kind = match c {
        '|' => TokenKind::Bar,
        '{' => TokenKind::BraceOpen,
        '}' => TokenKind::BraceClose,
        '[' => TokenKind::BracketOpen,
        ']' => TokenKind::BracketClose,
        '^' => TokenKind::Caret,
        ':' => TokenKind::Colon,
        ',' => TokenKind::Comma,
        '$' => TokenKind::Dollar,
        '=' => TokenKind::Equals,
        '>' => TokenKind::GreaterThan,
        '(' => TokenKind::ParenOpen,
        ')' => TokenKind::ParenClose,
        '+' => TokenKind::Plus,
        ';' => TokenKind::Semicolon,
        '*' => TokenKind::Star,
        '~' => TokenKind::Tilde,
        _ => return None,
    };
    Some(kind)
}

/// Count line breaks in a byte range, treating CRLF as a single break.
fn count_newlines(bytes: &[u8]) -> u32 {
    let mut count = 0;
    let mut iter = memchr2_iter(b'\r', b'\n', bytes).peekable();
    while let Some(i) = iter.next() {
        if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            iter.next();
        }
        count += 1;
    }
    count
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            offset: 0,
            line: 1,
            pushback: None,
            prev: '\0',
        }
    }

    /// The line the tokenizer is currently scanning (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    fn take_char(&mut self) -> Option<char> {
        if let Some(c) = self.pushback.take() {
            return Some(c);
        }
        let c = self.input[self.offset..].chars().next()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    /// Skip past the matching `*/`, or to end of input if the comment is
    /// never closed. Line breaks inside the comment still count.
    fn skip_comment(&mut self) {
        let rest = &self.input.as_bytes()[self.offset..];
        match memmem::find(rest, b"*/") {
            Some(i) => {
                self.line += count_newlines(&rest[..i + 2]);
                self.offset += i + 2;
            }
            None => {
                self.line += count_newlines(rest);
                self.offset = self.input.len();
            }
        }
    }

    /// Produce the next token, or `None` at end of input.
    ///
    /// An identifier still being accumulated at end of input is returned as
    /// a final token. Lexical errors (a string broken by a line break, a
    /// quote inside an identifier) abort with [`Error::Lexical`].
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let mut kind: Option<TokenKind> = None;
        let mut text = String::new();
        let mut quote = '"';
        let mut start_line = self.line;

        loop {
            let Some(c) = self.take_char() else { break };

            if c == '\n' || c == '\r' {
                self.prev = c;
                self.line += 1;
                // CRLF counts as one line break
                if c == '\r' && self.input[self.offset..].starts_with('\n') {
                    self.offset += 1;
                    self.prev = '\n';
                }
                match kind {
                    Some(TokenKind::String) => {
                        return Err(Error::Lexical {
                            message: "string cannot extend to new line".into(),
                            line: self.line,
                        });
                    }
                    Some(k) => {
                        return Ok(Some(Token {
                            kind: k,
                            text,
                            line: start_line,
                        }));
                    }
                    None => continue,
                }
            }

            if kind == Some(TokenKind::String) {
                self.prev = c;
                if c == quote {
                    return Ok(Some(Token {
                        kind: TokenKind::String,
                        text,
                        line: start_line,
                    }));
                }
                text.push(c);
                continue;
            }

            // A '*' right after '/' opens a block comment. The '/' has
            // already been accumulated, so the partial token is dropped.
            if c == '*' && self.prev == '/' {
                kind = None;
                text.clear();
                self.skip_comment();
                self.prev = '/';
                continue;
            }

            self.prev = c;

            match c {
                ' ' | '\t' => {
                    if kind.is_some() {
                        return Ok(Some(Token {
                            kind: TokenKind::Identifier,
                            text,
                            line: start_line,
                        }));
                    }
                }
                '"' | '\'' => {
                    if kind.is_none() {
                        kind = Some(TokenKind::String);
                        quote = c;
                        start_line = self.line;
                    } else {
                        return Err(Error::Lexical {
                            message: "unexpected string character".into(),
                            line: self.line,
                        });
                    }
                }
                _ => {
                    if let Some(punct) = punctuation(c) {
                        if kind.is_none() {
                            return Ok(Some(Token {
                                kind: punct,
                                text,
                                line: self.line,
                            }));
                        }
                        // Terminate the identifier; re-offer the
                        // punctuation as the start of the next token.
                        self.pushback = Some(c);
                        return Ok(Some(Token {
                            kind: TokenKind::Identifier,
                            text,
                            line: start_line,
                        }));
                    }
                    if kind.is_none() {
                        kind = Some(TokenKind::Identifier);
                        start_line = self.line;
                    }
                    text.push(c);
                }
            }
        }

        Ok(kind.map(|k| Token {
            kind: k,
            text,
            line: start_line,
        }))
    }
}
