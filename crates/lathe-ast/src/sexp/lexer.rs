use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{LexError, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    LParen,
    RParen,
    Symbol,
    Keyword,
    String,
    Number,
    Nil,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub typ: TokenType,
    pub lexeme: String,
    pub pos: Position,
}

pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    input: &'a str,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { chars: input.char_indices().peekable(), input, line: 1, column: 1 }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.typ == TokenType::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let pos = self.position();
        let Some(ch) = self.peek_char() else {
            return Ok(Token { typ: TokenType::Eof, lexeme: String::new(), pos });
        };

        match ch {
            '(' | ')' => {
                self.bump();
                let typ = if ch == '(' { TokenType::LParen } else { TokenType::RParen };
                Ok(Token { typ, lexeme: ch.to_string(), pos })
            }
            ':' => {
                self.bump();
                let name = self.take_while(is_symbol_char);
                Ok(Token { typ: TokenType::Keyword, lexeme: name, pos })
            }
            '"' => self.read_string(pos),
            _ if ch.is_ascii_digit() || (ch == '-' && self.second_is_digit()) => {
                let mut lexeme = String::new();
                if ch == '-' {
                    self.bump();
                    lexeme.push('-');
                }
                lexeme.push_str(&self.take_while(|c| c.is_ascii_digit()));
                Ok(Token { typ: TokenType::Number, lexeme, pos })
            }
            _ if is_symbol_start(ch) => {
                let lexeme = self.take_while(is_symbol_char);
                let typ = if lexeme == "nil" { TokenType::Nil } else { TokenType::Symbol };
                Ok(Token { typ, lexeme, pos })
            }
            _ => Err(LexError::UnexpectedChar { ch, pos }),
        }
    }

    fn read_string(&mut self, pos: Position) -> Result<Token, LexError> {
        self.bump(); // opening quote
        let mut value = String::new();

        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedString { pos }),
                Some('"') => break,
                Some('\\') => {
                    let escape_pos = self.position();
                    match self.bump() {
                        None => return Err(LexError::UnterminatedString { pos }),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some(c @ ('\\' | '"')) => value.push(c),
                        Some(ch) => return Err(LexError::InvalidEscape { ch, pos: escape_pos }),
                    }
                }
                Some(ch) => value.push(ch),
            }
        }

        Ok(Token { typ: TokenType::String, lexeme: value, pos })
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            out.push(ch);
            self.bump();
        }
        out
    }

    fn second_is_digit(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().is_some_and(|(_, c)| c.is_ascii_digit())
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn position(&mut self) -> Position {
        let offset = self.chars.peek().map_or(self.input.len(), |&(i, _)| i);
        Position::new(offset, self.line, self.column)
    }
}

fn is_symbol_start(ch: char) -> bool {
    ch.is_alphabetic() || matches!(ch, '_' | '-' | '+' | '*' | '/' | '=' | '<' | '>' | '!' | '?' | '@')
}

fn is_symbol_char(ch: char) -> bool {
    is_symbol_start(ch) || ch.is_alphanumeric() || matches!(ch, '.' | '$' | '\'')
}
