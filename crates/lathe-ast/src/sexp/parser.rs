use crate::error::{ParseError, Result};
use crate::sexp::lexer::{Lexer, Token, TokenType};
use crate::sexp::types::*;

pub struct Parser {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens: tokens.into_iter().peekable() }
    }

    /// Parse exactly one S-expression; trailing forms are rejected.
    pub fn parse_str(input: &str) -> Result<SExp> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Parser::new(tokens);
        let sexp = parser.parse()?;

        match parser.tokens.next() {
            Some(token) if token.typ != TokenType::Eof => {
                Err(ParseError::UnexpectedToken { token: token.lexeme, pos: token.pos })
            }
            _ => Ok(sexp),
        }
    }

    pub fn parse(&mut self) -> Result<SExp> {
        match self.tokens.peek() {
            None => Err(ParseError::EmptyInput),
            Some(token) if token.typ == TokenType::Eof => Err(ParseError::EmptyInput),
            Some(_) => self.parse_sexp(),
        }
    }

    fn parse_sexp(&mut self) -> Result<SExp> {
        let token = self.tokens.next().ok_or(ParseError::EmptyInput)?;

        match token.typ {
            TokenType::LParen => self.parse_list(token),
            TokenType::RParen => Err(ParseError::UnexpectedCloseParen { pos: token.pos }),
            TokenType::Symbol => Ok(SExp::Symbol(Atom::new(token.lexeme, token.pos))),
            TokenType::Keyword => Ok(SExp::Keyword(Atom::new(token.lexeme, token.pos))),
            TokenType::String => Ok(SExp::String(Atom::new(token.lexeme, token.pos))),
            TokenType::Nil => Ok(SExp::Nil(token.pos)),
            TokenType::Number => {
                let value = token.lexeme.parse().map_err(|_| ParseError::Expected {
                    expected: "64-bit integer".to_string(),
                    found: token.lexeme.clone(),
                    pos: token.pos,
                })?;
                Ok(SExp::Number(Number { value, pos: token.pos }))
            }
            TokenType::Eof => Err(ParseError::EmptyInput),
        }
    }

    fn parse_list(&mut self, open: Token) -> Result<SExp> {
        let mut elements = Vec::new();

        loop {
            match self.tokens.peek().map(|t| &t.typ) {
                None | Some(TokenType::Eof) => {
                    return Err(ParseError::UnterminatedList { pos: open.pos })
                }
                Some(TokenType::RParen) => {
                    self.tokens.next();
                    return Ok(SExp::List(List::new(elements, open.pos)));
                }
                Some(_) => elements.push(self.parse_sexp()?),
            }
        }
    }
}
