use crate::error::Position;

/// An S-expression value
#[derive(Debug, Clone, PartialEq)]
pub enum SExp {
    Symbol(Atom),
    Keyword(Atom),
    String(Atom),
    Number(Number),
    Nil(Position),
    List(List),
}

/// Text-bearing atom. Keywords are stored without the leading ':' and
/// strings are stored unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub value: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub value: i64,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub elements: Vec<SExp>,
    pub pos: Position, // Position of opening paren
}

impl Atom {
    pub fn new(value: impl Into<String>, pos: Position) -> Self {
        Self { value: value.into(), pos }
    }
}

impl List {
    pub fn new(elements: Vec<SExp>, pos: Position) -> Self {
        Self { elements, pos }
    }

    /// The head symbol of a `(Head ...)` form, if any.
    pub fn head(&self) -> Option<&str> {
        match self.elements.first() {
            Some(SExp::Symbol(s)) => Some(&s.value),
            _ => None,
        }
    }
}

impl SExp {
    pub fn symbol(value: impl Into<String>) -> Self {
        SExp::Symbol(Atom::new(value, Position::default()))
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        SExp::Keyword(Atom::new(name, Position::default()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        SExp::String(Atom::new(value, Position::default()))
    }

    pub fn number(value: i64) -> Self {
        SExp::Number(Number { value, pos: Position::default() })
    }

    pub fn list(elements: Vec<SExp>) -> Self {
        SExp::List(List::new(elements, Position::default()))
    }

    pub fn position(&self) -> Position {
        match self {
            SExp::Symbol(a) | SExp::Keyword(a) | SExp::String(a) => a.pos,
            SExp::Number(n) => n.pos,
            SExp::Nil(pos) => *pos,
            SExp::List(l) => l.pos,
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            SExp::Symbol(a) => format!("symbol {}", a.value),
            SExp::Keyword(a) => format!("keyword :{}", a.value),
            SExp::String(a) => format!("string {:?}", a.value),
            SExp::Number(n) => format!("number {}", n.value),
            SExp::Nil(_) => "nil".to_string(),
            SExp::List(l) => match l.head() {
                Some(head) => format!("({} ...)", head),
                None => "list".to_string(),
            },
        }
    }
}
