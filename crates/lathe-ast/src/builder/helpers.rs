use std::collections::BTreeMap;

use crate::error::{ParseError, Result};
use crate::sexp::{List, SExp};

/// Extract a symbol's text from an S-expression
pub fn expect_symbol(sexp: &SExp) -> Result<&str> {
    match sexp {
        SExp::Symbol(s) => Ok(&s.value),
        _ => Err(expected("symbol", sexp)),
    }
}

/// Extract a string from an S-expression
pub fn expect_string(sexp: &SExp) -> Result<String> {
    match sexp {
        SExp::String(s) => Ok(s.value.clone()),
        _ => Err(expected("string", sexp)),
    }
}

/// Accept `true` / `false` symbols
pub fn expect_bool(sexp: &SExp) -> Result<bool> {
    match sexp {
        SExp::Symbol(s) if s.value == "true" => Ok(true),
        SExp::Symbol(s) if s.value == "false" => Ok(false),
        _ => Err(expected("true or false", sexp)),
    }
}

pub fn expect_number(sexp: &SExp) -> Result<i64> {
    match sexp {
        SExp::Number(n) => Ok(n.value),
        _ => Err(expected("number", sexp)),
    }
}

/// Elements of a list; `nil` counts as the empty list.
pub fn expect_elements(sexp: &SExp) -> Result<&[SExp]> {
    match sexp {
        SExp::List(l) => Ok(&l.elements),
        SExp::Nil(_) => Ok(&[]),
        _ => Err(expected("list", sexp)),
    }
}

/// A `(Head :key value ...)` form whose head must be `head`.
pub fn expect_form<'a>(sexp: &'a SExp, head: &str) -> Result<&'a List> {
    match sexp {
        SExp::List(l) if l.head() == Some(head) => Ok(l),
        _ => Err(expected(&format!("({} ...)", head), sexp)),
    }
}

pub fn expected(what: &str, found: &SExp) -> ParseError {
    ParseError::Expected {
        expected: what.to_string(),
        found: found.describe(),
        pos: found.position(),
    }
}

/// Keyword arguments of a form. Every field must be consumed before
/// [`Fields::finish`], so misspelled keywords are reported instead of
/// silently ignored.
pub struct Fields<'a> {
    node: &'a str,
    list: &'a List,
    values: BTreeMap<&'a str, &'a SExp>,
}

impl<'a> Fields<'a> {
    pub fn parse(list: &'a List) -> Result<Self> {
        let node = list.head().unwrap_or("list");
        let mut values = BTreeMap::new();
        let mut rest = list.elements.iter().skip(1);

        while let Some(key) = rest.next() {
            let SExp::Keyword(k) = key else {
                return Err(expected("keyword", key));
            };
            let value = rest.next().ok_or_else(|| ParseError::Expected {
                expected: format!("value after :{}", k.value),
                found: "end of list".to_string(),
                pos: k.pos,
            })?;
            values.insert(k.value.as_str(), value);
        }

        Ok(Self { node, list, values })
    }

    pub fn take(&mut self, name: &str) -> Option<&'a SExp> {
        self.values.remove(name)
    }

    pub fn require(&mut self, name: &str) -> Result<&'a SExp> {
        self.take(name).ok_or_else(|| ParseError::Expected {
            expected: format!(":{} field", name),
            found: "missing field".to_string(),
            pos: self.list.pos,
        })
    }

    pub fn finish(self) -> Result<()> {
        match self.values.into_iter().next() {
            None => Ok(()),
            Some((field, value)) => Err(ParseError::UnknownField {
                field: field.to_string(),
                node: self.node.to_string(),
                pos: value.position(),
            }),
        }
    }
}
