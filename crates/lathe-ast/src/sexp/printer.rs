use crate::sexp::types::*;

/// Pretty printer that keeps `:keyword value` pairs together and only breaks
/// a list across lines when it does not fit in the configured width.
pub struct Printer {
    indent: usize,
    width: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self { indent: 2, width: 80 }
    }

    pub fn with_indent(indent: usize) -> Self {
        Self { indent, ..Self::new() }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn print(&self, sexp: &SExp) -> String {
        let mut out = String::new();
        self.write(sexp, 0, &mut out);
        out
    }

    fn write(&self, sexp: &SExp, column: usize, out: &mut String) {
        let flat = flat(sexp);
        if column + flat.len() <= self.width {
            out.push_str(&flat);
            return;
        }

        let SExp::List(list) = sexp else {
            out.push_str(&flat);
            return;
        };

        let inner = column + self.indent;
        out.push('(');
        let mut elements = list.elements.iter().peekable();
        if let Some(head) = elements.next() {
            self.write(head, column + 1, out);
        }
        while let Some(element) = elements.next() {
            out.push('\n');
            out.push_str(&" ".repeat(inner));
            if let SExp::Keyword(k) = element {
                out.push(':');
                out.push_str(&k.value);
                if let Some(value) = elements.next() {
                    out.push(' ');
                    self.write(value, inner + k.value.len() + 2, out);
                }
            } else {
                self.write(element, inner, out);
            }
        }
        out.push(')');
    }
}

fn flat(sexp: &SExp) -> String {
    match sexp {
        SExp::Symbol(a) => a.value.clone(),
        SExp::Keyword(a) => format!(":{}", a.value),
        SExp::String(a) => format!("\"{}\"", escape_string(&a.value)),
        SExp::Number(n) => n.value.to_string(),
        SExp::Nil(_) => "nil".to_string(),
        SExp::List(l) => {
            let parts: Vec<String> = l.elements.iter().map(flat).collect();
            format!("({})", parts.join(" "))
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape special characters in a string
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

/// Convenience function for printing S-expressions
pub fn print_sexp(sexp: &SExp) -> String {
    Printer::new().print(sexp)
}
