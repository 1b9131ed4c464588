use std::fmt;

use indexmap::map::IndexMap;
use serde::Serialize;

/// Deepest struct nesting accepted in source or produced by references.
pub const MAX_DEPTH: usize = 256;

/// Location of a token in the source: byte offset, 1-based line and column,
/// and width in characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub lptr: usize,
    pub lno: usize,
    pub col: usize,
    pub len: usize,
}

impl Span {
    pub fn new(lptr: usize, lno: usize, col: usize, len: usize) -> Span {
        Span { lptr, lno, col, len }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lno, self.col)
    }
}

/* Syntax */

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Int(i64),
    Str(String),
    Struct(Vec<Field>),
    Var { name: String, span: Span },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub name: String,
    pub span: Span,
    pub expr: Expr,
}

pub type Program = Vec<Definition>;

/* Evaluated data */

pub type Fields = IndexMap<String, Value>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Str(String),
    Struct(Fields),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(int) => Some(*int),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Number of nested struct levels; 0 for scalars.
    pub fn depth(&self) -> usize {
        match self {
            Value::Struct(fields) => 1 + fields.values().map(Value::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Field of a struct value; `None` for scalars and missing fields.
    pub fn get<S: AsRef<str>>(&self, field: S) -> Option<&Value> {
        self.as_struct().and_then(|fields| fields.get(field.as_ref()))
    }
}

/// What happens when a definition reuses a name already in the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Redefinition {
    #[default]
    Reject,
    /// Later value replaces the earlier one in its original position.
    Overwrite,
}

/// Ordered, append-only table of completed definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    defs: IndexMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable { defs: IndexMap::new() }
    }

    pub fn get<S: AsRef<str>>(&self, name: S) -> Option<&Value> {
        self.defs.get(name.as_ref())
    }

    pub fn contains<S: AsRef<str>>(&self, name: S) -> bool {
        self.defs.contains_key(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.defs.keys()
    }

    /// Inserts a definition, returning the value it displaced if the name
    /// was already bound. Position of an existing key is kept.
    pub(crate) fn bind(&mut self, name: String, value: Value) -> Option<Value> {
        self.defs.insert(name, value)
    }
}
