use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::types::{Expr, Field, Fields, Program, Redefinition, Span, SymbolTable, Value, MAX_DEPTH};

/// `level` counts the structs enclosing `expr`. A referenced value is
/// spliced in at that level, so the result stays within `MAX_DEPTH`.
fn eval_expr(expr: Expr, table: &SymbolTable, level: usize) -> Result<Value> {
    match expr {
        Expr::Int(integer) => Ok(Value::Int(integer)),
        Expr::Str(string) => Ok(Value::Str(string)),
        Expr::Struct(fields) => {
            let mut strct = Fields::with_capacity(fields.len());
            for Field { name, expr } in fields {
                let value = eval_expr(expr, table, level + 1)?;
                // a repeated field overwrites in place
                strct.insert(name, value);
            }
            Ok(Value::Struct(strct))
        },
        Expr::Var { name, span } => {
            match table.get(&name) {
                Some(value) if level + value.depth() > MAX_DEPTH => {
                    Err(Error::TooDeep { name, span, limit: MAX_DEPTH })
                },
                Some(value) => Ok(value.clone()),
                None => Err(Error::UndefinedVariable { name, span }),
            }
        },
    }
}

fn define(table: &mut SymbolTable, name: String, span: Span,
          value: Value, policy: Redefinition) -> Result<()> {
    if policy == Redefinition::Reject && table.contains(&name) {
        return Err(Error::DuplicateDefinition { name, span });
    }
    if table.bind(name, value).is_some() {
        trace!(policy = ?policy, "definition overwritten");
    }
    Ok(())
}

/// Evaluates definitions in source order. Each expression only sees the
/// definitions completed before it, so forward and self references fail.
pub fn evaluate(program: Program, policy: Redefinition) -> Result<SymbolTable> {
    let mut table = SymbolTable::new();
    for def in program {
        let value = eval_expr(def.expr, &table, 0)?;
        trace!(name = %def.name, "evaluated definition");
        define(&mut table, def.name, def.span, value, policy)?;
    }
    debug!(definitions = table.len(), "evaluated program");
    Ok(table)
}
