use tracing::debug;

use crate::error::{Error, Result};
use crate::tokeniser::{Token, TokVal};
use crate::types::{Definition, Expr, Field, Program, Span, MAX_DEPTH};
use crate::util::describe;

struct Parser<'src> {
    tokens: Vec<Token<'src>>,

    ptr: usize,
    depth: usize,   // Structs currently open
}

impl<'src> Parser<'src> {
    fn new(mut tokens: Vec<Token<'src>>) -> Parser<'src> {
        if !matches!(tokens.last(), Some(tok) if tok.val == TokVal::Eof) {
            let span = match tokens.last() {
                Some(tok) => Span::new(tok.span.lptr + tok.text.len(), tok.span.lno, tok.span.col + tok.span.len, 0),
                None => Span::new(0, 1, 1, 0),
            };
            tokens.push(Token::new(TokVal::Eof, "", span));
        }
        Parser {
           tokens,
           ptr: 0,
           depth: 0,
        }
    }

    /// Never runs past the trailing `Eof`.
    fn cur(&self) -> &Token<'src> {
        &self.tokens[self.ptr.min(self.tokens.len() - 1)]
    }

    fn step(&mut self) {
        if self.ptr < self.tokens.len() - 1 {
            self.ptr += 1;
        }
    }

    fn unexpected<T>(&self, exp: &str) -> Result<T> {
        let tok = self.cur();
        Err(Error::parse(tok.span, exp, describe(tok.text)))
    }

    fn expect(&mut self, gate: fn(tv: &TokVal) -> bool, exp: &str) -> Result<Token<'src>> {
        let tok = self.cur().clone();
        if gate(&tok.val) {
            self.step();
            Ok(tok)
        }
        else {
            self.unexpected(exp)
        }
    }

    fn expect_name(&mut self, exp: &str) -> Result<(String, Span)> {
        let tok = self.expect(|tv| matches!(tv, TokVal::Name(_)), exp)?;
        Ok((tok.text.to_string(), tok.span))
    }
}

/* Parse Values */

fn parse_var(parser: &mut Parser) -> Result<Expr> {
    parser.expect(|tv| matches!(tv, TokVal::Dot), "'.'")?;
    parser.expect(|tv| matches!(tv, TokVal::LParen), "'('")?;
    let (name, span) = parser.expect_name("variable name")?;
    parser.expect(|tv| matches!(tv, TokVal::RParen), "')'")?;
    parser.expect(|tv| matches!(tv, TokVal::Dot), "'.'")?;
    Ok(Expr::Var { name, span })
}

fn parse_struct(parser: &mut Parser) -> Result<Expr> {
    if parser.depth >= MAX_DEPTH {
        return parser.unexpected(&format!("at most {} nested structs", MAX_DEPTH));
    }
    parser.expect(|tv| matches!(tv, TokVal::Struct), "'struct'")?;
    parser.expect(|tv| matches!(tv, TokVal::LBrace), "'{'")?;
    parser.depth += 1;
    let fields = parse_fields(parser)?;
    parser.depth -= 1;
    Ok(Expr::Struct(fields))
}

fn parse_fields(parser: &mut Parser) -> Result<Vec<Field>> {
    let mut fields = Vec::new();

    if parser.cur().val == TokVal::RBrace {
        parser.step();
        return Ok(fields);
    }

    loop {
        let (name, _) = parser.expect_name("field name")?;
        parser.expect(|tv| matches!(tv, TokVal::Equals), "'='")?;
        let expr = parse_expr(parser)?;
        fields.push(Field { name, expr });

        match parser.cur().val {
            TokVal::Comma => {
                parser.step();
            },
            TokVal::RBrace => {
                parser.step();
                break;
            },
            _ => {
                return parser.unexpected("',' or '}'");
            }
        }
    }
    Ok(fields)
}

fn parse_expr(parser: &mut Parser) -> Result<Expr> {
    match parser.cur().val {
        TokVal::Integer(integer) => {
            parser.step();
            Ok(Expr::Int(integer))
        },
        TokVal::String(string) => {
            parser.step();
            Ok(Expr::Str(string.to_string()))
        },
        TokVal::Struct => {
            parse_struct(parser)
        },
        TokVal::Dot => {
            parse_var(parser)
        },
        _ => {
            parser.unexpected("a value (integer, string, struct or .(name).)")
        }
    }
}

/* Parse Definitions */

fn parse_definition(parser: &mut Parser) -> Result<Definition> {
    parser.expect(|tv| matches!(tv, TokVal::LParen), "'('")?;
    parser.expect(|tv| matches!(tv, TokVal::Def), "'def'")?;
    let (name, span) = parser.expect_name("definition name")?;
    let expr = parse_expr(parser)?;
    parser.expect(|tv| matches!(tv, TokVal::RParen), "')'")?;
    parser.expect(|tv| matches!(tv, TokVal::Break), "';'")?;
    Ok(Definition { name, span, expr })
}

/// Builds the ordered list of top-level definitions. Names are not resolved
/// here; `.(name).` stays an opaque reference until evaluation.
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    let mut parser = Parser::new(tokens);
    let mut program = Vec::new();
    while parser.cur().val != TokVal::Eof {
        program.push(parse_definition(&mut parser)?);
    }
    debug!(definitions = program.len(), "parsed program");
    Ok(program)
}
