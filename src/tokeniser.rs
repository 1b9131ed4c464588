use tracing::debug;

use crate::error::{Error, LexReason, Result};
use crate::types::Span;

const LINE_COMMENT: &str = "REM";
const BLOCK_OPEN: &str = "--[[";
const BLOCK_CLOSE: &str = "]]";
const BEFORE_COMMENT: &str = "{}();,.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokVal<'src> {
    Name(&'src str),

    String(&'src str),
    Integer(i64),

    Def,
    Struct,

    LParen,
    RParen,
    LBrace,
    RBrace,

    Equals,
    Comma,
    Dot,

    Break,

    Eof,
}

#[derive(Clone, Debug)]
pub struct Token<'src> {
    pub val: TokVal<'src>,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub(crate) fn new(val: TokVal<'src>, text: &'src str, span: Span) -> Token<'src> {
        Token {
            val,
            text,
            span,
        }
    }
}

fn unambiguous_symbol<'src>(c: char) -> Option<TokVal<'src>> {
    match c {
        '(' => Some(TokVal::LParen),
        ')' => Some(TokVal::RParen),
        '{' => Some(TokVal::LBrace),
        '}' => Some(TokVal::RBrace),

        '=' => Some(TokVal::Equals),
        ',' => Some(TokVal::Comma),
        '.' => Some(TokVal::Dot),

        ';' => Some(TokVal::Break),
        _   => None,
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Tokeniser<'src> {
    input: &'src str,
    toks: Vec<Token<'src>>,   // Built Tokens

    ptr: usize,               // Byte offset of the next char
    lno: usize,               // Line number of the next char
    col: usize,               // Column number of the next char
}

impl<'src> Tokeniser<'src> {
    fn new(input: &'src str) -> Tokeniser<'src> {
        Tokeniser {
            input,
            toks: Vec::new(),
            ptr: 0,
            lno: 1,
            col: 1,
        }
    }

    fn rest(&self) -> &'src str {
        &self.input[self.ptr..]
    }

    fn cur(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn step(&mut self) -> Option<char> {
        let c = self.cur()?;
        self.ptr += c.len_utf8();
        if c == '\n' {
            self.lno += 1;
            self.col = 1;
        }
        else if c != '\r' {
            self.col += 1;
        }
        Some(c)
    }

    fn step_while(&mut self, gate: fn(char) -> bool) {
        while let Some(c) = self.cur() {
            if !gate(c) { break; }
            self.step();
        }
    }

    /// Zero-width span at the next char; widened by `span_from` once a
    /// lexeme has been consumed. Tokens never cross a newline.
    fn mark(&self) -> Span {
        Span::new(self.ptr, self.lno, self.col, 0)
    }

    fn span_from(&self, start: Span) -> Span {
        Span { len: self.col - start.col, ..start }
    }

    fn push(&mut self, val: TokVal<'src>, start: Span) {
        let text = &self.input[start.lptr..self.ptr];
        let span = self.span_from(start);
        self.toks.push(Token::new(val, text, span));
    }

    fn fail<T>(&self, start: Span, len: usize, reason: LexReason) -> Result<T> {
        Err(Error::lex(Span { len, ..start }, reason))
    }

    fn run(mut self) -> Result<Vec<Token<'src>>> {
        while let Some(c) = self.cur() {
            let start = self.mark();

            if c.is_whitespace() {
                self.step();
            }
            else if self.rest().starts_with(BLOCK_OPEN) {
                self.block_comment(start)?;
            }
            else if let Some(symbol) = unambiguous_symbol(c) {
                self.step();
                self.push(symbol, start);
            }
            else if c == '\'' {
                self.string(start)?;
            }
            else if c.is_ascii_digit() || c == '+' || c == '-' {
                self.integer(start)?;
            }
            else if is_word_start(c) {
                self.word(start);
            }
            else {
                return self.fail(start, 1, LexReason::UnexpectedChar(c));
            }
        }

        let eof = self.mark();
        self.push(TokVal::Eof, eof);
        Ok(self.toks)
    }

    fn block_comment(&mut self, start: Span) -> Result<()> {
        self.ptr += BLOCK_OPEN.len();
        self.col += BLOCK_OPEN.len();
        match self.rest().find(BLOCK_CLOSE) {
            Some(offset) => {
                let end = self.ptr + offset + BLOCK_CLOSE.len();
                while self.ptr < end {
                    self.step();
                }
                Ok(())
            },
            None => {
                self.fail(start, BLOCK_OPEN.len(), LexReason::UnterminatedComment)
            },
        }
    }

    fn string(&mut self, start: Span) -> Result<()> {
        self.step();
        let lptr = self.ptr;
        loop {
            match self.cur() {
                Some('\'') => {
                    let content = &self.input[lptr..self.ptr];
                    self.step();
                    self.push(TokVal::String(content), start);
                    return Ok(());
                },
                Some('\n') => {
                    return self.fail(start, 1, LexReason::NewlineInString);
                },
                Some(_) => {
                    self.step();
                },
                None => {
                    return self.fail(start, 1, LexReason::UnterminatedString);
                },
            }
        }
    }

    fn integer(&mut self, start: Span) -> Result<()> {
        if let Some('+') | Some('-') = self.cur() {
            self.step();
            if !matches!(self.cur(), Some(c) if c.is_ascii_digit()) {
                return self.fail(start, 1, LexReason::DanglingSign);
            }
        }

        let digits_from = self.ptr;
        self.step_while(|c| c.is_ascii_digit());
        let digits = &self.input[digits_from..self.ptr];
        let text = &self.input[start.lptr..self.ptr];
        let len = self.col - start.col;

        if digits.len() > 1 && digits.starts_with('0') {
            return self.fail(start, len, LexReason::LeadingZero(text.to_string()));
        }
        match text.parse::<i64>() {
            Ok(val) => {
                self.push(TokVal::Integer(val), start);
                Ok(())
            },
            Err(_) => {
                self.fail(start, len, LexReason::IntegerOutOfRange(text.to_string()))
            },
        }
    }

    /// `REM` only opens a comment at the start of input, after whitespace
    /// or after punctuation.
    fn opens_comment(&self, start: Span) -> bool {
        match self.input[..start.lptr].chars().next_back() {
            Some(prev) => prev.is_whitespace() || BEFORE_COMMENT.contains(prev),
            None => true,
        }
    }

    fn word(&mut self, start: Span) {
        self.step_while(is_word_char);
        let word = &self.input[start.lptr..self.ptr];
        match word {
            "def" => self.push(TokVal::Def, start),
            "struct" => self.push(TokVal::Struct, start),
            LINE_COMMENT if self.opens_comment(start) => self.step_while(|c| c != '\n'),
            _ => self.push(TokVal::Name(word), start),
        }
    }
}

/// Splits `input` into tokens, dropping whitespace and comments. The last
/// token is always `TokVal::Eof`.
pub fn tokenise<'src>(input: &'src str) -> Result<Vec<Token<'src>>> {
    let toks = Tokeniser::new(input).run()?;
    debug!(tokens = toks.len(), "tokenised input");
    Ok(toks)
}
