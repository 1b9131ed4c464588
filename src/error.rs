use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error;

use crate::types::Span;
use crate::util::source_line;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexReason {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("string literal runs past the end of the line")]
    NewlineInString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("sign is not followed by a digit")]
    DanglingSign,
    #[error("integer literal '{0}' has a leading zero")]
    LeadingZero(String),
    #[error("integer literal '{0}' does not fit in 64 bits")]
    IntegerOutOfRange(String),
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

impl LexReason {
    fn code(&self) -> u16 {
        match self {
            LexReason::UnterminatedString => 101,
            LexReason::NewlineInString => 102,
            LexReason::UnterminatedComment => 103,
            LexReason::DanglingSign => 104,
            LexReason::LeadingZero(_) => 105,
            LexReason::IntegerOutOfRange(_) => 106,
            LexReason::UnexpectedChar(_) => 107,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            LexReason::UnterminatedString => "Close this string with '",
            LexReason::NewlineInString => "Strings cannot span lines; close it before the line ends",
            LexReason::UnterminatedComment => "Close this comment with ]]",
            LexReason::DanglingSign => "Write the digits directly after the sign",
            LexReason::LeadingZero(_) => "Remove the leading zeros",
            LexReason::IntegerOutOfRange(_) => "Use a value between -9223372036854775808 and 9223372036854775807",
            LexReason::UnexpectedChar(_) => "Remove this character",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("LexError at {span}: {reason}")]
    Lex { span: Span, reason: LexReason },

    #[error("ParseError at {span}: expected {expected}, found {found}")]
    Parse { span: Span, expected: String, found: String },

    #[error("UndefinedVariableError at {span}: '{name}' is not defined before this point")]
    UndefinedVariable { name: String, span: Span },

    #[error("DuplicateDefinitionError at {span}: '{name}' is already defined")]
    DuplicateDefinition { name: String, span: Span },

    #[error("NestingError at {span}: '{name}' would nest structs deeper than {limit} levels")]
    TooDeep { name: String, span: Span, limit: usize },

    #[error("EncodeError: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IoError: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn lex(span: Span, reason: LexReason) -> Error {
        Error::Lex { span, reason }
    }

    pub(crate) fn parse<E: Into<String>, F: Into<String>>(span: Span, expected: E, found: F) -> Error {
        Error::Parse {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Error::Lex { reason, .. } => reason.code(),
            Error::Parse { .. } => 150,
            Error::UndefinedVariable { .. } => 201,
            Error::DuplicateDefinition { .. } => 202,
            Error::TooDeep { .. } => 203,
            Error::Encode(_) => 300,
            Error::Io { .. } => 400,
        }
    }

    /// Source location, for errors that stem from the input text.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex { span, .. } |
            Error::Parse { span, .. } |
            Error::UndefinedVariable { span, .. } |
            Error::DuplicateDefinition { span, .. } |
            Error::TooDeep { span, .. } => Some(*span),
            Error::Encode(_) | Error::Io { .. } => None,
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            Error::Lex { reason, .. } => Some(reason.hint().to_string()),
            Error::Parse { expected, .. } => Some(format!("Expected {} here", expected)),
            Error::UndefinedVariable { name, .. } => {
                Some(format!("Define '{}' in an earlier (def ...) statement", name))
            },
            Error::DuplicateDefinition { name, .. } => {
                Some(format!("Rename this definition or remove the earlier '{}'", name))
            },
            Error::TooDeep { .. } => {
                Some(String::from("Reference a less deeply nested definition here"))
            },
            Error::Encode(_) | Error::Io { .. } => None,
        }
    }

    /// Renders the error with the offending source line and a pointer under
    /// the token responsible.
    pub fn render(&self, input: &str) -> String {
        if let (Some(span), Some(hint)) = (self.span(), self.hint()) {
            let code_line = format!("{:<3}| {}", span.lno, source_line(input, span.lno));
            let ptr_line = format!("{}{}", " ".repeat(4 + span.col), "^".repeat(span.len.max(1)));
            let hint_line = format!("Hint: {}", hint);
            format!("[E{}] {}\n{}\n{}\n{}\n", self.code(), self, code_line, ptr_line, hint_line)
        }
        else {
            format!("[E{}] {}\n", self.code(), self)
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
