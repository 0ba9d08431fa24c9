use miette::{Diagnostic, SourceSpan};

/// Low-level failures reported by the parsing engine.
///
/// Backtracking rollbacks are *not* errors; they never surface here. A
/// generic syntax failure carries only the offset the engine stopped at —
/// this layer does not try to enrich it.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("syntax error")]
    Syntax { offset: usize },
}

/// A syntax failure with diagnostic information for the user.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{cause}")]
pub struct Error {
    /// The underlying cause of the error.
    pub cause: ParseError,
    /// The source code related to the error.
    pub source_code: String,
    /// The location in the source code for diagnostics.
    pub location: SourceSpan,
}

impl Error {
    pub fn from_error(source_code: impl Into<String>, cause: ParseError) -> Self {
        let source_code = source_code.into();
        let ParseError::Syntax { offset } = cause;
        let location = SourceSpan::new(offset.min(source_code.len()).into(), 1);

        Self {
            cause,
            source_code,
            location,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.cause {
            ParseError::Syntax { .. } => "ParseError::Syntax",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self.cause {
            ParseError::Syntax { .. } => Some(Box::new(
                "Check for syntax errors or misplaced tokens.".to_string(),
            )),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            miette::LabeledSpan::new_with_span(Some(format!("{}", self.cause)), self.location),
        )))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }
}
