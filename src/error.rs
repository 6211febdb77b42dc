//! Error types for expression evaluation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::eval::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Parse error at {span:?}: {message}")]
    Parse {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("{name} is not defined")]
    UndefinedVariable { name: String },

    #[error("Type error: {message}")]
    Type { message: String },
}

impl EvalError {
    /// Format the error with source context using ariadne
    ///
    /// Only parse errors carry a span; other variants format as their message.
    pub fn format(&self, source: &str, name: &str) -> String {
        let EvalError::Parse {
            span,
            message,
            expected,
        } = self
        else {
            return self.to_string();
        };

        let expected_str = if expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", expected.join(", "))
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, name, span.start)
            .with_message(message)
            .with_label(
                Label::new((name, span.clone()))
                    .with_message(format!("{}{}", message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((name, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for EvalError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of expression".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
            #[allow(unreachable_patterns)]
            _ => "Invalid expression".to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of expression".to_string()),
                _ => None,
            })
            .collect();

        EvalError::Parse {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Question => "'?'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Error => "unrecognized character".to_string(),
        _ => format!("{:?}", tok),
    }
}
