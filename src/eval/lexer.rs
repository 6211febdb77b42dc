//! Lexer for template expressions using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Literal keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,

    // Equality operators (longer first)
    #[token("===")]
    StrictEqual,
    #[token("!==")]
    StrictNotEqual,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,

    // Comparison operators
    #[token(">=")]
    GreaterOrEqual,
    #[token("<=")]
    LessOrEqual,
    #[token(">")]
    Greater,
    #[token("<")]
    Less,

    // Logical operators
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Bang,

    // Arithmetic operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Ternary
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(".")]
    Dot,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape(lex.slice()))]
    String(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Anything the grammar does not know; kept so the parser can report it
    Error,
}

/// Strip the surrounding quotes and resolve backslash escapes
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Lex an expression into tokens with spans
///
/// Unrecognized input becomes `Token::Error` rather than being dropped, so a
/// stray character makes the expression fail to parse instead of silently
/// changing its meaning.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Error), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            tokens(r#"true false null undefined 42 3.5 "hi" 'there'"#),
            vec![
                Token::True,
                Token::False,
                Token::Null,
                Token::Undefined,
                Token::Number(42.0),
                Token::Number(3.5),
                Token::String("hi".to_string()),
                Token::String("there".to_string()),
            ]
        );
    }

    #[test]
    fn test_equality_operators_longest_match() {
        assert_eq!(
            tokens("=== !== == != >= <= > <"),
            vec![
                Token::StrictEqual,
                Token::StrictNotEqual,
                Token::Equal,
                Token::NotEqual,
                Token::GreaterOrEqual,
                Token::LessOrEqual,
                Token::Greater,
                Token::Less,
            ]
        );
    }

    #[test]
    fn test_member_access() {
        assert_eq!(
            tokens("user.name[0]"),
            vec![
                Token::Ident("user".to_string()),
                Token::Dot,
                Token::Ident("name".to_string()),
                Token::BracketOpen,
                Token::Number(0.0),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(tokens("trueish"), vec![Token::Ident("trueish".to_string())]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""a\"b" 'it\'s'"#),
            vec![
                Token::String("a\"b".to_string()),
                Token::String("it's".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_character_is_error_token() {
        assert_eq!(
            tokens("a # b"),
            vec![
                Token::Ident("a".to_string()),
                Token::Error,
                Token::Ident("b".to_string()),
            ]
        );
    }
}
