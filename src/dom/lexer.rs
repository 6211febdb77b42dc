//! Markup lexer using logos
//!
//! Two token sets share one source: [`MarkupToken`] for content and
//! [`TagToken`] for the inside of a start tag. The scanner morphs between
//! them when it crosses `<name` and `>`.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum MarkupToken {
    #[token("<!--", comment)]
    Comment(String),

    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*", |lex| lex.slice()[1..].to_ascii_lowercase())]
    TagOpen(String),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", close_name)]
    TagClose(String),

    /// A `<` that does not start a tag is ordinary text
    #[token("<")]
    Lt,

    #[regex(r"[^<]+", |lex| lex.slice().to_string())]
    Text(String),
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum TagToken {
    #[token(">")]
    End,
    #[token("/>")]
    SelfClose,
    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| strip_quotes(lex.slice()))]
    #[regex(r"'[^']*'", |lex| strip_quotes(lex.slice()))]
    Quoted(String),

    /// Attribute name or unquoted attribute value
    #[regex(r#"[^ \t\n\r"'=<>/]+"#, |lex| lex.slice().to_string())]
    Word(String),
}

fn comment(lex: &mut Lexer<MarkupToken>) -> Option<String> {
    let remainder = lex.remainder();
    let end = remainder.find("-->")?;
    let text = remainder[..end].to_string();
    lex.bump(end + 3);
    Some(text)
}

fn close_name(lex: &mut Lexer<MarkupToken>) -> String {
    lex.slice()[2..]
        .trim_end_matches('>')
        .trim_end()
        .to_ascii_lowercase()
}

fn strip_quotes(quoted: &str) -> String {
    quoted[1..quoted.len() - 1].to_string()
}

/// One structural piece of markup
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Text(String),
    Comment(String),
    Open {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    Close(String),
}

/// Split markup into pieces
///
/// Malformed input never fails: unterminated comments and stray characters
/// degrade to text, and an unterminated start tag ends at end of input.
pub fn scan(input: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut lex = MarkupToken::lexer(input);

    while let Some(token) = lex.next() {
        match token {
            Ok(MarkupToken::Text(text)) => push_text(&mut pieces, &text),
            Ok(MarkupToken::Lt) => push_text(&mut pieces, "<"),
            Ok(MarkupToken::Comment(text)) => pieces.push(Piece::Comment(text)),
            Ok(MarkupToken::TagClose(name)) => pieces.push(Piece::Close(name)),
            Ok(MarkupToken::TagOpen(name)) => {
                let mut tag_lex = lex.morph::<TagToken>();
                let (attributes, self_closing) = scan_attributes(&mut tag_lex);
                pieces.push(Piece::Open {
                    name,
                    attributes,
                    self_closing,
                });
                lex = tag_lex.morph();
            }
            // Only an unterminated comment reaches here
            Err(()) => push_text(&mut pieces, lex.slice()),
        }
    }

    pieces
}

fn scan_attributes(lex: &mut Lexer<TagToken>) -> (Vec<(String, Option<String>)>, bool) {
    let mut attributes: Vec<(String, Option<String>)> = Vec::new();
    let mut awaiting_value = false;

    while let Some(token) = lex.next() {
        match token {
            Ok(TagToken::End) => return (attributes, false),
            Ok(TagToken::SelfClose) => return (attributes, true),
            Ok(TagToken::Equals) => awaiting_value = !attributes.is_empty(),
            Ok(TagToken::Word(word)) => {
                if awaiting_value {
                    if let Some(last) = attributes.last_mut() {
                        last.1 = Some(word);
                    }
                    awaiting_value = false;
                } else {
                    attributes.push((word, None));
                }
            }
            Ok(TagToken::Quoted(value)) => {
                if awaiting_value {
                    if let Some(last) = attributes.last_mut() {
                        last.1 = Some(value);
                    }
                }
                awaiting_value = false;
            }
            Err(()) => {}
        }
    }

    (attributes, false)
}

/// Adjacent text tokens (e.g. around a stray `<`) merge into one piece
fn push_text(pieces: &mut Vec<Piece>, text: &str) {
    if let Some(Piece::Text(last)) = pieces.last_mut() {
        last.push_str(text);
    } else {
        pieces.push(Piece::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn open(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Piece {
        Piece::Open {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(n, v)| (n.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing,
        }
    }

    #[test]
    fn test_element_with_text() {
        assert_eq!(
            scan("<p>Hello</p>"),
            vec![
                open("p", &[], false),
                Piece::Text("Hello".to_string()),
                Piece::Close("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_forms() {
        assert_eq!(
            scan(r#"<input type="text" value='a b' disabled data-x=1>"#),
            vec![open(
                "input",
                &[
                    ("type", Some("text")),
                    ("value", Some("a b")),
                    ("disabled", None),
                    ("data-x", Some("1")),
                ],
                false
            )]
        );
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(scan("<br/>"), vec![open("br", &[], true)]);
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            scan("a<!-- note -->b"),
            vec![
                Piece::Text("a".to_string()),
                Piece::Comment(" note ".to_string()),
                Piece::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_stray_less_than_is_text() {
        assert_eq!(scan("1 < 2"), vec![Piece::Text("1 < 2".to_string())]);
    }

    #[test]
    fn test_tag_names_lowercased() {
        assert_eq!(
            scan("<DIV></DIV >"),
            vec![open("div", &[], false), Piece::Close("div".to_string())]
        );
    }

    #[test]
    fn test_greater_than_in_style_text() {
        assert_eq!(
            scan("<style>a > b { color: red; }</style>"),
            vec![
                open("style", &[], false),
                Piece::Text("a > b { color: red; }".to_string()),
                Piece::Close("style".to_string()),
            ]
        );
    }
}
