//! Compound selectors: `tag`, `#id`, `.class`, `[attr]`, `[attr="value"]`

use crate::dom::tree::Element;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    /// Selector matching elements whose `name` attribute equals `value`
    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attributes: vec![(name.into(), Some(value.into()))],
            ..Self::default()
        }
    }

    /// Parse a single compound selector; combinators are not supported
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut selector = Self::default();
        let mut rest = input;

        let tag_len = ident_len(rest);
        if tag_len > 0 {
            selector.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 {
                        return None;
                    }
                    let name = rest[1..1 + len].to_string();
                    if c == '#' {
                        selector.id = Some(name);
                    } else {
                        selector.classes.push(name);
                    }
                    rest = &rest[1 + len..];
                }
                '[' => {
                    let end = rest.find(']')?;
                    selector.attributes.push(parse_attribute(&rest[1..end])?);
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        Some(selector)
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if &element.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = element.attribute("class").unwrap_or("");
            let classes = class_attr.split_whitespace();
            if !self.classes.iter().all(|c| classes.clone().any(|have| have == c)) {
                return false;
            }
        }
        self.attributes.iter().all(|(name, value)| match value {
            Some(value) => element.attribute(name) == Some(value.as_str()),
            None => element.has_attribute(name),
        })
    }
}

fn ident_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}

fn parse_attribute(body: &str) -> Option<(String, Option<String>)> {
    let Some((name, value)) = body.split_once('=') else {
        let name = body.trim();
        return (!name.is_empty()).then(|| (name.to_string(), None));
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim();
    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    Some((name.to_string(), Some(unquoted.to_string())))
}
