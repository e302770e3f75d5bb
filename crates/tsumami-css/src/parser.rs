//! Selector parser
//!
//! Hand-written cursor over the selector source. Produces the
//! `ComplexSelector` list consumed by the matcher.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, NthExpression, PseudoClass,
    SelectorComponent, SelectorList, SelectorPart,
};
use crate::SelectorError;

/// Parse a full selector list
pub(crate) fn parse_selector_list(source: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    if source.trim().is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut parser = Parser::new(source);
    let list = parser.parse_list(false)?;
    tracing::trace!(selector = source, complex = list.len(), "parsed selector");
    Ok(list)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, returns whether any was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                selector: self.src.to_string(),
                offset: self.pos,
                found,
            },
            None => SelectorError::UnexpectedEnd(self.src.to_string()),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Comma-separated complex selectors. Nested lists stop at `)`.
    fn parse_list(&mut self, nested: bool) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut list = Vec::new();
        loop {
            self.skip_ws();
            list.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                None if !nested => break,
                Some(')') if nested => break,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(list)
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let first = self.parse_compound()?.ok_or_else(|| self.unexpected())?;
        let mut parts = vec![SelectorPart {
            combinator: None,
            components: first,
        }];

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                None | Some(',') | Some(')') => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_ws();
            }

            let components = self.parse_compound()?.ok_or_else(|| self.unexpected())?;
            parts.push(SelectorPart {
                combinator: Some(combinator),
                components,
            });
        }

        Ok(ComplexSelector { parts })
    }

    /// Compound selector, None if nothing selector-like is at the cursor
    fn parse_compound(&mut self) -> Result<Option<Vec<SelectorComponent>>, SelectorError> {
        let mut components = Vec::new();

        if self.eat('*') {
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_start) {
            let tag = self.ident()?;
            components.push(SelectorComponent::Type(tag.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.attribute()?));
                }
                Some(':') => {
                    self.bump();
                    components.push(SelectorComponent::PseudoClass(self.pseudo_class()?));
                }
                _ => break,
            }
        }

        Ok((!components.is_empty()).then_some(components))
    }

    /// Identifier with backslash escapes resolved
    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(SelectorError::UnexpectedEnd(self.src.to_string())),
                }
            } else if is_ident_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }

        if is_valid_ident(&out) {
            Ok(out)
        } else {
            Err(self.unexpected())
        }
    }

    /// `[name]`, `[name op value]`, `[name op value i]`. The `[` is consumed.
    fn attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();

        if self.eat(']') {
            return Ok(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let op = match self.bump() {
            Some('=') => '=',
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                self.expect('=')?;
                op
            }
            _ => return Err(self.unexpected()),
        };
        self.skip_ws();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.quoted(quote)?
            }
            _ => self.ident()?,
        };
        let matcher = match op {
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            '*' => AttributeMatcher::Substring(value),
            _ => AttributeMatcher::Exact(value),
        };

        self.skip_ws();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.bump();
                self.skip_ws();
                true
            }
            Some('s' | 'S') => {
                self.bump();
                self.skip_ws();
                false
            }
            _ => false,
        };
        self.expect(']')?;

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    /// String body up to the closing quote. The opening quote is consumed.
    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => break,
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => break,
            }
        }
        Err(SelectorError::UnexpectedEnd(self.src.to_string()))
    }

    /// Pseudo-class after the `:`
    fn pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::PseudoElement(self.src.to_string()));
        }
        let name = self.ident()?.to_ascii_lowercase();

        if !self.eat('(') {
            return match name.as_str() {
                "root" => Ok(PseudoClass::Root),
                "empty" => Ok(PseudoClass::Empty),
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                "first-of-type" => Ok(PseudoClass::FirstOfType),
                "last-of-type" => Ok(PseudoClass::LastOfType),
                "only-of-type" => Ok(PseudoClass::OnlyOfType),
                "checked" => Ok(PseudoClass::Checked),
                "disabled" => Ok(PseudoClass::Disabled),
                "enabled" => Ok(PseudoClass::Enabled),
                "before" | "after" | "first-line" | "first-letter" => {
                    Err(SelectorError::PseudoElement(self.src.to_string()))
                }
                _ => Err(SelectorError::UnknownPseudoClass(name)),
            };
        }

        let pseudo = match name.as_str() {
            "nth-child" => PseudoClass::NthChild(self.nth()?),
            "nth-last-child" => PseudoClass::NthLastChild(self.nth()?),
            "nth-of-type" => PseudoClass::NthOfType(self.nth()?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(self.nth()?),
            "not" | "is" | "where" => {
                let start = self.pos;
                let inner = self.parse_list(true)?;
                let list = SelectorList::from_parts(self.src[start..self.pos].trim(), inner);
                match name.as_str() {
                    "not" => PseudoClass::Not(list),
                    "is" => PseudoClass::Is(list),
                    _ => PseudoClass::Where(list),
                }
            }
            _ => return Err(SelectorError::UnknownPseudoClass(name)),
        };
        self.expect(')')?;
        Ok(pseudo)
    }

    /// An+B argument, leaves the cursor on `)`
    fn nth(&mut self) -> Result<NthExpression, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != ')') {
            self.bump();
        }
        let raw = &self.src[start..self.pos];
        NthExpression::parse(raw).ok_or_else(|| SelectorError::InvalidNth(raw.trim().to_string()))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Non-empty, and not starting with a digit or a dash followed by a digit
fn is_valid_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some('-') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(_) => true,
    }
}
