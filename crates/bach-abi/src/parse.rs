//! Type spelling parser
//!
//! Turns spellings such as `uint256`, `address[]` or `(uint8 a, bytes b)[2]`
//! into [`ParamType`] descriptors. Integer and byte widths are taken as
//! written; range checks happen when a coder is resolved.

use std::str::FromStr;

use crate::error::{AbiError, Result};
use crate::param::{Param, ParamType};

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser::new(s);
        let kind = parser.param_type()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(kind)
    }
}

impl FromStr for Param {
    type Err = AbiError;

    /// Parse `type` or `type name`
    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser::new(s);
        let param = parser.param()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(param)
    }
}

/// Parse a list of spellings into unnamed-or-named parameters
pub fn parse_params<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Param>> {
    specs.iter().map(|s| s.as_ref().parse()).collect()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, reason: &str) -> AbiError {
        AbiError::Parse(format!("{} at position {} in {:?}", reason, self.pos, self.input))
    }

    fn identifier(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn param(&mut self) -> Result<Param> {
        self.skip_whitespace();
        let kind = self.param_type()?;
        self.skip_whitespace();
        let name = self.identifier().to_string();
        Ok(Param::new(name, kind))
    }

    fn param_type(&mut self) -> Result<ParamType> {
        self.skip_whitespace();
        let mut kind = if self.peek() == Some('(') {
            self.tuple()?
        } else {
            let ident = self.identifier();
            if ident == "tuple" && self.peek() == Some('(') {
                self.tuple()?
            } else {
                elementary(ident).ok_or_else(|| AbiError::InvalidType(ident.to_string()))?
            }
        };

        while self.eat('[') {
            let rest = self.rest();
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            let len = &rest[..digits];
            self.pos += digits;
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            kind = if len.is_empty() {
                ParamType::Array(Box::new(kind))
            } else {
                let len = len.parse().map_err(|_| self.error("array length too large"))?;
                ParamType::FixedArray(Box::new(kind), len)
            };
        }

        Ok(kind)
    }

    fn tuple(&mut self) -> Result<ParamType> {
        if !self.eat('(') {
            return Err(self.error("expected '('"));
        }
        let mut components = Vec::new();
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(ParamType::Tuple(components));
        }
        loop {
            components.push(self.param()?);
            self.skip_whitespace();
            if self.eat(')') {
                return Ok(ParamType::Tuple(components));
            }
            if !self.eat(',') {
                return Err(self.error("expected ',' or ')'"));
            }
        }
    }
}

fn elementary(ident: &str) -> Option<ParamType> {
    match ident {
        "" => return Some(ParamType::Empty),
        "address" => return Some(ParamType::Address),
        "bool" => return Some(ParamType::Bool),
        "string" => return Some(ParamType::String),
        "bytes" => return Some(ParamType::Bytes),
        "uint" => return Some(ParamType::Uint(256)),
        "int" => return Some(ParamType::Int(256)),
        _ => {}
    }

    if let Some(bits) = ident.strip_prefix("uint") {
        return width(bits).map(ParamType::Uint);
    }
    if let Some(bits) = ident.strip_prefix("int") {
        return width(bits).map(ParamType::Int);
    }
    if let Some(size) = ident.strip_prefix("bytes") {
        return width(size).map(ParamType::FixedBytes);
    }
    None
}

fn width(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Oversized suffixes still parse so the dispatcher reports them as bad widths
    Some(digits.parse().unwrap_or(usize::MAX))
}
