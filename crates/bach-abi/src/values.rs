//! Decoded value lists

use std::collections::HashMap;
use std::ops::Index;

use crate::error::{AbiError, Result};
use crate::param::Param;
use crate::token::Token;

/// Decoded values, addressable by position and by component name
///
/// Positional access always works. A name resolves only when exactly one
/// non-placeholder component carries it; names shared by several
/// components report [`AbiError::AmbiguousName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedValues {
    values: Vec<Token>,
    names: Vec<String>,
    index: HashMap<String, Option<usize>>,
}

impl DecodedValues {
    /// Pair decoded values with the parameters that produced them
    pub fn new(params: &[Param], values: Vec<Token>) -> Self {
        let names: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
        let mut index: HashMap<String, Option<usize>> = HashMap::new();
        for (position, (name, value)) in names.iter().zip(&values).enumerate() {
            if name.is_empty() || matches!(value, Token::Null) {
                continue;
            }
            index
                .entry(name.clone())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(position));
        }
        Self { values, names, index }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `position`
    pub fn get(&self, position: usize) -> Option<&Token> {
        self.values.get(position)
    }

    /// Value of the component called `name`
    pub fn by_name(&self, name: &str) -> Result<&Token> {
        match self.index.get(name) {
            Some(Some(position)) => Ok(&self.values[*position]),
            Some(None) => Err(AbiError::AmbiguousName(name.to_string())),
            None => Err(AbiError::UnknownName(name.to_string())),
        }
    }

    /// Component names, empty for unnamed components
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over values in order
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.values.iter()
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[Token] {
        &self.values
    }

    /// Take the positional values
    pub fn into_tokens(self) -> Vec<Token> {
        self.values
    }
}

impl Index<usize> for DecodedValues {
    type Output = Token;

    fn index(&self, position: usize) -> &Token {
        &self.values[position]
    }
}

impl<'a> IntoIterator for &'a DecodedValues {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for DecodedValues {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
