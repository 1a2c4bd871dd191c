//! Composite attribute addressing.
//!
//! Attribute names on the wire may be composite, `"material|color"` meaning
//! sub-field `color` of attribute `material`. The raw `|` syntax is parsed
//! exactly once, here, into a tagged [`AttributeAddress`]; everything past
//! this boundary works with the resolved form instead of re-splitting
//! strings ad hoc.

use std::collections::BTreeMap;

/// A structured-or-primitive attribute value as carried by entity records
/// and scene nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Num(f64),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Sub-field lookup. `None` for primitives and missing keys.
    pub fn field(&self, name: &str) -> Option<&AttributeValue> {
        match self {
            Self::Map(fields) => fields.get(name),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

/// A parsed attribute reference: the attribute itself, plus an optional
/// sub-field of a structured value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeAddress {
    attribute: String,
    sub_field: Option<String>,
}

impl AttributeAddress {
    /// Parses `"name"` or `"name|subfield"`. Splits on the first `|` only;
    /// deeper nesting is not part of the addressing scheme.
    pub fn parse(name: &str) -> Self {
        match name.split_once('|') {
            Some((attribute, sub_field)) => Self {
                attribute: attribute.to_string(),
                sub_field: Some(sub_field.to_string()),
            },
            None => Self {
                attribute: name.to_string(),
                sub_field: None,
            },
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn sub_field(&self) -> Option<&str> {
        self.sub_field.as_deref()
    }
}
