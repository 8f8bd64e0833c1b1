//! Reply rendering
//!
//! Only scalars and one level of arrays of scalars are printed. Nested
//! arrays, nulls and error values inside a reply produce no lines.

use crate::utils::RespValue;

/// The reply shapes the REPL knows how to print
#[derive(Debug, PartialEq)]
pub enum ReplyShape<'a> {
    Text(&'a str),
    Blob(&'a [u8]),
    Integer(i64),
    FlatArray(&'a [RespValue]),
    Ignored,
}

impl<'a> ReplyShape<'a> {
    pub fn classify(value: &'a RespValue) -> Self {
        match value {
            RespValue::SimpleString(s) => ReplyShape::Text(s),
            RespValue::BulkString(b) => ReplyShape::Blob(b),
            RespValue::Integer(n) => ReplyShape::Integer(*n),
            RespValue::Array(items) => ReplyShape::FlatArray(items),
            RespValue::Null | RespValue::Error(_) => ReplyShape::Ignored,
        }
    }

    /// Line for a scalar shape, `None` for arrays and ignored values
    fn scalar_line(&self) -> Option<String> {
        match self {
            ReplyShape::Text(s) => Some(s.to_string()),
            ReplyShape::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
            ReplyShape::Integer(n) => Some(n.to_string()),
            ReplyShape::FlatArray(_) | ReplyShape::Ignored => None,
        }
    }
}

/// Printable lines for `value`, in order
pub fn render(value: &RespValue) -> Vec<String> {
    match ReplyShape::classify(value) {
        ReplyShape::FlatArray(items) => items
            .iter()
            .filter_map(|item| ReplyShape::classify(item).scalar_line())
            .collect(),
        shape => shape.scalar_line().into_iter().collect(),
    }
}
