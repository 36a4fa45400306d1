//! Command replies.
//!
//! A [`Reply`] is what [`CommandHandler::execute`] hands back for every
//! command. It mirrors the reply kinds of the data-structure server this
//! store imitates, without committing to a wire format; `Display` renders
//! it the way an interactive CLI would.
//!
//! ```text
//! Status("OK")             OK
//! Integer(3)               (integer) 3
//! Bulk(b"v")               "v"
//! Nil                      (nil)
//! Error("ERR ...")         (error) ERR ...
//! Array([Bulk(a), Nil])    1) "a"
//!                          2) (nil)
//! ```
//!
//! [`CommandHandler::execute`]: super::CommandHandler::execute

use std::fmt;

use bytes::Bytes;

use crate::error::Error;

/// A command's result.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Short status text such as `OK` or `PONG`.
    Status(String),

    /// An error token, e.g. `ERR no such key`.
    Error(String),

    Integer(i64),

    /// A binary-safe string.
    Bulk(Bytes),

    /// A floating point number (ZSCORE).
    Double(f64),

    /// Multi-line text printed as is (INFO).
    Text(String),

    /// Absent value.
    Nil,

    Array(Vec<Reply>),
}

impl Reply {
    /// Common response for successful operations
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    pub fn status(s: impl Into<String>) -> Self {
        Reply::Status(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    pub fn integer(n: i64) -> Self {
        Reply::Integer(n)
    }

    /// `1` for true, `0` for false.
    pub fn boolean(b: bool) -> Self {
        Reply::Integer(i64::from(b))
    }

    /// A count that came back as `usize`/`u64`.
    pub fn count<N: TryInto<i64>>(n: N) -> Self {
        Reply::Integer(n.try_into().unwrap_or(i64::MAX))
    }

    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::Bulk(data.into())
    }

    /// A bulk string, or nil when absent.
    pub fn optional(data: Option<Bytes>) -> Self {
        data.map_or(Reply::Nil, Reply::Bulk)
    }

    pub fn array(values: Vec<Reply>) -> Self {
        Reply::Array(values)
    }

    /// An array of bulk strings.
    pub fn bulks(values: impl IntoIterator<Item = Bytes>) -> Self {
        Reply::Array(values.into_iter().map(Reply::Bulk).collect())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Bulk(b) => Some(b),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Reply::Status(s) => f.write_str(s),
            Reply::Error(s) => write!(f, "(error) {}", s),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Bulk(data) => write_quoted(f, data),
            Reply::Double(d) => write!(f, "\"{}\"", d),
            Reply::Text(s) => f.write_str(s.trim_end()),
            Reply::Nil => f.write_str("(nil)"),
            Reply::Array(values) if values.is_empty() => f.write_str("(empty array)"),
            Reply::Array(values) => {
                let width = values.len().to_string().len();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                        write!(f, "{:indent$}", "")?;
                    }
                    let label = format!("{:>width$}) ", i + 1);
                    f.write_str(&label)?;
                    value.render(f, indent + label.len())?;
                }
                Ok(())
            }
        }
    }
}

impl From<Error> for Reply {
    fn from(err: Error) -> Self {
        Reply::Error(err.to_string())
    }
}

/// Writes bytes as a double-quoted string, escaping anything unprintable.
fn write_quoted(f: &mut fmt::Formatter<'_>, data: &[u8]) -> fmt::Result {
    f.write_str("\"")?;
    for &b in data {
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x20..=0x7e => write!(f, "{}", b as char)?,
            _ => write!(f, "\\x{:02x}", b)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(Reply::ok().to_string(), "OK");
        assert_eq!(Reply::integer(-2).to_string(), "(integer) -2");
        assert_eq!(Reply::bulk(Bytes::from("v")).to_string(), "\"v\"");
        assert_eq!(Reply::Nil.to_string(), "(nil)");
        assert_eq!(Reply::Double(1.5).to_string(), "\"1.5\"");
        assert_eq!(
            Reply::from(Error::NameTaken).to_string(),
            "(error) ERR target key name is busy"
        );
    }

    #[test]
    fn test_binary_bulk_is_escaped() {
        let reply = Reply::bulk(Bytes::from_static(b"a\"b\x00\n"));
        assert_eq!(reply.to_string(), r#""a\"b\x00\n""#);
    }

    #[test]
    fn test_array_rendering() {
        let reply = Reply::array(vec![Reply::bulk(Bytes::from("a")), Reply::Nil]);
        assert_eq!(reply.to_string(), "1) \"a\"\n2) (nil)");

        assert_eq!(Reply::array(vec![]).to_string(), "(empty array)");
    }

    #[test]
    fn test_wide_and_nested_arrays_align() {
        let reply = Reply::bulks((1..=10).map(|i| Bytes::from(i.to_string())));
        let rendered = reply.to_string();
        assert!(rendered.starts_with(" 1) \"1\"\n 2) \"2\""));
        assert!(rendered.ends_with("10) \"10\""));

        let nested = Reply::array(vec![Reply::array(vec![
            Reply::integer(1),
            Reply::integer(2),
        ])]);
        assert_eq!(nested.to_string(), "1) 1) (integer) 1\n   2) (integer) 2");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(Reply::boolean(true), Reply::Integer(1));
        assert_eq!(Reply::count(3usize), Reply::Integer(3));
        assert_eq!(Reply::optional(None), Reply::Nil);
        assert!(Reply::error("ERR x").is_error());
        assert_eq!(Reply::integer(7).as_integer(), Some(7));
        assert_eq!(Reply::bulk(Bytes::from("x")).as_bytes(), Some(&b"x"[..]));
    }
}
