use crate::errors::IdentityError;

/// A value bound to a named statement parameter.
///
/// Flags travel as integers so that every backend reads them back as `"1"`/`"0"`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(i32),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(Some(value.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(Some(value))
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(Some(value.clone()))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(value: Option<&str>) -> Self {
        SqlValue::Text(value.map(str::to_string))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Int(i32::from(value))
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

/// Counts wider than an `INTEGER` column are rejected rather than truncated.
impl TryFrom<u32> for SqlValue {
    type Error = IdentityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        i32::try_from(value).map(SqlValue::Int).map_err(|_| {
            IdentityError::InvalidArgument(format!("Value {value} does not fit an INTEGER column"))
        })
    }
}

/// Named parameters for a statement using `@name` placeholders.
///
/// Names are matched case-insensitively; the leading `@` is optional when adding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, SqlValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a parameter
    pub fn with(mut self, name: &str, value: impl Into<SqlValue>) -> Self {
        let name = name.trim_start_matches('@').to_string();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.position(name.trim_start_matches('@'))
            .map(|index| &self.entries[index].1)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Statement text rewritten to positional `$n` placeholders, with values in bind order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundStatement {
    pub(crate) sql: String,
    pub(crate) values: Vec<SqlValue>,
}

/// Rewrites `@name` placeholders to `$1..$n` and orders the values to match.
///
/// Placeholders inside quoted literals or identifiers are left alone. A repeated
/// placeholder reuses its first position. Every placeholder needs a value and every
/// value needs a placeholder.
pub(crate) fn bind_named(statement: &str, params: &Params) -> Result<BoundStatement, IdentityError> {
    if statement.trim().is_empty() {
        return Err(IdentityError::InvalidArgument(
            "Command text cannot be null or empty.".to_string(),
        ));
    }

    let mut sql = String::with_capacity(statement.len() + 8);
    let mut order: Vec<usize> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            sql.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                sql.push(c);
            }
            '@' if chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') =>
            {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let entry = params.position(&name).ok_or_else(|| {
                    IdentityError::InvalidArgument(format!(
                        "No value supplied for parameter @{name}"
                    ))
                })?;
                let slot = match order.iter().position(|&e| e == entry) {
                    Some(slot) => slot,
                    None => {
                        order.push(entry);
                        order.len() - 1
                    }
                };
                sql.push('$');
                sql.push_str(&(slot + 1).to_string());
            }
            _ => sql.push(c),
        }
    }

    if let Some((name, _)) = params
        .entries
        .iter()
        .enumerate()
        .find(|(index, _)| !order.contains(index))
        .map(|(_, entry)| entry)
    {
        return Err(IdentityError::InvalidArgument(format!(
            "Parameter @{name} does not appear in the statement"
        )));
    }

    let values = order
        .iter()
        .map(|&index| params.entries[index].1.clone())
        .collect();

    Ok(BoundStatement { sql, values })
}
