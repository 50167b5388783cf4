//! Row filters in the gateway's `column=operator.value` query syntax.

/// A single horizontal filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column=eq.value`
    Eq { column: String, value: String },
    /// `column=in.("a","b")`
    In { column: String, values: Vec<String> },
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn is_in<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::In { column, .. } => column,
        }
    }

    /// The right-hand side of the query pair.
    #[must_use]
    pub fn expression(&self) -> String {
        match self {
            Filter::Eq { value, .. } => format!("eq.{value}"),
            Filter::In { values, .. } => {
                let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
                format!("in.({})", quoted.join(","))
            }
        }
    }
}

// Double quotes let list members contain commas or parentheses.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
