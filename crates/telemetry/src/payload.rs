//! Auxiliary data attached to a log line.

use serde::Serialize;
use serde_json::Value;

/// Optional detail that follows the message on a log line.
#[derive(Debug)]
pub enum Payload {
    /// Nothing attached; renders as an empty placeholder.
    Absent,
    /// Arbitrary structured data.
    Value(Value),
    /// An error and its causes. Never rendered in production.
    Error(anyhow::Error),
}

impl Payload {
    /// Serialize any value into a structured payload.
    pub fn value<T: Serialize + ?Sized>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Payload::Value(value),
            Err(e) => Payload::Value(Value::String(format!("<unserializable: {}>", e))),
        }
    }

    pub fn error(err: impl Into<anyhow::Error>) -> Self {
        Payload::Error(err.into())
    }

    /// Text that follows the message. Strings print bare, as a console would.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) render as the empty
    /// placeholder, the same as an absent payload.
    pub fn render(&self) -> String {
        match self {
            Payload::Absent => String::new(),
            Payload::Value(value) if is_falsy(value) => String::new(),
            Payload::Value(Value::String(s)) => s.clone(),
            Payload::Value(value) => value.to_string(),
            Payload::Error(err) => format!("{:#}", err),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Absent
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Value(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Value(Value::String(value))
    }
}

impl From<anyhow::Error> for Payload {
    fn from(err: anyhow::Error) -> Self {
        Payload::Error(err)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render() {
        assert_eq!(Payload::Absent.render(), "");
        assert_eq!(Payload::from(json!(null)).render(), "");
        assert_eq!(Payload::from(json!({"a": 1})).render(), r#"{"a":1}"#);
        assert_eq!(Payload::from("plain").render(), "plain");
        assert_eq!(Payload::from(None::<Value>).render(), "");
        assert_eq!(Payload::from(Some(json!([1, 2]))).render(), "[1,2]");
    }

    #[test]
    fn test_falsy_values_render_empty() {
        for value in [json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert_eq!(Payload::from(value.clone()).render(), "", "value: {}", value);
        }
        assert_eq!(Payload::from(json!(true)).render(), "true");
        assert_eq!(Payload::from(json!(1)).render(), "1");
        assert_eq!(Payload::from(json!([])).render(), "[]");
        assert_eq!(Payload::from(json!({})).render(), "{}");
    }

    #[test]
    fn test_error_renders_cause_chain() {
        let err = anyhow::anyhow!("connection refused").context("health check failed");
        assert_eq!(
            Payload::error(err).render(),
            "health check failed: connection refused"
        );
    }

    #[test]
    fn test_value_from_struct() {
        #[derive(Serialize)]
        struct Row {
            id: u32,
        }
        assert_eq!(Payload::value(&Row { id: 7 }).render(), r#"{"id":7}"#);
    }
}
