//! API Response Body
//!
//! Every API endpoint answers with `{"code": .., "msg": .., "data": ..}`.
//! `code` is the application-level status and is independent of the HTTP
//! status of the response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// Decoded response body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiBody {
    /// Application status; numeric strings are accepted
    #[serde(default, deserialize_with = "lenient_code")]
    pub code: Option<i64>,
    /// Server supplied message, shown to the user on failure
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ApiBody {
    /// Decode raw response bytes
    ///
    /// Fields of an object body are read one by one: `code` accepts numbers
    /// and numeric strings, `msg` is kept only when it is text, and a field
    /// of the wrong type never hides the others. A body that is not a JSON
    /// object keeps its content in `data` (parsed JSON, or the text itself)
    /// with no `code`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(mut map)) => Self {
                code: map.get("code").and_then(code_of),
                msg: map.get("msg").and_then(Value::as_str).map(str::to_string),
                data: map.remove("data").unwrap_or(Value::Null),
            },
            Ok(value) => Self::raw(value),
            Err(_) => Self::raw(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        }
    }

    fn raw(data: Value) -> Self {
        Self {
            code: None,
            msg: None,
            data,
        }
    }

    pub fn is_success(&self, success_code: i64) -> bool {
        self.code == Some(success_code)
    }

    /// Message to show for a failed body
    pub fn error_message(&self) -> String {
        match (&self.msg, self.code) {
            (Some(msg), _) if !msg.is_empty() => msg.clone(),
            (_, Some(code)) => format!("request failed with code {code}"),
            (_, None) => "unexpected response from server".to_string(),
        }
    }

    /// `data` on success, an application error otherwise
    pub fn into_result(self, success_code: i64) -> GatewayResult<Value> {
        if self.is_success(success_code) {
            Ok(self.data)
        } else {
            Err(GatewayError::Application {
                code: self.code,
                message: self.error_message(),
            })
        }
    }

    /// Deserialize `data` into `T`
    pub fn data_as<T>(&self) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        T::deserialize(&self.data).map_err(GatewayError::Decode)
    }
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(code_of))
}

fn code_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
