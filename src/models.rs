//! Wire types returned by the portfolio backend.

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// A user-submitted comment as echoed by `GET /data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    /// Older backends send the author as `userName`.
    #[serde(default, alias = "userName")]
    pub user_email: String,
    #[serde(default)]
    pub upload_date: String,
    /// Identity of the requesting user, repeated on every comment.
    #[serde(default, alias = "currUserEmail")]
    pub current_user_email: Option<String>,
    /// Upload time in epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Comment {
    /// The requesting user wrote this comment.
    pub fn is_owned_by_current_user(&self) -> bool {
        self.current_user_email.as_deref() == Some(self.user_email.as_str())
    }

    /// `uploadDate` as sent, or the local time of `timestamp` when the backend left it blank.
    pub fn display_date(&self) -> String {
        if !self.upload_date.trim().is_empty() {
            return self.upload_date.clone();
        }
        self.timestamp
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
            .map(|utc| {
                utc.with_timezone(&chrono::Local)
                    .format("%b %-d, %Y, %-I:%M:%S %p")
                    .to_string()
            })
            .unwrap_or_default()
    }
}

/// Session state from `GET /loginStat`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginStatus {
    #[serde(rename = "userStatus", deserialize_with = "deserialize_user_status")]
    pub logged_in: bool,
    #[serde(rename = "userEmail", default)]
    pub user_email: String,
}

impl LoginStatus {
    #[cfg(test)]
    pub fn logged_in(user_email: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            user_email: user_email.into(),
        }
    }

    #[cfg(test)]
    pub fn logged_out() -> Self {
        Self {
            logged_in: false,
            user_email: String::new(),
        }
    }
}

/// The backend sends `"True"`/`"False"`; only `"True"` (or a JSON `true`) counts.
fn deserialize_user_status<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s == "True",
        serde_json::Value::Bool(b) => b,
        _ => false,
    })
}

/// A time-indexed amplitude mapping, keys kept in document order.
///
/// A `null` amplitude is kept as a step with no value. A repeated key keeps its
/// first position and takes the latest value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries(IndexMap<String, Option<f64>>);

impl TimeSeries {
    #[cfg(test)]
    pub fn from_points<K: Into<String>>(points: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self(
            points
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value)))
                .collect(),
        )
    }

    /// Steps in document order. Steps without a value read as NaN.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.unwrap_or(f64::NAN)))
    }

    /// Value stored under `key`, or `None` when the series has no such step.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).map(|v| v.unwrap_or(f64::NAN))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `[theory, experimental, residuals]` from `GET /chart-data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransientResponse(pub TimeSeries, pub TimeSeries, pub TimeSeries);

impl TransientResponse {
    pub fn theory(&self) -> &TimeSeries {
        &self.0
    }

    pub fn experimental(&self) -> &TimeSeries {
        &self.1
    }

    pub fn residuals(&self) -> &TimeSeries {
        &self.2
    }
}

/// Checks the text of a new comment. The backend refuses whitespace-only posts.
pub fn validate_comment_text(text: &str) -> Result<&str, String> {
    if text.chars().all(char::is_whitespace) {
        return Err("Enter Text".to_string());
    }
    Ok(text)
}
