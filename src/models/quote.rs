//! Quote records returned by the search backend.
//!
//! A quote is one paragraph of a conference talk together with the
//! metadata needed to jump back into the talk: the speaker, a deep link
//! into the published transcript, and the talk video with start/end
//! offsets in seconds.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::QueryError;

static VIDEO_ID: OnceLock<Regex> = OnceLock::new();
static SESSION_PATH: OnceLock<Regex> = OnceLock::new();

/// One quote record from the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Speaker name as published.
    pub speaker: String,
    /// Speaker role at the time of the talk.
    #[serde(default)]
    pub role: String,
    /// Talk title.
    #[serde(default)]
    pub title: String,
    /// Link to the full talk video, empty when no recording exists.
    #[serde(default)]
    pub youtube_link: String,
    /// Deep link to the paragraph in the published transcript.
    #[serde(default)]
    pub paragraph_deep_link: String,
    /// The quoted paragraph, verbatim.
    pub paragraph_text: String,
    /// Offset of the paragraph in the video, in seconds.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub start_time: u32,
    /// End offset of the paragraph in the video, in seconds.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub end_time: u32,
}

impl Quote {
    /// Extract the YouTube video id from the talk link.
    ///
    /// Handles `watch?v=`, `youtu.be/`, `embed/` and `/v/` link shapes.
    pub fn video_id(&self) -> Option<&str> {
        if self.youtube_link.is_empty() {
            return None;
        }
        let re = VIDEO_ID.get_or_init(|| {
            Regex::new(r"(?:v=|youtu\.be/|embed/|/v/)([A-Za-z0-9_-]+)")
                .expect("video id pattern")
        });
        re.captures(&self.youtube_link)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Video start offset formatted as `m:ss`.
    pub fn start_label(&self) -> String {
        format_time(self.start_time)
    }

    /// Conference session ("April 2023") derived from the transcript deep
    /// link, which embeds the session as a `/YYYY/MM/` path segment.
    /// Conferences are held only in April and October; any other month
    /// yields no label.
    pub fn session_label(&self) -> Option<String> {
        let re = SESSION_PATH
            .get_or_init(|| Regex::new(r"/(\d{4})/(\d{2})/").expect("session path pattern"));
        let caps = re.captures(&self.paragraph_deep_link)?;
        let year = caps.get(1)?.as_str();
        let month = match caps.get(2)?.as_str() {
            "04" => "April",
            "10" => "October",
            _ => return None,
        };
        Some(format!("{month} {year}"))
    }

    /// Watch link with the start offset applied.
    pub fn timed_youtube_link(&self) -> Option<String> {
        self.video_id().map(|id| {
            format!(
                "https://youtube.com/watch?v={}&t={}s",
                id, self.start_time
            )
        })
    }
}

/// Format a second count as `m:ss`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Decode the `response_text` payload into quote records.
///
/// Some backend revisions return the array directly, others a
/// JSON-encoded string containing the array. Both shapes are accepted.
pub fn parse_query_result(payload: &Value) -> Result<Vec<Quote>, QueryError> {
    match payload {
        Value::Array(_) => serde_json::from_value(payload.clone())
            .map_err(|e| QueryError::MalformedResponse(format!("bad quote record: {e}"))),
        Value::String(text) => serde_json::from_str(text)
            .map_err(|e| QueryError::MalformedResponse(format!("bad quote payload: {e}"))),
        _ => Err(QueryError::MalformedResponse(
            "response_text is neither an array nor a string".to_string(),
        )),
    }
}

/// Accept seconds as a JSON number or a numeric string; anything else
/// (including negative or non-numeric values) reads as zero.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let seconds = match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u32)
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u32)
            .unwrap_or(0),
        _ => 0,
    };
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote_with_link(link: &str) -> Quote {
        Quote {
            speaker: "Test Speaker".to_string(),
            role: String::new(),
            title: String::new(),
            youtube_link: link.to_string(),
            paragraph_deep_link: String::new(),
            paragraph_text: "text".to_string(),
            start_time: 0,
            end_time: 0,
        }
    }

    #[test]
    fn test_video_id_watch_link() {
        let quote = quote_with_link("https://www.youtube.com/watch?v=9t8zdkO9abE");
        assert_eq!(quote.video_id(), Some("9t8zdkO9abE"));
    }

    #[test]
    fn test_video_id_short_link() {
        let quote = quote_with_link("https://youtu.be/nD8gGZzHZ7Y?t=10");
        assert_eq!(quote.video_id(), Some("nD8gGZzHZ7Y"));
    }

    #[test]
    fn test_video_id_embed_link() {
        let quote = quote_with_link("https://www.youtube.com/embed/zzx6GYH95zw");
        assert_eq!(quote.video_id(), Some("zzx6GYH95zw"));
    }

    #[test]
    fn test_video_id_missing_or_garbage() {
        assert_eq!(quote_with_link("").video_id(), None);
        assert_eq!(quote_with_link("https://example.com/talk").video_id(), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(3725), "62:05");
    }

    #[test]
    fn test_session_label() {
        let mut quote = quote_with_link("");
        quote.paragraph_deep_link =
            "https://example.org/study/general-conference/2023/04/talk?lang=eng#p12".to_string();
        assert_eq!(quote.session_label(), Some("April 2023".to_string()));

        quote.paragraph_deep_link = "https://example.org/2021/10/other-talk".to_string();
        assert_eq!(quote.session_label(), Some("October 2021".to_string()));
    }

    #[test]
    fn test_session_label_unknown_month_or_missing() {
        let mut quote = quote_with_link("");
        quote.paragraph_deep_link = "https://example.org/2023/07/talk".to_string();
        assert_eq!(quote.session_label(), None);

        quote.paragraph_deep_link = "https://example.org/no-date-here".to_string();
        assert_eq!(quote.session_label(), None);
    }

    #[test]
    fn test_timed_youtube_link() {
        let mut quote = quote_with_link("https://www.youtube.com/watch?v=abc_123-XY");
        quote.start_time = 95;
        assert_eq!(
            quote.timed_youtube_link().as_deref(),
            Some("https://youtube.com/watch?v=abc_123-XY&t=95s")
        );
        assert_eq!(quote_with_link("").timed_youtube_link(), None);
    }

    #[test]
    fn test_lenient_seconds_accepts_numbers_and_strings() {
        let quote: Quote = serde_json::from_value(json!({
            "speaker": "A",
            "paragraph_text": "t",
            "start_time": 120,
            "end_time": "185"
        }))
        .unwrap();
        assert_eq!(quote.start_time, 120);
        assert_eq!(quote.end_time, 185);
    }

    #[test]
    fn test_lenient_seconds_defaults_bad_values_to_zero() {
        let quote: Quote = serde_json::from_value(json!({
            "speaker": "A",
            "paragraph_text": "t",
            "start_time": "not a number",
            "end_time": -5
        }))
        .unwrap();
        assert_eq!(quote.start_time, 0);
        assert_eq!(quote.end_time, 0);
    }

    #[test]
    fn test_parse_query_result_array() {
        let payload = json!([{
            "speaker": "A",
            "paragraph_text": "first"
        }]);
        let quotes = parse_query_result(&payload).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].paragraph_text, "first");
    }

    #[test]
    fn test_parse_query_result_encoded_string() {
        let inner = json!([{"speaker": "B", "paragraph_text": "second"}]).to_string();
        let payload = Value::String(inner);
        let quotes = parse_query_result(&payload).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].speaker, "B");
    }

    #[test]
    fn test_parse_query_result_rejects_other_shapes() {
        assert!(parse_query_result(&json!({"not": "an array"})).is_err());
        assert!(parse_query_result(&Value::String("{broken".to_string())).is_err());
    }
}
