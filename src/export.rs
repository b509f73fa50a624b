//! Standalone HTML export of search results.
//!
//! Mirrors the in-app result cards: speaker, role, session metadata, the
//! quoted paragraph, and links back to the transcript and the talk video.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::models::{format_time, Quote};

/// Render quotes as a self-contained HTML document.
pub fn render_document(quotes: &[Quote]) -> String {
    let sections: String = quotes.iter().map(quote_section).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Conference Quotes</title>
    <style>
      body {{
        font-family: system-ui, sans-serif;
        line-height: 1.5;
        max-width: 800px;
        margin: 2rem auto;
        padding: 0 1rem;
      }}
      .quote {{
        margin-bottom: 2rem;
        padding: 1rem;
        border: 1px solid #e2e8f0;
        border-radius: 8px;
      }}
      .metadata {{ color: #64748b; }}
      .links {{
        margin-top: 1rem;
        display: flex;
        gap: 1rem;
      }}
      .links a {{
        color: #2563eb;
        text-decoration: none;
      }}
      .links a:hover {{ text-decoration: underline; }}
      footer {{ color: #94a3b8; font-size: 0.8rem; }}
    </style>
  </head>
  <body>
    <h1>Conference Quotes</h1>
{sections}    <footer>Generated {generated}</footer>
  </body>
</html>
"#,
        generated = Utc::now().format("%Y-%m-%d %H:%M UTC"),
    )
}

/// Render and write the document, creating parent directories as needed.
pub fn write_document(quotes: &[Quote], path: &Path) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_document(quotes))?;
    Ok(path.to_path_buf())
}

/// Render one quote card.
fn quote_section(quote: &Quote) -> String {
    let session = quote
        .session_label()
        .map(|label| format!("<p><strong>Session:</strong> {}</p>", escape(&label)))
        .unwrap_or_default();

    let video_link = quote
        .video_id()
        .map(|id| {
            format!(
                r#"<a href="https://youtube.com/watch?v={id}&amp;t={start}s" target="_blank">Watch on YouTube ({label})</a>"#,
                start = quote.start_time,
                label = format_time(quote.start_time),
            )
        })
        .unwrap_or_default();

    format!(
        r#"    <div class="quote">
      <h2>{speaker}</h2>
      <div class="metadata">
        <p>{role}</p>
        <p><strong>Title:</strong> {title}</p>
        {session}
      </div>
      <p>{text}</p>
      <div class="links">
        <a href="{deep_link}" target="_blank">Read in Context</a>
        {video_link}
      </div>
    </div>
"#,
        speaker = escape(&quote.speaker),
        role = escape(&quote.role),
        title = escape(&quote.title),
        text = escape(&quote.paragraph_text),
        deep_link = escape(&quote.paragraph_deep_link),
    )
}

/// Minimal HTML escaping for interpolated metadata.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
