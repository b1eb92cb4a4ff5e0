//! Telegram Bot API delivery (`sendMessage`).

use std::time::Duration;

use localbirds_core::TelegramSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Telegram rejects message text longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: &TelegramSettings, timeout_secs: u64) -> Result<Self, NotifyError> {
        Self::with_base_url(settings, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Same as [`Self::new`] but against a custom API root (for wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        settings: &TelegramSettings,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            bot_token: settings.bot_token.clone(),
            chat_id: settings.chat_id.clone(),
        })
    }

    /// Sends `markdown` to the configured chat, split into as many messages as
    /// Telegram's length limit requires.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::Http`] on network failure.
    /// - [`NotifyError::Telegram`] if the API answers with a non-2xx status or
    ///   `"ok": false`.
    pub async fn send(&self, markdown: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let chunks = split_message(markdown, MAX_MESSAGE_CHARS);

        for chunk in &chunks {
            let request = SendMessageRequest {
                chat_id: &self.chat_id,
                text: chunk,
                parse_mode: "Markdown",
                disable_web_page_preview: true,
            };
            let response = self.client.post(&url).json(&request).send().await?;
            let status = response.status();
            let body = response.text().await?;

            let parsed: Option<SendMessageResponse> = serde_json::from_str(&body).ok();
            let accepted = status.is_success() && parsed.as_ref().is_some_and(|r| r.ok);
            if !accepted {
                let description = parsed
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "no description".to_string());
                return Err(NotifyError::Telegram {
                    status: status.as_u16(),
                    description,
                });
            }
        }

        tracing::info!(messages = chunks.len(), "digest sent to Telegram");
        Ok(())
    }
}

/// Splits `text` into pieces of at most `limit` characters, preferring to
/// break between blank-line separated blocks.
///
/// A single block longer than `limit` is cut at character boundaries.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for block in text.split_inclusive("\n\n") {
        let block_len = block.chars().count();

        if current_len + block_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if block_len > limit {
            let chars: Vec<char> = block.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        current.push_str(block);
        current_len += block_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hello\n\nworld\n\n", 4096), vec!["hello\n\nworld\n\n"]);
    }

    #[test]
    fn splits_on_block_boundaries() {
        let chunks = split_message("aaaa\n\nbbbb\n\ncccc\n\n", 12);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb\n\n", "cccc\n\n"]);
    }

    #[test]
    fn oversized_block_is_cut() {
        let chunks = split_message("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let text = "\u{1f989}\u{1f989}\u{1f989}";
        assert_eq!(split_message(text, 3), vec![text]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(split_message("", 10).is_empty());
    }
}
