//! Digest delivery channels.
//!
//! Neither notifier retries; a failed send is reported to the caller, which
//! decides whether the other channel still goes out.

pub mod email;
pub mod telegram;

pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;
