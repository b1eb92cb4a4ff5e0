use std::path::PathBuf;

use crate::location::QueryPoint;

/// Which family of eBird queries a run issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// One "nearest recent" query per configured species code and point.
    Species,
    /// One "notable" query per point, plus any supplementary species.
    Notable,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Species => write!(f, "species"),
            FilterMode::Notable => write!(f, "notable"),
        }
    }
}

/// What the pipeline does when a single query or checklist fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, count, and keep going with the remaining work.
    SkipAndContinue,
    /// Stop the run at the first failure.
    Abort,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::SkipAndContinue => write!(f, "skip"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub transport: EmailTransport,
}

/// How a finished digest email leaves the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTransport {
    /// A local `sendmail`-compatible binary.
    Sendmail { path: PathBuf },
    /// Authenticated SMTP submission.
    Smtp(SmtpSettings),
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Upgrade a plain connection with STARTTLS instead of connecting over TLS.
    pub starttls: bool,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("starttls", &self.starttls)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &"[redacted]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub ebird_api_key: String,
    /// Explicit query points. Empty means "resolve the current location".
    pub locations: Vec<QueryPoint>,
    pub filter_mode: FilterMode,
    pub species_codes: Vec<String>,
    pub additional_species_codes: Vec<String>,
    pub region_code: Option<String>,
    pub days_back: u32,
    pub max_distance_miles: u32,
    pub max_results: u32,
    pub supplementary_max_results: u32,
    pub include_provisional: bool,
    pub on_error: FailurePolicy,
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub species_names_path: Option<PathBuf>,
    pub log_level: String,
    pub schedule: String,
    pub email: Option<EmailSettings>,
    pub telegram: Option<TelegramSettings>,
}

impl AppConfig {
    /// Search radius sent to eBird, which takes kilometres.
    ///
    /// Uses the 1.6 km/mi approximation and truncates, so 31 miles becomes 49 km.
    /// Configuration rejects distances above [`crate::MAX_DISTANCE_KM`].
    #[must_use]
    pub fn max_distance_km(&self) -> u32 {
        self.max_distance_miles.saturating_mul(16) / 10
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("ebird_api_key", &"[redacted]")
            .field("locations", &self.locations)
            .field("filter_mode", &self.filter_mode)
            .field("species_codes", &self.species_codes)
            .field("additional_species_codes", &self.additional_species_codes)
            .field("region_code", &self.region_code)
            .field("days_back", &self.days_back)
            .field("max_distance_miles", &self.max_distance_miles)
            .field("max_results", &self.max_results)
            .field("supplementary_max_results", &self.supplementary_max_results)
            .field("include_provisional", &self.include_provisional)
            .field("on_error", &self.on_error)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("species_names_path", &self.species_names_path)
            .field("log_level", &self.log_level)
            .field("schedule", &self.schedule)
            .field("email", &self.email)
            .field("telegram", &self.telegram)
            .finish()
    }
}
