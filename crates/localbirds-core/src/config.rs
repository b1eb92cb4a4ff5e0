use std::path::PathBuf;

use crate::app_config::{
    AppConfig, EmailSettings, EmailTransport, FailurePolicy, FilterMode, SmtpSettings,
    TelegramSettings,
};
use crate::location::parse_locations;
use crate::ConfigError;

/// Species queried in species mode when `LOCALBIRDS_SPECIES_CODES` is unset.
pub const DEFAULT_SPECIES_CODES: &[&str] = &[
    "grhowl", "brnowl", "wesowl1", "nopowl", "nswowl", "brdowl", "burowl",
];

/// Upper bound eBird accepts for the `back` parameter.
const MAX_DAYS_BACK: u32 = 30;
/// Upper bound eBird accepts for the `maxResults` parameter.
const MAX_RESULTS_LIMIT: u32 = 10_000;
/// Upper bound eBird accepts for the `dist` parameter of geo queries.
pub const MAX_DISTANCE_KM: u32 = 50;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn invalid(var: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.into(),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset so an empty line in `.env` does not
    // silently override a default.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32_in = |var: &str, default: &str, max: u32| -> Result<u32, ConfigError> {
        let value = parse_u32(var, default)?;
        if value == 0 || value > max {
            return Err(invalid(var, format!("must be between 1 and {max}, got {value}")));
        }
        Ok(value)
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                invalid(var, format!("expected true/false, got '{raw}'"))
            }),
        }
    };

    let ebird_api_key = require("EBIRD_API_KEY")?;

    let locations = match optional("LOCALBIRDS_LOCATIONS") {
        Some(raw) => parse_locations(&raw).map_err(|reason| invalid("LOCALBIRDS_LOCATIONS", reason))?,
        None => Vec::new(),
    };

    let filter_mode = parse_filter_mode(&or_default("LOCALBIRDS_FILTER_MODE", "species"))?;

    let species_codes = match optional("LOCALBIRDS_SPECIES_CODES") {
        Some(raw) => parse_species_codes("LOCALBIRDS_SPECIES_CODES", &raw)?,
        None => DEFAULT_SPECIES_CODES.iter().map(|c| (*c).to_string()).collect(),
    };
    if filter_mode == FilterMode::Species && species_codes.is_empty() {
        return Err(invalid(
            "LOCALBIRDS_SPECIES_CODES",
            "species mode needs at least one species code",
        ));
    }

    let additional_species_codes = match optional("LOCALBIRDS_ADDITIONAL_SPECIES_CODES") {
        Some(raw) => parse_species_codes("LOCALBIRDS_ADDITIONAL_SPECIES_CODES", &raw)?,
        None => Vec::new(),
    };

    let region_code = optional("LOCALBIRDS_REGION_CODE");
    if let Some(region) = &region_code {
        if !region.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid(
                "LOCALBIRDS_REGION_CODE",
                format!("'{region}' is not a region code like 'US-CA-085'"),
            ));
        }
    }

    let days_back = parse_u32_in("LOCALBIRDS_DAYS_BACK", "1", MAX_DAYS_BACK)?;
    let max_distance_miles = parse_u32("LOCALBIRDS_MAX_DISTANCE_MILES", "31")?;
    if max_distance_miles.saturating_mul(16) / 10 > MAX_DISTANCE_KM {
        return Err(invalid(
            "LOCALBIRDS_MAX_DISTANCE_MILES",
            format!(
                "eBird accepts at most {MAX_DISTANCE_KM} km (31 miles), got {max_distance_miles} miles"
            ),
        ));
    }
    let max_results = parse_u32_in("LOCALBIRDS_MAX_RESULTS", "100", MAX_RESULTS_LIMIT)?;
    let supplementary_max_results =
        parse_u32_in("LOCALBIRDS_SUPPLEMENTARY_MAX_RESULTS", "20", MAX_RESULTS_LIMIT)?;
    let include_provisional = parse_bool("LOCALBIRDS_INCLUDE_PROVISIONAL", false)?;
    let on_error = parse_failure_policy(&or_default("LOCALBIRDS_ON_ERROR", "skip"))?;

    let max_concurrent_requests = or_default("LOCALBIRDS_MAX_CONCURRENT_REQUESTS", "1")
        .parse::<usize>()
        .map_err(|e| invalid("LOCALBIRDS_MAX_CONCURRENT_REQUESTS", e.to_string()))?;
    if max_concurrent_requests == 0 {
        return Err(invalid("LOCALBIRDS_MAX_CONCURRENT_REQUESTS", "must be at least 1"));
    }

    let request_timeout_secs = or_default("LOCALBIRDS_REQUEST_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("LOCALBIRDS_REQUEST_TIMEOUT_SECS", e.to_string()))?;
    if request_timeout_secs == 0 {
        return Err(invalid("LOCALBIRDS_REQUEST_TIMEOUT_SECS", "must be at least 1"));
    }
    let user_agent = or_default("LOCALBIRDS_USER_AGENT", "localbirds/0.1 (observation-digest)");
    let species_names_path = optional("LOCALBIRDS_SPECIES_NAMES_PATH").map(PathBuf::from);
    let log_level = or_default("LOCALBIRDS_LOG_LEVEL", "info");
    let schedule = or_default("LOCALBIRDS_SCHEDULE", "0 0 7 * * *");

    let email = if parse_bool("LOCALBIRDS_EMAIL_ENABLED", false)? {
        let recipients: Vec<String> = require("LOCALBIRDS_EMAIL_RECIPIENTS")?
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        if recipients.is_empty() {
            return Err(invalid("LOCALBIRDS_EMAIL_RECIPIENTS", "no recipients listed"));
        }
        let from = require("LOCALBIRDS_EMAIL_FROM")?;

        // An SMTP host switches delivery away from the local sendmail binary.
        let transport = match optional("LOCALBIRDS_SMTP_HOST") {
            Some(host) => {
                let starttls = parse_bool("LOCALBIRDS_SMTP_STARTTLS", false)?;
                let port = or_default("LOCALBIRDS_SMTP_PORT", if starttls { "587" } else { "465" })
                    .parse::<u16>()
                    .map_err(|e| invalid("LOCALBIRDS_SMTP_PORT", e.to_string()))?;
                EmailTransport::Smtp(SmtpSettings {
                    host,
                    port,
                    username: optional("LOCALBIRDS_SMTP_USERNAME").unwrap_or_else(|| from.clone()),
                    password: require("LOCALBIRDS_SMTP_PASSWORD")?,
                    starttls,
                })
            }
            None => EmailTransport::Sendmail {
                path: PathBuf::from(or_default("LOCALBIRDS_SENDMAIL_PATH", "/usr/sbin/sendmail")),
            },
        };

        Some(EmailSettings {
            from,
            recipients,
            subject: or_default("LOCALBIRDS_EMAIL_SUBJECT", "Local bird observations"),
            transport,
        })
    } else {
        None
    };

    let telegram = if parse_bool("LOCALBIRDS_TELEGRAM_ENABLED", false)? {
        Some(TelegramSettings {
            bot_token: require("TELEGRAM_BOT_TOKEN")?,
            chat_id: require("TELEGRAM_CHAT_ID")?,
        })
    } else {
        None
    };

    Ok(AppConfig {
        ebird_api_key,
        locations,
        filter_mode,
        species_codes,
        additional_species_codes,
        region_code,
        days_back,
        max_distance_miles,
        max_results,
        supplementary_max_results,
        include_provisional,
        on_error,
        max_concurrent_requests,
        request_timeout_secs,
        user_agent,
        species_names_path,
        log_level,
        schedule,
        email,
        telegram,
    })
}

/// Parse a filter mode name. `owl` is accepted as an alias for `species`.
fn parse_filter_mode(s: &str) -> Result<FilterMode, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "species" | "owl" => Ok(FilterMode::Species),
        "notable" => Ok(FilterMode::Notable),
        other => Err(invalid(
            "LOCALBIRDS_FILTER_MODE",
            format!("unknown mode '{other}', expected 'species' or 'notable'"),
        )),
    }
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "skip" | "continue" => Ok(FailurePolicy::SkipAndContinue),
        "abort" => Ok(FailurePolicy::Abort),
        other => Err(invalid(
            "LOCALBIRDS_ON_ERROR",
            format!("unknown policy '{other}', expected 'skip' or 'abort'"),
        )),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma list of eBird species codes.
///
/// Codes end up in URL paths, so only ASCII alphanumerics are accepted.
fn parse_species_codes(var: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            if code.chars().all(|c| c.is_ascii_alphanumeric()) {
                Ok(code.to_string())
            } else {
                Err(invalid(var, format!("'{code}' is not a valid species code")))
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
