use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("EBIRD_API_KEY", "test-key");
    m
}

fn assert_invalid(result: Result<AppConfig, ConfigError>, expected_var: &str) {
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "EBIRD_API_KEY"),
        "expected MissingEnvVar(EBIRD_API_KEY), got: {result:?}"
    );
}

#[test]
fn blank_api_key_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("EBIRD_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn defaults_with_only_required_vars() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ebird_api_key, "test-key");
    assert!(cfg.locations.is_empty());
    assert_eq!(cfg.filter_mode, FilterMode::Species);
    assert_eq!(cfg.species_codes.len(), DEFAULT_SPECIES_CODES.len());
    assert_eq!(cfg.species_codes[0], "grhowl");
    assert!(cfg.additional_species_codes.is_empty());
    assert!(cfg.region_code.is_none());
    assert_eq!(cfg.days_back, 1);
    assert_eq!(cfg.max_distance_miles, 31);
    assert_eq!(cfg.max_distance_km(), 49);
    assert_eq!(cfg.max_results, 100);
    assert_eq!(cfg.supplementary_max_results, 20);
    assert!(!cfg.include_provisional);
    assert_eq!(cfg.on_error, FailurePolicy::SkipAndContinue);
    assert_eq!(cfg.max_concurrent_requests, 1);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "localbirds/0.1 (observation-digest)");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.schedule, "0 0 7 * * *");
    assert!(cfg.email.is_none());
    assert!(cfg.telegram.is_none());
}

#[test]
fn parses_explicit_locations() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_LOCATIONS", "SF: 37.77, -122.42 / Oakland: 37.80, -122.27");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let labels: Vec<&str> = cfg.locations.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["SF", "Oakland"]);
}

#[test]
fn malformed_locations_are_rejected() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_LOCATIONS", "SF 37.77 -122.42");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_LOCATIONS");
}

#[test]
fn notable_mode_with_additional_species() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_FILTER_MODE", "NOTABLE");
    map.insert("LOCALBIRDS_ADDITIONAL_SPECIES_CODES", "snoowl1, ,lbbgul");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.filter_mode, FilterMode::Notable);
    assert_eq!(cfg.additional_species_codes, vec!["snoowl1", "lbbgul"]);
}

#[test]
fn owl_is_an_alias_for_species_mode() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_FILTER_MODE", "owl");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.filter_mode, FilterMode::Species);
}

#[test]
fn unknown_filter_mode_is_rejected() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_FILTER_MODE", "rare");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_FILTER_MODE");
}

#[test]
fn species_codes_with_path_characters_are_rejected() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_SPECIES_CODES", "brnowl,../admin");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_SPECIES_CODES");
}

#[test]
fn species_mode_requires_at_least_one_code() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_SPECIES_CODES", ", ,");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_SPECIES_CODES");
}

#[test]
fn notable_mode_allows_empty_species_list() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_FILTER_MODE", "notable");
    map.insert("LOCALBIRDS_SPECIES_CODES", ",");
    assert!(build_app_config(lookup_from_map(&map)).is_ok());
}

#[test]
fn region_code_is_validated() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_REGION_CODE", "US-CA-085");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.region_code.as_deref(), Some("US-CA-085"));

    map.insert("LOCALBIRDS_REGION_CODE", "US/CA");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_REGION_CODE");
}

#[test]
fn days_back_override_and_bounds() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_DAYS_BACK", "7");
    assert_eq!(build_app_config(lookup_from_map(&map)).unwrap().days_back, 7);

    map.insert("LOCALBIRDS_DAYS_BACK", "0");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_DAYS_BACK");

    map.insert("LOCALBIRDS_DAYS_BACK", "31");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_DAYS_BACK");

    map.insert("LOCALBIRDS_DAYS_BACK", "a week");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_DAYS_BACK");
}

#[test]
fn max_distance_converts_to_kilometres() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_MAX_DISTANCE_MILES", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_distance_km(), 16);
}

#[test]
fn max_results_bounds() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_MAX_RESULTS", "10001");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_MAX_RESULTS");
}

#[test]
fn include_provisional_accepts_common_flags() {
    let mut map = full_env();
    for (raw, expected) in [("true", true), ("YES", true), ("1", true), ("off", false)] {
        map.insert("LOCALBIRDS_INCLUDE_PROVISIONAL", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.include_provisional, expected, "raw value {raw}");
    }
    map.insert("LOCALBIRDS_INCLUDE_PROVISIONAL", "maybe");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "LOCALBIRDS_INCLUDE_PROVISIONAL",
    );
}

#[test]
fn abort_policy_override() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_ON_ERROR", "abort");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.on_error, FailurePolicy::Abort);
}

#[test]
fn zero_concurrency_is_rejected() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_MAX_CONCURRENT_REQUESTS", "0");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "LOCALBIRDS_MAX_CONCURRENT_REQUESTS",
    );
}

#[test]
fn email_requires_sender_and_recipients() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_EMAIL_ENABLED", "true");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "LOCALBIRDS_EMAIL_RECIPIENTS"),
        "got: {result:?}"
    );

    map.insert("LOCALBIRDS_EMAIL_RECIPIENTS", "a@example.com, b@example.com");
    map.insert("LOCALBIRDS_EMAIL_FROM", "digest@example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let email = cfg.email.expect("email settings");
    assert_eq!(email.recipients, vec!["a@example.com", "b@example.com"]);
    assert_eq!(email.subject, "Local bird observations");
    assert_eq!(
        email.transport,
        EmailTransport::Sendmail {
            path: PathBuf::from("/usr/sbin/sendmail")
        }
    );
}

#[test]
fn smtp_host_selects_smtp_transport() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_EMAIL_ENABLED", "true");
    map.insert("LOCALBIRDS_EMAIL_RECIPIENTS", "a@example.com");
    map.insert("LOCALBIRDS_EMAIL_FROM", "digest@example.com");
    map.insert("LOCALBIRDS_SMTP_HOST", "smtp.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "LOCALBIRDS_SMTP_PASSWORD"),
        "got: {result:?}"
    );

    map.insert("LOCALBIRDS_SMTP_PASSWORD", "hunter2");
    let email = build_app_config(lookup_from_map(&map))
        .unwrap()
        .email
        .expect("email settings");
    match email.transport {
        EmailTransport::Smtp(smtp) => {
            assert_eq!(smtp.host, "smtp.example.com");
            assert_eq!(smtp.port, 465);
            assert_eq!(smtp.username, "digest@example.com");
            assert!(!smtp.starttls);
            assert!(!format!("{smtp:?}").contains("hunter2"));
        }
        other => panic!("expected SMTP transport, got {other:?}"),
    }

    map.insert("LOCALBIRDS_SMTP_STARTTLS", "true");
    map.insert("LOCALBIRDS_SMTP_USERNAME", "relay-user");
    let email = build_app_config(lookup_from_map(&map))
        .unwrap()
        .email
        .expect("email settings");
    match email.transport {
        EmailTransport::Smtp(smtp) => {
            assert_eq!(smtp.port, 587);
            assert_eq!(smtp.username, "relay-user");
            assert!(smtp.starttls);
        }
        other => panic!("expected SMTP transport, got {other:?}"),
    }

    map.insert("LOCALBIRDS_SMTP_PORT", "smtp");
    assert_invalid(build_app_config(lookup_from_map(&map)), "LOCALBIRDS_SMTP_PORT");
}

#[test]
fn zero_request_timeout_is_rejected() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_REQUEST_TIMEOUT_SECS", "0");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "LOCALBIRDS_REQUEST_TIMEOUT_SECS",
    );

    map.insert("LOCALBIRDS_REQUEST_TIMEOUT_SECS", "1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 1);
}

#[test]
fn distance_beyond_ebird_radius_is_rejected() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_MAX_DISTANCE_MILES", "31");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.max_distance_km() <= MAX_DISTANCE_KM);

    map.insert("LOCALBIRDS_MAX_DISTANCE_MILES", "32");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "LOCALBIRDS_MAX_DISTANCE_MILES",
    );

    map.insert("LOCALBIRDS_MAX_DISTANCE_MILES", "4294967295");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "LOCALBIRDS_MAX_DISTANCE_MILES",
    );
}

#[test]
fn telegram_requires_token_and_chat() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_TELEGRAM_ENABLED", "true");
    map.insert("TELEGRAM_BOT_TOKEN", "123:abc");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TELEGRAM_CHAT_ID"),
        "got: {result:?}"
    );

    map.insert("TELEGRAM_CHAT_ID", "-100200");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.telegram.unwrap().chat_id, "-100200");
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("LOCALBIRDS_TELEGRAM_ENABLED", "true");
    map.insert("TELEGRAM_BOT_TOKEN", "123:secret-token");
    map.insert("TELEGRAM_CHAT_ID", "42");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"), "{rendered}");
    assert!(!rendered.contains("secret-token"), "{rendered}");
    assert!(rendered.contains("[redacted]"));
}
