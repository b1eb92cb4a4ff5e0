use localbirds_core::{AppConfig, FailurePolicy, FilterMode};

pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        ebird_api_key: "test-key".to_string(),
        locations: Vec::new(),
        filter_mode: FilterMode::Species,
        species_codes: vec!["grhowl".to_string(), "brnowl".to_string(), "wesowl1".to_string()],
        additional_species_codes: Vec::new(),
        region_code: None,
        days_back: 1,
        max_distance_miles: 31,
        max_results: 100,
        supplementary_max_results: 20,
        include_provisional: false,
        on_error: FailurePolicy::SkipAndContinue,
        max_concurrent_requests: 1,
        request_timeout_secs: 5,
        user_agent: "localbirds-test/0.1".to_string(),
        species_names_path: None,
        log_level: "info".to_string(),
        schedule: "0 0 7 * * *".to_string(),
        email: None,
        telegram: None,
    }
}
