use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["localbirds"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_run_defaults() {
    let cli = Cli::try_parse_from(["localbirds", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            dry_run: false,
            json: false
        })
    ));
}

#[test]
fn parses_run_dry_run_json() {
    let cli = Cli::try_parse_from(["localbirds", "run", "--dry-run", "--json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            dry_run: true,
            json: true
        })
    ));
}

#[test]
fn parses_plan_command() {
    let cli = Cli::try_parse_from(["localbirds", "plan"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Plan)));
}

#[test]
fn parses_watch_with_schedule_override() {
    let cli = Cli::try_parse_from(["localbirds", "watch", "--schedule", "0 30 6 * * *"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Watch { schedule }) => assert_eq!(schedule.as_deref(), Some("0 30 6 * * *")),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn watch_without_schedule_uses_config() {
    let cli = Cli::try_parse_from(["localbirds", "watch"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Watch { schedule: None })));
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["localbirds", "migrate"]).is_err());
}
