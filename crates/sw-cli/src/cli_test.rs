use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_up_with_id() {
    let cli = Cli::try_parse_from(["stepwise", "up", "003"]).unwrap();
    match cli.command {
        Commands::Up(args) => {
            assert!(!args.force);
            assert_eq!(args.id.map(|id| id.get()), Some(3));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_force_requires_id() {
    assert!(Cli::try_parse_from(["stepwise", "down", "--force"]).is_err());
    assert!(Cli::try_parse_from(["stepwise", "down", "--force", "2"]).is_ok());
}

#[test]
fn test_rejects_non_numeric_id() {
    assert!(Cli::try_parse_from(["stepwise", "up", "abc"]).is_err());
    assert!(Cli::try_parse_from(["stepwise", "up", "0"]).is_err());
}

#[test]
fn test_generate_collects_words() {
    let cli = Cli::try_parse_from(["stepwise", "generate", "add", "users"]).unwrap();
    match cli.command {
        Commands::Generate(args) => assert_eq!(args.name, vec!["add", "users"]),
        other => panic!("unexpected command: {other:?}"),
    }
    assert!(Cli::try_parse_from(["stepwise", "generate"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli =
        Cli::try_parse_from(["stepwise", "status", "--output", "json", "--verbose"]).unwrap();
    assert!(cli.global.verbose);
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Json),
        other => panic!("unexpected command: {other:?}"),
    }
}
