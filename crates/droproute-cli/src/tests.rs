use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["droproute"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.from.is_none());
}

#[test]
fn parses_add_with_multi_word_address() {
    let cli = Cli::try_parse_from(["droproute", "add", "Rua", "Augusta,", "500"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Add { ref address, coords: None }) if address.join(" ") == "Rua Augusta, 500"
    ));
}

#[test]
fn parses_add_with_negative_coords() {
    let cli = Cli::try_parse_from([
        "droproute",
        "add",
        "Praça da Sé",
        "--coords",
        "-23.55,-46.63",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Add { coords: Some(c), .. }) if c == Coordinate::new(-23.55, -46.63)
    ));
}

#[test]
fn global_from_works_after_subcommand() {
    let cli = Cli::try_parse_from(["droproute", "list", "--from", "-23.5,-46.6"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::List)));
    assert_eq!(cli.from, Some(Coordinate::new(-23.5, -46.6)));
}

#[test]
fn parses_remove_target() {
    let cli = Cli::try_parse_from(["droproute", "remove", "Rua A"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Remove { ref target }) if target == "Rua A"
    ));
}

#[test]
fn parses_where_with_negative_coordinate() {
    let cli = Cli::try_parse_from(["droproute", "where", "-22.9,-43.2"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Where { at }) if at == Coordinate::new(-22.9, -43.2)
    ));
}

#[test]
fn parses_track() {
    let cli = Cli::try_parse_from(["droproute", "track"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Track)));
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["droproute", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn add_requires_an_address() {
    assert!(Cli::try_parse_from(["droproute", "add"]).is_err());
}

#[test]
fn coordinate_arg_rejects_out_of_range() {
    assert!(parse_coordinate_arg("91,0").is_err());
    assert!(parse_coordinate_arg("0,181").is_err());
}

#[test]
fn coordinate_arg_rejects_missing_comma() {
    assert!(parse_coordinate_arg("-23.5 -46.6").is_err());
}

#[test]
fn coordinate_arg_trims_whitespace() {
    assert_eq!(
        parse_coordinate_arg(" 1.5 , 2.5 ").unwrap(),
        Coordinate::new(1.5, 2.5)
    );
}
