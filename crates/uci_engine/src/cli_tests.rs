use super::*;

fn parse(args: &[&str]) -> Result<CliOptions, CliError> {
    CliOptions::parse(args)
}

#[test]
fn test_no_arguments_is_protocol_mode() {
    let options = parse(&[]).unwrap();
    assert_eq!(options, CliOptions::default());
    assert_eq!(options.mode(0), Mode::Protocol);
}

#[test]
fn test_all_flags() {
    let args = [
        "-m", "-md", "5", "-qd", "2", "-t", "0", "-threads", "3", "-config", "engine.toml",
        "-fen", "8/8/8/8/8/8/8/K1k5", "w", "-", "-", "0", "1",
    ];
    let options = parse(&args).unwrap();
    assert!(options.mute);
    assert!(!options.demo);
    assert_eq!(options.depth, Some(5));
    assert_eq!(options.quiescence_depth, Some(2));
    assert_eq!(options.time_limit_secs, Some(0.0));
    assert_eq!(options.threads, Some(3));
    assert_eq!(options.config, Some(PathBuf::from("engine.toml")));
    assert_eq!(options.fen.as_deref(), Some("8/8/8/8/8/8/8/K1k5 w - - 0 1"));
    assert_eq!(options.mode(args.len()), Mode::OneShot);
}

#[test]
fn test_demo_mode() {
    let options = parse(&["-demo", "-t", "1.5"]).unwrap();
    assert_eq!(options.mode(3), Mode::Demo);
    assert_eq!(options.time_limit_secs, Some(1.5));
}

#[test]
fn test_malformed_numbers() {
    assert_eq!(
        parse(&["-md", "five"]),
        Err(CliError::InvalidNumber {
            flag: "-md".to_string(),
            value: "five".to_string()
        })
    );
    assert!(parse(&["-qd", "-1"]).is_err());
    assert!(parse(&["-md", "0"]).is_err());
    assert!(parse(&["-md", "999"]).is_err());
    assert!(parse(&["-t", "-3"]).is_err());
    assert!(parse(&["-t", "NaN"]).is_err());
    assert!(parse(&["-t", "inf"]).is_err());
    assert!(parse(&["-threads", "0"]).is_err());
}

#[test]
fn test_missing_values_and_unknown_flags() {
    assert_eq!(
        parse(&["-md"]),
        Err(CliError::MissingValue("-md".to_string()))
    );
    assert_eq!(parse(&["-fen"]), Err(CliError::EmptyFen));
    assert_eq!(
        parse(&["--depth", "4"]),
        Err(CliError::UnknownFlag("--depth".to_string()))
    );
}

#[test]
fn test_apply_overrides_config() {
    let mut config = EngineConfig::default();
    let options = parse(&["-md", "3", "-t", "0", "-threads", "2"]).unwrap();
    options.apply(&mut config);
    assert_eq!(config.depth, 3);
    assert_eq!(config.quiescence_depth, 3);
    assert_eq!(config.threads, 2);
    assert_eq!(config.time_limit(), None);
}

#[test]
fn test_usage_lists_flags() {
    let text = usage("uci_engine");
    for flag in ["-m", "-demo", "-md", "-qd", "-t", "-fen", "-threads", "-config"] {
        assert!(text.contains(flag), "{flag}");
    }
}

#[test]
fn test_huge_time_limit_is_malformed() {
    for text in ["1e19", "1e20", "604801"] {
        assert_eq!(
            parse(&["-t", text]),
            Err(CliError::InvalidNumber {
                flag: "-t".to_string(),
                value: text.to_string()
            })
        );
    }
    let week = parse(&["-t", "604800"]).unwrap();
    let mut config = EngineConfig::default();
    week.apply(&mut config);
    assert!(config.validate().is_ok());
    assert!(crate::demo::limits_for(&config).move_time.is_some());
}
