//! Integration test: RhiConfig
//!
//! Parses rhi.toml snippets and checks defaults, clamping and the command
//! buffers created from the configured growth policy.
//!
//! Run with: cargo test --test config_test -- --nocapture

use rhi_command::buffer::{DEFAULT_GROWTH_QUANTUM, MAXIMUM_NUMBER_OF_BYTES};
use rhi_command::commands::DispatchCompute;
use rhi_command::CommandBufferError;
use rhi_core::config::{CommandBufferConfig, RhiConfig};
use rhi_core::CoreError;

#[test]
fn test_empty_config_uses_defaults() {
    let config = RhiConfig::parse("").expect("empty config parses");
    assert_eq!(config, RhiConfig::default());
    assert_eq!(config.command_buffer.initial_capacity, 0);
    assert_eq!(config.command_buffer.growth_quantum, DEFAULT_GROWTH_QUANTUM);
    assert_eq!(config.command_buffer.max_bytes, MAXIMUM_NUMBER_OF_BYTES);
    assert!(config.null_backend.validate_resources);
    assert!(!config.null_backend.log_commands);
}

#[test]
fn test_partial_sections() {
    let config = RhiConfig::parse(
        r#"
        [command_buffer]
        growth_quantum = 256

        [null_backend]
        log_commands = true
        "#,
    )
    .expect("config parses");

    assert_eq!(config.command_buffer.growth_quantum, 256);
    assert_eq!(config.command_buffer.initial_capacity, 0);
    assert_eq!(config.command_buffer.max_bytes, MAXIMUM_NUMBER_OF_BYTES);
    assert!(config.null_backend.log_commands);
    assert!(config.null_backend.validate_resources);
}

#[test]
fn test_invalid_toml_rejected() {
    match RhiConfig::parse("[command_buffer]\ngrowth_quantum = \"lots\"\n") {
        Err(CoreError::ParseError(e)) => println!("Rejected as expected: {}", e),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_initial_capacity_above_maximum_rejected() {
    let result = RhiConfig::parse(
        r#"
        [command_buffer]
        initial_capacity = 4096
        max_bytes = 1024
        "#,
    );
    match result {
        Err(CoreError::ConfigError(message)) => assert!(message.contains("initial_capacity")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_growth_policy_clamps_maximum() {
    let config = CommandBufferConfig {
        initial_capacity: 64,
        growth_quantum: 128,
        max_bytes: u32::MAX,
    };
    let policy = config.growth_policy();
    assert_eq!(policy.initial_capacity, 64);
    assert_eq!(policy.growth_quantum, 128);
    assert_eq!(policy.max_bytes, MAXIMUM_NUMBER_OF_BYTES);
}

#[test]
fn test_create_command_buffer_uses_policy() {
    let config = CommandBufferConfig {
        initial_capacity: 64,
        growth_quantum: 32,
        max_bytes: 96,
    };
    let mut buffer = config.create_command_buffer();
    assert_eq!(buffer.capacity(), 64);
    assert!(buffer.is_empty());

    // DispatchCompute packets are 32 bytes: three fit, the fourth does not
    for _ in 0..3 {
        DispatchCompute::create(&mut buffer, 1, 1, 1).expect("fits");
    }
    assert_eq!(buffer.size(), 96);
    assert_eq!(buffer.capacity(), 96);

    match DispatchCompute::create(&mut buffer, 1, 1, 1) {
        Err(CommandBufferError::CapacityExceeded { requested, maximum }) => {
            assert_eq!(requested, 128);
            assert_eq!(maximum, 96);
        }
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }
    assert_eq!(buffer.number_of_commands(), 3);
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("rhi-config-test-{}.toml", std::process::id()));
    std::fs::write(&path, "[command_buffer]\ninitial_capacity = 1024\n").expect("write config");

    let config = RhiConfig::load(&path).expect("config loads");
    assert_eq!(config.command_buffer.initial_capacity, 1024);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_or_default_missing_file() {
    let path = std::env::temp_dir().join("rhi-config-test-does-not-exist.toml");
    match RhiConfig::load(&path) {
        Err(CoreError::Io(_)) => {}
        other => panic!("expected IO error, got {:?}", other),
    }
    assert_eq!(RhiConfig::load_or_default(&path), RhiConfig::default());
}

#[test]
fn test_config_round_trips_through_toml() {
    let mut config = RhiConfig::default();
    config.command_buffer.growth_quantum = 512;
    config.null_backend.validate_resources = false;

    let text = toml::to_string(&config).expect("config serializes");
    println!("{}", text);
    assert_eq!(RhiConfig::parse(&text).expect("config parses"), config);
}

#[test]
fn test_command_errors_convert() {
    let error: CoreError = CommandBufferError::EmptySource.into();
    assert!(matches!(error, CoreError::Command(CommandBufferError::EmptySource)));
    assert_eq!(error.to_string(), "command buffer error: cannot append an empty command buffer");
}
