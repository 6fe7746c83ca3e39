use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_verity_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for key in [
            "VERITY_PORT",
            "VERITY_BIND_ADDR",
            "VERITY_QDRANT_URL",
            "VERITY_COLLECTION",
            "VERITY_RECORDS_DB",
            "VERITY_EMBEDDER_PATH",
            "VERITY_NLI_PATH",
            "VERITY_SYNC_WINDOW",
            "VERITY_SYNC_CHUNK_SIZE",
            "VERITY_SYNC_INTERVAL_SECS",
        ] {
            env::remove_var(key);
        }
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "news_facts");
    assert_eq!(config.records_db, PathBuf::from("./Database/news_articles.db"));
    assert!(config.embedder_path.is_none());
    assert!(config.nli_path.is_none());
    assert_eq!(config.sync_window, 5000);
    assert_eq!(config.sync_chunk_size, 500);
    assert!(config.sync_interval.is_none());
}

#[test]
fn test_socket_addr() {
    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_derived_component_configs() {
    let config = Config {
        sync_window: 100,
        sync_chunk_size: 10,
        ..Default::default()
    };
    let sync = config.sync_config();
    assert_eq!((sync.window, sync.chunk_size), (100, 10));
    assert!(config.embedder_config().is_stub());
    assert!(config.nli_config().model_dir.is_none());

    let config = Config {
        nli_path: Some(PathBuf::from("/models/nli")),
        ..Default::default()
    };
    assert_eq!(
        config.nli_config().model_dir,
        Some(PathBuf::from("/models/nli"))
    );
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_verity_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config.port, 8080);
    assert_eq!(config.sync_window, 5000);
}

#[test]
#[serial]
fn test_from_env_full() {
    clear_verity_env();

    with_env_vars(
        &[
            ("VERITY_PORT", "9000"),
            ("VERITY_BIND_ADDR", "::1"),
            ("VERITY_QDRANT_URL", "http://qdrant.cluster:6334"),
            ("VERITY_COLLECTION", "crisis_news"),
            ("VERITY_RECORDS_DB", "/data/news.db"),
            ("VERITY_EMBEDDER_PATH", "/models/minilm"),
            ("VERITY_NLI_PATH", "  "),
            ("VERITY_SYNC_WINDOW", "1200"),
            ("VERITY_SYNC_CHUNK_SIZE", "64"),
            ("VERITY_SYNC_INTERVAL_SECS", "900"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.port, 9000);
            assert_eq!(
                config.bind_addr,
                IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
            );
            assert_eq!(config.qdrant_url, "http://qdrant.cluster:6334");
            assert_eq!(config.collection, "crisis_news");
            assert_eq!(config.records_db, PathBuf::from("/data/news.db"));
            assert_eq!(config.embedder_path, Some(PathBuf::from("/models/minilm")));
            assert!(config.nli_path.is_none());
            assert_eq!(config.sync_window, 1200);
            assert_eq!(config.sync_chunk_size, 64);
            assert_eq!(config.sync_interval, Some(Duration::from_secs(900)));
        },
    );
}

#[test]
#[serial]
fn test_zero_interval_disables_periodic_sync() {
    clear_verity_env();

    with_env_vars(&[("VERITY_SYNC_INTERVAL_SECS", "0")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.sync_interval.is_none());
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_verity_env();

    with_env_vars(&[("VERITY_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_verity_env();

    with_env_vars(&[("VERITY_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_verity_env();

    with_env_vars(&[("VERITY_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_sync_window_is_rejected() {
    clear_verity_env();

    with_env_vars(&[("VERITY_SYNC_WINDOW", "lots")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                name: "VERITY_SYNC_WINDOW",
                ..
            }
        ));
        assert!(err.to_string().contains("lots"));
    });
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_zero_chunk_size() {
    let config = Config {
        sync_chunk_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_empty_collection() {
    let config = Config {
        collection: "   ".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_records_db_is_directory() {
    let config = Config {
        records_db: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src"),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotAFile { .. })
    ));
}

#[test]
fn test_validate_nonexistent_model_paths() {
    let config = Config {
        embedder_path: Some(PathBuf::from("/nonexistent/embedder")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));

    let config = Config {
        nli_path: Some(PathBuf::from("/nonexistent/nli")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_is_file() {
    let config = Config {
        nli_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_success_with_valid_paths() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = Config {
        records_db: manifest_dir.join("Cargo.toml"),
        embedder_path: Some(manifest_dir.join("src")),
        nli_path: Some(manifest_dir.join("src")),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
