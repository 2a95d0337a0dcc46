// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::tempdir;
use tripclip::auth::AuthState;
use tripclip::config::Config;

#[test]
fn parses_full_config() {
    let cfg = Config::from_toml_str(
        r#"
        database = "/tmp/trips.sqlite"

        [remote]
        base_url = "https://sync.example.com/v1"
        api_token = "abc"

        [user]
        id = "user-42"
        display_name = "Ana"
        "#,
    )
    .unwrap();

    assert_eq!(cfg.database_path().unwrap(), PathBuf::from("/tmp/trips.sqlite"));
    let remote = cfg.remote.as_ref().unwrap();
    assert_eq!(remote.base_url, "https://sync.example.com/v1");
    assert_eq!(remote.timeout_secs(), 15);
    match cfg.initial_auth_state() {
        AuthState::SignedIn(profile) => {
            assert_eq!(profile.uid, "user-42");
            assert_eq!(profile.display_name.as_deref(), Some("Ana"));
        }
        other => panic!("expected signed in, got {other:?}"),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Config::from_toml_str("colour = \"blue\"").unwrap_err();
    assert!(matches!(err, tripclip::Error::Config(_)));
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let cfg = Config::from_file(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.initial_auth_state(), AuthState::SignedOut);
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[remote]\nbase_url = \"http://localhost:9000\"\ntimeout_secs = 3\n")
        .unwrap();
    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.remote.unwrap().timeout_secs(), 3);
}

#[test]
fn overrides_win_over_file_values() {
    let mut cfg = Config::from_toml_str(
        r#"
        [remote]
        base_url = "https://old.example.com"
        "#,
    )
    .unwrap();
    let env: HashMap<&str, &str> = HashMap::from([
        ("TRIPCLIP_DB", "/data/t.sqlite"),
        ("TRIPCLIP_REMOTE_URL", "https://new.example.com"),
        ("TRIPCLIP_REMOTE_TOKEN", "tok"),
        ("TRIPCLIP_USER_ID", "u-7"),
    ]);

    cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(cfg.database, Some(PathBuf::from("/data/t.sqlite")));
    let remote = cfg.remote.as_ref().unwrap();
    assert_eq!(remote.base_url, "https://new.example.com");
    assert_eq!(remote.api_token.as_deref(), Some("tok"));
    assert_eq!(cfg.user.as_ref().unwrap().id, "u-7");
}

#[test]
fn blank_overrides_are_ignored() {
    let mut cfg = Config::default();
    cfg.apply_overrides(|_| Some("   ".to_string()));
    assert_eq!(cfg, Config::default());
}
