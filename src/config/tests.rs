// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::record;
use crate::resolver::MapEnv;

#[derive(Debug, Default, Clone, PartialEq)]
struct Listener {
    name: String,
    port: u16,
}

record!(Listener {
    name: ".param",
    port: "port",
});

#[derive(Debug, Default, Clone, PartialEq)]
struct AppConfig {
    version: i64,
    title: String,
    ratio: f64,
    tags: Vec<String>,
    listeners: Vec<Listener>,
}

record!(AppConfig {
    version: "version",
    title: "title",
    ratio: "ratio.1",
    tags: "tags",
    listeners: "listener",
});

fn sample() -> AppConfig {
    AppConfig {
        version: 2,
        title: "demo".into(),
        ratio: 0.5,
        tags: vec!["a".into(), "b".into()],
        listeners: vec![
            Listener {
                name: "http".into(),
                port: 80,
            },
            Listener {
                name: "https".into(),
                port: 443,
            },
        ],
    }
}

#[test]
fn test_marshal_string() {
    let text = marshal_string(&sample()).unwrap();
    assert_eq!(
        text,
        "version = 2\ntitle = \"demo\"\nratio = 0.5\ntags = [\"a\", \"b\"]\nlistener \"http\" {\n    port = 80\n}\nlistener \"https\" {\n    port = 443\n}\n"
    );
    assert_eq!(marshal(&sample()).unwrap(), text.into_bytes());
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.icl");

    marshal_file(&path, &sample()).unwrap();
    assert_eq!(parse_file(&path).unwrap().version(), 2);

    let mut loaded = AppConfig::default();
    unmarshal_file(&path, &mut loaded).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn test_unmarshal_bytes() {
    let mut target = AppConfig::default();
    unmarshal(b"title = \"bytes\"", &mut target).unwrap();
    assert_eq!(target.title, "bytes");
}

#[test]
fn test_unmarshal_syntax_error() {
    let mut target = AppConfig::default();
    let err = unmarshal_string("title = ", &mut target).unwrap_err();
    assert!(matches!(err, IclError::Syntax { .. }));
}

#[test]
fn test_unmarshal_with_env() {
    let env = MapEnv::new().with("TITLE", "from env");
    let mut target = AppConfig::default();
    unmarshal_with_env("title = env(TITLE)", &mut target, &env).unwrap();
    assert_eq!(target.title, "from env");
}

#[test]
fn test_missing_file_is_file_error() {
    let dir = TempDir::new().unwrap();
    let mut target = AppConfig::default();
    let err = unmarshal_file(dir.path().join("missing.icl"), &mut target).unwrap_err();
    assert!(matches!(err, IclError::File { .. }));
}

#[test]
fn test_fallback_file() {
    let dir = TempDir::new().unwrap();
    let primary = dir.path().join("primary.icl");
    let fallback = dir.path().join("fallback.icl");
    fs::write(&fallback, "title = \"fallback\"\n").unwrap();

    let mut target = AppConfig::default();
    unmarshal_file_with_fallback(&primary, &fallback, &mut target).unwrap();
    assert_eq!(target.title, "fallback");

    fs::write(&primary, "title = \"primary\"\n").unwrap();
    unmarshal_file_with_fallback(&primary, &fallback, &mut target).unwrap();
    assert_eq!(target.title, "primary");
}

#[test]
fn test_fallback_does_not_hide_parse_errors() {
    let dir = TempDir::new().unwrap();
    let primary = dir.path().join("primary.icl");
    let fallback = dir.path().join("fallback.icl");
    fs::write(&primary, "title = \n").unwrap();
    fs::write(&fallback, "title = \"fallback\"\n").unwrap();

    let mut target = AppConfig::default();
    let err = unmarshal_file_with_fallback(&primary, &fallback, &mut target).unwrap_err();
    assert!(matches!(err, IclError::Syntax { .. }));
}

#[test]
fn test_both_files_missing() {
    let dir = TempDir::new().unwrap();
    let mut target = AppConfig::default();
    let err = unmarshal_file_with_fallback(
        dir.path().join("a.icl"),
        dir.path().join("b.icl"),
        &mut target,
    )
    .unwrap_err();

    match err {
        IclError::File { path, .. } => assert!(path.contains("fallback")),
        other => panic!("expected file error, got {:?}", other),
    }
}

#[test]
fn test_tilde_expansion() {
    let resolved = helpers::resolve_path(&PathBuf::from("~/conf/app.icl"));
    if let Some(home) = dirs::home_dir() {
        assert_eq!(resolved, home.join("conf/app.icl"));
    }
    assert_eq!(
        helpers::resolve_path(&PathBuf::from("/etc/app.icl")),
        PathBuf::from("/etc/app.icl")
    );
}
