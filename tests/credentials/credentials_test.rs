//! Coverage for credential loading and permission checks.

use std::fs;
use std::path::{Path, PathBuf};

use penwright::credentials::{load_credentials, ENV_FILE_NAME};

fn write_env(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join(ENV_FILE_NAME);
    let write = fs::write(&path, contents);
    assert!(write.is_ok());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
        assert!(perms.is_ok());
    }
    path
}

#[test]
fn loads_env_credentials() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let env_path = write_env(
        tmp.path(),
        "PENWRIGHT_API_KEY=runtime-key\n# comment\nPENWRIGHT_MODEL=\"glm-4-air\"\n",
    );

    let credentials = match load_credentials(&env_path) {
        Ok(credentials) => credentials,
        Err(err) => panic!("credentials should load: {err}"),
    };

    assert!(!credentials.is_empty());
    assert_eq!(credentials.get("PENWRIGHT_API_KEY"), Some("runtime-key"));
    assert_eq!(credentials.get("PENWRIGHT_MODEL"), Some("glm-4-air"));
    assert_eq!(credentials.get("MISSING"), None);
}

#[cfg(unix)]
#[test]
fn rejects_world_readable_env_file() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().expect("should create temp dir");
    let env_path = write_env(tmp.path(), "PENWRIGHT_API_KEY=runtime-key\n");
    let perms = fs::set_permissions(&env_path, fs::Permissions::from_mode(0o644));
    assert!(perms.is_ok());

    let loaded = load_credentials(&env_path);
    assert!(loaded.is_err());
}

#[test]
fn missing_file_is_reported() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let loaded = load_credentials(&tmp.path().join(ENV_FILE_NAME));
    match loaded {
        Ok(_) => panic!("missing credentials file should be an error"),
        Err(err) => assert!(err.to_string().contains("does not exist")),
    }
}
