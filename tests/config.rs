// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, defaults and file lookup order.

use podgate::config::*;
use podgate::engine::RuntimeType;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.listen.to_string(), "0.0.0.0:5000");
        assert!(config.engine.runtime.is_none());
        assert_eq!(config.engine.timeout, Duration::from_secs(120));
        assert_eq!(config.engine.stop_timeout, Duration::from_secs(10));
        assert_eq!(config.engine.port_pairing, PortPairing::Strict);
        assert!(config.cluster.kubeconfig.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
listen: 127.0.0.1:8080
engine:
  runtime: podman
  socket: /run/user/1000/podman/podman.sock
  timeout: 2m
  stop_timeout: 30s
  port_pairing: truncate
cluster:
  kubeconfig: /etc/kube/admin.conf
  context: staging
  timeout: 5s
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.engine.runtime, Some(RuntimeType::Podman));
        assert_eq!(
            config.engine.socket.as_deref(),
            Some("/run/user/1000/podman/podman.sock")
        );
        assert_eq!(config.engine.timeout, Duration::from_secs(120));
        assert_eq!(config.engine.stop_timeout, Duration::from_secs(30));
        assert_eq!(config.engine.port_pairing, PortPairing::Truncate);
        assert_eq!(
            config.cluster.kubeconfig,
            Some(PathBuf::from("/etc/kube/admin.conf"))
        );
        assert_eq!(config.cluster.context.as_deref(), Some("staging"));
        assert_eq!(config.cluster.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let yaml = "engine:\n  sockt: /var/run/docker.sock\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn unknown_pairing_policy_is_rejected() {
        let yaml = "engine:\n  port_pairing: wrap\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        assert!(Config::from_yaml("listen: not-an-address\n").is_err());
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("podgate.yml"), "listen: 127.0.0.1:7000\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.listen.port(), 7000);
    }

    #[test]
    fn finds_dot_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".podgate")).unwrap();
        fs::write(
            dir.path().join(".podgate/config.yml"),
            "listen: 127.0.0.1:7001\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.listen.port(), 7001);
    }

    #[test]
    fn primary_file_wins_over_alternatives() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("podgate.yml"), "listen: 127.0.0.1:7002\n").unwrap();
        fs::write(dir.path().join("podgate.yaml"), "listen: 127.0.0.1:7003\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.listen.port(), 7002);
    }

    #[test]
    fn missing_file_is_an_error_for_discover() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, podgate::error::Error::ConfigNotFound(_)));
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.listen.port(), 5000);
    }

    #[test]
    fn resolve_with_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        assert!(Config::resolve(Some(&missing), dir.path()).is_err());
    }
}

mod init {
    use super::*;

    #[test]
    fn init_writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), false).unwrap();
        assert!(dir.path().join(CONFIG_FILENAME).exists());

        let err = init_config(dir.path(), false).unwrap_err();
        assert!(matches!(err, podgate::error::Error::AlreadyExists(_)));

        init_config(dir.path(), true).unwrap();
    }
}
