use sqlgate_core::config::{ConfigError, ConfigValue, SecretResolver, SqlgateConfig};
use sqlgate_core::ConnectionConfig;

#[test]
fn test_empty_config() {
    let config = SqlgateConfig::empty();
    assert!(matches!(
        config.get::<String>("datasource.driver"),
        Err(ConfigError::NotFound(_))
    ));
    assert!(config.get_opt::<String>("datasource.driver").unwrap().is_none());
}

#[test]
fn test_set_and_get() {
    let mut config = SqlgateConfig::empty();
    config.set("datasource.port", ConfigValue::String("5432".into()));
    assert_eq!(config.get::<u16>("datasource.port").unwrap(), 5432);
    assert_eq!(config.get_or("datasource.missing", 7i64), 7);
}

#[test]
fn test_type_mismatch() {
    let mut config = SqlgateConfig::empty();
    config.set("datasource.port", ConfigValue::Integer(70_000));
    assert!(matches!(
        config.get::<u16>("datasource.port"),
        Err(ConfigError::TypeMismatch { expected: "u16", .. })
    ));
}

#[test]
fn test_datasource_section() {
    let yaml = r#"
datasource:
  driver: postgres
  host: db.internal
  port: 5432
  user: app
  password: secret
  database: orders
  params:
    sslmode: disable
    connect_timeout: 10
  pool:
    maxopen: 20
    maxlifetime: 600
"#;
    let config = SqlgateConfig::from_yaml_str(yaml, "test").unwrap();
    let ds: ConnectionConfig = config.section().unwrap();

    assert_eq!(ds.driver, "postgres");
    assert_eq!(ds.host, "db.internal");
    assert_eq!(ds.port, 5432);
    assert_eq!(ds.user, "app");
    assert_eq!(ds.password, "secret");
    assert_eq!(ds.db_name, "orders");
    assert_eq!(ds.params.len(), 2);
    assert_eq!(ds.params["sslmode"], "disable");
    assert_eq!(ds.params["connect_timeout"], "10");
    assert_eq!(ds.max_open_conns, 20);
    assert_eq!(ds.max_idle_conns, 0);
    assert_eq!(ds.conn_max_lifetime_secs, 600);
}

#[test]
fn test_datasource_requires_driver() {
    let config = SqlgateConfig::from_yaml_str("datasource:\n  host: db\n", "test").unwrap();
    let err = config.section::<ConnectionConfig>().unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(ref key) if key == "datasource.driver"));
}

#[test]
fn test_invalid_yaml() {
    assert!(matches!(
        SqlgateConfig::from_yaml_str("datasource: [unclosed", "test"),
        Err(ConfigError::Load(_))
    ));
}

struct Vault;

impl SecretResolver for Vault {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError> {
        match reference {
            "vault:db" => Ok("from-vault".into()),
            other => Err(ConfigError::NotFound(other.into())),
        }
    }
}

#[test]
fn test_load_from_directory_with_profile() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("sqlgate.yaml"),
        "datasource:\n  driver: sqlite\n  database: base.db\n  password: ${vault:db}\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("sqlgate-staging.yaml"),
        "datasource:\n  database: staging.db\n",
    )
    .unwrap();

    let config = SqlgateConfig::load_from(dir.path(), "staging", &Vault).unwrap();
    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("datasource.database").unwrap(), "staging.db");
    assert_eq!(config.get::<String>("datasource.password").unwrap(), "from-vault");
}
