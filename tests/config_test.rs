use fivetran_mcp::config::Settings;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("fivetran-mcp.toml");

    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[fivetran]
base_url = "https://fivetran.example.com/v1"
api_key = "key"
api_secret = "secret"
timeout_seconds = 10
max_pages = 50
"#;
    fs::write(&path, toml)?;

    let settings = Settings::from_file(&path)?;

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.fivetran.base_url, "https://fivetran.example.com/v1");
    assert_eq!(settings.fivetran.api_key.as_deref(), Some("key"));
    assert_eq!(settings.fivetran.timeout_seconds, 10);
    assert_eq!(settings.fivetran.max_pages, 50);

    Ok(())
}

#[test]
fn test_fivetran_section_is_optional() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("fivetran-mcp.toml");
    fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 3001\n")?;

    let settings = Settings::from_file(&path)?;

    assert_eq!(settings.server.port, 3001);
    assert_eq!(settings.fivetran.base_url, "https://api.fivetran.com/v1");
    assert_eq!(settings.fivetran.max_pages, 1000);
    assert!(settings.fivetran.api_secret.is_none());

    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("fivetran-mcp.toml");

    let toml = r#"
[server]
host = "127.0.0.1"
port = 3000

[fivetran]
base_url = "ftp://fivetran.example.com"
timeout_seconds = 0
"#;
    fs::write(&path, toml)?;

    let err = Settings::from_file(&path).unwrap_err().to_string();

    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("base_url"));
    assert!(err.contains("timeout_seconds"));

    Ok(())
}
