//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use hearth_config::HearthConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_store_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
token = "secret_abc"
template_db_id = "1111aaaa"
active_db_id = "2222bbbb"
min_call_interval_ms = 500
"#,
        )?;

        let config: HearthConfig = Figment::from(Serialized::defaults(HearthConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.token, "secret_abc");
        assert_eq!(config.store.template_db_id, "1111aaaa");
        assert_eq!(config.store.active_db_id, "2222bbbb");
        assert_eq!(config.store.min_call_interval_ms, 500);
        assert!(config.store.is_configured());
        assert!(config.store.validate().is_ok());
        Ok(())
    });
}

#[test]
fn loads_summarizer_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[summarizer]
api_key = "sk-test"
model = "gpt-4o"
base_url = "http://localhost:8080/v1"
"#,
        )?;

        let config: HearthConfig = Figment::from(Serialized::defaults(HearthConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.summarizer.api_key, "sk-test");
        assert_eq!(config.summarizer.model, "gpt-4o");
        assert_eq!(config.summarizer.base_url, "http://localhost:8080/v1");
        assert!(config.summarizer.is_configured());
        Ok(())
    });
}

#[test]
fn partial_section_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
token = "secret_abc"
"#,
        )?;

        let config: HearthConfig = Figment::from(Serialized::defaults(HearthConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.base_url, "https://api.notion.com/v1");
        assert_eq!(config.store.min_call_interval_ms, 350);
        // token alone is not enough for a run
        assert!(config.store.validate().is_err());
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
token = "from_toml"
"#,
        )?;
        jail.set_env("HEARTH_STORE__TOKEN", "from_env");

        let config: HearthConfig = Figment::from(Serialized::defaults(HearthConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("HEARTH_").split("__"))
            .extract()?;

        assert_eq!(config.store.token, "from_env");
        Ok(())
    });
}
