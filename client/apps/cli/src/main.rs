//! Blog Client Entry Point
//!
//! Command line front end over the client crates.
//! Uses `anyhow` for top-level errors, but library code
//! reports `kernel::error::AppError` or its own error enums.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gateway::{
    AppCodeCheck, AuthGate, ClientConfig, History, HttpClient, Navigator, Route, SanitizeParams,
    SessionJar,
};
use kernel::json::remove_empty_in_str;
use kernel::time::{self, DateFormatter, Zone};
use platform::codec::{self, Base64Variant, HashAlgorithm, TextTransform};
use platform::notify::TracingNotifier;
use platform::storage::LocalStorage;
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, CodecAction, Command, StringAction};

/// Storage key of the remembered session id
const SESSION_KEY: &str = "session";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog=info,gateway=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Date { stamp, tz } => run_date(stamp, tz.as_deref())?,
        Command::Sanitize { json } => {
            let cleaned = remove_empty_in_str(&json)?;
            println!("{}", serde_json::to_string_pretty(&cleaned)?);
        }
        Command::Hex { action, text } => match action {
            CodecAction::Encode => println!("{}", codec::hex_encode(&text)),
            CodecAction::Decode => println!("{}", codec::hex_decode(&text)?),
        },
        Command::Base64 {
            action,
            text,
            url_safe,
        } => {
            let variant = if url_safe {
                Base64Variant::UrlSafe
            } else {
                Base64Variant::Standard
            };
            match action {
                CodecAction::Encode => println!("{}", codec::to_base64(&text, variant)),
                CodecAction::Decode => println!("{}", codec::from_base64(&text, variant)?),
            }
        }
        Command::Hash { text, algorithm } => run_hash(&text, algorithm.as_deref())?,
        Command::String { action, text } => run_string(action, &text),
        Command::Get {
            path,
            params,
            session,
        } => {
            let storage = LocalStorage::open(&cli.store)?;
            run_get(&storage, &path, &params, session).await?;
        }
        Command::Open { path, session } => {
            let storage = LocalStorage::open(&cli.store)?;
            run_open(&storage, &path, session)?;
        }
        Command::Logout => {
            let storage = LocalStorage::open(&cli.store)?;
            storage.remove(SESSION_KEY)?;
            tracing::info!("Session forgotten");
        }
    }

    Ok(())
}

fn run_date(stamp: Option<String>, tz: Option<&str>) -> anyhow::Result<()> {
    let formatter = match tz {
        Some(name) => DateFormatter::in_zone(Zone::named(name)?),
        None => DateFormatter::local(),
    };

    match stamp {
        Some(stamp) => println!("{}", formatter.timestamp_to_time(stamp, None)?),
        None => {
            let now = chrono::Utc::now();
            println!("{}", formatter.format_date(&now));
            println!("ms  {}", time::date_to_ms_timestamp(&now));
            println!("s   {}", time::date_to_s_timestamp(&now));
        }
    }
    Ok(())
}

fn run_hash(text: &str, algorithm: Option<&str>) -> anyhow::Result<()> {
    match algorithm {
        Some(name) => {
            let algorithm: HashAlgorithm = name.parse()?;
            println!("{}", codec::digest_hex(algorithm, text));
        }
        None => {
            for algorithm in HashAlgorithm::ALL {
                println!("{:<7} {}", algorithm.as_str(), codec::digest_hex(algorithm, text));
            }
        }
    }
    Ok(())
}

fn run_string(action: StringAction, text: &str) {
    let transform = match action {
        StringAction::Upper => TextTransform::Upper,
        StringAction::Lower => TextTransform::Lower,
        StringAction::Trim => TextTransform::Trim,
        StringAction::Reverse => TextTransform::Reverse,
        StringAction::Stats => {
            let stats = codec::text_stats(text);
            println!("chars {}", stats.chars);
            println!("bytes {}", stats.bytes);
            println!("lines {}", stats.lines);
            println!("words {}", stats.words);
            return;
        }
    };
    println!("{}", transform.apply(text));
}

async fn run_get(
    storage: &LocalStorage,
    path: &str,
    params: &[String],
    session: Option<String>,
) -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    let cookie = session_cookie(storage, &config, session)?;

    // Keep a handle on the checker so a pending notice is not lost on exit
    let check = AppCodeCheck::with_notifier(
        Arc::new(TracingNotifier),
        config.error_debounce,
        config.success_code,
    );
    let client = HttpClient::builder(config)
        .request_interceptor(SanitizeParams)
        .response_interceptor(check.clone())
        .build()?;
    if let Some(cookie) = cookie {
        client.jar().add_cookie_str(&cookie);
    }

    let result = client.get(path, parse_params(params)?).await;
    check.notifier().flush();

    let body = result.map_err(|e| {
        let err = e.to_app_error();
        if err.is_retryable() {
            tracing::info!(code = ?err.code(), "API unavailable, try again later");
        }
        err
    })?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn run_open(storage: &LocalStorage, path: &str, session: Option<String>) -> anyhow::Result<()> {
    let route = Route::parse(path).with_context(|| format!("No view at {path}"))?;

    let config = ClientConfig::from_env()?;
    let jar = SessionJar::new(config.base_url.clone());
    if let Some(cookie) = session_cookie(storage, &config, session)? {
        jar.add_cookie_str(&cookie);
    }

    let history = Arc::new(History::default());
    let gate = AuthGate::new(
        Arc::new(jar),
        Arc::new(TracingNotifier),
        history.clone(),
        config.session_cookie_name.clone(),
    );

    if gate.allow(&route) {
        history.push(&route);
    }

    let current = history.current();
    println!("{} ({})", current.path(), current.name());
    Ok(())
}

/// `Set-Cookie` line for the session, remembering a newly given id
fn session_cookie(
    storage: &LocalStorage,
    config: &ClientConfig,
    session: Option<String>,
) -> anyhow::Result<Option<String>> {
    let session = match session {
        Some(id) => {
            storage.set(SESSION_KEY, &id)?;
            Some(id)
        }
        None => storage.get::<String>(SESSION_KEY)?,
    };

    Ok(session.map(|id| format!("{}={id}; Path=/", config.session_cookie_name)))
}

/// `key=value` pairs into a params object
fn parse_params(pairs: &[String]) -> anyhow::Result<Value> {
    let mut params = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got `{pair}`"))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        params.insert(key.to_string(), value);
    }
    Ok(Value::Object(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&[
            "page=2".to_string(),
            "tag=".to_string(),
            "keyword=rust lang".to_string(),
            "ids=[1,2]".to_string(),
        ])
        .unwrap();
        assert_eq!(
            params,
            json!({"page": 2, "tag": "", "keyword": "rust lang", "ids": [1, 2]})
        );
    }

    #[test]
    fn test_parse_params_rejects_bare_key() {
        assert!(parse_params(&["page".to_string()]).is_err());
    }

    #[test]
    fn test_session_cookie_is_remembered() {
        let storage = LocalStorage::in_memory();
        let config = ClientConfig::default();

        assert_eq!(session_cookie(&storage, &config, None).unwrap(), None);

        let cookie = session_cookie(&storage, &config, Some("abc".to_string())).unwrap();
        assert_eq!(cookie.as_deref(), Some("SESSION_ID=abc; Path=/"));

        let remembered = session_cookie(&storage, &config, None).unwrap();
        assert_eq!(remembered, cookie);
    }

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::try_parse_from(["blog", "get", "/article/list", "-p", "page=1"]).unwrap();
        match cli.command {
            Command::Get { path, params, session } => {
                assert_eq!(path, "/article/list");
                assert_eq!(params, vec!["page=1".to_string()]);
                assert_eq!(session, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
