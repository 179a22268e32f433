//! libpq-style `key=value` connection strings.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Build connect options from a URL or a keyword/value string.
pub fn connect_options(conn: &str) -> Result<PgConnectOptions, String> {
    if conn.contains("://") {
        return PgConnectOptions::from_str(conn).map_err(|err| err.to_string());
    }

    let mut options = PgConnectOptions::new();
    let mut runtime = Vec::new();
    for (key, value) in parse_keywords(conn)? {
        options = match key.as_str() {
            "host" if value.starts_with('/') => options.socket(&value),
            "host" | "hostaddr" => options.host(&value),
            "port" => {
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port: {value}"))?;
                options.port(port)
            }
            "user" => options.username(&value),
            "password" => options.password(&value),
            "dbname" => options.database(&value),
            "sslmode" => {
                let mode = PgSslMode::from_str(&value).map_err(|err| err.to_string())?;
                options.ssl_mode(mode)
            }
            "sslrootcert" => options.ssl_root_cert(value.as_str()),
            "application_name" => options.application_name(&value),
            "connect_timeout" => options,
            _ => {
                runtime.push((key, value));
                options
            }
        };
    }

    if runtime.is_empty() {
        Ok(options)
    } else {
        Ok(options.options(runtime))
    }
}

/// Split `key=value` pairs. Values may be single-quoted; inside quotes `\'`
/// and `\\` are escapes.
pub fn parse_keywords(conn: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut chars = conn.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('=') {
            return Err(format!("missing \"=\" after \"{key}\" in connection string"));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => return Err("unterminated quoted value".to_string()),
                    },
                    Some(c) => value.push(c),
                    None => return Err("unterminated quoted value".to_string()),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                value.push(c);
            }
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}
