//! TOML and JSON documents flattened to dotted keys.
//!
//! Nested tables become `a.b.c`; arrays become `key[0]`, `key[1]`, ...
//! JSON `null` maps to an empty string.

use super::FormatError;

pub fn parse_toml(text: &str) -> Result<Vec<(String, String)>, FormatError> {
    let table: toml::Table = toml::from_str(text)?;
    let mut pairs = Vec::new();
    for (key, value) in &table {
        flatten_toml(key.clone(), value, &mut pairs);
    }
    Ok(pairs)
}

pub fn parse_json(text: &str) -> Result<Vec<(String, String)>, FormatError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(map) = value else {
        return Err(FormatError::NotATable);
    };
    let mut pairs = Vec::new();
    for (key, value) in &map {
        flatten_json(key.clone(), value, &mut pairs);
    }
    Ok(pairs)
}

fn flatten_toml(prefix: String, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                flatten_toml(format!("{prefix}.{key}"), nested, out);
            }
        }
        toml::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_toml(format!("{prefix}[{i}]"), item, out);
            }
        }
        toml::Value::String(s) => out.push((prefix, s.clone())),
        other => out.push((prefix, other.to_string())),
    }
}

fn flatten_json(prefix: String, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_json(format!("{prefix}.{key}"), nested, out);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_json(format!("{prefix}[{i}]"), item, out);
            }
        }
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Null => out.push((prefix, String::new())),
        other => out.push((prefix, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn toml_tables_and_arrays_flatten() {
        let pairs = parse_toml(
            r#"
            name = "app"
            [server]
            port = 8080
            hosts = ["a", "b"]
            [server.tls]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(lookup(&pairs, "name"), Some("app"));
        assert_eq!(lookup(&pairs, "server.port"), Some("8080"));
        assert_eq!(lookup(&pairs, "server.hosts[1]"), Some("b"));
        assert_eq!(lookup(&pairs, "server.tls.enabled"), Some("true"));
    }

    #[test]
    fn json_objects_arrays_and_null() {
        let pairs = parse_json(r#"{"db": {"url": "x", "pool": [1, 2], "user": null}}"#).unwrap();

        assert_eq!(lookup(&pairs, "db.url"), Some("x"));
        assert_eq!(lookup(&pairs, "db.pool[0]"), Some("1"));
        assert_eq!(lookup(&pairs, "db.user"), Some(""));
    }

    #[test]
    fn json_root_must_be_object() {
        assert!(matches!(parse_json("[1, 2]"), Err(FormatError::NotATable)));
    }
}
