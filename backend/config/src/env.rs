//! `${VAR}` substitution over the string leaves of a loaded config tree.
//!
//! Names are `[A-Z_][A-Z0-9_]*`. `$${VAR}` is kept as the literal `${VAR}`,
//! so a `checkoutDir` can still contain a dollar-brace sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// A config string referenced an env var that is unset or empty.
#[derive(Debug, thiserror::Error)]
#[error("config path `{path}` references unset env var `{var}`")]
pub struct MissingEnvVarError {
    pub var: String,
    pub path: String,
}

/// Substitute env var references from the process environment.
pub fn resolve_env_vars(value: Value) -> Result<Value, MissingEnvVarError> {
    resolve(value, "", &|name| std::env::var(name).ok())
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn resolve(value: Value, path: &str, lookup: Lookup<'_>) -> Result<Value, MissingEnvVarError> {
    Ok(match value {
        Value::String(s) => Value::String(expand(&s, path, lookup)?),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| resolve(item, &format!("{path}[{i}]"), lookup))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    resolve(item, &child, lookup).map(|item| (key, item))
                })
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}

fn expand(s: &str, path: &str, lookup: Lookup<'_>) -> Result<String, MissingEnvVarError> {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_REF.captures_iter(s) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&s[last..whole.start()]);
        last = whole.end();

        if let Some(literal) = whole.as_str().strip_prefix('$').filter(|r| r.starts_with('$')) {
            out.push_str(literal);
            continue;
        }
        match lookup(&caps[1]).filter(|v| !v.is_empty()) {
            Some(val) => out.push_str(&val),
            None => {
                return Err(MissingEnvVarError {
                    var: caps[1].to_string(),
                    path: path.to_string(),
                })
            }
        }
    }
    out.push_str(&s[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve_with(value: Value, vars: &[(&str, &str)]) -> Result<Value, MissingEnvVarError> {
        let vars: Vec<(String, String)> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        resolve(value, "", &|name| {
            vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn substitutes_checkout_dir() {
        let v = json!({"agent": {"checkoutDir": "${CHECKOUT_ROOT}/repos"}});
        let out = resolve_with(v, &[("CHECKOUT_ROOT", "/srv")]).unwrap();
        assert_eq!(out["agent"]["checkoutDir"], "/srv/repos");
    }

    #[test]
    fn missing_var_names_its_path() {
        let v = json!({"agent": {"enabledCommands": ["file_exists", "${EXTRA_CMD}"]}});
        let err = resolve_with(v, &[]).unwrap_err();
        assert_eq!(err.var, "EXTRA_CMD");
        assert_eq!(err.path, "agent.enabledCommands[1]");
    }

    #[test]
    fn empty_var_counts_as_missing() {
        let v = json!({"logging": {"level": "${LOG_LEVEL}"}});
        assert!(resolve_with(v, &[("LOG_LEVEL", "")]).is_err());
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"agent": {"name": "$${NOT_A_VAR} and ${NAME}"}});
        let out = resolve_with(v, &[("NAME", "dockerchat")]).unwrap();
        assert_eq!(out["agent"]["name"], "${NOT_A_VAR} and dockerchat");
    }

    #[test]
    fn non_strings_pass_through() {
        let v = json!({"agent": {"enabledCommands": null}, "plain": "no refs", "n": 3});
        assert_eq!(resolve_with(v.clone(), &[]).unwrap(), v);
    }
}
