use std::{env, num::ParseIntError, path::PathBuf, str::FromStr};

#[derive(Debug, thiserror::Error)]
#[error("Failed to parse {name}: {source}")]
pub struct Error {
    name: &'static str,
    source: ParseIntError,
}

/// Environment-derived service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`PORT`).
    pub port: u16,

    /// Writable cache directory for model weights (`MODEL_CACHE_DIR`).
    /// Falls back to the hub client's default cache when unset.
    pub model_cache_dir: Option<PathBuf>,

    /// Upper bound on generated caption length, in tokens (`CAPTION_MAX_TOKENS`).
    pub max_caption_tokens: usize,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            port: parse_var("PORT", 8080)?,
            model_cache_dir: env::var_os("MODEL_CACHE_DIR").map(PathBuf::from),
            max_caption_tokens: parse_var("CAPTION_MAX_TOKENS", 50)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            model_cache_dir: None,
            max_caption_tokens: 50,
        }
    }
}

fn parse_var<T: FromStr<Err = ParseIntError>>(
    name: &'static str,
    default: T,
) -> Result<T, Error> {
    env::var(name).map_or(Ok(default), |value| {
        value.parse().map_err(|source| Error { name, source })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations don't race each other.
    #[test]
    fn test_from_env() {
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_caption_tokens, 50);
        assert_eq!(config.model_cache_dir, None);

        env::set_var("CAPTION_MAX_TOKENS", "25");
        env::set_var("MODEL_CACHE_DIR", "/tmp/weights");
        let config = Config::from_env().unwrap();
        assert_eq!(config.max_caption_tokens, 25);
        assert_eq!(config.model_cache_dir, Some(PathBuf::from("/tmp/weights")));

        env::set_var("CAPTION_MAX_TOKENS", "not a number");
        assert!(Config::from_env().is_err());

        env::remove_var("CAPTION_MAX_TOKENS");
        env::remove_var("MODEL_CACHE_DIR");
    }
}
