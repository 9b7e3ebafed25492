use std::path::PathBuf;

use rs_shiina_core::model::generation_input::DEFAULT_MAX_TOKENS;

/// Server settings, read from `SHIINA_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	pub host: String,
	pub port: u16,
	/// JSON Lines corpus, created empty if missing.
	pub corpus_path: PathBuf,
	/// Default generation token cap.
	pub max_tokens: usize,
}

impl Config {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, String> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, falling back to defaults
	/// for unset variables.
	///
	/// # Errors
	/// Returns an error naming the variable if a numeric value is malformed.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
	where
		F: Fn(&str) -> Option<String>,
	{
		let port = match lookup("SHIINA_PORT") {
			Some(value) => value
				.parse::<u16>()
				.map_err(|e| format!("SHIINA_PORT must be a port number, got '{value}': {e}"))?,
			None => 8001,
		};

		let max_tokens = match lookup("SHIINA_MAX_TOKENS") {
			Some(value) => match value.parse::<usize>() {
				Ok(n) if n > 0 => n,
				_ => return Err(format!("SHIINA_MAX_TOKENS must be a positive integer, got '{value}'")),
			},
			None => DEFAULT_MAX_TOKENS,
		};

		Ok(Self {
			host: lookup("SHIINA_HOST").unwrap_or_else(|| "127.0.0.1".to_owned()),
			port,
			corpus_path: lookup("SHIINA_CORPUS")
				.map(PathBuf::from)
				.unwrap_or_else(|| PathBuf::from("logs/dialogue.jsonl")),
			max_tokens,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn config(vars: &[(&str, &str)]) -> Result<Config, String> {
		let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		Config::from_lookup(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 8001);
		assert_eq!(config.corpus_path, PathBuf::from("logs/dialogue.jsonl"));
		assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
	}

	#[test]
	fn test_overrides() {
		let config = config(&[("SHIINA_PORT", "9000"), ("SHIINA_MAX_TOKENS", "30"), ("SHIINA_CORPUS", "data/a.jsonl")]).unwrap();
		assert_eq!(config.port, 9000);
		assert_eq!(config.max_tokens, 30);
		assert_eq!(config.corpus_path, PathBuf::from("data/a.jsonl"));
	}

	#[test]
	fn test_malformed_numbers() {
		assert!(config(&[("SHIINA_PORT", "http")]).unwrap_err().contains("SHIINA_PORT"));
		assert!(config(&[("SHIINA_MAX_TOKENS", "0")]).unwrap_err().contains("SHIINA_MAX_TOKENS"));
	}
}
