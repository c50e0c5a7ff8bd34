//! Process-wide configuration: defaults, rc file, environment overlay.

use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .runboxrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    /// Build a config from explicit key/value pairs on top of the defaults.
    /// Lets tests construct independent instances without touching the
    /// process environment.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert((*k).to_string(), (*v).to_string());
        }
        Self {
            inner: map,
            config_path: default_config_path(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    /// Default round-trip budget for one execution, in milliseconds.
    pub fn request_timeout_ms(&self) -> Option<u64> {
        self.get_u64("REQUEST_TIMEOUT_MS")
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "EXECUTION_API_BASE",
        "EXECUTION_API_KEY",
        "REQUEST_TIMEOUT_MS",
        "COMPILE_TIMEOUT_MS",
        "RUN_MEMORY_LIMIT",
    ];

    KEYS.contains(&k) || k.starts_with("RUNBOX_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("runbox").join(".runboxrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert(
        "EXECUTION_API_BASE".into(),
        "https://emkc.org/api/v2/piston".into(),
    );

    // Milliseconds; REQUEST_TIMEOUT_MS bounds the whole round trip.
    m.insert("REQUEST_TIMEOUT_MS".into(), "25000".into());
    m.insert("COMPILE_TIMEOUT_MS".into(), "10000".into());

    // -1 means the service-side default (no explicit limit).
    m.insert("RUN_MEMORY_LIMIT".into(), "-1".into());

    m
}
