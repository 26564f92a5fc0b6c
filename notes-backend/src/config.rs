use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTES_HOST";
    pub const PORT: &str = "PORT";
    /// Path of the JSON file holding the note collection.
    pub const NOTES_FILE: &str = "NOTES_FILE";
    /// Directory served for `/UploadForm.html`.
    pub const STATIC_DIR: &str = "NOTES_STATIC_DIR";
    /// Upper bound for form, multipart text field and PUT bodies.
    pub const MAX_BODY_BYTES: &str = "NOTES_MAX_BODY_BYTES";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8000;
    pub const NOTES_FILE: &str = "notes.json";
    pub const STATIC_DIR: &str = "static";
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
}

/// Returns the absolute path to the notes-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so default paths resolve
/// the same regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub notes_file: PathBuf,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            notes_file: backend_dir().join(defaults::NOTES_FILE),
            static_dir: backend_dir().join(defaults::STATIC_DIR),
            max_body_bytes: defaults::MAX_BODY_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup(env_vars::HOST).unwrap_or(defaults.host),
            port: parse_or_default(env_vars::PORT, lookup(env_vars::PORT), defaults.port),
            notes_file: lookup(env_vars::NOTES_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.notes_file),
            static_dir: lookup(env_vars::STATIC_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            max_body_bytes: parse_or_default(
                env_vars::MAX_BODY_BYTES,
                lookup(env_vars::MAX_BODY_BYTES),
                defaults.max_body_bytes,
            ),
        }
    }

    /// Path of the uploader page served at `/UploadForm.html`
    pub fn upload_form_path(&self) -> PathBuf {
        self.static_dir.join("UploadForm.html")
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                log::warn!("Invalid {} value '{}', using default {}", key, value, default);
                default
            }
        },
        None => default,
    }
}
