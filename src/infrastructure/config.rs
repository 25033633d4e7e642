use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub upload: UploadConfig,
    pub chunking: ChunkingConfig,
    pub search: SearchConfig,
    pub documents_path: PathBuf,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub generation_model: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub retry_attempts: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub max_files: usize,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_chunk_len: usize,
    pub min_chunk_len: usize,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub similarity_threshold: f32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse_or("SERVER_PORT", 8000),
            },
            gemini: GeminiConfig {
                api_key: env_or("GOOGLE_API_KEY", ""),
                base_url: env_or(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com",
                ),
                generation_model: env_or("GEMINI_MODEL", "gemini-2.0-flash-exp"),
                embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-004"),
                embedding_dimension: env_parse_or("EMBEDDING_DIMENSION", 768),
                retry_attempts: 3,
                retry_base_delay: Duration::from_secs(1),
                retry_max_delay: Duration::from_secs(8),
            },
            upload: UploadConfig {
                max_file_size: env_parse_or("MAX_FILE_SIZE", 10 * 1024 * 1024),
                max_files: env_parse_or("MAX_FILES", 10),
                allowed_extensions: env_or("ALLOWED_EXTENSIONS", "pdf,txt")
                    .split(',')
                    .map(|ext| ext.trim().to_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect(),
            },
            chunking: ChunkingConfig {
                max_chunk_len: env_parse_or("CHUNK_SIZE", 4000),
                min_chunk_len: 10,
            },
            search: SearchConfig {
                default_limit: env_parse_or("SEARCH_LIMIT", 5),
                similarity_threshold: env_parse_or("SIMILARITY_THRESHOLD", 0.4),
            },
            documents_path: PathBuf::from(env_or("DOCUMENTS_PATH", "./data/documents")),
            allowed_origins: env_or("ALLOWED_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env();
        assert_eq!(config.chunking.max_chunk_len, 4000);
        assert_eq!(config.chunking.min_chunk_len, 10);
        assert_eq!(config.search.default_limit, 5);
        assert!((config.search.similarity_threshold - 0.4).abs() < 1e-6);
        assert_eq!(config.upload.max_files, 10);
        assert_eq!(
            config.upload.allowed_extensions,
            vec!["pdf".to_string(), "txt".to_string()]
        );
    }
}
