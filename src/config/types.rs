use serde::Deserialize;

/// Main configuration structure for Tankobon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub mangaplus: MangaPlusConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent with HTML and web-API requests
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Entity cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether results are cached at all
    pub enabled: bool,

    /// Path to the SQLite cache database
    pub path: String,

    /// Persist generic HTML providers too, instead of keeping them in memory
    #[serde(rename = "persist-generic")]
    pub persist_generic: bool,

    /// Entries older than this are treated as misses
    #[serde(rename = "ttl-hours")]
    pub ttl_hours: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "tankobon-cache.db".to_string(),
            persist_generic: false,
            ttl_hours: None,
        }
    }
}

/// Page downloader configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// Download all pages of a chapter concurrently
    #[serde(rename = "async")]
    pub concurrent: bool,

    /// Upper bound on in-flight page downloads when concurrent
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            concurrent: true,
            max_concurrent: 8,
        }
    }
}

/// MangaPlus API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MangaPlusConfig {
    /// Use the authenticated app API instead of the web API
    #[serde(rename = "use-app-api")]
    pub use_app_api: bool,

    /// App API secret; registered and persisted automatically when empty
    pub secret: String,

    pub os: String,

    #[serde(rename = "os-ver")]
    pub os_ver: String,

    #[serde(rename = "app-ver")]
    pub app_ver: String,
}

impl Default for MangaPlusConfig {
    fn default() -> Self {
        Self {
            use_app_api: false,
            secret: String::new(),
            os: "android".to_string(),
            os_ver: "30".to_string(),
            app_ver: "150".to_string(),
        }
    }
}
