use crate::cache::SecretStore;
use crate::config::MangaPlusConfig;
use md5::{Digest, Md5};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const WEB_API_URL: &str = "https://jumpg-webapi.tokyo-cdn.com/api";

pub const APP_API_URL: &str = "https://jumpg-api.tokyo-cdn.com/api";

/// User agent the app API expects
pub const APP_USER_AGENT: &str = "okhttp/4.9.0";

/// Name of the app secret in the secret store
pub const SECRET_NAME: &str = "mangaplus_app_secret";

const SECURITY_SALT: &str = "4Kin9vGg";

/// Which MangaPlus API the provider talks to
pub enum ApiSurface {
    /// Anonymous web API
    Web { base_url: String },

    /// Authenticated app API
    App(AppApi),
}

impl ApiSurface {
    pub fn from_config(
        config: &MangaPlusConfig,
        secrets: Arc<dyn SecretStore>,
        web_url: &str,
        app_url: &str,
    ) -> Self {
        if config.use_app_api {
            Self::App(AppApi::new(config, secrets, app_url))
        } else {
            Self::Web {
                base_url: web_url.trim_end_matches('/').to_string(),
            }
        }
    }

    /// Short name used in cache namespaces
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Web { .. } => "web",
            Self::App(_) => "app",
        }
    }
}

impl fmt::Debug for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web { base_url } => f.debug_struct("Web").field("base_url", base_url).finish(),
            Self::App(app) => f.debug_tuple("App").field(app).finish(),
        }
    }
}

/// App API client identity and its lazily registered secret
pub struct AppApi {
    pub base_url: String,
    pub os: String,
    pub os_ver: String,
    pub app_ver: String,
    pub(super) secret: Mutex<Option<String>>,
    pub(super) secrets: Arc<dyn SecretStore>,
}

impl AppApi {
    pub fn new(config: &MangaPlusConfig, secrets: Arc<dyn SecretStore>, base_url: &str) -> Self {
        let secret = Some(config.secret.trim())
            .filter(|secret| !secret.is_empty())
            .map(str::to_string);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            os: config.os.clone(),
            os_ver: config.os_ver.clone(),
            app_ver: config.app_ver.clone(),
            secret: Mutex::new(secret),
            secrets,
        }
    }

    /// Query parameters identifying the client on every app request
    pub fn identity(&self) -> [(&'static str, &str); 3] {
        [
            ("os", self.os.as_str()),
            ("os_ver", self.os_ver.as_str()),
            ("app_ver", self.app_ver.as_str()),
        ]
    }
}

impl fmt::Debug for AppApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppApi")
            .field("base_url", &self.base_url)
            .field("os", &self.os)
            .field("os_ver", &self.os_ver)
            .field("app_ver", &self.app_ver)
            .finish_non_exhaustive()
    }
}

/// Device credentials sent when registering for an app secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistration {
    pub device_token: String,
    pub security_key: String,
}

impl DeviceRegistration {
    /// Derives credentials for a fresh random device
    pub fn generate() -> Self {
        let mut android_id = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut android_id);
        Self::for_android_id(&hex::encode(android_id))
    }

    /// Derives credentials for a known device ID
    pub fn for_android_id(android_id: &str) -> Self {
        let device_token = hex::encode(Md5::digest(android_id.as_bytes()));
        let security_key = hex::encode(Md5::digest(
            format!("{}{}", device_token, SECURITY_SALT).as_bytes(),
        ));

        Self {
            device_token,
            security_key,
        }
    }
}
