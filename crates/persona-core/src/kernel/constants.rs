/// Application name
pub const APP_NAME: &str = "PersonaBar";

/// Application version
pub const APP_VERSION: &str = "0.1.0";

/// Current feature API version
pub const API_VERSION: &str = "0.1.0";

/// Environment variable overriding the storage root
pub const HOME_ENV_VAR: &str = "PERSONABAR_HOME";

/// Storage root directory name, relative to the working directory
pub const CONFIG_DIR_NAME: &str = ".personabar";

/// Application configuration file name (without extension)
pub const APP_CONFIG_NAME: &str = "personabar";

/// Default registry snapshot file, relative to the data directory
pub const DEFAULT_REGISTRY_FILE: &str = "registry.json";

/// Default product SKU reported by the host
pub const DEFAULT_SKU: &str = "DNN";

/// Default service base URL
pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost/API";

/// Default module root for PersonaBar service routes
pub const DEFAULT_MODULE_ROOT: &str = "PersonaBar";

/// Default service request timeout in seconds
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

/// Role name of host (super) users
pub const HOST_ROLE_NAME: &str = "Host";

/// User id recorded for registry writes performed by the system itself
pub const SYSTEM_USER_ID: i32 = -1;
