// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "NumSlider";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "numslider";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".numslider";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "numslider.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "NUMSLIDER_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "NUMSLIDER_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "NUMSLIDER_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "NUMSLIDER_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "NUMSLIDER_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// JSON API route prefix
pub const API_PREFIX: &str = "/api/v1";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "NUMSLIDER_DATA_DIR";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "numslider.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Shop
// =============================================================================

/// Environment variable for products per listing page
pub const ENV_SHOP_PER_PAGE: &str = "NUMSLIDER_SHOP_PER_PAGE";

/// Default products per listing page
pub const DEFAULT_SHOP_PER_PAGE: u32 = 12;

/// Upper bound for products per listing page
pub const MAX_SHOP_PER_PAGE: u32 = 100;

/// Default path of the shop listing page
pub const DEFAULT_SHOP_BASE_PATH: &str = "/shop";

/// Query parameters that select a listing page; dropped from filter forms
pub const PAGINATION_PARAMS: &[&str] = &["page", "paged", "product-page"];

// =============================================================================
// Slider
// =============================================================================

/// Environment variable for the extrema tracking mode
pub const ENV_SLIDER_EXTREMA_TRACKING: &str = "NUMSLIDER_SLIDER_EXTREMA_TRACKING";

/// Environment variable for the bound key parsing mode
pub const ENV_SLIDER_KEY_PARSING: &str = "NUMSLIDER_SLIDER_KEY_PARSING";

/// Title given to a freshly created widget instance
pub const DEFAULT_WIDGET_TITLE: &str = "New title";

// =============================================================================
// Assets
// =============================================================================

/// Environment variable for the jQuery UI version served from the CDN
pub const ENV_JQUERY_UI_VERSION: &str = "NUMSLIDER_JQUERY_UI_VERSION";

/// Default jQuery UI version
pub const DEFAULT_JQUERY_UI_VERSION: &str = "1.13.2";

/// jQuery version loaded alongside jQuery UI
pub const JQUERY_VERSION: &str = "3.7.1";

/// CDN base for jQuery and jQuery UI assets
pub const JQUERY_CDN_BASE: &str = "https://code.jquery.com";

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for form and API requests (64 KB)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
