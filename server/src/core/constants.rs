// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Marquee";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "marquee";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "marquee.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "MARQUEE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "MARQUEE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "MARQUEE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "MARQUEE_LOG";

// =============================================================================
// Environment Variables - Dataset
// =============================================================================

/// Environment variable for the dataset directory
pub const ENV_DATA_DIR: &str = "MARQUEE_DATA_DIR";

/// Environment variable for the snapshot reload interval (seconds)
pub const ENV_RELOAD_SECS: &str = "MARQUEE_RELOAD_SECS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5460;

// =============================================================================
// Dataset Defaults
// =============================================================================

/// Default dataset directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default snapshot staleness window in seconds (0 disables reloads)
pub const DEFAULT_RELOAD_SECS: u64 = 300;

// =============================================================================
// Source Relations
// =============================================================================

/// Tickets relation file name
pub const TICKETS_FILE: &str = "tickets.csv";

/// Movies relation file name
pub const MOVIES_FILE: &str = "movies.csv";

/// Theaters relation file name
pub const THEATERS_FILE: &str = "theaters.csv";

/// Shows relation file name
pub const SHOWS_FILE: &str = "shows.csv";

/// Customers relation file name
pub const CUSTOMERS_FILE: &str = "customers.csv";

// =============================================================================
// Query Defaults
// =============================================================================

/// Default row cap for /filter/data when the caller does not pass `limit`.
/// Explicit and overridable; `limit=0` removes the cap entirely.
pub const DEFAULT_FILTER_LIMIT: usize = 100;

/// Default group count for the top-N aggregation endpoints
pub const DEFAULT_TOP_LIMIT: usize = 5;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
