// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Sieve";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "sieve";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "sieve.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SIEVE_CONFIG";

// =============================================================================
// Environment Variables - Logging
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SIEVE_LOG";

// =============================================================================
// Environment Variables - Compilation
// =============================================================================

/// Environment variable for the target SQL dialect
pub const ENV_DIALECT: &str = "SIEVE_DIALECT";

/// Environment variable for the generated parameter name prefix
pub const ENV_PARAM_PREFIX: &str = "SIEVE_PARAM_PREFIX";

/// Environment variable for the schema catalog file
pub const ENV_SCHEMA: &str = "SIEVE_SCHEMA";

// =============================================================================
// Input
// =============================================================================

/// Read from stdin when passed as the request path
pub const STDIN_PATH: &str = "-";
