//! Client constants
//!
//! Centralized location for defaults shared by the client, the host session
//! and the CLI.

// Endpoints
pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:8080/v1/graphql";
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9000";

// HTTP transport
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_HTTP_BASE_BACKOFF_MS: u64 = 200;

// Simulation polling
pub const DEFAULT_POLL_PERIOD_SECS: u64 = 5;

// Hasura headers
pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";
pub const ROLE_HEADER: &str = "x-hasura-role";

/// GraphQL error extension codes that mean the credentials were rejected.
pub const AUTH_ERROR_CODES: &[&str] =
    &["invalid-jwt", "jwt-invalid-claims", "invalid-headers", "access-denied"];
