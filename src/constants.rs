//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

/// Default SQLite database URL. Overridden by `DATABASE_URL`.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:alpiplan.db";

// --- Outbound HTTP ---

/// Timeout (seconds) for every outbound HTTP call (trekking API, enrichment
/// fetches). Bounds request latency; there are no retries.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default base URL of the external trekking API.
pub const DEFAULT_TREKKING_API_URL: &str = "https://hiking-trails-api.example.com/api/v1";
/// Default region used for trail imports when the request omits one.
pub const DEFAULT_IMPORT_REGION: &str = "trentino-alto-adige";
/// Default number of trails fetched per import request.
pub const DEFAULT_IMPORT_LIMIT: usize = 25;
/// Number of successful inserts between incremental commits during a bulk
/// trail import. Bounds transaction size; a malformed record is skipped, not
/// fatal to the batch.
pub const IMPORT_COMMIT_BATCH: usize = 10;
/// Number of points (before closing the loop) in a simulated circular path
/// for imported trails that arrive without geometry.
pub const SIMULATED_PATH_POINTS: usize = 8;
/// Approximate radius (km) of a simulated circular path.
pub const SIMULATED_PATH_RADIUS_KM: f64 = 1.0;

// --- Recommendation engine ---

/// Cap applied to each recommendation list produced by the aggregator.
pub const RECOMMENDATION_LIMIT: usize = 5;
/// Default cap for the standalone difficulty-filtered trail listing.
pub const DIFFICULTY_QUERY_LIMIT: usize = 10;
/// Half-width of the difficulty band: a request for level d matches trails
/// with `difficulty_rating` in [d - 0.5, d + 0.5].
pub const DIFFICULTY_BAND_HALF_WIDTH: f64 = 0.5;
/// Default radius (km) for the nearby-trail ranker.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;
/// Upper difficulty bound for the family-friendly fallback pass.
pub const FAMILY_FRIENDLY_MAX_DIFFICULTY: f64 = 2.5;
/// Keywords whose presence in a trail name or description marks it as
/// family-friendly (first pass of the family filter).
pub const FAMILY_KEYWORDS: [&str; 5] = ["family", "kid", "child", "easy", "beginner"];

// --- Trail enrichment ---

/// Descriptions shorter than this are considered missing and eligible for
/// enrichment.
pub const MIN_DESCRIPTION_LENGTH: usize = 50;
/// Extracted descriptions are assembled from scored sentences up to roughly
/// this many characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 600;
/// Length of the raw-text prefix used when no sentence scores well enough.
pub const FALLBACK_DESCRIPTION_LENGTH: usize = 500;
/// Keywords used to score candidate sentences during description extraction.
pub const ENRICHMENT_KEYWORDS: [&str; 16] = [
    "hiking",
    "trail",
    "path",
    "route",
    "trek",
    "mountain",
    "hike",
    "difficulty",
    "scenic",
    "panoramic",
    "family",
    "children",
    "distance",
    "elevation",
    "duration",
    "alpine",
];
/// Default number of trails processed per enrichment batch.
pub const DEFAULT_ENRICHMENT_BATCH: usize = 5;

// --- Sync history ---

/// Default path of the append-only sync history log.
pub const DEFAULT_SYNC_HISTORY_PATH: &str = "sync_history.json";
/// Maximum number of entries kept in the sync history log (most recent first).
pub const SYNC_HISTORY_CAP: usize = 50;
