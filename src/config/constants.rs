// * Configuration Constants
// * Central location for all configurable thresholds, limits, and timeouts

// * Page fetch timeout in milliseconds
pub const PAGE_FETCH_TIMEOUT_MS: u64 = 30_000;

// * Capture retry policy: initial attempt plus this many retries, fixed backoff
pub const FETCH_MAX_RETRIES: usize = 3;
pub const FETCH_RETRY_DELAY_MS: u64 = 500;

// * Character budget for extracted body content (bounds enrichment payloads)
pub const CONTENT_CHAR_BUDGET: usize = 5_000;

// * Marker appended when content is cut at the budget
pub const CONTENT_ELLIPSIS: &str = "...";

// * Notion multi-select limits
pub const MAX_TAGS_PER_WRITE: usize = 10;
pub const MAX_TAG_LENGTH: usize = 100;

// * Placeholder persisted when a record has no description
pub const DESCRIPTION_PLACEHOLDER: &str = "No description";

// * Fixed Notion API version header value
pub const NOTION_VERSION: &str = "2022-06-28";

// * Generation parameters for enrichment requests
pub const ENRICH_TEMPERATURE: f32 = 0.7;
pub const ENRICH_MAX_TOKENS: u32 = 1_000;

// * Page size for the Gemini list-models endpoint
pub const MODEL_LIST_PAGE_SIZE: usize = 50;

// * Advisory recovery snapshot TTLs
pub const IN_PROGRESS_TTL_SECS: i64 = 60 * 60;
pub const LAST_RESULT_TTL_SECS: i64 = 24 * 60 * 60;
