// * TabFlow
// * Captures web pages into structured records, optionally enriches them
// * with an LLM-generated description and tags, and persists them to a
// * Notion database.
//
// * Layering, outside-in:
// *   network  - resilient page fetching
// *   capture  - HTML metadata extraction, tag and URL editing primitives
// *   catalog  - provider model listing with offline defaults
// *   enrich   - prompt construction, provider calls, layered reply parsing
// *   notion   - database page writes
// *   session  - the capture-edit-save state machine and crash recovery
// *   config   - persisted settings and shared constants
// *   ops      - logging setup

pub mod capture;
pub mod catalog;
pub mod config;
pub mod enrich;
pub mod network;
pub mod notion;
pub mod ops;
pub mod session;
