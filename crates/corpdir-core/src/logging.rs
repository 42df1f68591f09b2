//! Structured logging conventions shared by every corpdir crate.
//!
//! `tracing` events name their fields inline, so the conventions live here as
//! documentation rather than constants.
//!
//! ## Fields
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `request_id` | Correlation id from `x-request-id` (UUIDv7 when generated) |
//! | `subsystem` | `"api"`, `"db"` or `"import"` |
//! | `component` | Part of a subsystem: `"pool"`, `"languages"`, `"catalog_store"`, `"query"`, `"commands"`, `"directory"` |
//! | `op` | Operation name: `"create_company"`, `"add_tags"`, `"delete_tag"`, `"search_names"`, ... |
//! | `company_id`, `tag_group_id` | Entity ids being operated on |
//! | `language` | Requested display language |
//! | `query` | Search text |
//! | `duration_ms` | Wall-clock duration in milliseconds |
//! | `result_count` | Rows returned by a search |
//! | `row_count` | Rows written or deleted |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed, requires operator attention |
//! | WARN  | Recoverable issue (skipped import row, rejected input) |
//! | INFO  | Lifecycle events (startup, shutdown), write completions |
//! | DEBUG | Decision points (fallback language picked, shared text stored once) |
//! | TRACE | Per-row iteration |
