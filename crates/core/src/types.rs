//! Scalar aliases shared by models, repositories and report records.

/// `BIGSERIAL` primary and foreign keys.
pub type DbId = i64;

/// `TIMESTAMPTZ` columns, always read back in UTC. Display in the report
/// zone happens only in the projector.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
