/// Redis integration
///
/// Redis holds the session records. Keys are written with `SET .. EX` so
/// expiry is enforced by Redis itself; nothing in the service sweeps them.
///
/// ```text
/// api-session:{sha256(token)}  ->  {"session_id": ..., "user_id": 1, "created_at": ...}
///                                   TTL = session expire seconds
/// ```

pub mod client;

pub use client::{RedisClient, RedisClientError, RedisConfig};
