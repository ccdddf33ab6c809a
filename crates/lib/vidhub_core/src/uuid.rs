// Identity ids are generated app-side as UUIDv7 so that rows sort by creation
// time in both stores. Token ids (`jti`) only need to be unique and use v4.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable) identity id.
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a random token id.
pub fn token_id() -> Uuid {
    Uuid::new_v4()
}
