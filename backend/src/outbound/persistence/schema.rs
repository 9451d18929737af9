//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations`. Audit columns with
//! database defaults (`created_at`) are omitted because no query reads them.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        id -> Int8,
        email -> Varchar,
        full_name -> Varchar,
        password -> Text,
        phone -> Nullable<Varchar>,
        favorite_genres -> Array<Text>,
    }
}

diesel::table! {
    /// Store catalogue.
    games (id) {
        id -> Int8,
        title -> Varchar,
        genre -> Varchar,
        price -> Float8,
        description -> Nullable<Varchar>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, games);
