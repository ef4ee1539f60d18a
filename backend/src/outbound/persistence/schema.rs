//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts.
    ///
    /// `username` and `email` carry unique indexes; those indexes, not the
    /// application-level pre-checks, are the authority on uniqueness.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 80 characters).
        username -> Varchar,
        /// Unique contact email (max 254 characters).
        email -> Varchar,
        /// Contact phone number (max 32 characters).
        phone_number -> Varchar,
        /// Salted password hash in PHC string form.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Archived contact-form submissions; written once, never read back.
    contact_messages (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Sender's name (max 220 characters).
        contact_name -> Varchar,
        /// Sender's email (max 220 characters).
        contact_email -> Varchar,
        /// Sender's phone number (max 220 characters).
        contact_phone_number -> Varchar,
        /// Free-text inquiry body (max 220 characters).
        contact_message -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
