//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! `diesel print-schema` regenerates them from a live database.

diesel::table! {
    /// Registered accounts and their onboarding workflow fields.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Stored trimmed and lower-cased; unique.
        email -> Varchar,
        phone -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        /// `user` or `admin`.
        role -> Varchar,
        training_progress -> Int4,
        videos_watched -> Array<Int4>,
        quiz_passed -> Bool,
        meeting_scheduled -> Bool,
        dashboard_access -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Client leads referred by hunters.
    leads (id) {
        id -> Uuid,
        hunter_id -> Uuid,
        client_name -> Varchar,
        company_name -> Nullable<Varchar>,
        email -> Varchar,
        phone -> Varchar,
        alternate_phone -> Nullable<Varchar>,
        address -> Nullable<Varchar>,
        business_type -> Varchar,
        project_requirements -> Text,
        budget -> Varchar,
        additional_notes -> Nullable<Text>,
        /// One of `pending`, `contacted`, `in_progress`, `completed`, `rejected`.
        status -> Varchar,
        commission_rate -> Float8,
        project_value -> Float8,
        commission_earned -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(leads -> users (hunter_id));
diesel::allow_tables_to_appear_in_same_query!(leads, users);
