//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users. `username` is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        password_hash -> Varchar,
        /// One of the eight type labels, e.g. `AB+`.
        blood_type -> Varchar,
        location -> Varchar,
        /// `donor` or `recipient`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blood banks with one non-negative counter per blood type.
    blood_banks (id) {
        id -> Uuid,
        name -> Varchar,
        location -> Varchar,
        o_negative -> Int4,
        o_positive -> Int4,
        a_negative -> Int4,
        a_positive -> Int4,
        b_negative -> Int4,
        b_positive -> Int4,
        ab_negative -> Int4,
        ab_positive -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Donation posts.
    blood_posts (id) {
        id -> Uuid,
        user_id -> Uuid,
        blood_bank_id -> Uuid,
        content -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blood requests and whether they were fulfilled.
    blood_requests (id) {
        id -> Uuid,
        user_id -> Uuid,
        blood_bank_id -> Uuid,
        blood_type_needed -> Varchar,
        location_needed -> Varchar,
        fulfilled -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(blood_posts -> users (user_id));
diesel::joinable!(blood_posts -> blood_banks (blood_bank_id));
diesel::joinable!(blood_requests -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(blood_banks, blood_posts, blood_requests, users);
