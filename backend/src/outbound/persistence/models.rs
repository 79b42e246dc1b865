//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Conversions to domain types live with the
//! repositories that use them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{blood_banks, blood_posts, blood_requests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub blood_type: String,
    pub location: String,
    pub role: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub blood_type: &'a str,
    pub location: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the blood_banks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blood_banks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BloodBankRow {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub o_negative: i32,
    pub o_positive: i32,
    pub a_negative: i32,
    pub a_positive: i32,
    pub b_negative: i32,
    pub b_positive: i32,
    pub ab_negative: i32,
    pub ab_positive: i32,
}

impl BloodBankRow {
    /// Counters in canonical blood type order.
    pub fn counters(&self) -> [i32; 8] {
        [
            self.o_negative,
            self.o_positive,
            self.a_negative,
            self.a_positive,
            self.b_negative,
            self.b_positive,
            self.ab_negative,
            self.ab_positive,
        ]
    }
}

/// Insertable struct for seeding banks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blood_banks)]
pub(crate) struct NewBloodBankRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub location: &'a str,
}

/// Changeset writing all eight counters back after a ledger mutation.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = blood_banks)]
pub(crate) struct InventoryUpdate {
    pub o_negative: i32,
    pub o_positive: i32,
    pub a_negative: i32,
    pub a_positive: i32,
    pub b_negative: i32,
    pub b_positive: i32,
    pub ab_negative: i32,
    pub ab_positive: i32,
    pub updated_at: DateTime<Utc>,
}

impl InventoryUpdate {
    pub fn from_counters(counters: [i32; 8], updated_at: DateTime<Utc>) -> Self {
        let [
            o_negative,
            o_positive,
            a_negative,
            a_positive,
            b_negative,
            b_positive,
            ab_negative,
            ab_positive,
        ] = counters;
        Self {
            o_negative,
            o_positive,
            a_negative,
            a_positive,
            b_negative,
            b_positive,
            ab_negative,
            ab_positive,
            updated_at,
        }
    }
}

/// Row struct for the blood_posts table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = blood_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BloodPostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blood_bank_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the blood_requests table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = blood_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BloodRequestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blood_bank_id: Uuid,
    pub blood_type_needed: String,
    pub location_needed: String,
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}
