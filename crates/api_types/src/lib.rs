//! Wire types shared between the server and its clients.
//!
//! Monetary values travel as integer cents (`*_cents`) so no decimal
//! precision is lost in transit. List endpoints all share the same
//! `{ data, meta }` envelope.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Query-string fields arrive as strings; an empty one (`?from=`) means
/// "not provided", exactly like the parameter being absent.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

pub mod page {
    use super::*;

    /// Query-string pagination parameters. Both optional; the server applies
    /// per-entity defaults.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct PageQuery {
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub page: Option<i64>,
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub per: Option<i64>,
    }

    /// Pagination metadata over the entire filtered set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PageMeta {
        pub page: u64,
        pub per: u64,
        pub total_pages: u64,
        pub total_count: u64,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
    }

    /// Returned on login; the token goes into `Authorization: Bearer`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SessionResponse {
        pub token: String,
        pub user: UserView,
    }
}

pub mod budget {
    use super::*;
    use crate::page::PageMeta;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub name: String,
        pub financial_goal_cents: i64,
    }

    /// Partial update; absent fields keep their current value.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub name: Option<String>,
        pub financial_goal_cents: Option<i64>,
    }

    /// A budget with its derived totals. `remaining_cents` may be negative.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub name: String,
        pub financial_goal_cents: i64,
        pub spent_cents: i64,
        pub remaining_cents: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub data: Vec<BudgetView>,
        pub meta: PageMeta,
    }
}

pub mod category {
    use super::*;
    use crate::page::PageMeta;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub data: Vec<CategoryView>,
        pub meta: PageMeta,
    }
}

pub mod transaction {
    use super::*;
    use crate::page::PageMeta;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub description: String,
        pub amount_cents: i64,
        pub date: NaiveDate,
        pub category_id: Uuid,
    }

    /// Partial update; absent fields keep their current value.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub description: Option<String>,
        pub amount_cents: Option<i64>,
        pub date: Option<NaiveDate>,
        pub category_id: Option<Uuid>,
    }

    /// Query-string filters for listings. Every field is optional; a missing
    /// or blank field applies no restriction.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub page: Option<i64>,
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub per: Option<i64>,
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub from: Option<NaiveDate>,
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub to: Option<NaiveDate>,
        #[serde(default, deserialize_with = "crate::empty_string_as_none")]
        pub category_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub budget_id: Uuid,
        pub category_id: Uuid,
        pub description: String,
        pub amount_cents: i64,
        pub date: NaiveDate,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub data: Vec<TransactionView>,
        pub meta: PageMeta,
    }
}

/// Error envelope returned for non-2xx responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}
