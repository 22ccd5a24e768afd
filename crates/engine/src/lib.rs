//! Ledger engine: ownership-scoped queries, filtering, pagination and
//! on-read aggregation for budgets, categories and transactions.
//!
//! Every operation takes an explicit [`Scope`] built from the authenticated
//! principal; nothing can be read or mutated without one.

pub use budgets::{Budget, BudgetPatch, BudgetSummary};
pub use categories::Category;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, Scope, TransactionFilter};
pub use pages::{
    DEFAULT_PER_BUDGETS, DEFAULT_PER_CATEGORIES, DEFAULT_PER_TRANSACTIONS, Page, PageMeta,
    PageRequest,
};
pub use transactions::{Transaction, TransactionDraft, TransactionPatch};

pub mod budgets;
pub mod categories;
mod error;
mod money;
mod ops;
mod pages;
pub mod transactions;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
