//! Batched iteration over a query.
//!
//! A [`BatchQuery`] never executes anything; it describes how a base
//! `SELECT` is cut into `LIMIT`/`OFFSET` pages so the caller can fetch
//! results a page at a time (`batch`) or a row at a time (`each`).

use crate::config::ParamsConfig;
use sea_query::SelectStatement;

/// Page size used when a batch size of zero is requested
pub const DEFAULT_BATCH_SIZE: u64 = 100;

#[derive(Debug, Clone)]
pub struct BatchQuery {
    query: SelectStatement,
    batch_size: u64,
    each: bool,
}

impl BatchQuery {
    /// Wrap a query; a `batch_size` of zero falls back to [`DEFAULT_BATCH_SIZE`]
    pub fn new(query: SelectStatement, batch_size: u64, each: bool) -> Self {
        Self::with_default(query, batch_size, each, DEFAULT_BATCH_SIZE)
    }

    /// Like [`BatchQuery::new`], but zero falls back to the configured size
    pub fn from_config(
        query: SelectStatement,
        batch_size: u64,
        each: bool,
        config: &ParamsConfig,
    ) -> Self {
        Self::with_default(query, batch_size, each, config.default_batch_size)
    }

    fn with_default(query: SelectStatement, batch_size: u64, each: bool, default: u64) -> Self {
        let batch_size = match (batch_size, default) {
            (0, 0) => DEFAULT_BATCH_SIZE,
            (0, default) => default,
            (size, _) => size,
        };
        log::trace!("Batch query with size {batch_size} (each: {each})");
        Self {
            query,
            batch_size,
            each,
        }
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Whether results are meant to be yielded one row at a time
    pub fn is_each(&self) -> bool {
        self.each
    }

    pub fn query(&self) -> &SelectStatement {
        &self.query
    }

    /// The statement for the zero-based page `index`
    pub fn page(&self, index: u64) -> SelectStatement {
        let mut page = self.query.clone();
        page.limit(self.batch_size)
            .offset(index.saturating_mul(self.batch_size));
        page
    }

    /// Every page needed to cover `total_rows` rows
    pub fn pages(&self, total_rows: u64) -> impl Iterator<Item = SelectStatement> + '_ {
        let count = total_rows.div_ceil(self.batch_size);
        (0..count).map(move |index| self.page(index))
    }
}

/// Fetch results in pages of `batch_size`
pub fn batch(query: SelectStatement, batch_size: u64) -> BatchQuery {
    BatchQuery::new(query, batch_size, false)
}

/// Fetch results in pages of `batch_size`, yielding one row at a time
pub fn each(query: SelectStatement, batch_size: u64) -> BatchQuery {
    BatchQuery::new(query, batch_size, true)
}
