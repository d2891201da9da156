// src/db/pagination.rs
// DOCUMENTATION: Paginated search shared by every entity table
// PURPOSE: Assemble windowed, sorted, searched and filtered SELECTs
//
// Column and direction names are never taken from the request: they are
// looked up in each table's static allow-lists. Every value (search term,
// filter values, limit, offset) is a bound parameter.

use crate::errors::DbError;
use crate::models::Page;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// Static description of a searchable table
#[derive(Debug)]
pub struct TableDef {
    pub table: &'static str,
    /// Comma-separated SELECT list
    pub columns: &'static str,
    pub sortable: &'static [&'static str],
    /// Used when sort_by is absent or not in `sortable`
    pub default_sort: &'static str,
    /// Text columns OR'd together for substring search
    pub searchable: &'static [&'static str],
    /// Columns accepting exact-match-in-set filters
    pub filterable: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive "asc"/"desc"; anything else is ascending
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One paginated-search request, already clamped by the handler
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub sort_by: Option<String>,
    pub direction: SortDirection,
    pub search: Option<String>,
    /// (column, accepted values); empty value lists are ignored
    pub filters: Vec<(&'static str, Vec<String>)>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            sort_by: None,
            direction: SortDirection::Asc,
            search: None,
            filters: Vec::new(),
        }
    }

    /// Saturates instead of overflowing on huge page/limit values
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl TableDef {
    /// Resolve the requested sort column against the allow-list
    pub fn sort_column(&self, requested: Option<&str>) -> &'static str {
        requested
            .map(str::trim)
            .and_then(|r| self.sortable.iter().copied().find(|c| *c == r))
            .unwrap_or(self.default_sort)
    }

    /// SELECT for one page of rows
    pub fn page_query(&self, req: &PageRequest) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", self.columns, self.table));
        self.push_where(&mut qb, req);

        let sort = self.sort_column(req.sort_by.as_deref());
        qb.push(format!(" ORDER BY {} {}", sort, req.direction.as_sql()));
        if sort != "id" {
            // Stable windows when the sort column has duplicates
            qb.push(", id ASC");
        }

        qb.push(" LIMIT ");
        qb.push_bind(req.limit);
        qb.push(" OFFSET ");
        qb.push_bind(req.offset());
        qb
    }

    /// COUNT over the same filters, ignoring the window
    pub fn count_query(&self, req: &PageRequest) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.table));
        self.push_where(&mut qb, req);
        qb
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>, req: &PageRequest) {
        let mut first = true;
        let mut next_clause = |qb: &mut QueryBuilder<'static, Postgres>| {
            qb.push(if first { " WHERE " } else { " AND " });
            first = false;
        };

        if let Some(term) = req.search_term() {
            if !self.searchable.is_empty() {
                let pattern = format!("%{}%", escape_like(term));
                next_clause(qb);
                qb.push("(");
                for (i, column) in self.searchable.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(format!("{} ILIKE ", column));
                    qb.push_bind(pattern.clone());
                }
                qb.push(")");
            }
        }

        for (column, values) in &req.filters {
            if values.is_empty() || !self.filterable.contains(column) {
                continue;
            }
            next_clause(qb);
            qb.push(format!("{}::text = ANY(", column));
            qb.push_bind(values.clone());
            qb.push(")");
        }
    }
}

/// Escape LIKE metacharacters so the term matches literally
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Run the page and count queries for one table
pub async fn fetch_page<T>(
    pool: &PgPool,
    def: &TableDef,
    req: &PageRequest,
) -> Result<Page<T>, DbError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut page_query = def.page_query(req);
    let rows = page_query
        .build_query_as::<T>()
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Page query on {} failed: {}", def.table, e);
            DbError::from(e)
        })?;

    let mut count_query = def.count_query(req);
    let (total,): (i64,) = count_query
        .build_query_as()
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Count query on {} failed: {}", def.table, e);
            DbError::from(e)
        })?;

    log::debug!(
        "{}: page {} ({} rows of {} total)",
        def.table,
        req.page,
        rows.len(),
        total
    );

    Ok(Page {
        data: rows,
        page: req.page,
        limit: req.limit,
        total,
    })
}
