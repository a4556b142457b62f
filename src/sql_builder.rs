//! SQL builder with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use congress_trades_sdk::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("trades")
//!     .where_eq("ticker", "NVDA")
//!     .where_gte("trade_date", "2024-01-01")
//!     .order_by(&["trade_date DESC"])
//!     .limit(10)
//!     .build();
//! ```

/// Escape LIKE wildcards (`%`, `_`) and the escape character itself.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Builds parameterized SQL queries safely.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    is_distinct: bool,
    from_table: String,
    joins: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table (an alias may follow,
    /// e.g. `"trades t"`).
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            is_distinct: false,
            from_table: table.to_string(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.is_distinct = true;
        self
    }

    /// Add a full JOIN clause, e.g. `"LEFT JOIN members m ON t.member_id = m.id"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// Add a case-insensitive equality condition.
    ///
    /// Generates: `LOWER({column}) = LOWER(?)`
    pub fn where_ieq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("LOWER({}) = LOWER(?)", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a case-insensitive substring match against any of `columns`.
    ///
    /// `%`, `_` and `\` in `term` match literally.
    pub fn where_contains_any(&mut self, columns: &[&str], term: &str) -> &mut Self {
        let pattern = format!("%{}%", escape_like(term));
        let conditions: Vec<String> = columns
            .iter()
            .map(|c| format!("LOWER({}) LIKE LOWER(?) ESCAPE '\\'", c))
            .collect();
        let pairs: Vec<(&str, &str)> = conditions
            .iter()
            .map(|c| (c.as_str(), pattern.as_str()))
            .collect();
        self.where_or(&pairs)
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a greater-than-or-equal condition: `{column} >= ?`.
    pub fn where_gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} >= ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add `{column} IS NOT NULL`.
    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.where_clauses.push(format!("{} IS NOT NULL", column));
        self
    }

    /// Add OR-combined conditions.
    ///
    /// Each condition is a `(sql_fragment, param_value)` tuple where the fragment
    /// uses `?` as a placeholder.
    pub fn where_or(&mut self, conditions: &[(&str, &str)]) -> &mut Self {
        if conditions.is_empty() {
            return self;
        }
        let mut or_parts = Vec::with_capacity(conditions.len());
        for (cond, param) in conditions {
            or_parts.push(cond.to_string());
            self.params.push(param.to_string());
        }
        self.where_clauses
            .push(format!("({})", or_parts.join(" OR ")));
        self
    }

    /// Add ORDER BY clauses (e.g. `"ticker ASC"`).
    pub fn order_by<S: AsRef<str>>(&mut self, clauses: &[S]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.as_ref().to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let distinct = if self.is_distinct { "DISTINCT " } else { "" };
        let mut parts = vec![
            format!("SELECT {}{}", distinct, self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        parts.extend(self.joins.iter().cloned());

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}
