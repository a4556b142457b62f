//! Member queries against the cached `members` table.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::Member;
use crate::sql_builder::SqlBuilder;

/// Query interface for members of Congress.
pub struct MemberQuery<'a> {
    conn: &'a Connection,
}

impl<'a> MemberQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All members ordered by name, optionally limited to one chamber
    /// (case-insensitive).
    pub fn list(&self, chamber: Option<&str>) -> Result<Vec<Member>> {
        self.conn.ensure_tables(&["members"])?;

        let mut qb = SqlBuilder::new("members");
        qb.order_by(&["name ASC"]);
        if let Some(c) = chamber {
            qb.where_ieq("chamber", c);
        }

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    pub fn get(&self, id: &str) -> Result<Option<Member>> {
        self.conn.ensure_tables(&["members"])?;

        let (sql, params) = SqlBuilder::new("members")
            .where_eq("id", id)
            .limit(1)
            .build();
        let members: Vec<Member> = self.conn.execute_into(&sql, &params)?;
        Ok(members.into_iter().next())
    }

    pub fn count(&self) -> Result<i64> {
        self.conn.ensure_tables(&["members"])?;

        let (sql, params) = SqlBuilder::new("members")
            .select(&["COUNT(*) AS cnt"])
            .build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }
}
