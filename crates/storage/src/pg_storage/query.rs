//! SQL for the server-side search: predicate, ordering and pagination over
//! the JSONB document column.

use student_records_core::{SortField, SortOrder, StudentQuery};

use super::{escape_like, usize_to_i64};

/// A positional bind parameter, in `$n` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(String),
    Int(i32),
    BigInt(i64),
}

/// SQL text plus its binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindQuery {
    pub sql: String,
    pub binds: Vec<Bind>,
}

const TEXT_COLUMNS: [&str; 3] = ["doc->>'name'", "doc->>'email'", "doc->>'address'"];

/// Sort key for `field`; absent or non-numeric values evaluate to NULL.
#[must_use]
pub const fn sort_expr(field: SortField) -> &'static str {
    match field {
        SortField::Name => "doc->>'name'",
        SortField::Email => "doc->>'email'",
        SortField::Address => "doc->>'address'",
        SortField::Age => {
            "CASE WHEN jsonb_typeof(doc->'age') = 'number' THEN (doc->>'age')::numeric END"
        },
        SortField::CreatedAt => "student_instant(doc->'createdAt')",
    }
}

/// Text keys order by `lower()` then the raw value; unlike the in-memory
/// comparator, accents are not folded.
fn order_clause(field: SortField, order: SortOrder) -> String {
    let dir = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    let expr = sort_expr(field);
    match field {
        SortField::Name | SortField::Email | SortField::Address => {
            format!("lower({expr}) {dir} NULLS LAST, {expr} {dir} NULLS LAST, id ASC")
        },
        SortField::Age | SortField::CreatedAt => format!("{expr} {dir} NULLS LAST, id ASC"),
    }
}

/// Builds `SELECT id, doc FROM students ... ORDER BY ... LIMIT .. OFFSET ..`.
///
/// The term is matched with `ILIKE` against the text fields (LIKE wildcards
/// in the term are escaped) and, when it is an integral number, by equality
/// against `age`.
#[must_use]
pub fn build_find_query(query: &StudentQuery) -> FindQuery {
    let mut binds = Vec::new();
    let mut param_idx: usize = 1;
    let mut where_clause = String::new();

    if let Some(term) = query.filter.term() {
        let pattern_idx = param_idx;
        param_idx += 1;
        binds.push(Bind::Text(format!("%{}%", escape_like(term))));

        let mut conditions: Vec<String> =
            TEXT_COLUMNS.iter().map(|col| format!("{col} ILIKE ${pattern_idx}")).collect();
        if let Some(age) = query.filter.age_equals() {
            conditions.push(format!("doc->'age' = to_jsonb(${param_idx}::int)"));
            param_idx += 1;
            binds.push(Bind::Int(age));
        }
        where_clause = format!(" WHERE ({})", conditions.join(" OR "));
    }

    let order = order_clause(query.sort.field, query.sort.order);
    let limit_idx = param_idx;
    let offset_idx = param_idx + 1;
    binds.push(Bind::BigInt(usize_to_i64(query.page.limit)));
    binds.push(Bind::BigInt(usize_to_i64(query.page.offset)));

    let sql = format!(
        "SELECT id, doc FROM students{where_clause} ORDER BY {order} LIMIT ${limit_idx} OFFSET ${offset_idx}"
    );
    FindQuery { sql, binds }
}

#[cfg(test)]
mod tests {
    use student_records_core::{QueryLimits, SearchRequest};

    use super::*;

    fn compile(term: Option<&str>, sort_by: SortField, sort_order: SortOrder) -> FindQuery {
        let request = SearchRequest {
            search_term: term.map(str::to_owned),
            sort_by,
            sort_order,
            limit: Some(10),
            offset: Some(20),
        };
        build_find_query(&StudentQuery::from_request(&request, QueryLimits::default()))
    }

    #[test]
    fn no_term_has_no_where_clause() {
        let q = compile(Some("   "), SortField::Name, SortOrder::Asc);
        assert!(!q.sql.contains("WHERE"), "{}", q.sql);
        assert!(q.sql.ends_with("LIMIT $1 OFFSET $2"), "{}", q.sql);
        assert_eq!(q.binds, vec![Bind::BigInt(10), Bind::BigInt(20)]);
    }

    #[test]
    fn text_term_searches_three_fields() {
        let q = compile(Some("ana"), SortField::Name, SortOrder::Asc);
        assert_eq!(q.sql.matches("ILIKE $1").count(), 3);
        assert!(!q.sql.contains("doc->'age' ="));
        assert_eq!(q.binds[0], Bind::Text("%ana%".to_owned()));
        assert!(q.sql.ends_with("LIMIT $2 OFFSET $3"), "{}", q.sql);
    }

    #[test]
    fn numeric_term_adds_age_equality() {
        let q = compile(Some("25"), SortField::Age, SortOrder::Desc);
        assert!(q.sql.contains("doc->'age' = to_jsonb($2::int)"), "{}", q.sql);
        assert_eq!(q.binds[1], Bind::Int(25));
        assert!(q.sql.contains("END DESC NULLS LAST, id ASC"), "{}", q.sql);
        assert!(q.sql.ends_with("LIMIT $3 OFFSET $4"), "{}", q.sql);
    }

    #[test]
    fn created_at_orders_by_parsed_instant() {
        let q = compile(None, SortField::CreatedAt, SortOrder::Asc);
        assert!(
            q.sql.contains("ORDER BY student_instant(doc->'createdAt') ASC NULLS LAST, id ASC"),
            "{}",
            q.sql
        );
        assert!(!q.sql.contains("doc->>'createdAt'"), "{}", q.sql);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        let q = compile(Some("50%_off\\"), SortField::Name, SortOrder::Asc);
        assert_eq!(q.binds[0], Bind::Text("%50\\%\\_off\\\\%".to_owned()));
    }

    #[test]
    fn nulls_trail_in_both_directions() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            for field in SortField::ALL {
                let q = compile(None, field, order);
                assert!(q.sql.contains(&format!("{} NULLS LAST", order.as_str().to_uppercase())));
                assert!(q.sql.contains("id ASC LIMIT"), "{}", q.sql);
            }
        }
    }
}
