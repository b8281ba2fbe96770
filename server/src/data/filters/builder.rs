//! SQL filter builder
//!
//! Builds SQL WHERE clauses from filter expressions. Leaves become a
//! sub-select on `product_terms`; groups join their children with AND/OR.

use crate::domain::slider::{FilterExpression, Relation, TermClause};

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<i64>,
}

/// SQL rendering for filter expressions
pub trait FilterSql {
    /// Generate a WHERE clause fragment with `?` placeholders.
    /// The product id column is unqualified.
    fn to_sql(&self, params: &mut SqlParams) -> String {
        self.to_sql_aliased(params, "")
    }

    /// Generate a WHERE clause fragment with the product table alias
    /// prepended to the id column (e.g., "p" → "p.id").
    fn to_sql_aliased(&self, params: &mut SqlParams, alias: &str) -> String;
}

impl FilterSql for FilterExpression {
    fn to_sql_aliased(&self, params: &mut SqlParams, alias: &str) -> String {
        match self {
            FilterExpression::Terms(clause) => build_terms_filter(clause, params, alias),
            FilterExpression::Group { children, .. } if children.is_empty() => "1=1".to_string(),
            FilterExpression::Group { relation, children } => {
                let join_op = match relation {
                    Relation::And => " AND ",
                    Relation::Or => " OR ",
                };
                let parts: Vec<String> = children
                    .iter()
                    .map(|child| child.to_sql_aliased(params, alias))
                    .collect();
                format!("({})", parts.join(join_op))
            }
        }
    }
}

/// Build a term membership filter: the product carries any listed term
fn build_terms_filter(clause: &TermClause, params: &mut SqlParams, alias: &str) -> String {
    if clause.terms.is_empty() {
        return "1=0".to_string();
    }

    let col = if alias.is_empty() {
        "id".to_string()
    } else {
        format!("{}.id", alias)
    };

    let placeholders: Vec<&str> = clause
        .terms
        .iter()
        .map(|id| {
            params.values.push(*id);
            "?"
        })
        .collect();

    format!(
        "{} IN (SELECT product_id FROM product_terms WHERE term_id IN ({}))",
        col,
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_terms_leaf() {
        let expr = FilterExpression::terms("weight", vec![2, 3]);
        let mut params = SqlParams::default();
        let sql = expr.to_sql(&mut params);

        assert_eq!(
            sql,
            "id IN (SELECT product_id FROM product_terms WHERE term_id IN (?, ?))"
        );
        assert_eq!(params.values, vec![2, 3]);
    }

    #[test]
    fn build_terms_leaf_with_alias() {
        let expr = FilterExpression::terms("weight", vec![7]);
        let mut params = SqlParams::default();
        let sql = expr.to_sql_aliased(&mut params, "p");

        assert_eq!(
            sql,
            "p.id IN (SELECT product_id FROM product_terms WHERE term_id IN (?))"
        );
    }

    #[test]
    fn build_empty_leaf_matches_nothing() {
        let expr = FilterExpression::terms("weight", vec![]);
        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&mut params), "1=0");
        assert!(params.values.is_empty());
    }

    #[test]
    fn build_empty_group_matches_everything() {
        let mut params = SqlParams::default();
        assert_eq!(FilterExpression::and(vec![]).to_sql(&mut params), "1=1");
    }

    #[test]
    fn build_nested_groups_keep_param_order() {
        let expr = FilterExpression::and(vec![
            FilterExpression::or(vec![
                FilterExpression::terms("category", vec![10]),
                FilterExpression::terms("category", vec![11]),
            ]),
            FilterExpression::terms("weight", vec![2]),
        ]);
        let mut params = SqlParams::default();
        let sql = expr.to_sql(&mut params);

        assert!(sql.starts_with("((id IN"));
        assert!(sql.contains(") OR id IN"));
        assert!(sql.contains(")) AND id IN"));
        assert_eq!(params.values, vec![10, 11, 2]);
    }
}
