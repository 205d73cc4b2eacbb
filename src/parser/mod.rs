use sqlparser::ast::{AlterTableOperation, Statement};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;


pub static DIALECT_POSTGRES: PostgreSqlDialect = PostgreSqlDialect {};

/// Number of leading words kept when labelling a statement, e.g. "DROP TABLE users".
const LABEL_WORDS: usize = 3;


/// What a migration script does, as far as the parser can tell.
/// Only used for display: scripts run verbatim whether or not they parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSummary {
    Empty,
    Parsed { statements: Vec<String>, destructive: bool },
    Unparsed { reason: String },
}

impl ScriptSummary {
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Parsed { destructive: true, .. })
    }
}


fn is_destructive(statement: &Statement) -> bool {
    match statement {
        Statement::Drop { .. } | Statement::Truncate { .. } => true,
        Statement::AlterTable { operations, .. } => operations.iter().any(|operation| matches!(
            operation,
            AlterTableOperation::DropColumn { .. }
                | AlterTableOperation::DropConstraint { .. }
                | AlterTableOperation::DropPrimaryKey
        )),
        _ => false,
    }
}

pub fn summarize(sql: &str) -> ScriptSummary {
    if sql.trim().is_empty() {
        return ScriptSummary::Empty;
    }

    match Parser::parse_sql(&DIALECT_POSTGRES, sql) {
        Ok(parsed) => {
            let destructive = parsed.iter().any(is_destructive);
            let statements = parsed
                .iter()
                .map(|stmt| stmt.to_string().split_whitespace().take(LABEL_WORDS).collect::<Vec<_>>().join(" "))
                .collect();

            ScriptSummary::Parsed { statements, destructive }
        }
        Err(e) => {
            tracing::debug!("SQL parsing failed: {}", e);
            ScriptSummary::Unparsed { reason: e.to_string() }
        }
    }
}
