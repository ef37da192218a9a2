pub(super) const POSTGRES_SCHEMA_SQL: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/postgres.sql"));

pub(super) const SQLITE_SCHEMA_SQL: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/sqlite.sql"));

/// Split a schema file into statements ending with `;`.
/// Statements must not contain semicolons inside literals.
pub(super) fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_skips_comments_and_blank_lines() {
        let sql = "-- header\n\nCREATE TABLE a (id INT);\n-- note\nCREATE TABLE b (\n  id INT\n);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE a (id INT);".to_string(),
                "CREATE TABLE b (\n  id INT\n);".to_string(),
            ]
        );
    }

    #[test]
    fn split_keeps_trailing_statement_without_semicolon() {
        let statements = split_sql_statements("SELECT 1;\nSELECT 2");
        assert_eq!(statements, vec!["SELECT 1;".to_string(), "SELECT 2".to_string()]);
    }

    #[test]
    fn schemas_define_both_tables() {
        for sql in [POSTGRES_SCHEMA_SQL, SQLITE_SCHEMA_SQL] {
            let statements = split_sql_statements(sql);
            assert_eq!(statements.len(), 3);
            assert!(statements[0].contains("usuarios"));
            assert!(statements[0].contains("UNIQUE"));
            assert!(statements[1].contains("sesiones"));
        }
    }
}
