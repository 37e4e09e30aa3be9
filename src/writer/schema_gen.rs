use crate::schema::TableSchema;

/// Delimiter between statements in a DDL script
pub const STATEMENT_DELIMITER: char = ';';

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut lines = Vec::new();

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let default = col
            .default
            .map(|literal| format!(" DEFAULT {}", literal))
            .unwrap_or_default();

        lines.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            null_constraint,
            default
        ));
    }

    if !schema.primary_key.is_empty() {
        lines.push(format!("    PRIMARY KEY ({})", schema.primary_key.join(", ")));
    }

    for fk in schema.foreign_keys {
        lines.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.columns.join(", "),
            fk.references_table,
            fk.references_columns.join(", ")
        ));
    }

    sql.push_str(&lines.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate the full DDL script for the given tables, one statement per
/// table, separated by [`STATEMENT_DELIMITER`]
pub fn generate_schema_script(schemas: &[&TableSchema]) -> String {
    let mut script = String::new();
    for schema in schemas {
        script.push_str(&generate_create_table(schema));
        script.push(STATEMENT_DELIMITER);
        script.push_str("\n\n");
    }
    script
}

/// Split a DDL script into statements, dropping blank fragments
pub fn split_statements(script: &str, delimiter: char) -> Vec<&str> {
    script
        .split(delimiter)
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .collect()
}

/// Parameterized INSERT for every column of the table, in declaration order
pub fn insert_sql(schema: &TableSchema) -> String {
    let placeholders: Vec<String> = (1..=schema.columns.len())
        .map(|i| format!("?{}", i))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        schema.column_names().join(", "),
        placeholders.join(", ")
    )
}

/// SELECT of every column in declaration order, rows in storage order
pub fn select_sql(schema: &TableSchema) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY rowid",
        schema.column_names().join(", "),
        schema.name
    )
}
