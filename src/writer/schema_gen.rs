use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let single_key = match schema.primary_key {
        [key] => Some(*key),
        _ => None,
    };

    let mut columns: Vec<String> = schema
        .columns
        .iter()
        .map(|col| {
            let pk = if single_key == Some(col.name) {
                " PRIMARY KEY"
            } else {
                ""
            };
            format!("    {} {}{}", col.name, col.col_type.sql_type(), pk)
        })
        .collect();

    if single_key.is_none() {
        columns.push(format!(
            "    PRIMARY KEY ({})",
            schema.primary_key.join(", ")
        ));
    }

    // Declared only; enforcement stays off so dangling references still load
    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    format!("CREATE TABLE {} (\n{}\n)", schema.name, columns.join(",\n"))
}

pub fn generate_drop_table(schema: &TableSchema) -> String {
    format!("DROP TABLE IF EXISTS {}", schema.name)
}

/// Generate CREATE INDEX statements for foreign key columns.
///
/// The leading primary-key column already has an index and is skipped.
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let leading = schema.primary_key.first().copied();

    schema
        .foreign_keys
        .iter()
        .filter(|fk| Some(fk.column) != leading)
        .map(|fk| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

/// INSERT statement covering every column of the table
pub fn generate_insert(schema: &TableSchema, conflict: &str) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT OR {} INTO {} ({}) VALUES ({})",
        conflict,
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}
