use crate::models::{AggregateTable, ReadingTable, Table};

/// Tables in creation order. Disposal runs in reverse.
pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(tables: Vec<Box<dyn Table>>) -> Self {
        Self { tables }
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        self.tables.iter().map(|table| table.name()).collect()
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![Box::new(ReadingTable), Box::new(AggregateTable)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTable(&'static str);

    impl Table for MockTable {
        fn name(&self) -> &'static str {
            self.0
        }

        fn create(&self) -> String {
            format!("CREATE TABLE {};", self.0)
        }

        fn dispose(&self) -> String {
            format!("DROP TABLE {};", self.0)
        }
    }

    #[test]
    fn test_dispose_reverses_creation() {
        let manager = SchemaManager::new(vec![
            Box::new(MockTable("readings")),
            Box::new(MockTable("aggregates")),
        ]);

        assert_eq!(
            manager.create_schema(),
            vec!["CREATE TABLE readings;", "CREATE TABLE aggregates;"]
        );
        assert_eq!(
            manager.dispose_schema(),
            vec!["DROP TABLE aggregates;", "DROP TABLE readings;"]
        );
    }

    #[test]
    fn test_default_schema_covers_both_stores() {
        let manager = SchemaManager::default();
        let statements = manager.create_schema().join("\n");

        assert_eq!(manager.table_names(), vec!["readings", "aggregates"]);
        assert!(statements.contains("CREATE TABLE IF NOT EXISTS readings"));
        assert!(statements.contains("CREATE TABLE IF NOT EXISTS aggregates"));
    }
}
