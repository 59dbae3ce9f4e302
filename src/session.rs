use std::fmt;

use tracing::debug;

use crate::{
    config::StoreConfig,
    executor::{
        delete::TableDeleter,
        insert::{Inserter, TableInserter},
        scan::ScanIterator,
        sequential_scan::SequentialScanner,
        update::TableUpdater,
    },
    planner::{
        logical_plan::{InsertPlan, LogicalPlan, ScanPlan},
        parser::SqlParser,
    },
    storage::catalog::Catalog,
    transaction::Transaction,
    types::{
        error::{DatabaseError, Result},
        row::Row,
        value::Value,
    },
};

/// Outcome of one executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows { columns: Vec<String>, rows: Vec<Row> },
    RowsAffected(usize),
    Done(String),
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows { columns, rows } => {
                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| row.values.iter().map(Value::to_string).collect())
                    .collect();
                let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
                for row in &cells {
                    for (width, cell) in widths.iter_mut().zip(row) {
                        *width = (*width).max(cell.len());
                    }
                }

                let header: Vec<String> = columns
                    .iter()
                    .zip(&widths)
                    .map(|(name, width)| format!("{:<width$}", name, width = width))
                    .collect();
                writeln!(f, "{}", header.join(" | "))?;
                let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
                writeln!(f, "{}", rule.join("-+-"))?;
                for row in &cells {
                    let line: Vec<String> = row
                        .iter()
                        .zip(&widths)
                        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                        .collect();
                    writeln!(f, "{}", line.join(" | "))?;
                }
                write!(f, "({} rows)", rows.len())
            }
            QueryResult::RowsAffected(count) => write!(f, "{} row(s) affected", count),
            QueryResult::Done(tag) => write!(f, "{}", tag),
        }
    }
}

/// A database session: one catalog and its transaction state.
pub struct Database {
    catalog: Catalog,
    transaction: Transaction,
    parser: SqlParser,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            transaction: Transaction::new(),
            parser: SqlParser::new(),
        }
    }

    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::with_config(config)?,
            transaction: Transaction::new(),
            parser: SqlParser::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Parses and runs one SQL statement.
    pub fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        let plan = self.parser.parse_sql(sql)?;
        debug!(?plan, "executing plan");
        self.execute_plan(plan)
    }

    pub fn execute_plan(&mut self, plan: LogicalPlan) -> Result<QueryResult> {
        match plan {
            LogicalPlan::CreateTable(create) => {
                self.catalog.create_table(create.schema, create.if_not_exists)?;
                Ok(QueryResult::Done("CREATE TABLE".to_string()))
            }
            LogicalPlan::DropTable(drop) => {
                if !drop.if_exists {
                    if let Some(missing) = drop
                        .table_names
                        .iter()
                        .find(|name| !self.catalog.table_exists(name))
                    {
                        return Err(DatabaseError::TableNotFound {
                            name: missing.to_string(),
                        });
                    }
                }
                for name in &drop.table_names {
                    self.catalog.drop_table(name, true)?;
                }
                Ok(QueryResult::Done("DROP TABLE".to_string()))
            }
            LogicalPlan::DropSchema(drop) => {
                if !drop.if_exists {
                    if let Some(missing) = drop
                        .schema_names
                        .iter()
                        .find(|name| !self.catalog.find_schema(name))
                    {
                        return Err(DatabaseError::SchemaNotFound {
                            name: missing.clone(),
                        });
                    }
                }
                for name in &drop.schema_names {
                    self.catalog.drop_schema(name);
                }
                Ok(QueryResult::Done("DROP SCHEMA".to_string()))
            }
            LogicalPlan::Insert(insert) => self.insert(insert),
            LogicalPlan::Select(scan) => self.select(scan),
            LogicalPlan::Update(update) => {
                let store = self.catalog.table_mut(&update.table_name)?;
                let assignments: Vec<(String, Value)> = update
                    .assignments
                    .into_iter()
                    .map(|assignment| (assignment.column, assignment.value))
                    .collect();
                let count = TableUpdater::new(store, &mut self.transaction)
                    .execute(&assignments, update.predicate)?;
                Ok(QueryResult::RowsAffected(count))
            }
            LogicalPlan::Delete(delete) => {
                let store = self.catalog.table_mut(&delete.table_name)?;
                let count =
                    TableDeleter::new(store, &mut self.transaction).execute(delete.predicate)?;
                Ok(QueryResult::RowsAffected(count))
            }
            LogicalPlan::ShowTables => Ok(QueryResult::Rows {
                columns: vec!["table".to_string()],
                rows: self
                    .catalog
                    .table_names()
                    .into_iter()
                    .map(|name| Row::new(vec![Value::Text(name.to_string())]))
                    .collect(),
            }),
            LogicalPlan::Begin => {
                self.transaction.begin()?;
                Ok(QueryResult::Done("BEGIN".to_string()))
            }
            LogicalPlan::Commit => {
                self.transaction.commit()?;
                Ok(QueryResult::Done("COMMIT".to_string()))
            }
            LogicalPlan::Rollback => {
                self.transaction.rollback(&mut self.catalog)?;
                Ok(QueryResult::Done("ROLLBACK".to_string()))
            }
        }
    }

    fn insert(&mut self, insert: InsertPlan) -> Result<QueryResult> {
        let store = self.catalog.table_mut(&insert.table_name)?;
        let schema = store.schema().clone();

        let rows = match &insert.columns {
            None => insert.values.into_iter().map(Row::new).collect(),
            Some(columns) => {
                let mut indexes = Vec::with_capacity(columns.len());
                for column in columns {
                    let index = schema.require_column_index(column)?;
                    if indexes.contains(&index) {
                        return Err(DatabaseError::ExecutionError {
                            details: format!("Column '{}' specified more than once", column),
                        });
                    }
                    indexes.push(index);
                }

                // Reorder into schema order; unlisted columns become NULL
                let mut rows = Vec::with_capacity(insert.values.len());
                for values in insert.values {
                    if values.len() != indexes.len() {
                        return Err(DatabaseError::ColumnCountMismatch {
                            expected: indexes.len(),
                            actual: values.len(),
                        });
                    }
                    let mut full = vec![Value::Null; schema.column_count()];
                    for (index, value) in indexes.iter().zip(values) {
                        full[*index] = value;
                    }
                    rows.push(Row::new(full));
                }
                rows
            }
        };

        let inserted = TableInserter::new(store, &mut self.transaction).insert_batch(rows)?;
        Ok(QueryResult::RowsAffected(inserted.len()))
    }

    fn select(&self, scan: ScanPlan) -> Result<QueryResult> {
        let mut scanner = SequentialScanner::new(&self.catalog, &scan.table_name, None)?;
        if let Some(predicate) = scan.predicate {
            scanner = scanner.with_predicate(predicate);
        }
        let columns = match scan.projected_columns {
            Some(columns) => {
                scanner = scanner.with_projection(&columns)?;
                let schema = self.catalog.table(&scan.table_name)?.schema();
                columns
                    .iter()
                    .map(|name| schema.column(name).map_or(name.clone(), |c| c.name.clone()))
                    .collect()
            }
            None => self.catalog.table(&scan.table_name)?.schema().column_names(),
        };

        let rows = ScanIterator::new(scanner).collect::<Result<Vec<Row>>>()?;
        Ok(QueryResult::Rows { columns, rows })
    }
}
