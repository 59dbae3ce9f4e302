use crate::{
    executor::predicate::Predicate,
    storage::schema::{TableName, TableSchema},
    types::value::Value,
};

#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    CreateTable(CreateTablePlan),
    DropTable(DropTablePlan),
    DropSchema(DropSchemaPlan),
    Insert(InsertPlan),
    Select(ScanPlan),
    Update(UpdatePlan),
    Delete(DeletePlan),
    ShowTables,
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTablePlan {
    pub schema: TableSchema,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTablePlan {
    pub table_names: Vec<TableName>,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropSchemaPlan {
    pub schema_names: Vec<String>,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub table_name: TableName,
    pub columns: Option<Vec<String>>,
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan {
    pub table_name: TableName,
    /// `None` selects every column in schema order.
    pub projected_columns: Option<Vec<String>>,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
    pub table_name: TableName,
    pub assignments: Vec<Assignment>,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlan {
    pub table_name: TableName,
    pub predicate: Option<Predicate>,
}
