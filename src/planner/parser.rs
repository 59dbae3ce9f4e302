use std::ops::ControlFlow;

use sqlparser::{
    ast::{
        AssignmentTarget, BinaryOperator, ColumnOption, Expr, ObjectName, ObjectType, SelectItem,
        SetExpr, Statement, TableFactor, UnaryOperator, Value as SqlValue, Values,
        visit_relations,
    },
    dialect::GenericDialect,
    parser::Parser,
};

use crate::{
    executor::predicate::{ComparisonOp, Predicate},
    planner::{
        error::PlannerError,
        logical_plan::{
            Assignment, CreateTablePlan, DeletePlan, DropSchemaPlan, DropTablePlan, InsertPlan,
            LogicalPlan, ScanPlan, UpdatePlan,
        },
    },
    storage::schema::{TableName, TableSchemaBuilder},
    types::value::{DataType, Value},
};

/// Turns one SQL statement into a [`LogicalPlan`].
pub struct SqlParser;

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_sql(&self, sql: &str) -> Result<LogicalPlan, PlannerError> {
        let dialect = GenericDialect {};
        let statements = Parser::parse_sql(&dialect, sql)?;

        if statements.len() != 1 {
            return Err(PlannerError::InvalidQuery(
                "Expected exactly one statement".to_string(),
            ));
        }

        self.to_plan(&statements[0])
    }

    fn to_plan(&self, statement: &Statement) -> Result<LogicalPlan, PlannerError> {
        match statement {
            Statement::CreateTable(create) => {
                let mut builder = TableSchemaBuilder::new(table_name(&create.name));
                for column in &create.columns {
                    let data_type = self.convert_data_type(&column.data_type.to_string())?;
                    let not_null = column.options.iter().any(|def| {
                        matches!(
                            def.option,
                            ColumnOption::NotNull | ColumnOption::Unique { is_primary: true, .. }
                        )
                    });
                    builder = if not_null {
                        builder.add_not_null_column(column.name.value.clone(), data_type)
                    } else {
                        builder.add_column(column.name.value.clone(), data_type)
                    };
                }
                let schema = builder
                    .build()
                    .map_err(|e| PlannerError::InvalidQuery(e.to_string()))?;
                Ok(LogicalPlan::CreateTable(CreateTablePlan {
                    schema,
                    if_not_exists: create.if_not_exists,
                }))
            }
            Statement::Drop {
                object_type,
                if_exists,
                names,
                ..
            } => match object_type {
                ObjectType::Table => Ok(LogicalPlan::DropTable(DropTablePlan {
                    table_names: names.iter().map(table_name).collect(),
                    if_exists: *if_exists,
                })),
                ObjectType::Schema => Ok(LogicalPlan::DropSchema(DropSchemaPlan {
                    schema_names: names.iter().map(|name| unquote(&name.to_string())).collect(),
                    if_exists: *if_exists,
                })),
                other => Err(PlannerError::UnsupportedStatement(format!("DROP {}", other))),
            },
            Statement::Insert(insert) => {
                let source = insert.source.as_ref().ok_or_else(|| {
                    PlannerError::InvalidQuery("INSERT requires a VALUES list".to_string())
                })?;
                let SetExpr::Values(Values { rows, .. }) = source.body.as_ref() else {
                    return Err(PlannerError::UnsupportedStatement(
                        "INSERT ... SELECT".to_string(),
                    ));
                };
                let values = rows
                    .iter()
                    .map(|row| row.iter().map(literal).collect::<Result<Vec<_>, _>>())
                    .collect::<Result<Vec<_>, _>>()?;
                let columns = if insert.columns.is_empty() {
                    None
                } else {
                    Some(insert.columns.iter().map(|c| c.value.clone()).collect())
                };
                Ok(LogicalPlan::Insert(InsertPlan {
                    table_name: target_table(statement)?,
                    columns,
                    values,
                }))
            }
            Statement::Query(query) => {
                let SetExpr::Select(select) = query.body.as_ref() else {
                    return Err(PlannerError::UnsupportedStatement(format!("{}", query)));
                };
                if select.from.len() != 1 || !select.from[0].joins.is_empty() {
                    return Err(PlannerError::UnsupportedStatement(
                        "SELECT must read exactly one table without joins".to_string(),
                    ));
                }
                let TableFactor::Table { name, .. } = &select.from[0].relation else {
                    return Err(PlannerError::UnsupportedStatement(format!(
                        "FROM {}",
                        select.from[0].relation
                    )));
                };

                let mut projected = Vec::new();
                let mut wildcard = false;
                for item in &select.projection {
                    match item {
                        SelectItem::Wildcard(_) => wildcard = true,
                        SelectItem::UnnamedExpr(expr) => projected.push(column_ref(expr)?),
                        other => {
                            return Err(PlannerError::UnsupportedExpression(other.to_string()));
                        }
                    }
                }
                if wildcard && !projected.is_empty() {
                    return Err(PlannerError::InvalidQuery(
                        "Cannot mix * with named columns".to_string(),
                    ));
                }

                Ok(LogicalPlan::Select(ScanPlan {
                    table_name: table_name(name),
                    projected_columns: (!wildcard).then_some(projected),
                    predicate: select.selection.as_ref().map(predicate).transpose()?,
                }))
            }
            Statement::Update {
                assignments,
                selection,
                ..
            } => {
                let assignments = assignments
                    .iter()
                    .map(|assignment| match &assignment.target {
                        AssignmentTarget::ColumnName(column) => Ok(Assignment {
                            column: column_name(column),
                            value: literal(&assignment.value)?,
                        }),
                        other => Err(PlannerError::UnsupportedExpression(other.to_string())),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(LogicalPlan::Update(UpdatePlan {
                    table_name: target_table(statement)?,
                    assignments,
                    predicate: selection.as_ref().map(predicate).transpose()?,
                }))
            }
            Statement::Delete(delete) => Ok(LogicalPlan::Delete(DeletePlan {
                table_name: target_table(statement)?,
                predicate: delete.selection.as_ref().map(predicate).transpose()?,
            })),
            Statement::ShowTables { .. } => Ok(LogicalPlan::ShowTables),
            Statement::StartTransaction { .. } => Ok(LogicalPlan::Begin),
            Statement::Commit { .. } => Ok(LogicalPlan::Commit),
            Statement::Rollback { .. } => Ok(LogicalPlan::Rollback),
            _ => Err(PlannerError::UnsupportedStatement(format!("{}", statement))),
        }
    }

    fn convert_data_type(&self, sql_type: &str) -> Result<DataType, PlannerError> {
        DataType::from_string(sql_type)
            .map_err(|_| PlannerError::UnsupportedDataType(sql_type.to_string()))
    }
}

/// First relation named by a statement, which for INSERT, UPDATE and DELETE
/// is the table being modified.
fn target_table(statement: &Statement) -> Result<TableName, PlannerError> {
    let mut target = None;
    let _ = visit_relations(statement, |relation| {
        target = Some(table_name(relation));
        ControlFlow::<()>::Break(())
    });
    target.ok_or_else(|| PlannerError::InvalidQuery("Statement names no table".to_string()))
}

fn table_name(name: &ObjectName) -> TableName {
    TableName::parse(&name.to_string())
}

fn column_name(name: &ObjectName) -> String {
    let qualified = name.to_string();
    unquote(qualified.rsplit('.').next().unwrap_or(&qualified))
}

fn unquote(name: &str) -> String {
    name.trim_matches(|c| c == '"' || c == '`').to_string()
}

fn column_ref(expr: &Expr) -> Result<String, PlannerError> {
    match expr {
        Expr::Identifier(ident) => Ok(ident.value.clone()),
        Expr::CompoundIdentifier(idents) => idents
            .last()
            .map(|ident| ident.value.clone())
            .ok_or_else(|| PlannerError::UnsupportedExpression(expr.to_string())),
        Expr::Nested(inner) => column_ref(inner),
        _ => Err(PlannerError::UnsupportedExpression(expr.to_string())),
    }
}

fn literal(expr: &Expr) -> Result<Value, PlannerError> {
    match expr {
        Expr::Value(SqlValue::Number(number, _)) => parse_number(number),
        Expr::Value(SqlValue::SingleQuotedString(text)) => Ok(Value::Text(text.clone())),
        Expr::Value(SqlValue::Null) => Ok(Value::Null),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: inner,
        } => match inner.as_ref() {
            // Negate the digits so i64::MIN stays representable
            Expr::Value(SqlValue::Number(number, _)) => parse_number(&format!("-{}", number)),
            _ => match literal(inner)? {
                Value::Integer(v) => v
                    .checked_neg()
                    .map(Value::Integer)
                    .ok_or_else(|| PlannerError::UnsupportedExpression(expr.to_string())),
                Value::Real(v) => Ok(Value::Real(-v)),
                _ => Err(PlannerError::UnsupportedExpression(expr.to_string())),
            },
        },
        Expr::UnaryOp {
            op: UnaryOperator::Plus,
            expr: inner,
        } => literal(inner),
        Expr::Nested(inner) => literal(inner),
        _ => Err(PlannerError::UnsupportedExpression(expr.to_string())),
    }
}

fn parse_number(number: &str) -> Result<Value, PlannerError> {
    if let Ok(v) = number.parse::<i64>() {
        return Ok(Value::Integer(v));
    }
    number
        .parse::<f64>()
        .map(Value::Real)
        .map_err(|_| PlannerError::UnsupportedExpression(number.to_string()))
}

fn comparison_op(op: &BinaryOperator) -> Option<ComparisonOp> {
    match op {
        BinaryOperator::Eq => Some(ComparisonOp::Equal),
        BinaryOperator::NotEq => Some(ComparisonOp::NotEqual),
        BinaryOperator::Lt => Some(ComparisonOp::LessThan),
        BinaryOperator::LtEq => Some(ComparisonOp::LessThanOrEqual),
        BinaryOperator::Gt => Some(ComparisonOp::GreaterThan),
        BinaryOperator::GtEq => Some(ComparisonOp::GreaterThanOrEqual),
        _ => None,
    }
}

/// `5 < col` is the same filter as `col > 5`.
fn mirror(op: ComparisonOp) -> ComparisonOp {
    match op {
        ComparisonOp::LessThan => ComparisonOp::GreaterThan,
        ComparisonOp::LessThanOrEqual => ComparisonOp::GreaterThanOrEqual,
        ComparisonOp::GreaterThan => ComparisonOp::LessThan,
        ComparisonOp::GreaterThanOrEqual => ComparisonOp::LessThanOrEqual,
        other => other,
    }
}

fn predicate(expr: &Expr) -> Result<Predicate, PlannerError> {
    match expr {
        Expr::Nested(inner) => predicate(inner),
        Expr::Value(SqlValue::Boolean(true)) => Ok(Predicate::True),
        Expr::Value(SqlValue::Boolean(false)) => Ok(Predicate::False),
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: inner,
        } => Ok(Predicate::not(predicate(inner)?)),
        Expr::IsNull(inner) => Ok(Predicate::is_null(column_ref(inner)?)),
        Expr::IsNotNull(inner) => Ok(Predicate::is_not_null(column_ref(inner)?)),
        Expr::InList {
            expr: inner,
            list,
            negated,
        } => {
            let values = list.iter().map(literal).collect::<Result<Vec<_>, _>>()?;
            Ok(Predicate::in_list(column_ref(inner)?, values, *negated))
        }
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => Ok(Predicate::and(predicate(left)?, predicate(right)?)),
            BinaryOperator::Or => Ok(Predicate::or(predicate(left)?, predicate(right)?)),
            _ => {
                let op = comparison_op(op)
                    .ok_or_else(|| PlannerError::UnsupportedExpression(expr.to_string()))?;
                if let Ok(column) = column_ref(left) {
                    Ok(Predicate::compare(column, op, literal(right)?))
                } else {
                    Ok(Predicate::compare(column_ref(right)?, mirror(op), literal(left)?))
                }
            }
        },
        _ => Err(PlannerError::UnsupportedExpression(expr.to_string())),
    }
}
