// ==========================================
// 销售数据 ETL 系统 - 目标表定义
// ==========================================
// 表: ventas（全量刷新） / ventas_rejected（拒绝审计，只追加）
// 红线: INSERT 列顺序与 SalesColumn::ALL 一致
// ==========================================

use crate::domain::sales::{CleanSalesRecord, RejectedRecord};
use rusqlite::types::Value;

pub const SALES_TABLE: &str = "ventas";
pub const REJECTED_TABLE: &str = "ventas_rejected";

pub const CREATE_SALES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ventas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fecha DATE NOT NULL,
    producto VARCHAR(100) NOT NULL,
    categoria VARCHAR(50),
    cantidad INT NOT NULL,
    precio_unitario DECIMAL(10,2) NOT NULL,
    total DECIMAL(12,2) NOT NULL,
    cliente_id VARCHAR(20),
    region VARCHAR(50),
    vendedor VARCHAR(100),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const CREATE_REJECTED_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ventas_rejected (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    execution_id VARCHAR(20),
    raw_data TEXT,
    rejection_reason TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// 全量刷新：清空数据并重置自增序列
pub const TRUNCATE_SALES: [&str; 2] = [
    "DELETE FROM ventas",
    "DELETE FROM sqlite_sequence WHERE name = 'ventas'",
];

pub const INSERT_SALES: &str = r#"
INSERT INTO ventas (
    fecha, producto, categoria, cantidad, precio_unitario,
    total, cliente_id, region, vendedor
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const INSERT_REJECTED: &str = r#"
INSERT INTO ventas_rejected (execution_id, raw_data, rejection_reason)
VALUES (?1, ?2, ?3)
"#;

pub const COUNT_SALES: &str = "SELECT COUNT(*) FROM ventas";

fn optional_text(value: &Option<String>) -> Value {
    value.clone().map(Value::Text).unwrap_or(Value::Null)
}

/// 入库记录 → INSERT 参数（日期 YYYY-MM-DD，金额为十进制文本）
pub fn sales_row(record: &CleanSalesRecord) -> Vec<Value> {
    vec![
        Value::Text(record.date.format("%Y-%m-%d").to_string()),
        Value::Text(record.product.clone()),
        optional_text(&record.category),
        Value::Integer(record.quantity),
        Value::Text(record.unit_price.to_string()),
        Value::Text(record.total.to_string()),
        Value::Text(record.customer_id.clone()),
        optional_text(&record.region),
        Value::Text(record.seller.clone()),
    ]
}

/// 拒绝记录 → INSERT 参数
pub fn rejected_row(execution_id: &str, record: &RejectedRecord) -> Vec<Value> {
    vec![
        Value::Text(execution_id.to_string()),
        Value::Text(record.raw_data().to_string()),
        Value::Text(record.rejection_reason().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_sales_row_column_order() {
        let record = CleanSalesRecord {
            row_number: 1,
            date: NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
            product: "Tablet Samsung".to_string(),
            category: None,
            quantity: 3,
            unit_price: Decimal::new(89990, 2),
            total: Decimal::new(269970, 2),
            customer_id: "CLI-00099".to_string(),
            region: Some("Trujillo".to_string()),
            seller: "Sin asignar".to_string(),
        };

        let row = sales_row(&record);

        assert_eq!(row.len(), 9);
        assert_eq!(row[0], Value::Text("2024-05-09".to_string()));
        assert_eq!(row[2], Value::Null);
        assert_eq!(row[3], Value::Integer(3));
        assert_eq!(row[4], Value::Text("899.90".to_string()));
        assert_eq!(row[5], Value::Text("2699.70".to_string()));
    }
}
