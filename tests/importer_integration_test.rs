// ==========================================
// 导入层集成测试
// ==========================================
// 职责: 验证真实文件路径下的格式探测与列识别协作
// 场景: FormatDetector → ColumnResolver 数据流转
// ==========================================


use stockwise::importer::{ColumnResolver, FormatDetector, ImportError};
use test_helpers::write_sales_csv;

// ==========================================
// 格式探测（文件路径）
// ==========================================

#[test]
fn test_detect_standard_pos_export() {
    let file = write_sales_csv(
        b"Date,Item Name,Quantity Sold\n2025-01-01,Latte,2\n2025-01-01,Mocha,1\n",
    )
    .unwrap();

    let detector = FormatDetector::new();
    let table = detector.detect(file.path()).unwrap();

    assert_eq!(table.columns, vec!["date", "item name", "quantity sold"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "item name"), Some("Latte"));
}

#[test]
fn test_detect_bom_prefixed_export() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"date,item,qty\n2025-01-01,Latte,2\n");
    let file = write_sales_csv(&bytes).unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    assert_eq!(table.columns[0], "date");
    assert_eq!(table.row_count(), 1);
}

#[test]
fn test_detect_tab_separated_export() {
    let file = write_sales_csv(b"date\titem\tqty\n2025-01-01\tLatte\t2\n").unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.value(0, "qty"), Some("2"));
}

#[test]
fn test_detect_latin1_export() {
    // 0xE9 ("é") 不是合法 UTF-8,应落到 Latin 系回退
    let file = write_sales_csv(b"date,item\n2025-01-01,caf\xe9 latte\n").unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    assert_eq!(table.value(0, "item"), Some("café latte"));
}

#[test]
fn test_detect_fully_quoted_rows() {
    let file =
        write_sales_csv(b"\"date,item,qty\"\n\"2025-01-01,Latte,2\"\n\"2025-01-02,Mocha,1\"\n")
            .unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.value(1, "item"), Some("Mocha"));
}

#[test]
fn test_detect_missing_file() {
    let result = FormatDetector::new().detect(std::path::Path::new("/no/such/sales.csv"));
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[test]
fn test_detect_rejects_non_csv_extension() {
    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    std::io::Write::write_all(&mut file, b"not a csv").unwrap();

    let result = FormatDetector::new().detect(file.path());
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

// ==========================================
// 列识别（探测结果之上）
// ==========================================

#[test]
fn test_resolve_pos_headers() {
    let file = write_sales_csv(
        b"Transaction Date,Item Name,Quantity Sold,Net Sales\n2025-01-01,Latte,2,10.0\n",
    )
    .unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    let schema = ColumnResolver::new().resolve(&table).unwrap();

    assert_eq!(schema.date_column, "transaction date");
    assert_eq!(schema.item_column, "item name");
    assert_eq!(schema.quantity_column.as_deref(), Some("quantity sold"));
}

#[test]
fn test_resolve_headerless_date_fallback() {
    // 列名无日期关键词,但首列值可解析为日期 → 首列充当日期列
    let file = write_sales_csv(
        b"col_a,product,count\n2025-01-01,Latte,2\n2025-01-02,Mocha,1\n",
    )
    .unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    let schema = ColumnResolver::new().resolve(&table).unwrap();

    assert_eq!(schema.date_column, "col_a");
    assert_eq!(schema.item_column, "product");
    assert_eq!(schema.quantity_column.as_deref(), Some("count"));
}

#[test]
fn test_resolve_missing_quantity_is_optional() {
    let file = write_sales_csv(b"date,item\n2025-01-01,Latte\n").unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    let schema = ColumnResolver::new().resolve(&table).unwrap();

    assert!(schema.quantity_column.is_none());
}

#[test]
fn test_resolve_failure_lists_columns() {
    // 单列且值不是日期 → 无法识别模式
    let file = write_sales_csv(b"stuff\nhello\nworld\n").unwrap();

    let table = FormatDetector::new().detect(file.path()).unwrap();
    let result = ColumnResolver::new().resolve(&table);

    match result {
        Err(ImportError::SchemaUnresolved { columns }) => {
            assert!(columns.contains("stuff"));
        }
        other => panic!("应返回 SchemaUnresolved,实际: {:?}", other),
    }
}
