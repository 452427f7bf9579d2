use model::TableDetail;

pub fn test_detail(name: &str, columns: &[&str], row_count: u64) -> TableDetail {
    TableDetail {
        name: name.to_owned(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        row_count,
    }
}
