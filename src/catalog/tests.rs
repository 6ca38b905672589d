use super::*;

const STYLES: &str = "\
id,gender,masterCategory,subCategory,articleType,baseColour,season,year,usage,productDisplayName
15970,Men,Apparel,Topwear,Shirts,Navy Blue,Fall,2011,Casual,Turtle Check Men Navy Blue Shirt
39386,Men,Apparel,Bottomwear,Jeans,Blue,Summer,2012,Casual,Peter England Men Party Blue Jeans
59263,Women,Accessories,Watches,Watches,Silver,Winter,2016,Casual,Titan Women Silver Watch
";

fn load(text: &str) -> InMemoryCatalog {
    InMemoryCatalog::from_reader(text.as_bytes()).unwrap()
}

#[test]
fn test_loads_rows_by_id() {
    let catalog = load(STYLES);
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.skipped_rows(), 0);

    let shirt = catalog.lookup("15970").unwrap();
    assert_eq!(shirt.name, "Turtle Check Men Navy Blue Shirt");
    assert_eq!(shirt.category.as_deref(), Some("Apparel"));
    assert_eq!(shirt.sub_category.as_deref(), Some("Topwear"));
    assert_eq!(shirt.article_type.as_deref(), Some("Shirts"));
    assert_eq!(shirt.base_color.as_deref(), Some("Navy Blue"));
    assert_eq!(shirt.gender.as_deref(), Some("Men"));
    assert_eq!(shirt.usage.as_deref(), Some("Casual"));
}

#[test]
fn test_missing_id_is_none() {
    assert!(load(STYLES).lookup("99999").is_none());
}

#[test]
fn test_skips_rows_with_extra_fields() {
    let text = format!(
        "{STYLES}1163,Men,Apparel,Topwear,Tshirts,Blue,Summer,2011,Sports,Nike Sahara, Team India Tshirt\n"
    );
    let catalog = load(&text);
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.skipped_rows(), 1);
    assert!(catalog.lookup("1163").is_none());
}

#[test]
fn test_empty_cell_is_missing_value() {
    let text = "id,articleType,baseColour,usage,productDisplayName\n7,Tshirts,,Casual,Plain Tee\n";
    let record = load(text).lookup("7").cloned().unwrap();
    assert_eq!(record.base_color, None);
    assert_eq!(record.usage.as_deref(), Some("Casual"));
}

#[test]
fn test_absent_column_reads_unknown() {
    let text = "id,productDisplayName\n7,Plain Tee\n";
    let record = load(text).lookup("7").cloned().unwrap();
    assert_eq!(record.category.as_deref(), Some(UNKNOWN_FIELD));
    assert_eq!(record.base_color.as_deref(), Some(UNKNOWN_FIELD));
}

#[test]
fn test_rows_without_id_or_name_skipped() {
    let text = "id,productDisplayName\n,No Id\n8,\n9,Kept\n";
    let catalog = load(text);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.skipped_rows(), 2);
}

#[test]
fn test_first_duplicate_wins() {
    let text = "id,productDisplayName\n5,First\n5,Second\n";
    assert_eq!(load(text).lookup("5").unwrap().name, "First");
}

#[test]
fn test_missing_required_column() {
    let err = InMemoryCatalog::from_reader("id,name\n1,x\n".as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::MissingColumn {
            column: "productDisplayName"
        }
    ));
}

#[test]
fn test_from_csv_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styles.csv");
    std::fs::write(&path, STYLES).unwrap();

    let catalog = InMemoryCatalog::from_csv_path(&path).unwrap();
    assert_eq!(catalog.len(), 3);
}

#[test]
fn test_from_csv_path_missing() {
    let err = InMemoryCatalog::from_csv_path(Path::new("/nonexistent/styles.csv")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_from_records() {
    let catalog = InMemoryCatalog::from_records([
        CatalogRecord::new("1", "One"),
        CatalogRecord::new("2", "Two"),
    ]);
    assert_eq!(catalog.len(), 2);
    assert!(catalog.lookup("2").unwrap().base_color.is_none());
}
