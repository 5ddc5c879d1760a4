//! Change-list CSV loading.
//!
//! Files have no header row. Each row names an appliance, the four entry
//! fields, and an optional operation column:
//!
//! ```text
//! appliance_name,vlan_id,address,netmask,vlan_name[,add|remove]
//! appliance_name,route_name,address,netmask,gateway[,add|remove]
//! ```
//!
//! A missing operation column means `add`.

use std::io;
use std::path::Path;

use scanconf_core::{Category, ChangeRequest, CoreError, Entry, Operation, RouteEntry, VlanEntry};

use crate::error::{ReconcileError, Result};

const ENTRY_FIELDS: usize = 5;
const WITH_OPERATION: usize = 6;

/// Load VLAN changes from a CSV file.
pub fn load_vlan_changes(path: &Path) -> Result<Vec<ChangeRequest>> {
    load_changes(path, Category::Vlans)
}

/// Load static route changes from a CSV file.
pub fn load_route_changes(path: &Path) -> Result<Vec<ChangeRequest>> {
    load_changes(path, Category::Routes)
}

fn load_changes(path: &Path, category: Category) -> Result<Vec<ChangeRequest>> {
    let file = std::fs::File::open(path).map_err(|e| ReconcileError::OpenChangeList {
        path: path.to_path_buf(),
        source: e,
    })?;
    let changes = parse_changes(file, path, category)?;

    tracing::info!(
        path = %path.display(),
        category = %category,
        changes = changes.len(),
        "Loaded change list"
    );
    Ok(changes)
}

/// Parse change rows of one category. `source` is only used in error reports.
///
/// The first bad row aborts the whole parse.
pub fn parse_changes<R: io::Read>(
    reader: R,
    source: &Path,
    category: Category,
) -> Result<Vec<ChangeRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut changes = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| ReconcileError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        changes.push(parse_row(&record, source, line, category)?);
    }

    Ok(changes)
}

fn parse_row(
    record: &csv::StringRecord,
    source: &Path,
    line: u64,
    category: Category,
) -> Result<ChangeRequest> {
    let malformed = |reason: String| ReconcileError::MalformedRow {
        path: source.to_path_buf(),
        line,
        reason,
    };

    if record.len() != ENTRY_FIELDS && record.len() != WITH_OPERATION {
        return Err(malformed(format!(
            "expected {ENTRY_FIELDS} or {WITH_OPERATION} fields, found {}",
            record.len()
        )));
    }

    let fields: Vec<&str> = record.iter().collect();

    let appliance = fields[0];
    if appliance.is_empty() {
        return Err(malformed("empty appliance name".to_string()));
    }

    let operation = match fields.get(ENTRY_FIELDS) {
        None => Operation::Add,
        Some(token) => token.parse().map_err(|_| ReconcileError::InvalidRow {
            path: source.to_path_buf(),
            line,
            source: CoreError::InvalidOperation {
                appliance: appliance.to_string(),
                token: token.to_string(),
            },
        })?,
    };

    let entry = match category {
        Category::Vlans => Entry::Vlan(VlanEntry::new(fields[1], fields[4], fields[2], fields[3])),
        Category::Routes => Entry::Route(RouteEntry::new(fields[1], fields[2], fields[3], fields[4])),
    };

    Ok(ChangeRequest::new(appliance, entry, operation))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn src() -> PathBuf {
        PathBuf::from("changes.csv")
    }

    #[test]
    fn test_parse_vlan_rows() {
        let csv = "scanner-east,10,10.0.0.0,255.255.255.0,corp\n\
                   scanner-east,20,10.0.2.0,255.255.255.0,lab,remove\n";

        let changes = parse_changes(csv.as_bytes(), &src(), Category::Vlans).unwrap();
        assert_eq!(changes.len(), 2);

        assert_eq!(changes[0].appliance_name, "scanner-east");
        assert_eq!(changes[0].operation, Operation::Add);
        assert_eq!(
            changes[0].entry,
            Entry::Vlan(VlanEntry::new("10", "corp", "10.0.0.0", "255.255.255.0"))
        );
        assert_eq!(changes[0].entry.render(), "10|10.0.0.0|255.255.255.0|corp");

        assert_eq!(changes[1].operation, Operation::Remove);
    }

    #[test]
    fn test_parse_route_rows() {
        let csv = "scanner-west, r1 ,10.0.1.0,255.255.255.0,10.0.0.1,ADD\n";

        let changes = parse_changes(csv.as_bytes(), &src(), Category::Routes).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].operation, Operation::Add);
        assert_eq!(
            changes[0].entry,
            Entry::Route(RouteEntry::new("r1", "10.0.1.0", "255.255.255.0", "10.0.0.1"))
        );
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "\"scanner, east\",10,10.0.0.0,255.255.255.0,\"corp net\"\n";

        let changes = parse_changes(csv.as_bytes(), &src(), Category::Vlans).unwrap();
        assert_eq!(changes[0].appliance_name, "scanner, east");
        assert_eq!(changes[0].entry.render(), "10|10.0.0.0|255.255.255.0|corp net");
    }

    #[test]
    fn test_invalid_operation_names_appliance() {
        let csv = "scanner-east,10,10.0.0.0,255.255.255.0,corp\n\
                   scanner-west,20,10.0.2.0,255.255.255.0,lab,delete\n";

        let err = parse_changes(csv.as_bytes(), &src(), Category::Vlans).unwrap_err();
        match err {
            ReconcileError::InvalidRow { line, source, .. } => {
                assert_eq!(line, 2);
                assert!(matches!(
                    source,
                    CoreError::InvalidOperation { ref appliance, ref token }
                        if appliance == "scanner-west" && token == "delete"
                ));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_operation_is_invalid() {
        let csv = "scanner-east,10,10.0.0.0,255.255.255.0,corp,\n";

        let err = parse_changes(csv.as_bytes(), &src(), Category::Vlans).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidRow { .. }));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let csv = "scanner-east,10,10.0.0.0\n";

        let err = parse_changes(csv.as_bytes(), &src(), Category::Vlans).unwrap_err();
        assert!(matches!(err, ReconcileError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_empty_appliance_is_malformed() {
        let csv = ",r1,10.0.1.0,255.255.255.0,10.0.0.1\n";

        let err = parse_changes(csv.as_bytes(), &src(), Category::Routes).unwrap_err();
        assert!(matches!(err, ReconcileError::MalformedRow { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.csv");
        std::fs::write(&path, "scanner-east,r1,10.0.1.0,255.255.255.0,10.0.0.1\n").unwrap();

        let changes = load_route_changes(&path).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].entry.category(), Category::Routes);
    }

    #[test]
    fn test_missing_file() {
        let err = load_vlan_changes(Path::new("/nonexistent/vlans.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/vlans.csv"));
        assert!(matches!(
            err,
            ReconcileError::OpenChangeList { ref path, .. } if path == Path::new("/nonexistent/vlans.csv")
        ));
    }
}
