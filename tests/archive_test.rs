use mailing_archive::*;

fn message(id: &str, date: Option<&str>) -> Message {
    let message = Message::new()
        .with_header("Message-ID", id)
        .with_header("Subject", format!("about {id}"));
    match date {
        Some(date) => message.with_header("Date", date),
        None => message,
    }
}

const DATE_A: &str = "Mon, 01 Jan 2001 10:00:00 +0000";
const DATE_B: &str = "Tue, 02 Jan 2001 11:30:00 +0100";

#[test]
fn test_archive_indexes_message_ids() {
    let lists = vec![
        MailingList::new("A", vec![message("<1@x>", Some(DATE_A)), message("<2@x>", Some(DATE_B))]),
        MailingList::new("B", vec![message("<3@x>", Some(DATE_A))]),
    ];

    let archive = ArchiveTable::from_lists(&lists, &IngestOptions::default()).unwrap();

    assert_eq!(archive.len(), 3);
    assert_eq!(archive.merged_rows(), 3);
    assert_eq!(archive.rows_for_message_id("<3@x>"), &[2]);
    assert!(archive.rows_for_message_id("<missing@x>").is_empty());
    assert_eq!(archive.message_ids().count(), 3);
    assert!(archive.table().get(1, DATE).unwrap().as_date().is_some());
}

#[test]
fn test_archive_permits_duplicate_ids() {
    let lists = vec![
        MailingList::new("A", vec![message("<dup@x>", Some(DATE_A))]),
        MailingList::new("B", vec![message("<dup@x>", Some(DATE_B))]),
    ];

    let archive = ArchiveTable::from_lists(&lists, &IngestOptions::default()).unwrap();

    assert_eq!(archive.rows_for_message_id("<dup@x>"), &[0, 1]);
    let duplicates: Vec<_> = archive.duplicate_message_ids().collect();
    assert_eq!(duplicates, vec![("<dup@x>", &[0_usize, 1][..])]);
}

#[test]
fn test_archive_drops_undated_rows_by_default() {
    let lists = vec![
        MailingList::new("A", vec![message("<1@x>", Some(DATE_A))]),
        MailingList::new("B", vec![message("<2@x>", None)]),
    ];

    let archive = ArchiveTable::from_lists(&lists, &IngestOptions::default()).unwrap();

    assert_eq!(archive.len(), 1);
    assert_eq!(archive.merged_rows(), 2);
    assert!(archive.rows_for_message_id("<2@x>").is_empty());
}

#[test]
fn test_archive_keeps_undated_rows_on_request() {
    let lists = vec![
        MailingList::new("A", vec![message("<1@x>", Some(DATE_A))]),
        MailingList::new("B", vec![message("<2@x>", None)]),
    ];
    let options = IngestOptions::from_json(r#"{ "filter_undated": false }"#).unwrap();

    let archive = ArchiveTable::from_lists(&lists, &options).unwrap();
    let table = archive.table();

    assert_eq!(archive.len(), 2);
    assert_eq!(archive.rows_for_message_id("<2@x>"), &[1]);
    assert!(table.get(1, DATE).unwrap().is_null());
    assert_eq!(table.get(1, MAILING_LIST), Some(&Value::from("B")));
}

#[test]
fn test_archive_aborts_on_bad_date() {
    let lists = vec![MailingList::new("A", vec![message("<1@x>", Some("sometime last week"))])];

    let result = ArchiveTable::from_lists(&lists, &IngestOptions::default());

    assert!(matches!(result, Err(IngestError::DateParse { row: 0, .. })));
}

#[test]
fn test_archive_requires_message_id_column() {
    let lists = vec![MailingList::new(
        "A",
        vec![Message::new().with_header("Date", DATE_A)],
    )];

    let result = ArchiveTable::from_lists(&lists, &IngestOptions::default());

    assert!(matches!(result, Err(IngestError::MissingColumn(c)) if c == MESSAGE_ID));
}

#[test]
fn test_options_from_json() {
    let options = IngestOptions::from_json(
        r#"{ "include_body": false, "date_failure": "skip_row" }"#,
    )
    .unwrap();

    assert!(!options.include_body);
    assert_eq!(options.date_failure, DateFailurePolicy::SkipRow);
    assert!(options.filter_undated);
}

#[test]
fn test_options_reject_unknown_policy() {
    assert!(matches!(
        IngestOptions::from_json(r#"{ "date_failure": "retry" }"#),
        Err(IngestError::Json(_))
    ));
}
