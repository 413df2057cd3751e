use mailing_archive::*;
use std::collections::HashSet;

fn message(headers: &[(&str, &str)]) -> Message {
    headers
        .iter()
        .fold(Message::new(), |m, (k, v)| m.with_header(*k, *v))
}

fn column_set(table: &Table) -> HashSet<&str> {
    table.column_names().collect()
}

fn list_a() -> MailingList {
    MailingList::new(
        "A",
        vec![message(&[
            ("Message-ID", "m1"),
            ("Date", "Mon, 01 Jan 2001 10:00:00 +0000"),
            ("Subject", "s1"),
        ])],
    )
}

fn list_b() -> MailingList {
    MailingList::new("B", vec![message(&[("Message-ID", "m2"), ("From", "f2")])])
}

#[test]
fn test_two_list_scenario() {
    let merged = merge_lists(&[list_a(), list_b()], false).unwrap();
    let table = &merged.table;

    assert_eq!(merged.total_rows, 2);
    assert_eq!(table.len(), 2);
    assert_eq!(
        column_set(table),
        HashSet::from(["message-id", "date", "subject", "from", MAILING_LIST])
    );
    assert_eq!(table.get(0, "from"), Some(&Value::Null));
    assert_eq!(table.get(1, "date"), Some(&Value::Null));
    assert_eq!(table.get(1, "subject"), Some(&Value::Null));
    assert_eq!(table.get(1, "from"), Some(&Value::from("f2")));
    assert_eq!(
        table.column(MAILING_LIST).unwrap(),
        &[Value::from("A"), Value::from("B")]
    );
}

#[test]
fn test_no_column_is_lost() {
    let a = list_a();
    let b = list_b();
    let left = normalize_list(&a.messages, true).unwrap();
    let right = normalize_list(&b.messages, true).unwrap();

    let merged = merge_lists(&[a, b], true).unwrap();

    let mut expected: HashSet<&str> = column_set(&left);
    expected.extend(column_set(&right));
    expected.insert(MAILING_LIST);
    assert_eq!(column_set(&merged.table), expected);
}

#[test]
fn test_column_from_second_list_is_padded() {
    let a = MailingList::new(
        "A",
        vec![message(&[("Subject", "a1")]), message(&[("Subject", "a2")])],
    );
    let b = MailingList::new(
        "B",
        vec![
            message(&[("Subject", "b1"), ("X-Label", "x1")]),
            message(&[("Subject", "b2"), ("X-Label", "x2")]),
            message(&[("Subject", "b3"), ("X-Label", "x3")]),
        ],
    );

    let merged = merge_lists(&[a, b], false).unwrap();

    assert_eq!(
        merged.table.column("x-label").unwrap(),
        &[
            Value::Null,
            Value::Null,
            Value::from("x1"),
            Value::from("x2"),
            Value::from("x3"),
        ]
    );
}

#[test]
fn test_column_missing_from_middle_list() {
    let a = MailingList::new("A", vec![message(&[("Subject", "a")])]);
    let b = MailingList::new("B", vec![message(&[("From", "b")])]);
    let c = MailingList::new("C", vec![message(&[("Subject", "c")])]);

    let merged = merge_lists(&[a, b, c], false).unwrap();

    assert_eq!(
        merged.table.column("subject").unwrap(),
        &[Value::from("a"), Value::Null, Value::from("c")]
    );
    assert_eq!(
        merged.table.column("from").unwrap(),
        &[Value::Null, Value::from("b"), Value::Null]
    );
}

#[test]
fn test_every_column_matches_total_rows() {
    let lists = vec![
        list_a(),
        MailingList::new("empty", Vec::new()),
        list_b(),
        MailingList::new("C", vec![Message::new(), message(&[("X-Other", "o")])]),
    ];

    let merged = merge_lists(&lists, true).unwrap();

    assert_eq!(merged.total_rows, 4);
    for (name, values) in merged.table.columns() {
        assert_eq!(values.len(), 4, "column {name}");
    }
}

#[test]
fn test_mailing_list_header_does_not_clash() {
    let a = MailingList::new("A", vec![message(&[("Mailing-List", "contact a-help")])]);
    let b = MailingList::new("B", vec![message(&[("Mailing-List", "contact b-help")])]);

    let merged = merge_lists(&[a, b], false).unwrap();

    assert_eq!(
        merged.table.column(MAILING_LIST).unwrap(),
        &[Value::from("A"), Value::from("B")]
    );
}

#[test]
fn test_duplicate_message_ids_are_kept() {
    let a = MailingList::new("A", vec![message(&[("Message-ID", "dup")])]);
    let b = MailingList::new("B", vec![message(&[("Message-ID", "dup")])]);

    let merged = merge_lists(&[a, b], false).unwrap();

    assert_eq!(merged.total_rows, 2);
}

#[test]
fn test_accumulator_fold_steps() {
    let first = normalize_list(&list_a().messages, false).unwrap();
    let second = normalize_list(&list_b().messages, false).unwrap();

    let acc = ArchiveAccumulator::new().fold("A", first).unwrap();
    assert_eq!(acc.len(), 1);
    assert_eq!(acc.lists(), 1);
    assert!(acc.table().contains_column(MAILING_LIST));

    let acc = acc.fold("B", second).unwrap();
    assert_eq!(acc.len(), 2);
    assert_eq!(acc.lists(), 2);
    assert!(acc.table().validate().is_ok());
}

#[test]
fn test_merge_nothing() {
    let merged = merge_lists(&[], true).unwrap();

    assert_eq!(merged.total_rows, 0);
    assert_eq!(merged.table.width(), 0);
}
