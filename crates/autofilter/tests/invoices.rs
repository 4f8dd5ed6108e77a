//! Filter and sort scenarios over a small invoice ledger.
//!
//! The source rows are projected onto [`InvoiceRow`] before any criterion is
//! applied, the way a list endpoint narrows its entity to a response shape.

#![allow(dead_code)] // Some fields exist only to be skipped or projected away

use autofilter::{
    AutoFilterError, DateMatching, Engine, ErrorKind, Filter, MemoryQuery, Operator, Options,
    QueryExt, Record, Sort,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone)]
struct InvoiceDetail {
    goods: &'static str,
    unit_price: Decimal,
    quantity: Decimal,
}

#[derive(Debug, Clone, Record)]
#[filter(rename_all = "PascalCase")]
struct Invoice {
    id: u32,
    number: String,
    #[filter(rename = "Type")]
    kind: String,
    status: String,
    due_date: NaiveDateTime,
    sent_date: Option<NaiveDateTime>,
    vat_base: Decimal,
    vat: Decimal,
    total: Decimal,
    is_paid: bool,
    #[filter(skip)]
    details: Vec<InvoiceDetail>,
}

#[derive(Debug, Clone, Record)]
#[filter(rename_all = "PascalCase")]
struct InvoiceRow {
    number: String,
    #[filter(rename = "Type")]
    kind: String,
    status: String,
    due_date: NaiveDateTime,
    sent_date: Option<NaiveDateTime>,
    total: Decimal,
    is_paid: bool,
}

impl From<Invoice> for InvoiceRow {
    fn from(invoice: Invoice) -> Self {
        InvoiceRow {
            number: invoice.number,
            kind: invoice.kind,
            status: invoice.status,
            due_date: invoice.due_date,
            sent_date: invoice.sent_date,
            total: invoice.total,
            is_paid: invoice.is_paid,
        }
    }
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn detail(goods: &'static str, unit_price: &str, quantity: &str) -> InvoiceDetail {
    InvoiceDetail {
        goods,
        unit_price: dec(unit_price),
        quantity: dec(quantity),
    }
}

#[allow(clippy::too_many_arguments)]
fn invoice(
    id: u32,
    number: &str,
    kind: &str,
    status: &str,
    due: &str,
    sent: Option<&str>,
    amounts: [&str; 3],
    is_paid: bool,
    details: Vec<InvoiceDetail>,
) -> Invoice {
    Invoice {
        id,
        number: number.into(),
        kind: kind.into(),
        status: status.into(),
        due_date: at(due),
        sent_date: sent.map(at),
        vat_base: dec(amounts[0]),
        vat: dec(amounts[1]),
        total: dec(amounts[2]),
        is_paid,
        details,
    }
}

/// Six documents, in id order.
fn ledger() -> Vec<Invoice> {
    vec![
        invoice(
            1,
            "INV-1001",
            "Invoice",
            "Sent",
            "2025-10-02 15:00",
            Some("2025-09-16 10:00"),
            ["20", "4", "24"],
            true,
            vec![detail("Goods 1", "100", "2"), detail("Goods 2", "50", "1")],
        ),
        invoice(
            2,
            "INV-1002",
            "Invoice",
            "Draft",
            "2025-09-27 00:00",
            None,
            ["10", "2", "12"],
            false,
            vec![detail("Goods 3", "200", "1"), detail("Goods 4", "20", "3")],
        ),
        invoice(
            3,
            "CRN-1001",
            "Credit Note",
            "Sent",
            "2025-09-17 07:30",
            Some("2025-09-07 12:00"),
            ["-5", "-1", "-6"],
            false,
            vec![detail("Goods 2", "50", "-1"), detail("Goods 5", "25", "-1")],
        ),
        invoice(
            4,
            "CRN-1002",
            "Credit Note",
            "Draft",
            "2025-09-17 09:00",
            None,
            ["-8", "-1.6", "-9.6"],
            false,
            vec![detail("Goods 6", "80", "-1")],
        ),
        invoice(
            5,
            "INV-1003",
            "Invoice",
            "Sent",
            "2025-09-22 10:00",
            Some("2025-09-12 08:15"),
            ["15", "3", "18"],
            true,
            vec![detail("Goods 7", "150", "1"), detail("Goods 8", "30", "1")],
        ),
        invoice(
            6,
            "INV-1004",
            "Invoice",
            "Draft",
            "2025-10-02 16:00",
            None,
            ["5", "1", "6"],
            false,
            vec![detail("Goods 9", "5", "1")],
        ),
    ]
}

fn invoices() -> MemoryQuery<Invoice> {
    MemoryQuery::new(ledger())
}

fn rows() -> MemoryQuery<InvoiceRow> {
    invoices().select(InvoiceRow::from)
}

fn first_number(filter: Filter) -> Option<String> {
    rows().apply_filter(&filter).unwrap().first().map(|r| r.number)
}

fn first_total(op: Operator, value: &str) -> Option<Decimal> {
    rows()
        .apply_filter(&Filter::new("total", op, value))
        .unwrap()
        .first()
        .map(|r| r.total)
}

fn first_due(engine: Engine, op: Operator, value: &str) -> Option<NaiveDateTime> {
    let sorted = engine.apply_sort(&rows(), &Sort::asc("DueDate")).unwrap();
    engine
        .apply_filter(&sorted, &Filter::new("duedate", op, value))
        .unwrap()
        .first()
        .map(|r| r.due_date)
}

fn numbers(rows: &[InvoiceRow]) -> Vec<&str> {
    rows.iter().map(|r| r.number.as_str()).collect()
}

// =============================================================================
// Field resolution
// =============================================================================

#[test]
fn blank_field_is_rejected() {
    for field in ["", "\t", " ", "\u{a0}"] {
        let err = rows().apply_filter(&Filter::eq(field, "Value")).unwrap_err();
        assert_eq!(err, AutoFilterError::EmptyField, "{field:?}");

        let err = rows().apply_sort(&Sort::asc(field)).unwrap_err();
        assert_eq!(err, AutoFilterError::EmptyField, "{field:?}");
    }
}

#[test]
fn blank_field_is_skipped_when_permissive() {
    let engine = Engine::permissive();
    for field in ["", "\t", " ", "\u{a0}"] {
        let query = engine.apply_filter(&rows(), &Filter::eq(field, "Value")).unwrap();
        assert_eq!(query.count(), 6);

        let query = engine.apply_sort(&rows(), &Sort::desc(field)).unwrap();
        assert_eq!(numbers(&query.to_vec())[0], "INV-1001");
    }
}

#[test]
fn unknown_field_is_rejected() {
    for field in ["gibberish", "nUmBer ", " nUmBer"] {
        let err = rows().apply_filter(&Filter::eq(field, "Value")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField, "{field:?}");

        let err = rows().apply_sort(&Sort::asc(field)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField, "{field:?}");
    }
}

#[test]
fn skipped_and_projected_away_fields_are_unknown() {
    let err = invoices()
        .select(|i| i)
        .apply_filter(&Filter::eq("Details", "x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);

    let err = rows().apply_filter(&Filter::eq("VatBase", "20")).unwrap_err();
    assert_eq!(err.to_string(), "unknown field 'VatBase' on InvoiceRow");
}

#[test]
fn unprojected_query_is_rejected() {
    let err = invoices()
        .apply_filter(&Filter::eq("Number", "Value"))
        .unwrap_err();
    assert_eq!(err, AutoFilterError::MissingProjection { step: "filter" });

    let err = invoices().apply_sort(&Sort::asc("Number")).unwrap_err();
    assert_eq!(err, AutoFilterError::MissingProjection { step: "sort" });
}

// =============================================================================
// Values and operators
// =============================================================================

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        ("SentDate", "2025-13-13"),
        ("SentDate", "2025-03-33"),
        ("SentDate", "20250333"),
        ("SentDate", "random"),
        ("IsPaid", "random"),
        ("Total", "random"),
    ];

    for (field, value) in cases {
        let err = rows().apply_filter(&Filter::eq(field, value)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueFormat, "{field} = {value}");
    }
}

#[test]
fn null_value_requires_nullable_field() {
    let err = rows()
        .apply_filter(&Filter::null("Total", Operator::Equal))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullValue);

    let unsent = rows()
        .apply_filter(&Filter::null("SentDate", Operator::Equal))
        .unwrap()
        .to_vec();
    assert_eq!(numbers(&unsent), ["INV-1002", "CRN-1002", "INV-1004"]);

    let sent = rows()
        .apply_filter(&Filter::null("SentDate", Operator::NotEqual))
        .unwrap()
        .to_vec();
    assert_eq!(numbers(&sent), ["INV-1001", "CRN-1001", "INV-1003"]);
}

#[test]
fn invalid_operators_are_rejected() {
    let cases = [
        ("number", Operator::GreaterThan, "INV"),
        ("total", Operator::Contains, "24"),
        ("DueDate", Operator::Contains, "2025-09-02"),
        ("SentDate", Operator::Contains, "2025-09-02"),
        ("ispaid", Operator::LessThanOrEqual, "true"),
    ];

    for (field, op, value) in cases {
        let err = rows()
            .apply_filter(&Filter::new(field, op, value))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator, "{field} {op}");
    }

    let err = rows()
        .apply_filter(&Filter::contains("total", "24"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid operator [Contains] provided for value type [decimal]"
    );
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn text_filters_ignore_case() {
    let cases = [
        (Operator::NotContains, "INV", Some("CRN")),
        (Operator::NotContains, "inv", Some("CRN")),
        (Operator::NotContains, "IN", Some("CRN")),
        (Operator::NotContains, "in", Some("CRN")),
        (Operator::NotContains, "DEP", Some("INV")),
        (Operator::NotEqual, "DEP-1001", Some("INV-1001")),
        (Operator::NotEqual, "INV-1001", Some("INV-1002")),
        (Operator::NotEqual, "inv-1001", Some("INV-1002")),
        (Operator::Contains, "DEP", None),
        (Operator::Contains, "INV", Some("INV")),
        (Operator::Contains, "inv", Some("INV")),
        (Operator::Contains, "IN", Some("INV")),
        (Operator::Contains, "in", Some("INV")),
        (Operator::Equal, "INV-1001", Some("INV")),
        (Operator::Equal, "inv-1001", Some("INV")),
        (Operator::Equal, "DEP-1001", None),
    ];

    for (op, value, expected_prefix) in cases {
        let found = first_number(Filter::new("Number", op, value));
        match expected_prefix {
            Some(prefix) => {
                let number = found.unwrap_or_default();
                assert!(number.starts_with(prefix), "{op} {value}: got {number}");
            }
            None => assert_eq!(found, None, "{op} {value}"),
        }
    }
}

// =============================================================================
// Numbers
// =============================================================================

#[test]
fn number_filters_compare_exactly() {
    let cases = [
        (Operator::GreaterThan, "18", Some("24")),
        (Operator::GreaterThan, "24", None),
        (Operator::GreaterThan, "-9.6", Some("24")),
        (Operator::GreaterThan, "-9,6", Some("24")),
        (Operator::GreaterThanOrEqual, "24", Some("24")),
        (Operator::GreaterThanOrEqual, "25", None),
        (Operator::GreaterThanOrEqual, "-9.6", Some("24")),
        (Operator::GreaterThanOrEqual, "-9,6", Some("24")),
        (Operator::LessThan, "24", Some("12")),
        (Operator::LessThan, "-10", None),
        (Operator::LessThan, "-9.6", None),
        (Operator::LessThan, "-9,6", None),
        (Operator::LessThanOrEqual, "24", Some("24")),
        (Operator::LessThanOrEqual, "-10", None),
        (Operator::LessThanOrEqual, "-9.6", Some("-9.6")),
        (Operator::LessThanOrEqual, "-9,6", Some("-9.6")),
        (Operator::Equal, "12", Some("12")),
        (Operator::Equal, "35", None),
        (Operator::Equal, "-9.6", Some("-9.6")),
        (Operator::Equal, "-9,6", Some("-9.6")),
        (Operator::NotEqual, "24", Some("12")),
        (Operator::NotEqual, "65", Some("24")),
        (Operator::NotEqual, "-9.6", Some("24")),
        (Operator::NotEqual, "-9,6", Some("24")),
    ];

    for (op, value, expected) in cases {
        assert_eq!(
            first_total(op, value),
            expected.map(dec),
            "total {op} {value}"
        );
    }
}

// =============================================================================
// Dates
// =============================================================================

#[test]
fn date_filters_use_day_buckets() {
    let engine = Engine::default();
    let cases = [
        (Operator::Equal, "2025-09-27 00:00", Some("2025-09-27 00:00")),
        (Operator::Equal, "2025-09-29 21:00", None),
        (Operator::Equal, "2025-09-17 23:59", Some("2025-09-17 07:30")),
        (Operator::NotEqual, "2025-10-02 16:00", Some("2025-09-17 07:30")),
        (Operator::NotEqual, "2025-09-17", Some("2025-09-22 10:00")),
        // GreaterThan excludes the whole boundary day
        (Operator::GreaterThan, "2025-09-17 07:30", Some("2025-09-22 10:00")),
        (Operator::GreaterThan, "2025-10-10 07:30", None),
        (Operator::GreaterThanOrEqual, "2025-09-17 08:00", Some("2025-09-17 07:30")),
        (Operator::GreaterThanOrEqual, "2025-10-17 08:00", None),
        (Operator::LessThan, "2025-09-22 11:00", Some("2025-09-17 07:30")),
        (Operator::LessThan, "2025-09-17 11:00", None),
        (Operator::LessThanOrEqual, "2025-09-17 06:00", Some("2025-09-17 07:30")),
        (Operator::LessThanOrEqual, "2025-09-16 23:00", None),
    ];

    for (op, value, expected) in cases {
        assert_eq!(
            first_due(engine, op, value),
            expected.map(at),
            "duedate {op} {value}"
        );
    }
}

#[test]
fn date_equality_spans_the_day() {
    let both = rows()
        .apply_filter(&Filter::eq("DueDate", "2025-10-02"))
        .unwrap();
    assert_eq!(numbers(&both.to_vec()), ["INV-1001", "INV-1004"]);

    let rest = rows()
        .apply_filter(&Filter::ne("DueDate", "2025-10-02 12:00"))
        .unwrap();
    assert_eq!(rest.count(), 4);
}

#[test]
fn date_filters_compare_instants_when_timed() {
    let engine = Engine::new(Options::new().date_matching(DateMatching::ExactWhenTimed));
    let cases = [
        (Operator::Equal, "2025-09-27 00:00", Some("2025-09-27 00:00")),
        (Operator::Equal, "2025-09-29 21:00", None),
        (Operator::NotEqual, "2025-10-02 16:00", Some("2025-09-17 07:30")),
        (Operator::NotEqual, "2025-10-02 15:00", Some("2025-09-17 07:30")),
        (Operator::GreaterThan, "2025-09-17 07:30", Some("2025-09-17 09:00")),
        (Operator::GreaterThan, "2025-10-10 07:30", None),
        (Operator::GreaterThanOrEqual, "2025-09-17 07:30", Some("2025-09-17 07:30")),
        (Operator::GreaterThanOrEqual, "2025-09-17 08:00", Some("2025-09-17 09:00")),
        (Operator::GreaterThanOrEqual, "2025-10-17 08:00", None),
        (Operator::LessThan, "2025-09-22 11:00", Some("2025-09-17 07:30")),
        (Operator::LessThan, "2025-09-10 11:00", None),
        (Operator::LessThanOrEqual, "2025-09-22 11:00", Some("2025-09-17 07:30")),
        (Operator::LessThanOrEqual, "2025-09-22 10:00", Some("2025-09-17 07:30")),
        (Operator::LessThanOrEqual, "2025-09-01 10:00", None),
    ];

    for (op, value, expected) in cases {
        assert_eq!(
            first_due(engine, op, value),
            expected.map(at),
            "duedate {op} {value}"
        );
    }
}

#[test]
fn nullable_dates_skip_missing_values() {
    let sent_early = rows()
        .apply_filter(&Filter::lt("SentDate", "2025-09-13"))
        .unwrap()
        .to_vec();
    assert_eq!(numbers(&sent_early), ["CRN-1001", "INV-1003"]);

    // Unsent documents have no sent date, so they differ from any date
    let not_on_day = rows()
        .apply_filter(&Filter::ne("SentDate", "2025-09-16"))
        .unwrap()
        .to_vec();
    assert_eq!(
        numbers(&not_on_day),
        ["INV-1002", "CRN-1001", "CRN-1002", "INV-1003", "INV-1004"]
    );
}

// =============================================================================
// Booleans
// =============================================================================

#[test]
fn bool_filters() {
    let cases = [
        (Operator::Equal, "true", true),
        (Operator::Equal, "false", false),
        (Operator::NotEqual, "false", true),
        (Operator::NotEqual, "TRUE", false),
    ];

    for (op, value, expected) in cases {
        let found = rows()
            .apply_filter(&Filter::new("ispaid", op, value))
            .unwrap()
            .first()
            .map(|r| r.is_paid);
        assert_eq!(found, Some(expected), "ispaid {op} {value}");
    }
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn sequential_filters_are_anded() {
    let cases = [
        (
            Filter::eq("status", "sent"),
            Filter::gte("duedate", "2025-10-02 15:00"),
            "INV-1001",
        ),
        (
            Filter::eq("type", "invoice"),
            Filter::ne("ispaid", "false"),
            "INV-1001",
        ),
    ];

    for (first, second, expected) in cases {
        let found = invoices()
            .select(|i| i)
            .apply_filter(&first)
            .unwrap()
            .apply_filter(&second)
            .unwrap()
            .first()
            .map(|i| i.number);
        assert_eq!(found.as_deref(), Some(expected));
    }
}

#[test]
fn timed_range_within_one_day() {
    let filters = [
        Filter::gt("duedate", "2025-09-17 07:30"),
        Filter::lte("duedate", "2025-09-17 09:00"),
    ];

    let exact = Engine::new(Options::new().date_matching(DateMatching::ExactWhenTimed));
    let query = invoices().select(|i| i);
    let found = exact.apply_filters(&query, &filters).unwrap().to_vec();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].number, "CRN-1002");

    // Day buckets make "after the 17th" and "on or before the 17th" disjoint
    let bucketed = query.apply_filters(&filters).unwrap();
    assert_eq!(bucketed.count(), 0);
}

#[test]
fn filters_and_sorts_interleave() {
    let result = rows()
        .apply_filter(&Filter::eq("Type", "Invoice"))
        .unwrap()
        .apply_sort(&Sort::desc("Total"))
        .unwrap()
        .apply_filter(&Filter::gt("Total", "10"))
        .unwrap()
        .to_vec();

    assert_eq!(numbers(&result), ["INV-1001", "INV-1003", "INV-1002"]);
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn sort_by_number() {
    let asc = rows().apply_sort(&Sort::asc("Number")).unwrap().to_vec();
    assert_eq!(
        numbers(&asc),
        ["CRN-1001", "CRN-1002", "INV-1001", "INV-1002", "INV-1003", "INV-1004"]
    );

    let desc = rows().apply_sort(&Sort::desc("number")).unwrap().to_vec();
    assert_eq!(
        numbers(&desc),
        ["INV-1004", "INV-1003", "INV-1002", "INV-1001", "CRN-1002", "CRN-1001"]
    );
}

#[test]
fn second_sort_breaks_ties_of_the_first() {
    let result = rows()
        .apply_sort(&Sort::asc("Type"))
        .unwrap()
        .apply_sort(&Sort::desc("Number"))
        .unwrap()
        .to_vec();

    let pairs: Vec<_> = result
        .iter()
        .map(|r| (r.kind.as_str(), r.number.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("Credit Note", "CRN-1002"),
            ("Credit Note", "CRN-1001"),
            ("Invoice", "INV-1004"),
            ("Invoice", "INV-1003"),
            ("Invoice", "INV-1002"),
            ("Invoice", "INV-1001"),
        ]
    );
}

#[test]
fn sort_nullable_puts_missing_first() {
    let result = rows()
        .apply_sorts(&[Sort::asc("SentDate"), Sort::asc("Number")])
        .unwrap()
        .to_vec();
    assert_eq!(
        numbers(&result),
        ["CRN-1002", "INV-1002", "INV-1004", "CRN-1001", "INV-1003", "INV-1001"]
    );
}

#[test]
fn sort_before_projection_does_not_make_a_tie_breaker() {
    let upstream = invoices()
        .select(|i| i)
        .apply_sort(&Sort::desc("Id"))
        .unwrap();

    // Upstream order only breaks ties of the new primary key
    let result = upstream
        .select(InvoiceRow::from)
        .apply_sort(&Sort::asc("Type"))
        .unwrap()
        .to_vec();

    assert_eq!(
        numbers(&result),
        ["CRN-1002", "CRN-1001", "INV-1004", "INV-1003", "INV-1002", "INV-1001"]
    );
}

#[test]
fn generated_constants_name_fields() {
    assert_eq!(InvoiceRow::NUMBER, "Number");
    assert_eq!(InvoiceRow::KIND, "Type");
    assert_eq!(InvoiceRow::DUE_DATE, "DueDate");
    assert_eq!(Invoice::VAT_BASE, "VatBase");

    let found = rows()
        .apply_filter(&Filter::eq(InvoiceRow::KIND, "credit note"))
        .unwrap()
        .apply_sort(&Sort::desc(InvoiceRow::TOTAL))
        .unwrap()
        .first()
        .map(|r| r.number);
    assert_eq!(found.as_deref(), Some("CRN-1001"));
}

#[test]
fn date_values_only_parse_real_calendar_days() {
    let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert!(rows()
        .apply_filter(&Filter::eq("DueDate", leap.to_string()))
        .is_ok());
    assert!(rows()
        .apply_filter(&Filter::eq("DueDate", "2025-02-29"))
        .is_err());
}
