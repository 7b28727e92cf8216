use chrono::{Duration, TimeZone, Utc};

use super::*;
use crate::QueryLimits;

fn student(id: &str, name: &str, age: Option<i32>) -> Student {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date");
    let offset = id.trim_start_matches('s').parse::<i64>().unwrap_or(0);
    let mut builder = Student::builder(id)
        .name(name)
        .email(format!("{}@school.test", name.to_lowercase()))
        .address("Jl. Merdeka, Bandung")
        .created_at(base + Duration::days(offset));
    if let Some(age) = age {
        builder = builder.age(age);
    }
    builder.build()
}

fn roster() -> Vec<Student> {
    vec![
        student("s1", "Ana", Some(20)),
        student("s2", "Budi", Some(25)),
        student("s3", "Cici", None),
        student("s4", "Dewi", Some(125)),
        student("s5", "Eko", Some(31)),
    ]
}

fn names(records: &[Student]) -> Vec<&str> {
    records.iter().map(|s| s.name.as_deref().unwrap_or("")).collect()
}

#[test]
fn blank_term_matches_everything() {
    for term in [None, Some(""), Some("   ")] {
        let filter = StudentFilter::new(term, AgeMatch::Exact);
        assert!(filter.is_match_all());
        assert!(roster().iter().all(|s| filter.matches(s)));
    }
}

#[test]
fn empty_term_result_is_sorted_paginated_full_set() {
    let records = roster();
    let page = Page { offset: 1, limit: 2 };
    let out = apply(&records, &StudentFilter::all(), SortSpec::default(), Some(page));
    assert_eq!(names(&out), vec!["Budi", "Cici"]);
}

#[test]
fn text_match_is_case_insensitive_substring() {
    let filter = StudentFilter::new(Some("BUD"), AgeMatch::Exact);
    let out = apply(&roster(), &filter, SortSpec::default(), None);
    assert_eq!(names(&out), vec!["Budi"]);

    let by_email = StudentFilter::new(Some("school.TEST"), AgeMatch::Exact);
    assert_eq!(apply(&roster(), &by_email, SortSpec::default(), None).len(), 5);
}

#[test]
fn recall_holds_for_every_substring_of_name() {
    let records = roster();
    for record in &records {
        let name = record.name.as_deref().unwrap_or_default();
        for start in 0..name.len() {
            let term = &name[start..];
            let filter = StudentFilter::new(Some(term), AgeMatch::Exact);
            let out = apply(&records, &filter, SortSpec::default(), None);
            assert!(out.iter().any(|s| s.id == record.id), "{term} must match {}", record.id);
        }
    }
}

#[test]
fn numeric_term_server_vs_client_divergence() {
    let mut records = roster();
    records.push(
        Student::builder("s9").name("Fajar").email("fajar@school.test").address("Solo").age(52).build(),
    );

    // Server: age == 25, or "25" inside a text field.
    let server = StudentFilter::new(Some("25"), AgeMatch::Exact);
    assert_eq!(server.age_equals(), Some(25));
    let fajar = records.last().expect("fajar");
    assert!(!server.matches(fajar), "52 is not equal to 25");
    assert!(server.matches(&records[1]), "Budi is 25");
    assert!(!server.matches(&records[3]), "125 is not equal to 25");
    let mut in_address = records[0].clone();
    in_address.address = Some("Blok 25".to_owned());
    assert!(server.matches(&in_address));

    // Client: stringified age must contain "25".
    let client = StudentFilter::new(Some("25"), AgeMatch::Substring);
    assert_eq!(client.age_equals(), None);
    assert!(client.matches(&records[3]), "125 contains 25");
    assert!(!client.matches(fajar), "52 does not contain 25");

    let exact_only = StudentFilter::new(Some("125"), AgeMatch::Exact);
    let dewi_like = Student::builder("s10").name("Gita").age(125).build();
    assert!(exact_only.matches(&dewi_like));
    let not_exact = StudentFilter::new(Some("12"), AgeMatch::Exact);
    assert!(!not_exact.matches(&dewi_like));
    assert!(StudentFilter::new(Some("12"), AgeMatch::Substring).matches(&dewi_like));
}

#[test]
fn numeric_term_parsing() {
    assert_eq!(parse_numeric_term("25"), Some(25));
    assert_eq!(parse_numeric_term(" 25 "), Some(25));
    assert_eq!(parse_numeric_term("25.0"), Some(25));
    assert_eq!(parse_numeric_term("1e2"), Some(100));
    assert_eq!(parse_numeric_term("2.5"), None);
    assert_eq!(parse_numeric_term("inf"), None);
    assert_eq!(parse_numeric_term("NaN"), None);
    assert_eq!(parse_numeric_term("Ana"), None);
    assert_eq!(parse_numeric_term("99999999999"), None);
}

#[test]
fn filtering_is_idempotent() {
    let filter = StudentFilter::new(Some("a"), AgeMatch::Substring);
    let once = apply(&roster(), &filter, SortSpec::default(), None);
    let twice = apply(&once, &filter, SortSpec::default(), None);
    assert_eq!(once, twice);
}

#[test]
fn missing_sort_key_trails_under_desc() {
    let records = vec![
        student("s1", "Ana", Some(20)),
        student("s2", "Budi", Some(25)),
        student("s3", "Cici", None),
    ];
    let spec = SortSpec::new(SortField::Age, SortOrder::Desc);
    let out = apply(&records, &StudentFilter::all(), spec, None);
    assert_eq!(names(&out), vec!["Budi", "Ana", "Cici"]);

    let spec = SortSpec::new(SortField::Age, SortOrder::Asc);
    let out = apply(&records, &StudentFilter::all(), spec, None);
    assert_eq!(names(&out), vec!["Ana", "Budi", "Cici"]);
}

#[test]
fn missing_name_trails_under_desc() {
    let mut nameless = student("s3", "x", Some(40));
    nameless.name = None;
    let records = vec![student("s1", "Ana", Some(20)), student("s2", "Budi", Some(25)), nameless];
    let spec = SortSpec::new(SortField::Name, SortOrder::Desc);
    let out = apply(&records, &StudentFilter::all(), spec, None);
    let ids: Vec<&str> = out.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s1", "s3"]);
}

#[test]
fn every_field_and_direction_yields_monotonic_sequence() {
    let records = roster();
    for field in SortField::ALL {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let spec = SortSpec::new(field, order);
            let out = apply(&records, &StudentFilter::all(), spec, None);
            for pair in out.windows(2) {
                assert_ne!(
                    compare_students(&pair[0], &pair[1], spec),
                    std::cmp::Ordering::Greater,
                    "{field} {order} out of order"
                );
            }
            let first_null = out.iter().position(|s| field.value_of(s).is_none());
            if let Some(pos) = first_null {
                assert!(out[pos..].iter().all(|s| field.value_of(s).is_none()));
            }
        }
    }
}

#[test]
fn created_at_sorts_by_instant() {
    let spec = SortSpec::new(SortField::CreatedAt, SortOrder::Desc);
    let out = apply(&roster(), &StudentFilter::all(), spec, None);
    let ids: Vec<&str> = out.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s5", "s4", "s3", "s2", "s1"]);
}

#[test]
fn collation_ignores_case_and_accents() {
    use std::cmp::Ordering;
    assert_eq!(collate("ana", "Budi"), Ordering::Less);
    assert_eq!(collate("Élodie", "Fajar"), Ordering::Less);
    assert_ne!(collate("zoe", "Zoë"), Ordering::Equal);
    assert_eq!(collate("zoe", "Zoë").reverse(), collate("Zoë", "zoe"));
    assert_ne!(collate("Ana", "ana"), Ordering::Equal);
}

#[test]
fn mixed_sort_values_fall_back_to_text() {
    use std::cmp::Ordering;
    assert_eq!(SortValue::Number(10).compare(&SortValue::Text("9")), Ordering::Less);
    assert_eq!(SortValue::Text("b").compare(&SortValue::Text("a")), Ordering::Greater);
}

#[test]
fn consecutive_pages_are_disjoint_and_concatenate() {
    let records = roster();
    let spec = SortSpec::new(SortField::Name, SortOrder::Asc);
    let filter = StudentFilter::all();
    let first = apply(&records, &filter, spec, Some(Page { offset: 0, limit: 2 }));
    let second = apply(&records, &filter, spec, Some(Page { offset: 2, limit: 2 }));
    let both = apply(&records, &filter, spec, Some(Page { offset: 0, limit: 4 }));
    assert!(first.iter().all(|a| second.iter().all(|b| a.id != b.id)));
    let joined: Vec<Student> = first.into_iter().chain(second).collect();
    assert_eq!(joined, both);
}

#[test]
fn page_bounds_default_and_clamp() {
    let limits = QueryLimits::default();
    assert_eq!(Page::bounded(None, None, limits), Page { offset: 0, limit: 50 });
    assert_eq!(Page::bounded(Some(10), Some(0), limits), Page { offset: 10, limit: 50 });
    assert_eq!(Page::bounded(None, Some(1_000_000), limits).limit, 1000);
}

#[test]
fn sort_order_is_lenient() {
    assert_eq!(SortOrder::from_lenient(Some("desc")), SortOrder::Desc);
    assert_eq!(SortOrder::from_lenient(Some("DESC")), SortOrder::Desc);
    assert_eq!(SortOrder::from_lenient(Some("descending")), SortOrder::Asc);
    assert_eq!(SortOrder::from_lenient(None), SortOrder::Asc);
    assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
}

#[test]
fn sort_field_parsing() {
    assert_eq!("createdAt".parse::<SortField>(), Ok(SortField::CreatedAt));
    assert_eq!("age".parse::<SortField>(), Ok(SortField::Age));
    assert!("password".parse::<SortField>().is_err());
}

#[test]
fn server_query_from_request() {
    let request = SearchRequest {
        search_term: Some(" 25 ".to_owned()),
        sort_by: SortField::Age,
        sort_order: SortOrder::Desc,
        limit: Some(5000),
        offset: Some(3),
    };
    let query = StudentQuery::from_request(&request, QueryLimits::default());
    assert_eq!(query.filter.term(), Some("25"));
    assert_eq!(query.filter.age_equals(), Some(25));
    assert_eq!(query.sort, SortSpec::new(SortField::Age, SortOrder::Desc));
    assert_eq!(query.page, Page { offset: 3, limit: 1000 });
}

#[test]
fn search_request_wire_shape() {
    let request: SearchRequest = serde_json::from_value(serde_json::json!({
        "searchTerm": "ana",
        "sortBy": "createdAt",
        "sortOrder": "desc",
        "limit": 10
    }))
    .expect("request");
    assert_eq!(request.sort(), SortSpec::new(SortField::CreatedAt, SortOrder::Desc));
    assert_eq!(request.offset, None);
    let defaults: SearchRequest = serde_json::from_str("{}").expect("empty request");
    assert_eq!(defaults, SearchRequest::default());
}
