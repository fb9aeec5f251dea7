//! This bench measures validation of a full blood request draft, the work done
//! on every form submit.

#![allow(missing_docs)]

use bloodlink::{RequestDraft, RequestField, Urgency, domain::validate_request_form_at};
use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};

fn draft() -> RequestDraft {
    RequestDraft::default()
        .apply_field(RequestField::BloodGroup("O-".to_string()))
        .apply_field(RequestField::UnitsNeeded("12".to_string()))
        .apply_field(RequestField::Urgency(Urgency::Critical))
        .apply_field(RequestField::RequiredDate("2026-10-19T10:30".to_string()))
        .apply_field(RequestField::PatientName("Ngozi Eze".to_string()))
        .apply_field(RequestField::PatientAge("41".to_string()))
        .apply_field(RequestField::ContactPerson("Ward 3 desk".to_string()))
        .apply_field(RequestField::ContactPhone("+234 (0) 801-234-5678".to_string()))
}

fn validate_request(c: &mut Criterion) {
    let now = NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let valid = draft();
    let invalid = RequestDraft::default();

    c.bench_function("validate valid draft", |b| {
        b.iter(|| validate_request_form_at(std::hint::black_box(&valid), now));
    });
    c.bench_function("validate empty draft", |b| {
        b.iter(|| validate_request_form_at(std::hint::black_box(&invalid), now));
    });
}

criterion_group!(benches, validate_request);
criterion_main!(benches);
