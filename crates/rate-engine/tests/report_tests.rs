//! End-to-end tests for report generation through the in-memory store.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Europe::Helsinki;
use rate_engine::config::ReportConfig;
use rate_engine::error::{ReportError, ValidationError};
use rate_engine::model::{OpeningDay, OpeningPeriod, PeriodOwner, ReservationRecord, Resource, Unit};
use rate_engine::report::{generate_report, ReportGenerator};
use rate_engine::store::{InMemoryStore, ReservationStore};
use rate_engine::window::ReportRequest;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(y, m, d).and_time(t(hour, minute))
}

fn local(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Helsinki
        .with_ymd_and_hms(y, m, d, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn every_day(opens: NaiveTime, closes: NaiveTime) -> Vec<OpeningDay> {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .map(|weekday| OpeningDay {
        weekday,
        opens: Some(opens),
        closes: Some(closes),
        closed: false,
    })
    .collect()
}

fn unit(id: &str, name: &str) -> Unit {
    Unit {
        id: id.into(),
        name: name.into(),
        street_address: format!("{} street 1", name),
    }
}

fn resource(id: &str, unit_id: &str, name: &str, resource_type: &str) -> Resource {
    Resource {
        id: id.into(),
        unit_id: unit_id.into(),
        name: name.into(),
        resource_type: resource_type.into(),
    }
}

fn reservation(resource_id: &str, begin: DateTime<Utc>, end: DateTime<Utc>, who: &str) -> ReservationRecord {
    ReservationRecord {
        resource_id: resource_id.into(),
        begin,
        end,
        reserver_name: who.into(),
        event_subject: format!("{}'s event", who),
    }
}

fn unit_hours(unit_id: &str) -> OpeningPeriod {
    OpeningPeriod {
        owner: PeriodOwner::Unit(unit_id.into()),
        start: date(2015, 1, 1),
        end: date(2015, 12, 31),
        closed: false,
        days: every_day(t(8, 0), t(16, 0)),
    }
}

/// One unit, one resource open 08-16 every day, one booking 09-10 on Apr 4.
fn single_booking_store() -> InMemoryStore {
    InMemoryStore::new()
        .with_unit(unit("u1", "Library"))
        .with_resource(resource("r1", "u1", "Study room", "Room"))
        .with_period(unit_hours("u1"))
        .with_reservation(reservation("r1", local(2015, 4, 4, 9, 0), local(2015, 4, 4, 10, 0), "John Smith"))
}

// ── End-to-end ──────────────────────────────────────────────────────────────

#[test]
fn six_day_window_with_one_booking() {
    let store = single_booking_store();

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap();

    assert_eq!(report.day_period, "01.04.2015 - 06.04.2015");
    assert_eq!(report.time_period, "08.00 - 16.00");
    assert_eq!(report.units.len(), 1);

    let unit = &report.units[0];
    assert_eq!(unit.name, "Library");
    assert_eq!(unit.street_address, "Library street 1");
    assert_eq!(unit.unit_reservation_rate.reserved_time, Duration::hours(1));
    assert_eq!(unit.unit_reservation_rate.max_reservable_time, Duration::hours(48));
    assert_eq!(unit.unit_reservation_rate.to_string(), "1h 0min / 48h 0min");

    let resource = &unit.resources[0];
    assert_eq!(resource.name, "Study room");
    assert_eq!(resource.resource_type, "Room");
    assert_eq!(resource.reserved_time_sum, Duration::hours(1));
    assert_eq!(resource.max_reservable_time, Duration::hours(48));
    assert_eq!(resource.reservations.len(), 1);

    let row = &resource.reservations[0];
    assert_eq!(row.reserver_name, "John Smith");
    assert_eq!(row.event_subject, "John Smith's event");
    assert_eq!(row.begin_display(), "04.04.2015 09.00");
    assert_eq!(row.end_display(), "04.04.2015 10.00");
    assert_eq!(row.reserved_time, Duration::hours(1));
}

#[test]
fn unit_rate_sums_all_resources() {
    let store = InMemoryStore::new()
        .with_unit(unit("u1", "Library"))
        .with_resource(resource("r1", "u1", "Study room", "Room"))
        .with_resource(resource("r2", "u1", "Projector", "Equipment"))
        .with_period(unit_hours("u1"))
        .with_period(OpeningPeriod {
            owner: PeriodOwner::Resource("r2".into()),
            start: date(2015, 4, 1),
            end: date(2015, 4, 30),
            closed: false,
            days: every_day(t(12, 0), t(14, 0)),
        })
        .with_reservation(reservation("r1", local(2015, 4, 2, 8, 0), local(2015, 4, 2, 9, 30), "A"))
        .with_reservation(reservation("r2", local(2015, 4, 3, 12, 0), local(2015, 4, 3, 13, 0), "B"))
        .with_reservation(reservation("r2", local(2015, 4, 1, 13, 30), local(2015, 4, 1, 14, 0), "C"));

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 3, 16, 0), Helsinki).unwrap();
    let unit = &report.units[0];

    // Ordered by type: Equipment before Room.
    assert_eq!(unit.resources[0].name, "Projector");
    assert_eq!(unit.resources[1].name, "Study room");

    assert_eq!(unit.resources[0].reserved_time_sum, Duration::minutes(90));
    assert_eq!(unit.resources[0].max_reservable_time, Duration::hours(6));
    assert_eq!(unit.resources[1].reserved_time_sum, Duration::minutes(90));
    assert_eq!(unit.resources[1].max_reservable_time, Duration::hours(24));

    assert_eq!(unit.unit_reservation_rate.reserved_time, Duration::hours(3));
    assert_eq!(unit.unit_reservation_rate.max_reservable_time, Duration::hours(30));
    assert_eq!(unit.unit_reservation_rate.to_string(), "3h 0min / 30h 0min");
}

#[test]
fn reservations_are_listed_newest_first_and_filtered() {
    let store = single_booking_store()
        .with_reservation(reservation("r1", local(2015, 4, 2, 10, 0), local(2015, 4, 2, 11, 0), "Early"))
        .with_reservation(reservation("r1", local(2015, 4, 5, 14, 0), local(2015, 4, 5, 15, 0), "Late"))
        // Outside the date span.
        .with_reservation(reservation("r1", local(2015, 4, 8, 9, 0), local(2015, 4, 8, 10, 0), "Outside"))
        // Evening booking after the daily range.
        .with_reservation(reservation("r1", local(2015, 4, 3, 18, 0), local(2015, 4, 3, 20, 0), "Evening"));

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap();
    let names: Vec<&str> = report.units[0].resources[0]
        .reservations
        .iter()
        .map(|r| r.reserver_name.as_str())
        .collect();

    assert_eq!(names, vec!["Late", "John Smith", "Early"]);
    assert_eq!(report.units[0].resources[0].reserved_time_sum, Duration::hours(3));
}

#[test]
fn units_are_ordered_by_name() {
    let store = InMemoryStore::new()
        .with_unit(unit("u2", "Swimming hall"))
        .with_unit(unit("u1", "Library"))
        .with_unit(unit("u3", "Youth center"));

    let report = generate_report(&store, &["u2", "u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 1, 16, 0), Helsinki).unwrap();
    let names: Vec<&str> = report.units.iter().map(|u| u.name.as_str()).collect();

    assert_eq!(names, vec!["Library", "Swimming hall"]);
}

#[test]
fn unit_without_resources_has_zero_rate() {
    let store = InMemoryStore::new().with_unit(unit("u1", "Library"));

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap();

    assert!(report.units[0].resources.is_empty());
    assert_eq!(report.units[0].unit_reservation_rate.to_string(), "0h 0min / 0h 0min");
}

#[test]
fn closed_days_reduce_capacity_without_errors() {
    let holiday = OpeningPeriod {
        owner: PeriodOwner::Unit("u1".into()),
        start: date(2015, 4, 3),
        end: date(2015, 4, 6),
        closed: true,
        days: vec![],
    };
    let store = single_booking_store().with_period(holiday);

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap();

    assert_eq!(report.units[0].unit_reservation_rate.max_reservable_time, Duration::hours(16));
    // Reserved time is not cross-checked against opening days.
    assert_eq!(report.units[0].unit_reservation_rate.reserved_time, Duration::hours(1));
}

#[test]
fn generating_twice_gives_identical_reports() {
    let store = single_booking_store();
    let config = ReportConfig::default();
    let generator = ReportGenerator::new(&store, &config);
    let request = ReportRequest::new(["u1"], "2015-04-01", "2015-04-06").with_times("08:00", "16:00");

    let first = generator.generate(&request).unwrap();
    let second = generator.generate(&request).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn generator_uses_configured_default_times() {
    let store = single_booking_store();
    let config = ReportConfig {
        default_start_time: "09:30".into(),
        default_end_time: "12:00".into(),
        ..ReportConfig::default()
    };
    let request = ReportRequest::new(["u1"], "2015-04-01", "2015-04-06");

    let report = ReportGenerator::new(&store, &config).generate(&request).unwrap();

    assert_eq!(report.time_period, "09.30 - 12.00");
    let rate = report.units[0].unit_reservation_rate;
    assert_eq!(rate.reserved_time, Duration::minutes(30));
    assert_eq!(rate.max_reservable_time, Duration::minutes(6 * 150));
}

#[test]
fn report_serializes_durations_as_seconds() {
    let store = single_booking_store();

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["units"][0]["unit_reservation_rate"]["reserved_time"], 3600);
    assert_eq!(json["units"][0]["resources"][0]["max_reservable_time"], 48 * 3600);
    assert_eq!(json["units"][0]["resources"][0]["type"], "Room");
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn empty_unit_selection_is_a_validation_error() {
    let store = single_booking_store();

    let err = generate_report(&store, &[], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap_err();

    assert!(matches!(err, ReportError::Validation(ValidationError::MissingUnits)));
    assert_eq!(err.to_string(), "Missing unit id(s)");
}

#[test]
fn inverted_window_is_a_validation_error() {
    let store = single_booking_store();

    let err = generate_report(&store, &["u1"], at(2015, 4, 6, 8, 0), at(2015, 4, 1, 16, 0), Helsinki).unwrap_err();

    assert!(matches!(err, ReportError::Validation(ValidationError::EndBeforeBegin)));
}

#[test]
fn missing_dates_in_request_are_rejected() {
    let store = single_booking_store();
    let config = ReportConfig::default();
    let request = ReportRequest {
        unit_ids: vec!["u1".into()],
        end_date: Some("2015-04-06".into()),
        ..ReportRequest::default()
    };

    let err = ReportGenerator::new(&store, &config).generate(&request).unwrap_err();

    assert_eq!(err.to_string(), "Missing start date or end date");
}

#[test]
fn unknown_unit_is_not_found() {
    let store = single_booking_store();

    let err = generate_report(&store, &["u1", "nope"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap_err();

    match err {
        ReportError::NotFound { entity, id } => {
            assert_eq!(entity, "unit");
            assert_eq!(id, "nope");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn invalid_configured_timezone_is_reported() {
    let store = single_booking_store();
    let config = ReportConfig {
        timezone: "Mars/Olympus".into(),
        ..ReportConfig::default()
    };
    let request = ReportRequest::new(["u1"], "2015-04-01", "2015-04-06");

    let err = ReportGenerator::new(&store, &config).generate(&request).unwrap_err();

    assert!(matches!(err, ReportError::InvalidTimezone(ref tz) if tz == "Mars/Olympus"));
}

// ── Store ───────────────────────────────────────────────────────────────────

#[test]
fn dataset_loads_from_json() {
    let json = r#"{
        "units": [{"id": "u1", "name": "Library", "street_address": "Main street 1"}],
        "resources": [{"id": "r1", "unit_id": "u1", "name": "Study room", "type": "Room"}],
        "periods": [{
            "owner": {"scope": "unit", "id": "u1"},
            "start": "2015-01-01",
            "end": "2015-12-31",
            "days": [{"weekday": "Sat", "opens": "08:00:00", "closes": "16:00:00"}]
        }],
        "reservations": [{
            "resource_id": "r1",
            "begin": "2015-04-04T09:00:00+03:00",
            "end": "2015-04-04T10:00:00+03:00",
            "reserver_name": "John Smith",
            "event_subject": "John's welcome party"
        }]
    }"#;
    let store = InMemoryStore::from_json(json).unwrap();

    assert_eq!(store.periods[0].owner, PeriodOwner::Unit("u1".into()));
    assert_eq!(store.list_units(&["u1"]).unwrap()[0].street_address, "Main street 1");

    let report = generate_report(&store, &["u1"], at(2015, 4, 1, 8, 0), at(2015, 4, 6, 16, 0), Helsinki).unwrap();
    // Only Saturday 2015-04-04 is open.
    assert_eq!(report.units[0].unit_reservation_rate.to_string(), "1h 0min / 8h 0min");
}

#[test]
fn malformed_dataset_is_a_dataset_error() {
    let err = InMemoryStore::from_json("{\"units\": 5}").unwrap_err();

    assert!(matches!(err, ReportError::Dataset(_)));
}
