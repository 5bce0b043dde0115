// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_advances_both_monotonic_and_calendar_time() {
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
    let clock = FakeClock::new(start);
    let before = clock.now();

    clock.advance(Duration::from_secs(1800));

    assert_eq!(
        clock.now_utc(),
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    );
    assert!(clock.now() > before);
}

#[test]
fn fake_clock_set_utc_jumps_without_touching_monotonic() {
    let clock = FakeClock::default();
    let before = clock.now();
    let target = Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap();

    clock.set_utc(target);

    assert_eq!(clock.now_utc(), target);
    assert_eq!(clock.now(), before);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::default();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(30));
}
