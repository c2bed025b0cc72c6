use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn show_fills_the_rest_of_the_audio_clip() {
    let table = FixedDurations::default().fit_to_audio(ms(6000));
    assert_eq!(table.show, ms(2700));
    assert_eq!(table.delay, ms(1000));
    assert_eq!(table.flash, ms(300));
    assert_eq!(table.fade_in, ms(1000));
    assert_eq!(table.fade_out, ms(1000));
    assert_eq!(table.total(), ms(6000));
}

#[test]
fn short_audio_clamps_show_to_zero() {
    let table = FixedDurations::default().fit_to_audio(ms(1200));
    assert_eq!(table.show, Duration::ZERO);
    assert_eq!(table.total(), ms(3300));

    let table = FixedDurations::default().fit_to_audio(Duration::ZERO);
    assert_eq!(table.show, Duration::ZERO);
}

#[test]
fn fallback_length_gives_expected_show() {
    let table = FixedDurations::default().fit_to_audio(ms(5000));
    assert_eq!(table.show, ms(1700));
}

#[test]
fn done_has_no_duration() {
    let table = FixedDurations::default().fit_to_audio(ms(6000));
    assert_eq!(table.of(Phase::Done), None);
    assert_eq!(table.of(Phase::Show), Some(ms(2700)));
}

#[test]
fn total_saturates_instead_of_overflowing() {
    let fixed = FixedDurations {
        delay: Duration::MAX,
        flash: ms(1),
        fade_in: ms(1),
        fade_out: ms(1),
    };
    assert_eq!(fixed.total(), Duration::MAX);
    assert_eq!(fixed.fit_to_audio(ms(10)).show, Duration::ZERO);
}
