use super::*;

#[test]
fn from_bytes_stages_a_temp_file_removed_on_drop() {
    let source = AudioSource::from_bytes(b"ID3 not really audio").unwrap();
    assert!(source.is_staged());

    let path = source.path().to_path_buf();
    assert!(
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("flashbang-audio-"))
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"ID3 not really audio");

    drop(source);
    assert!(!path.exists());
}

#[test]
fn missing_audio_is_a_media_error() {
    let err = AudioSource::from_bytes(&[]).unwrap_err();
    assert!(matches!(err, FlashbangError::Media(_)), "{err}");

    let err = AudioSource::from_path("definitely/not/here.mp3").unwrap_err();
    assert!(matches!(err, FlashbangError::Media(_)), "{err}");
}

#[test]
fn from_path_keeps_caller_file() {
    let staged = AudioSource::from_bytes(b"abc").unwrap();
    let source = AudioSource::from_path(staged.path()).unwrap();
    assert!(!source.is_staged());
    drop(source);
    assert!(staged.path().exists());
}

#[test]
fn parse_probe_output_reads_format_duration() {
    let json = br#"{"format": {"filename": "a.mp3", "duration": "6.000000"}}"#;
    assert_eq!(
        parse_probe_output(json).unwrap(),
        Some(Duration::from_millis(6000))
    );
}

#[test]
fn parse_probe_output_indeterminate_durations_are_none() {
    for json in [
        br#"{"format": {"duration": "N/A"}}"#.as_slice(),
        br#"{"format": {}}"#.as_slice(),
        br#"{}"#.as_slice(),
        br#"{"format": {"duration": "-1.5"}}"#.as_slice(),
    ] {
        assert_eq!(parse_probe_output(json).unwrap(), None);
    }
}

#[test]
fn parse_probe_output_rejects_non_json() {
    assert!(parse_probe_output(b"not json").is_err());
}

#[test]
fn unprobeable_audio_uses_fallback() {
    // Works with or without ffprobe on PATH: either spawning or probing fails.
    let source = AudioSource::from_bytes(b"garbage that is not an audio stream").unwrap();
    let fallback = Duration::from_millis(1234);
    assert_eq!(probe_duration_or(&source, fallback), fallback);
    assert_eq!(probe_duration(&source), FALLBACK_AUDIO_DURATION);
}

#[test]
fn missing_player_is_a_playback_error() {
    let source = AudioSource::from_bytes(b"abc").unwrap();
    let err = AudioPlayback::start_with("flashbang-no-such-player", &source).unwrap_err();
    assert!(matches!(err, FlashbangError::Playback(_)), "{err}");
}
