use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlashbangError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FlashbangError::media("x")
            .to_string()
            .contains("media unavailable:")
    );
    assert!(
        FlashbangError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        FlashbangError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        FlashbangError::window("x")
            .to_string()
            .contains("window error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlashbangError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
