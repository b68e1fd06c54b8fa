use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PanelflowError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PanelflowError::content("x")
            .to_string()
            .contains("content error:")
    );
    assert!(
        PanelflowError::audio("x")
            .to_string()
            .contains("audio error:")
    );
    assert!(
        PanelflowError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PanelflowError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn within_keeps_variant_and_prefixes_message() {
    let err = PanelflowError::content("bounds are degenerate").within("page 2 panel 1");
    assert!(matches!(err, PanelflowError::Content(_)));
    assert_eq!(
        err.to_string(),
        "content error: page 2 panel 1: bounds are degenerate"
    );
}
