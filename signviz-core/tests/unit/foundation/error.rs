use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SignVizError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SignVizError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        SignVizError::camera("x")
            .to_string()
            .contains("camera error:")
    );
    assert!(
        SignVizError::generation("x")
            .to_string()
            .contains("generation error:")
    );
    assert!(
        SignVizError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SignVizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
