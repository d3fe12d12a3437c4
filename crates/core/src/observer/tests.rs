use super::*;

fn entry(
    border: Option<(f64, f64)>,
    content: Option<(f64, f64)>,
    rect: (f64, f64),
) -> ResizeEntry<&'static str> {
    ResizeEntry {
        target: "element",
        border_box_size: border.map(|(w, h)| BoxSize::new(w, h)),
        content_box_size: content.map(|(w, h)| BoxSize::new(w, h)),
        content_rect: ContentRect {
            x: 0.0,
            y: 0.0,
            width: rect.0,
            height: rect.1,
        },
    }
}

#[test]
fn test_dimensions_round_to_nearest_unit() {
    let report = entry(Some((100.4, 50.6)), Some((90.0, 40.0)), (90.0, 40.0));
    assert_eq!(
        report.dimensions(ObservedBox::BorderBox),
        ObservedDimensions::new(100, 51)
    );
}

#[test]
fn test_dimensions_use_content_box_when_configured() {
    let report = entry(Some((120.0, 60.0)), Some((99.5, 48.2)), (10.0, 10.0));
    assert_eq!(
        report.dimensions(ObservedBox::ContentBox),
        ObservedDimensions::new(100, 48)
    );
}

#[test]
fn test_dimensions_fall_back_to_content_rect() {
    let missing_content = entry(Some((120.0, 60.0)), None, (33.3, 21.7));
    assert_eq!(
        missing_content.dimensions(ObservedBox::BorderBox),
        ObservedDimensions::new(33, 22)
    );

    let no_box_sizes = entry(None, None, (8.0, 4.0));
    assert_eq!(
        no_box_sizes.dimensions(ObservedBox::ContentBox),
        ObservedDimensions::new(8, 4)
    );
}

#[test]
fn test_negative_sizes_saturate_to_zero() {
    let report = entry(None, None, (-3.0, f64::NAN));
    assert_eq!(
        report.dimensions(ObservedBox::BorderBox),
        ObservedDimensions::new(0, 0)
    );
}

#[test]
fn test_observed_box_parsing() {
    assert_eq!("border-box".parse::<ObservedBox>(), Ok(ObservedBox::BorderBox));
    assert_eq!(" content-box ".parse::<ObservedBox>(), Ok(ObservedBox::ContentBox));
    assert!("padding-box".parse::<ObservedBox>().is_err());
    assert_eq!(ObservedBox::default(), ObservedBox::BorderBox);
    assert_eq!(ObservedBox::ContentBox.to_string(), "content-box");
}

#[test]
fn test_observed_box_serde_uses_kebab_case() {
    let parsed: ObservedBox = serde_json::from_str("\"content-box\"").unwrap();
    assert_eq!(parsed, ObservedBox::ContentBox);
    assert_eq!(
        serde_json::to_string(&ObservedBox::BorderBox).unwrap(),
        "\"border-box\""
    );
}

#[test]
fn test_observed_dimensions_default_is_unmeasured() {
    let dimensions = ObservedDimensions::default();
    assert_eq!(dimensions.width, None);
    assert_eq!(dimensions.height, None);
    assert!(!dimensions.is_measured());
    assert!(ObservedDimensions::new(1, 2).is_measured());

    let json = serde_json::to_string(&dimensions).unwrap();
    assert_eq!(json, r#"{"width":null,"height":null}"#);
}
