use super::*;

#[test]
fn each_position_has_its_label() {
    assert_eq!(IntensityLabel::for_value(0).text, "Muito leve");
    assert_eq!(IntensityLabel::for_value(4).text, "Perceptível");
    assert_eq!(IntensityLabel::for_value(9).text, "Extremo");
}

#[test]
fn label_highlights_above_four() {
    assert!(!IntensityLabel::for_value(4).active);
    assert!(IntensityLabel::for_value(5).active);
    assert!(IntensityLabel::for_value(9).active);
}

#[test]
fn out_of_range_values_are_blank() {
    assert_eq!(IntensityLabel::for_value(10), IntensityLabel { text: "", active: true });
    assert_eq!(IntensityLabel::for_value(-1), IntensityLabel { text: "", active: false });
}

#[test]
fn raw_values_parse_like_a_range_input() {
    assert_eq!(IntensityLabel::from_raw("6").text, "Muito forte");
    assert_eq!(IntensityLabel::from_raw(" 2").text, "Tranquilo");
    assert_eq!(IntensityLabel::from_raw("3.9").text, "Moderado");
}

#[test]
fn unparsable_value_clears_label() {
    assert_eq!(IntensityLabel::from_raw(""), IntensityLabel { text: "", active: false });
    assert_eq!(IntensityLabel::from_raw("forte"), IntensityLabel { text: "", active: false });
}

#[test]
fn leading_int_handles_signs() {
    assert_eq!(parse_leading_int("-3"), Some(-3));
    assert_eq!(parse_leading_int("+8px"), Some(8));
    assert_eq!(parse_leading_int("-"), None);
}

#[test]
fn leading_int_overflow_is_unparsable() {
    assert_eq!(parse_leading_int("99999999999999999999"), None);
    assert_eq!(IntensityLabel::from_raw("99999999999999999999").text, "");
}
