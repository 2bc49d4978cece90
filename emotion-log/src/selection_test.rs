use super::*;

#[test]
fn first_click_activates() {
    let mut selection = EmotionSelection::new();
    assert_eq!(selection.click(3), Some(3));
    assert_eq!(selection.active(), Some(3));
}

#[test]
fn clicking_another_button_moves_selection() {
    let mut selection = EmotionSelection::new();
    selection.click(3);
    assert_eq!(selection.click(5), Some(5));
}

#[test]
fn clicking_active_button_clears_selection() {
    let mut selection = EmotionSelection::new();
    selection.click(2);
    assert_eq!(selection.click(2), None);
    assert_eq!(selection.click(2), Some(2));
}

#[test]
fn button_active_at_load_deselects_on_first_click() {
    let mut selection = EmotionSelection::seeded(Some(1));
    assert_eq!(selection.active(), Some(1));
    assert_eq!(selection.click(1), None);
}

#[test]
fn seeded_selection_moves_like_any_other() {
    let mut selection = EmotionSelection::seeded(Some(1));
    assert_eq!(selection.click(4), Some(4));
    assert_eq!(EmotionSelection::seeded(None), EmotionSelection::new());
}

#[test]
fn value_prefers_data_attribute() {
    assert_eq!(button_value(Some("alegria"), "  Alegria  "), "alegria");
}

#[test]
fn value_falls_back_to_trimmed_text() {
    assert_eq!(button_value(None, "\n  Saudade \t"), "Saudade");
    assert_eq!(button_value(Some(""), " Medo "), "Medo");
}

#[test]
fn placeholders_complete_the_last_row() {
    assert_eq!(placeholders_needed(0), 0);
    assert_eq!(placeholders_needed(4), 0);
    assert_eq!(placeholders_needed(5), 3);
    assert_eq!(placeholders_needed(7), 1);
    assert_eq!(placeholders_needed(10), 2);
}
