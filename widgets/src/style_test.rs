use super::*;

#[test]
fn background_solid_uses_color() {
    assert_eq!(background(BackgroundMode::Solid, "#fff", "#000", "#111", 90.0), "#fff");
}

#[test]
fn background_gradient_uses_angle_and_stops() {
    assert_eq!(
        background(BackgroundMode::Gradient, "#fff", "#4f46e5", "#06b6d4", 135.0),
        "linear-gradient(135deg, #4f46e5, #06b6d4)"
    );
}

#[test]
fn number_trims_whole_values() {
    assert_eq!(number(40.0), "40");
    assert_eq!(number(2.5), "2.5");
    assert_eq!(number(0.125), "0.125");
}

#[test]
fn units_append_suffix() {
    assert_eq!(px(12.0), "12px");
    assert_eq!(seconds(1.5), "1.5s");
    assert_eq!(ms(400), "400ms");
}

#[test]
fn pad2_zero_pads_but_never_truncates() {
    assert_eq!(pad2(0), "00");
    assert_eq!(pad2(7), "07");
    assert_eq!(pad2(42), "42");
    assert_eq!(pad2(123), "123");
}

#[test]
fn money_formats_two_decimals() {
    assert_eq!(money("$", 12.5), "$12.50");
    assert_eq!(money("€", 0.0), "€0.00");
    assert_eq!(money("$", -3.0), "-$3.00");
}

#[test]
fn stars_fill_up_to_five() {
    assert_eq!(stars(4), "★★★★☆");
    assert_eq!(stars(0), "☆☆☆☆☆");
    assert_eq!(stars(9), "★★★★★");
}

#[test]
fn compact_count_abbreviates() {
    assert_eq!(compact_count(999), "999");
    assert_eq!(compact_count(1000), "1k");
    assert_eq!(compact_count(1234), "1.2k");
    assert_eq!(compact_count(1_500_000), "1.5M");
}

#[test]
fn entrance_slide_depends_on_edge() {
    assert_eq!(entrance(Animation::Slide, "top").0, "translateY(-100%)");
    assert_eq!(entrance(Animation::Slide, "bottom").0, "translateY(100%)");
    assert_eq!(entrance(Animation::Fade, "top"), ("none", "none"));
}
