use goname::core::naming::{needs_rename, rename};

#[test]
fn rename_matches_reference_cases() {
    let cases = [
        ("ONE_TWO_THREE", "OneTwoThree"),
        ("one_two_three", "oneTwoThree"),
        ("oneTwoThree", "oneTwoThree"),
        ("ALLCAPS", "Allcaps"),
        ("_", "_"),
        ("", ""),
    ];

    for (input, expected) in cases {
        assert_eq!(rename(input), expected, "rename({input:?})");
    }
}

#[test]
fn rename_preserves_leading_case() {
    assert_eq!(rename("Max_Retry_Count"), "MaxRetryCount");
    assert_eq!(rename("default_TIMEOUT"), "defaultTimeout");
    assert_eq!(rename("_private_value"), "privateValue");
    assert_eq!(rename("_Hidden"), "hidden");
}

#[test]
fn rename_drops_empty_terms() {
    assert_eq!(rename("FOO__BAR"), "FooBar");
    assert_eq!(rename("trailing_"), "trailing");
    assert_eq!(rename("___"), "___");
}

#[test]
fn rename_handles_digits_and_single_letters() {
    assert_eq!(rename("HTTP2"), "Http2");
    assert_eq!(rename("X"), "X");
    assert_eq!(rename("x"), "x");
    assert_eq!(rename("MAX_2_VALUES"), "Max2Values");
    assert_eq!(rename("v_1"), "v1");
}

#[test]
fn rename_is_unicode_aware() {
    assert_eq!(rename("ÉTÉ_CHAUD"), "ÉtéChaud");
    assert_eq!(rename("größe_wert"), "größeWert");
}

#[test]
fn rename_is_idempotent_on_its_output() {
    for input in ["ONE_TWO_THREE", "one_two_three", "ALLCAPS", "Max_Retry"] {
        let once = rename(input);
        assert_eq!(rename(&once), once, "rename is stable for {input:?}");
    }
}

#[test]
fn needs_rename_reports_changes_only() {
    assert!(needs_rename("FOO_BAR"));
    assert!(needs_rename("ALLCAPS"));
    assert!(!needs_rename("fooBar"));
    assert!(!needs_rename("_"));
    assert!(!needs_rename(""));
}
