use resume_nlu::{config::Text, prepare::prepare_for_analysis};

#[test]
fn legacy_paragraph_marks_become_newlines() {
    let cfg = Text::default();
    let out = prepare_for_analysis(&cfg, "Jane Doe\rRust\u{000B}Go\r\nBucharest\u{000C}Page two\r");
    assert_eq!(out, "Jane Doe\nRust\nGo\nBucharest\nPage two");
}

#[test]
fn word_control_marks_are_removed() {
    let cfg = Text::default();
    let out = prepare_for_analysis(&cfg, "Cell one\u{0007}Cell two\u{0007}\tTabbed");
    assert_eq!(out, "Cell oneCell two\tTabbed");
}

#[test]
fn blank_line_runs_collapse() {
    let cfg = Text::default();
    let out = prepare_for_analysis(&cfg, "\n\nA   \n\n\n \nB\n\nC\n\n");
    assert_eq!(out, "A\n\nB\n\nC");
}

#[test]
fn long_text_is_capped_on_char_boundaries() {
    let cfg = Text {
        max_chars: 4,
        ..Text::default()
    };
    assert_eq!(prepare_for_analysis(&cfg, "ăîșțâ rest"), "ăîșț");
}

#[test]
fn nfkc_is_opt_in() {
    let mut cfg = Text::default();
    assert_eq!(prepare_for_analysis(&cfg, "ﬁle"), "ﬁle");
    cfg.normalize_unicode = true;
    assert_eq!(prepare_for_analysis(&cfg, "ﬁle"), "file");
}

#[test]
fn everything_off_is_identity() {
    let cfg = Text {
        normalize_newlines: false,
        normalize_unicode: false,
        control_chars_to_sanitize: vec![],
        collapse_blank_lines: false,
        trim_trailing_whitespace: false,
        max_chars: 0,
    };
    let raw = "A\r\n\u{0007}B  \n\n\n";
    assert_eq!(prepare_for_analysis(&cfg, raw), raw);
}
