use super::common::{base_scan, get_errors};
use compiler::error::CompilationErrorKind as K;
use compiler::scanner::TokenKind;

#[test]
fn test_token_stream() {
    let ks = base_scan(r#"<div :id="a" @click="b">x{{ y }}<!-- c --></div>"#);
    assert_eq!(ks[0], TokenKind::TagOpen("div"));
    assert_eq!(ks[1], TokenKind::AttrName(":id"));
    assert_eq!(ks[3], TokenKind::AttrName("@click"));
    assert_eq!(ks[5], TokenKind::TagEnd { self_closing: false });
    assert!(matches!(&ks[6], TokenKind::Text(t) if t.raw == "x"));
    assert_eq!(ks[7], TokenKind::Interpolation(" y "));
    assert_eq!(ks[8], TokenKind::Comment(" c "));
    assert_eq!(ks[9], TokenKind::TagClose("div"));
    assert_eq!(ks.len(), 10);
}

#[test]
fn test_recovery_never_aborts() {
    let cases = [
        "<",
        "</>",
        "<?xml?>",
        "<div attr=\"unterminated",
        "<!-- open",
        "{{ open",
        "<a =b>",
    ];
    for case in cases {
        // every case still yields a stream and at least one warning
        let _ = base_scan(case);
        let errors = get_errors(case);
        assert!(!errors.is_empty(), "{}", case);
    }
}

#[test]
fn test_scan_errors() {
    assert!(get_errors("<!-->").contains(&K::AbruptClosingOfEmptyComment));
    assert_eq!(get_errors("{{ a"), vec![K::MissingInterpolationEnd]);
    assert!(get_errors("<!-- a").contains(&K::EofInComment));
}
