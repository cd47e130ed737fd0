//! Doctype declarations by version name

/// Version used when a doctype line names none.
pub const DEFAULT_VERSION: &str = "transitional";

pub const DOCTYPES: &[(&str, &str)] = &[
    ("xml", r#"<?xml version="1.0" encoding="utf-8" ?>"#),
    ("xml ISO-8859-1", r#"<?xml version="1.0" encoding="iso-8859-1" ?>"#),
    ("html", "<!DOCTYPE html>"),
    ("5", "<!DOCTYPE html>"),
    (
        "1.1",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#,
    ),
    (
        "strict",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
    ),
    (
        "frameset",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd">"#,
    ),
    (
        "mobile",
        r#"<!DOCTYPE html PUBLIC "-//WAPFORUM//DTD XHTML Mobile 1.2//EN" "http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd">"#,
    ),
    (
        "basic",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML Basic 1.1//EN" "http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd">"#,
    ),
    (
        "transitional",
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    ),
];

/// Declaration for a version name. Surrounding spaces are ignored and a blank name selects
/// [DEFAULT_VERSION].
pub fn declaration(version: &str) -> Option<&'static str> {
    let version = match version.trim() {
        "" => DEFAULT_VERSION,
        version => version,
    };
    DOCTYPES
        .iter()
        .find(|(name, _)| *name == version)
        .map(|(_, declaration)| *declaration)
}
