//! Built-in content filters
//!
//!     style         <style type="text/css"> ... </style>
//!     php           <?php ... ?>
//!     javascript    <script type="text/javascript"> ... </script>
//!     cdata         <![CDATA[ ... ]]>

use super::filter::WrappingFilter;

pub const STYLE: WrappingFilter = WrappingFilter::new(r#"<style type="text/css">"#, "</style>");
pub const PHP: WrappingFilter = WrappingFilter::new("<?php", "?>");
pub const JAVASCRIPT: WrappingFilter =
    WrappingFilter::new(r#"<script type="text/javascript">"#, "</script>");
pub const CDATA: WrappingFilter = WrappingFilter::new("<![CDATA[", "]]>");

/// Built-in filters under their aliases.
pub const BUILTIN_FILTERS: &[(&str, WrappingFilter)] = &[
    ("style", STYLE),
    ("php", PHP),
    ("javascript", JAVASCRIPT),
    ("cdata", CDATA),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Attributes;
    use crate::extensions::TextFilter;

    #[test]
    fn wraps_at_filter_indentation() {
        let html = STYLE.apply("  body {}", &Attributes::new(), "  ");
        assert_eq!(html, "  <style type=\"text/css\">\n  body {}\n  </style>");
    }

    #[test]
    fn php_block() {
        let html = PHP.apply("  echo 1;", &Attributes::new(), "");
        assert_eq!(html, "<?php\n  echo 1;\n?>");
    }

    #[test]
    fn aliases_are_unique() {
        let mut aliases: Vec<&str> = BUILTIN_FILTERS.iter().map(|(alias, _)| *alias).collect();
        aliases.sort_unstable();
        aliases.dedup();
        assert_eq!(aliases.len(), BUILTIN_FILTERS.len());
    }
}
