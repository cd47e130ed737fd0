//! End-to-end rendering through the engine with the bundled extensions

use indoc::indoc;
use rstest::rstest;
use slimc::{Engine, Error, Options};

fn render(source: &str) -> String {
    Engine::with_defaults(Options::default())
        .expect("bundled extensions to register")
        .render_str(source)
        .expect("template to render")
}

fn render_err(source: &str) -> Error {
    Engine::with_defaults(Options::default())
        .expect("bundled extensions to register")
        .render_str(source)
        .unwrap_err()
}

#[rstest]
#[case::basic_tags("p\ndiv\nimg", "<p></p>\n<div></div>\n<img />")]
#[case::crlf_line_endings("p\r\ndiv\r\nimg", "<p></p>\n<div></div>\n<img />")]
#[case::cr_line_endings("p\rdiv\rimg", "<p></p>\n<div></div>\n<img />")]
#[case::implied_div_with_id_and_class(
    "#item.something",
    r#"<div id="item" class="something"></div>"#
)]
#[case::implied_div_with_class(".something", r#"<div class="something"></div>"#)]
#[case::id_first_regardless_of_order(".bar#foo", r#"<div id="foo" class="bar"></div>"#)]
#[case::id_from_attribute_list(r#"div(id="bar").foo"#, r#"<div id="bar" class="foo"></div>"#)]
#[case::class_list_then_shorthand(
    r#"div(class="foo").bar.baz"#,
    r#"<div class="foo bar baz"></div>"#
)]
#[case::class_shorthand_around_list(
    r#"div.foo(class="bar").baz"#,
    r#"<div class="foo bar baz"></div>"#
)]
#[case::class_shorthand_then_list(
    r#"div.foo.bar(class="baz")"#,
    r#"<div class="foo bar baz"></div>"#
)]
#[case::class_names_with_dashes("div.a-b2", r#"<div class="a-b2"></div>"#)]
#[case::namespaced_tag("fb:user", "<fb:user></fb:user>")]
#[case::inline_text("p some random text", "<p>some random text</p>")]
#[case::single_quotes_in_text("p 'foo'", "<p>'foo'</p>")]
#[case::piped_text("| some random text", "some random text")]
#[case::php_inside_text("p yo, <?= $slim ?> is cool", "<p>yo, <?= $slim ?> is cool</p>")]
#[case::html5_doctype("!!! 5", "<!DOCTYPE html>")]
#[case::xml_doctype("!!! xml", r#"<?xml version="1.0" encoding="utf-8" ?>"#)]
#[case::doctype_keyword("doctype html", "<!DOCTYPE html>")]
#[case::self_closing_ignores_children("img\n  p x", "<img />")]
#[case::self_closing_keeps_attributes("br.clear\n  | text", r#"<br class="clear" />"#)]
fn renders_single_constructs(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(render(source), expected);
}

#[rstest]
#[case::escaped_value(r#"img(src="<script>")"#, r#"<img src="&lt;script&gt;" />"#)]
#[case::colon_separator(r#"a(data-attr:"bar")"#, r#"<a data-attr="bar"></a>"#)]
#[case::comma_inside_value(
    r##"a(title: "foo,bar", href="#")"##,
    r##"<a title="foo,bar" href="#"></a>"##
)]
#[case::single_quoted_value("p(class='foo')", r#"<p class="foo"></p>"#)]
#[case::bare_boolean(
    r#"input(type="checkbox", checked)"#,
    r#"<input type="checkbox" checked="checked" />"#
)]
#[case::true_boolean(
    r#"input(type="checkbox", checked: true)"#,
    r#"<input type="checkbox" checked="checked" />"#
)]
#[case::false_boolean(
    r#"input(type="checkbox", checked: false)"#,
    r#"<input type="checkbox" />"#
)]
#[case::null_value(
    r#"input(type="checkbox", checked: null)"#,
    r#"<input type="checkbox" />"#
)]
#[case::empty_value(
    r#"input(type="checkbox", checked: "")"#,
    r#"<input type="checkbox" />"#
)]
#[case::spaced_separator(r#"img(src  =  "/foo.png")"#, r#"<img src="/foo.png" />"#)]
#[case::separators_inside_value(
    r#"a(href: "http://google.com", title: "Some : weird = title")"#,
    r#"<a href="http://google.com" title="Some : weird = title"></a>"#
)]
#[case::equals_inside_single_quotes(
    "meta(name: 'viewport', content='width=device-width')",
    r#"<meta name="viewport" content="width=device-width" />"#
)]
#[case::quoted_key("p('class'='foo')", r#"<p class="foo"></p>"#)]
#[case::unicode_values(
    r#"input( type="текст", value="Поиск" )"#,
    r#"<input type="текст" value="Поиск" />"#
)]
#[case::interpolated_value(r#"a(href="/#{$path}")"#, r#"<a href="/<?= $path ?>"></a>"#)]
fn renders_attributes(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(render(source), expected);
}

#[rstest]
#[case::css(
    r#"link:css( media="screen", src="/css/ie6.css" )"#,
    r#"<link media="screen" src="/css/ie6.css" rel="stylesheet" type="text/css" />"#
)]
#[case::text_input(
    r#"input:text( value="Search" )"#,
    r#"<input value="Search" type="text" />"#
)]
#[case::bare_checkbox("input:checkbox", r#"<input type="checkbox" />"#)]
#[case::script(
    r#"script:js(src:"/stat.js")"#,
    r#"<script src="/stat.js" type="text/javascript"></script>"#
)]
#[case::void_link(
    r#"a:void( value="hello" )"#,
    r#"<a value="hello" href="javascript:;"></a>"#
)]
#[case::post_form("form:post", r#"<form method="POST"></form>"#)]
fn expands_autotags(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(render(source), expected);
}

#[test]
fn nested_tags() {
    let source = indoc! {"
        ul
          li a
          li b
          li
            ul
              li c
              li d
          li e
    "};
    let expected = indoc! {"
        <ul>
          <li>a</li>
          <li>b</li>
          <li>
            <ul>
              <li>c</li>
              <li>d</li>
            </ul>
          </li>
          <li>e</li>
        </ul>"};
    assert_eq!(render(source), expected);
}

#[test]
fn blank_lines_do_not_change_structure() {
    let source =
        "ul\n  li a\n  \n  li b\n \n         \n  li\n    ul\n      li c\n\n      li d\n  li e";
    let expected = indoc! {"
        <ul>
          <li>a</li>
          <li>b</li>
          <li>
            <ul>
              <li>c</li>
              <li>d</li>
            </ul>
          </li>
          <li>e</li>
        </ul>"};
    assert_eq!(render(source), expected);
}

#[test]
fn inline_text_moves_above_children() {
    let source = indoc! {r#"
        ul
          li visit
            a(href="/foo") foo
    "#};
    let expected = indoc! {r#"
        <ul>
          <li>
            visit
            <a href="/foo">foo</a>
          </li>
        </ul>"#};
    assert_eq!(render(source), expected);
}

#[test]
fn piped_lines_keep_extra_spaces() {
    assert_eq!(
        render("p\n  | foo\n  |    bar\n  |  baz"),
        "<p>\n  foo\n     bar\n   baz\n</p>"
    );
    assert_eq!(
        render("label\n  | Password:\n  input"),
        "<label>\n  Password:\n  <input />\n</label>"
    );
}

#[test]
fn text_interpolation() {
    assert_eq!(
        render("p Hello #{$user->name}, you have #{$count} messages"),
        "<p>Hello <?= $user->name ?>, you have <?= $count ?> messages</p>"
    );
    assert_eq!(render(r"p \#{literal}"), "<p>#{literal}</p>");
}

#[test]
fn code_lines() {
    let source = indoc! {r#"
        - $foo = "<script>";
        = $foo
    "#};
    assert_eq!(render(source), "<?php $foo = \"<script>\"; ?>\n<?= $foo ?>");
}

#[test]
fn foreach_and_for_loops() {
    assert_eq!(
        render("- foreach($contacts as $contact):\n  - include_partial('form', $contact)"),
        indoc! {"
            <?php foreach($contacts as $contact): ?>
              <?php include_partial('form', $contact) ?>
            <?php endforeach; ?>"}
    );
    assert_eq!(
        render("- for($i = 0; $i < 3; $i++):\n  = $i"),
        indoc! {"
            <?php for($i = 0; $i < 3; $i++): ?>
              <?= $i ?>
            <?php endfor; ?>"}
    );
}

#[test]
fn if_else_chain_is_closed_once() {
    assert_eq!(
        render("- if (true):\n  p x\n- else:\n  p y"),
        indoc! {"
            <?php if (true): ?>
              <p>x</p>
            <?php else: ?>
              <p>y</p>
            <?php endif; ?>"}
    );
}

#[test]
fn elseif_chain_inside_a_tag() {
    let source = indoc! {"
        p
          - if ($notice):
            strong= $notice

          - elseif ($error):
            em= $error
          - else   :
            | nothing
    "};
    let expected = indoc! {"
        <p>
          <?php if ($notice): ?>
            <strong><?= $notice ?></strong>
          <?php elseif ($error): ?>
            <em><?= $error ?></em>
          <?php else   : ?>
            nothing
          <?php endif; ?>
        </p>"};
    assert_eq!(render(source), expected);
}

#[test]
fn switch_cases_break() {
    let source = indoc! {"
        - switch ($foo) :

          -case 2 :
            p.foo= $foo

          -   case 5   :
            p some text
    "};
    let expected = indoc! {r#"
        <?php switch ($foo) : ?>
          <?php case 2 : ?>
            <p class="foo"><?= $foo ?></p>
          <?php break; ?>
          <?php case 5   : ?>
            <p>some text</p>
          <?php break; ?>
        <?php endswitch; ?>"#};
    assert_eq!(render(source), expected);
}

#[test]
fn one_line_statement_is_not_a_block() {
    assert_eq!(
        render("p\n  - if (5 === $num) $num++;"),
        "<p>\n  <?php if (5 === $num) $num++; ?>\n</p>"
    );
}

#[test]
fn comments() {
    assert_eq!(render("/ hidden\np shown"), "<p>shown</p>");
    assert_eq!(
        render("p\n  /! visible\n  | text"),
        "<p>\n  <!-- visible -->\n  text\n</p>"
    );
    assert_eq!(
        render("/!\n  p inside\n  div"),
        "<!--\n  <p>inside</p>\n  <div></div>\n-->"
    );
}

#[test]
fn hidden_comment_swallows_its_block() {
    let source = indoc! {"
        div
          /
            p
              | Not printed
          span
    "};
    assert_eq!(render(source), "<div>\n  <span></span>\n</div>");
}

#[test]
fn conditional_comments() {
    let source = indoc! {r#"
        /! [if lt IE 7]
          link:css( src="/less/ie6.less" )
    "#};
    let expected = indoc! {r#"
        <!--[if lt IE 7]>
          <link src="/less/ie6.less" rel="stylesheet" type="text/css" />
        <![endif]-->"#};
    assert_eq!(render(source), expected);
}

#[test]
fn style_filter_keeps_lines_verbatim() {
    assert_eq!(
        render(":style\n  | a {\n  | b }"),
        "<style type=\"text/css\">\n  a {\n  b }\n</style>"
    );
}

#[test]
fn filter_attributes_allow_a_leading_space() {
    let spaced = render(":php (x=1)\n  echo 1;");
    assert_eq!(spaced, render(":php(x=1)\n  echo 1;"));
    assert!(!spaced.contains("x=1"));
}

#[test]
fn filters_nest_at_their_level() {
    let source = indoc! {"
        head
          :javascript
            var a = 1;
              var b = 2;
    "};
    let expected = indoc! {r#"
        <head>
          <script type="text/javascript">
            var a = 1;
              var b = 2;
          </script>
        </head>"#};
    assert_eq!(render(source), expected);
}

#[test]
fn full_document() {
    let source = indoc! {"
        !!! strict
        html
          - use_helper('LESS')
          head
            - include_title()
          body
            a#logo( href = '#' ) logo

            ul#main-menu
              li
                a( href = '#' ) Второй итем

            = $sf_content
    "};
    insta::assert_snapshot!(render(source), @r###"
    <!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
    <html>
      <?php use_helper('LESS') ?>
      <head>
        <?php include_title() ?>
      </head>
      <body>
        <a id="logo" href="#">logo</a>
        <ul id="main-menu">
          <li>
            <a href="#">Второй итем</a>
          </li>
        </ul>
        <?= $sf_content ?>
      </body>
    </html>
    "###);
}

#[test]
fn tab_width_applies_to_input_and_output() {
    let engine = Engine::with_defaults(Options::with_tab_width(4)).unwrap();
    assert_eq!(
        engine.render_str("ul\n\tli a").unwrap(),
        "<ul>\n    <li>a</li>\n</ul>"
    );
}

#[test]
fn malformed_indentation_names_line_and_source() {
    let error = render_err("ul\n    li a\n  li b");
    assert_eq!(error.to_string(), "Malformed indentation, Line 3 on input");
}

#[test]
fn unknown_doctype_fails() {
    let error = render_err("!!! 42");
    assert_eq!(error.to_string(), "unknown doctype 42");
}

#[test]
fn unregistered_filter_fails() {
    let error = render_err(":sass\n  a\n    b: c");
    assert_eq!(
        error.to_string(),
        "filter with alias \"sass\" is not registered"
    );
}
