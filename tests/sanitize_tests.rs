//! Sanitization behavior through the public API
//!
//! Covers whitelist enforcement end to end: rule operations, attribute and
//! class filtering, the URL gate, style filtering and the standard preset.

use html_tailor::policy::PolicySet;
use html_tailor::rule::Rule;
use html_tailor::sanitizer::sanitize_html;

#[test]
fn test_unlisted_script_removed_and_flagged() {
    let policies = PolicySet::new().with(Rule::keep("div"));
    let out = sanitize_html("<div>ok</div><script>bad()</script>", &policies);

    assert_eq!(out.html, "<div>ok</div>");
    assert!(out.report.removed_tag);
    assert!(!out.report.removed_attribute);
    assert!(!out.report.removed_style);
}

#[test]
fn test_url_gate_removes_foreign_href() {
    let policies = PolicySet::new().with(
        Rule::keep("a")
            .allow_attributes(["href", "title"])
            .allow_url(["https://x/"]),
    );
    let out = sanitize_html(
        r#"<a href="https://y/evil" title="t">go</a><a href="https://x/ok">fine</a>"#,
        &policies,
    );

    assert_eq!(
        out.html,
        r#"<a title="t">go</a><a href="https://x/ok">fine</a>"#
    );
    assert!(out.report.blocked_url);
    assert!(!out.report.removed_tag);
}

#[test]
fn test_url_gate_is_case_sensitive() {
    let policies = PolicySet::new().with(
        Rule::keep("a")
            .allow_attributes(["href"])
            .allow_url(["https://x/"]),
    );
    let out = sanitize_html(r#"<a href="HTTPS://x/page">go</a>"#, &policies);

    assert_eq!(out.html, "<a>go</a>");
    assert!(out.report.blocked_url);
}

#[test]
fn test_namespaced_href_cannot_bypass_url_gate() {
    let policies = PolicySet::new().with(Rule::keep("svg")).with(
        Rule::keep("a")
            .allow_attributes(["href"])
            .allow_url(["https://ok/"]),
    );
    let out = sanitize_html(
        r#"<svg><a href="https://ok/" xlink:href="javascript:alert(1)">x</a></svg>"#,
        &policies,
    );

    assert_eq!(out.html, r#"<svg><a href="https://ok/">x</a></svg>"#);
    assert!(!out.html.contains("javascript:"));
    assert!(out.report.removed_attribute);
    assert!(!out.report.removed_tag);
}

#[test]
fn test_without_url_whitelist_href_stays() {
    let policies = PolicySet::new().with(Rule::keep("a").allow_attributes(["href"]));
    let out = sanitize_html(r#"<a href="javascript:void(0)">go</a>"#, &policies);

    assert_eq!(out.html, r#"<a href="javascript:void(0)">go</a>"#);
    assert!(out.report.is_clean());
}

#[test]
fn test_style_keeps_allowed_declarations() {
    let policies = PolicySet::new().with(
        Rule::keep("p")
            .allow_attributes(["style"])
            .allow_style(["color"]),
    );
    let out = sanitize_html(r#"<p style="color:red;display:flex">t</p>"#, &policies);

    assert_eq!(out.html, r#"<p style="color:red">t</p>"#);
    assert!(out.report.removed_style);
    assert!(!out.report.removed_attribute);
}

#[test]
fn test_style_removed_when_nothing_survives() {
    let policies = PolicySet::new().with(
        Rule::keep("p")
            .allow_attributes(["style"])
            .allow_style(["color"]),
    );
    let out = sanitize_html(r#"<p style="position:fixed">t</p>"#, &policies);

    assert_eq!(out.html, "<p>t</p>");
    assert!(out.report.removed_style);
}

#[test]
fn test_style_url_checked_against_whitelist() {
    let policies = PolicySet::new().with(
        Rule::keep("div")
            .allow_attributes(["style"])
            .allow_style(["background", "color"])
            .allow_url(["https://cdn.example/"]),
    );
    let out = sanitize_html(
        r#"<div style="background:url(https://evil.example/x.png);color:blue">t</div>"#,
        &policies,
    );

    assert_eq!(out.html, r#"<div style="color:blue">t</div>"#);
    assert!(out.report.blocked_url);
    assert!(out.report.removed_style);
}

#[test]
fn test_class_intersection() {
    let policies = PolicySet::new().with(
        Rule::keep("span")
            .allow_attributes(["class"])
            .allow_class(["b"]),
    );
    let out = sanitize_html(r#"<span class="a b c">t</span>"#, &policies);

    assert_eq!(out.html, r#"<span class="b">t</span>"#);
    assert!(!out.report.removed_attribute);
}

#[test]
fn test_class_removed_when_no_token_allowed() {
    let policies = PolicySet::new().with(
        Rule::keep("span")
            .allow_attributes(["class"])
            .allow_class(["b"]),
    );
    let out = sanitize_html(r#"<span class="a c">t</span>"#, &policies);

    assert_eq!(out.html, "<span>t</span>");
}

#[test]
fn test_replace_renames_and_strips() {
    let policies = PolicySet::new().with(Rule::replace("div", "p"));
    let out = sanitize_html(r#"<div class="x">t</div>"#, &policies);

    assert_eq!(out.html, "<p>t</p>");
    assert!(out.report.removed_attribute);
    assert!(!out.report.removed_tag);
}

#[test]
fn test_remove_rule_drops_subtree() {
    let policies = PolicySet::new()
        .with(Rule::keep("div"))
        .with(Rule::remove("aside"));
    let out = sanitize_html("<div>a<aside><div>b</div></aside>c</div>", &policies);

    assert_eq!(out.html, "<div>ac</div>");
    assert!(out.report.removed_tag);
}

#[test]
fn test_later_registration_overrides_earlier() {
    let policies = PolicySet::new()
        .with(Rule::keep("b"))
        .with(Rule::remove("b"));
    let out = sanitize_html("x<b>y</b>z", &policies);

    assert_eq!(out.html, "xz");
}

#[test]
fn test_malformed_markup_is_recovered() {
    let policies = PolicySet::new().with(Rule::keep("p")).with(Rule::keep("b"));
    let out = sanitize_html("<p>one<b>two<p>three", &policies);

    assert_eq!(out.html, "<p>one<b>two</b></p><p><b>three</b></p>");
}

#[test]
fn test_standard_strips_handlers_and_scripts() {
    let policies = PolicySet::standard();
    let out = sanitize_html(
        concat!(
            r#"<h1 onclick="steal()">Title</h1>"#,
            r#"<p title="x" style="color:red;position:absolute">Body</p>"#,
            r#"<iframe src="https://evil.example"></iframe>"#,
            "<script>steal()</script>",
        ),
        &policies,
    );

    assert_eq!(
        out.html,
        r#"<h1>Title</h1><p title="x" style="color:red">Body</p>"#
    );
    assert!(out.report.removed_tag);
    assert!(out.report.removed_attribute);
    assert!(out.report.removed_style);
}

#[test]
fn test_standard_image_sources() {
    let policies = PolicySet::standard();
    let out = sanitize_html(
        r#"<img src="//cdn.example/a.png"><img src="http://evil.example/b.png">"#,
        &policies,
    );

    assert_eq!(out.html, r#"<img src="//cdn.example/a.png"><img>"#);
    assert!(out.report.blocked_url);
}

#[test]
fn test_standard_keeps_links_without_href() {
    let policies = PolicySet::standard();
    let out = sanitize_html(r#"<p><a href="https://x">link</a> text</p>"#, &policies);

    assert_eq!(out.html, "<p><a>link</a> text</p>");
    assert!(out.report.removed_attribute);
}

#[test]
fn test_math_is_opt_in() {
    let input = "<p><math><mi>x</mi></math></p>";

    let out = sanitize_html(input, &PolicySet::standard());
    assert_eq!(out.html, "<p></p>");

    let mut policies = PolicySet::standard();
    policies.enable_math();
    let out = sanitize_html(input, &policies);
    assert_eq!(out.html, "<p><math><mi>x</mi></math></p>");
}

#[test]
fn test_sanitized_output_is_stable() {
    let policies = PolicySet::standard();
    let first = sanitize_html(
        r#"<div class="a" onclick="x()"><p style="color:red;float:left">t<b>b</b></p></div>"#,
        &policies,
    );
    let second = sanitize_html(&first.html, &policies);

    assert_eq!(first.html, second.html);
    assert!(second.report.is_clean());
}
