//! Built-in policy sets
//!
//! - [`PolicySet::standard`]: the general-purpose HTML5 whitelist used for
//!   `Level::Safe` when no custom policy is configured
//! - [`PolicySet::line_breaks`]: the reduced set behind
//!   `Level::TextWithLineBreaks`
//! - [`PolicySet::enable_math`]: opt-in MathML support on top of any set
//!
//! The standard set covers the sectioning, grouping, text-level, edit,
//! image and table elements. Forms, scripting, embedded media and links
//! (`href` is not a common attribute) are left to default-deny.

use crate::policy::PolicySet;
use crate::rule::Rule;

/// Attributes every element of the standard set may carry
pub const COMMON_ATTRIBUTES: &[&str] = &[
    "action", "align", "alt", "axis", "bgcolor", "border", "cellpadding", "cellspacing", "cite",
    "clear", "color", "cols", "colspan", "datetime", "dir", "disabled", "headers", "height",
    "high", "hspace", "label", "lang", "list", "longdesc", "low", "max", "maxlength", "min",
    "name", "nohref", "noshade", "novalidate", "nowrap", "optimum", "pubdate", "readonly",
    "reversed", "rows", "rowspan", "rules", "scope", "size", "span", "src", "start", "style",
    "summary", "tabindex", "title", "valign", "vspace", "width", "wrap",
];

/// CSS properties every element of the standard set may carry
pub const COMMON_STYLES: &[&str] = &[
    "background",
    "background-attachment",
    "background-clip",
    "background-color",
    "background-image",
    "background-origin",
    "background-position",
    "background-repeat",
    "background-size",
    "border",
    "border-bottom",
    "border-bottom-color",
    "border-bottom-left-radius",
    "border-bottom-right-radius",
    "border-bottom-style",
    "border-bottom-width",
    "border-collapse",
    "border-color",
    "border-image",
    "border-image-outset",
    "border-image-repeat",
    "border-image-slice",
    "border-image-source",
    "border-image-width",
    "border-left",
    "border-left-color",
    "border-left-style",
    "border-left-width",
    "border-radius",
    "border-right",
    "border-right-color",
    "border-right-style",
    "border-right-width",
    "border-spacing",
    "border-style",
    "border-top",
    "border-top-color",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-top-style",
    "border-top-width",
    "border-width",
    "bottom",
    "caption-side",
    "clear",
    "clip",
    "color",
    "content",
    "counter-increment",
    "counter-reset",
    "cursor",
    "direction",
    "display",
    "empty-cells",
    "font",
    "font-family",
    "font-feature-settings",
    "font-kerning",
    "font-language-override",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-synthesis",
    "font-variant",
    "font-variant-alternates",
    "font-variant-caps",
    "font-variant-east-asian",
    "font-variant-ligatures",
    "font-variant-numeric",
    "font-variant-position",
    "font-weight",
    "height",
    "left",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-image",
    "list-style-position",
    "list-style-type",
    "margin",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "opacity",
    "orphans",
    "outline",
    "outline-color",
    "outline-offset",
    "outline-style",
    "outline-width",
    "overflow",
    "overflow-wrap",
    "overflow-x",
    "overflow-y",
    "padding",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "page-break-after",
    "page-break-before",
    "page-break-inside",
    "quotes",
    "right",
    "table-layout",
    "text-align",
    "text-decoration",
    "text-decoration-color",
    "text-decoration-line",
    "text-decoration-skip",
    "text-decoration-style",
    "text-indent",
    "text-transform",
    "top",
    "unicode-bidi",
    "vertical-align",
    "white-space",
    "widows",
    "width",
    "word-spacing",
    "z-index",
];

/// URL prefixes accepted for images in the standard set
pub const IMAGE_URL_PREFIXES: &[&str] = &["//", "data:image/"];

const SECTIONING: &[&str] = &[
    "section", "article", "aside", "h1", "h2", "h3", "h4", "h5", "h6", "header", "footer",
    "address", "main",
];

const GROUPING: &[&str] = &[
    "p", "hr", "pre", "blockquote", "ol", "ul", "li", "dl", "dt", "dd", "figure", "figcaption",
    "div",
];

const TEXT_LEVEL: &[&str] = &[
    "a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "time", "code", "var", "samp",
    "kbd", "sub", "sup", "i", "b", "u", "mark", "ruby", "rt", "rp", "bdi", "bdo", "span", "br",
    "wbr",
];

const EDITS: &[&str] = &["ins", "del"];

const TABLES: &[&str] = &[
    "table", "caption", "colgroup", "col", "tbody", "thead", "tfoot", "tr", "td", "th",
];

/// MathML presentation elements registered by [`PolicySet::enable_math`]
pub const MATH_TAGS: &[&str] = &[
    "math", "maction", "menclose", "merror", "mfenced", "mfrac", "mglyph", "mi", "mlabeledtr",
    "mmultiscripts", "mn", "mo", "mover", "mpadded", "mphantom", "mroot", "mrow", "ms", "mspace",
    "msqrt", "mstyle", "msub", "msubsup", "msup", "mtable", "mtd", "mtext", "mtr", "munder",
    "munderover", "semantics",
];

fn common_rule(tag: &str) -> Rule {
    Rule::keep(tag)
        .allow_attributes(COMMON_ATTRIBUTES.iter().copied())
        .allow_style(COMMON_STYLES.iter().copied())
}

impl PolicySet {
    /// The general-purpose HTML5 whitelist
    ///
    /// # Examples
    ///
    /// ```
    /// use html_tailor::policy::PolicySet;
    ///
    /// let set = PolicySet::standard();
    /// assert!(set.contains("table"));
    /// assert!(!set.contains("script"));
    /// ```
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.insert_all(
            [SECTIONING, GROUPING, TEXT_LEVEL, EDITS]
                .into_iter()
                .flatten()
                .map(|tag| common_rule(tag)),
        );
        set.insert(common_rule("img").allow_url(IMAGE_URL_PREFIXES.iter().copied()));
        set.insert_all(TABLES.iter().map(|tag| common_rule(tag)));
        set
    }

    /// Paragraph-preserving set: block and inline text tags with no
    /// attributes, and `div` turned into `p`
    pub fn line_breaks() -> Self {
        let mut set = Self::new();
        set.insert_all(
            [SECTIONING, GROUPING, TEXT_LEVEL]
                .into_iter()
                .flatten()
                .filter(|tag| **tag != "div")
                .map(|tag| Rule::keep(*tag)),
        );
        set.insert(Rule::replace("div", "p"));
        set
    }

    /// Registers attribute-free Keep rules for the MathML element set
    pub fn enable_math(&mut self) -> &mut Self {
        self.insert_all(MATH_TAGS.iter().map(|tag| Rule::keep(*tag)));
        self
    }
}
