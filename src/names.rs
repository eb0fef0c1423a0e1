//! Identifier lookup for tag names, attribute names and `xmlns` namespaces.
//!
//! Tag and attribute names arriving here are already ASCII-lowercased by the
//! tokenizer. Anything outside the known vocabulary maps to `Unknown`, which
//! keeps the original spelling available through the token's `name` field.

/// The well-known HTML element names, plus [`TagId::Unknown`] for everything
/// else.
///
/// The tokenizer only dispatches on a handful of these (the raw-text
/// elements, `plaintext`, `script` and `html`); the rest exist so consumers
/// can match on ids instead of strings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum TagId {
    A,
    Abbr,
    Acronym,
    Address,
    Applet,
    Area,
    Article,
    Aside,
    Audio,
    B,
    Base,
    Basefont,
    Bdi,
    Bdo,
    Bgsound,
    Big,
    Blockquote,
    Body,
    Br,
    Button,
    Canvas,
    Caption,
    Center,
    Cite,
    Code,
    Col,
    Colgroup,
    Data,
    Datalist,
    Dd,
    Del,
    Details,
    Dfn,
    Dialog,
    Dir,
    Div,
    Dl,
    Dt,
    Em,
    Embed,
    Fieldset,
    Figcaption,
    Figure,
    Font,
    Footer,
    Form,
    Frame,
    Frameset,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Header,
    Hgroup,
    Hr,
    Html,
    I,
    Iframe,
    Img,
    Input,
    Ins,
    Isindex,
    Kbd,
    Keygen,
    Label,
    Legend,
    Li,
    Link,
    Listing,
    Main,
    Map,
    Mark,
    Marquee,
    Menu,
    Meta,
    Meter,
    Nav,
    Nobr,
    Noembed,
    Noframes,
    Noscript,
    Object,
    Ol,
    Optgroup,
    Option,
    Output,
    P,
    Param,
    Picture,
    Plaintext,
    Pre,
    Progress,
    Q,
    Rp,
    Rt,
    Ruby,
    S,
    Samp,
    Script,
    Search,
    Section,
    Select,
    Slot,
    Small,
    Source,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Summary,
    Sup,
    Table,
    Tbody,
    Td,
    Template,
    Textarea,
    Tfoot,
    Th,
    Thead,
    Time,
    Title,
    Tr,
    Track,
    Tt,
    U,
    Ul,
    Var,
    Video,
    Wbr,
    Xmp,
    /// Any element name not in the table.
    Unknown,
}

impl TagId {
    /// Look up a lowercased tag name.
    #[must_use]
    pub fn from_name(name: &str) -> TagId {
        match name {
            "a" => TagId::A,
            "abbr" => TagId::Abbr,
            "acronym" => TagId::Acronym,
            "address" => TagId::Address,
            "applet" => TagId::Applet,
            "area" => TagId::Area,
            "article" => TagId::Article,
            "aside" => TagId::Aside,
            "audio" => TagId::Audio,
            "b" => TagId::B,
            "base" => TagId::Base,
            "basefont" => TagId::Basefont,
            "bdi" => TagId::Bdi,
            "bdo" => TagId::Bdo,
            "bgsound" => TagId::Bgsound,
            "big" => TagId::Big,
            "blockquote" => TagId::Blockquote,
            "body" => TagId::Body,
            "br" => TagId::Br,
            "button" => TagId::Button,
            "canvas" => TagId::Canvas,
            "caption" => TagId::Caption,
            "center" => TagId::Center,
            "cite" => TagId::Cite,
            "code" => TagId::Code,
            "col" => TagId::Col,
            "colgroup" => TagId::Colgroup,
            "data" => TagId::Data,
            "datalist" => TagId::Datalist,
            "dd" => TagId::Dd,
            "del" => TagId::Del,
            "details" => TagId::Details,
            "dfn" => TagId::Dfn,
            "dialog" => TagId::Dialog,
            "dir" => TagId::Dir,
            "div" => TagId::Div,
            "dl" => TagId::Dl,
            "dt" => TagId::Dt,
            "em" => TagId::Em,
            "embed" => TagId::Embed,
            "fieldset" => TagId::Fieldset,
            "figcaption" => TagId::Figcaption,
            "figure" => TagId::Figure,
            "font" => TagId::Font,
            "footer" => TagId::Footer,
            "form" => TagId::Form,
            "frame" => TagId::Frame,
            "frameset" => TagId::Frameset,
            "h1" => TagId::H1,
            "h2" => TagId::H2,
            "h3" => TagId::H3,
            "h4" => TagId::H4,
            "h5" => TagId::H5,
            "h6" => TagId::H6,
            "head" => TagId::Head,
            "header" => TagId::Header,
            "hgroup" => TagId::Hgroup,
            "hr" => TagId::Hr,
            "html" => TagId::Html,
            "i" => TagId::I,
            "iframe" => TagId::Iframe,
            "img" => TagId::Img,
            "input" => TagId::Input,
            "ins" => TagId::Ins,
            "isindex" => TagId::Isindex,
            "kbd" => TagId::Kbd,
            "keygen" => TagId::Keygen,
            "label" => TagId::Label,
            "legend" => TagId::Legend,
            "li" => TagId::Li,
            "link" => TagId::Link,
            "listing" => TagId::Listing,
            "main" => TagId::Main,
            "map" => TagId::Map,
            "mark" => TagId::Mark,
            "marquee" => TagId::Marquee,
            "menu" => TagId::Menu,
            "meta" => TagId::Meta,
            "meter" => TagId::Meter,
            "nav" => TagId::Nav,
            "nobr" => TagId::Nobr,
            "noembed" => TagId::Noembed,
            "noframes" => TagId::Noframes,
            "noscript" => TagId::Noscript,
            "object" => TagId::Object,
            "ol" => TagId::Ol,
            "optgroup" => TagId::Optgroup,
            "option" => TagId::Option,
            "output" => TagId::Output,
            "p" => TagId::P,
            "param" => TagId::Param,
            "picture" => TagId::Picture,
            "plaintext" => TagId::Plaintext,
            "pre" => TagId::Pre,
            "progress" => TagId::Progress,
            "q" => TagId::Q,
            "rp" => TagId::Rp,
            "rt" => TagId::Rt,
            "ruby" => TagId::Ruby,
            "s" => TagId::S,
            "samp" => TagId::Samp,
            "script" => TagId::Script,
            "search" => TagId::Search,
            "section" => TagId::Section,
            "select" => TagId::Select,
            "slot" => TagId::Slot,
            "small" => TagId::Small,
            "source" => TagId::Source,
            "span" => TagId::Span,
            "strike" => TagId::Strike,
            "strong" => TagId::Strong,
            "style" => TagId::Style,
            "sub" => TagId::Sub,
            "summary" => TagId::Summary,
            "sup" => TagId::Sup,
            "table" => TagId::Table,
            "tbody" => TagId::Tbody,
            "td" => TagId::Td,
            "template" => TagId::Template,
            "textarea" => TagId::Textarea,
            "tfoot" => TagId::Tfoot,
            "th" => TagId::Th,
            "thead" => TagId::Thead,
            "time" => TagId::Time,
            "title" => TagId::Title,
            "tr" => TagId::Tr,
            "track" => TagId::Track,
            "tt" => TagId::Tt,
            "u" => TagId::U,
            "ul" => TagId::Ul,
            "var" => TagId::Var,
            "video" => TagId::Video,
            "wbr" => TagId::Wbr,
            "xmp" => TagId::Xmp,
            _ => TagId::Unknown,
        }
    }
}

/// The well-known HTML attribute names, plus [`AttrId::Unknown`] for
/// everything else.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum AttrId {
    Accept,
    Accesskey,
    Action,
    Allow,
    Alt,
    Async,
    Autocomplete,
    Autofocus,
    Autoplay,
    Charset,
    Checked,
    Cite,
    Class,
    Cols,
    Colspan,
    Content,
    Contenteditable,
    Controls,
    Coords,
    Crossorigin,
    Datetime,
    Default,
    Defer,
    Dir,
    Disabled,
    Download,
    Draggable,
    Enctype,
    For,
    Form,
    Headers,
    Height,
    Hidden,
    High,
    Href,
    Hreflang,
    HttpEquiv,
    Id,
    Integrity,
    Ismap,
    Kind,
    Label,
    Lang,
    List,
    Loop,
    Low,
    Max,
    Maxlength,
    Media,
    Method,
    Min,
    Minlength,
    Multiple,
    Muted,
    Name,
    Novalidate,
    Open,
    Optimum,
    Pattern,
    Ping,
    Placeholder,
    Poster,
    Preload,
    Readonly,
    Rel,
    Required,
    Reversed,
    Rows,
    Rowspan,
    Sandbox,
    Scope,
    Selected,
    Shape,
    Size,
    Sizes,
    Slot,
    Span,
    Spellcheck,
    Src,
    Srcdoc,
    Srclang,
    Srcset,
    Start,
    Step,
    Style,
    Tabindex,
    Target,
    Title,
    Translate,
    Type,
    Usemap,
    Value,
    Width,
    Wrap,
    Xmlns,
    /// Any attribute name not in the table.
    Unknown,
}

impl AttrId {
    /// Look up a lowercased attribute name.
    #[must_use]
    pub fn from_name(name: &str) -> AttrId {
        match name {
            "accept" => AttrId::Accept,
            "accesskey" => AttrId::Accesskey,
            "action" => AttrId::Action,
            "allow" => AttrId::Allow,
            "alt" => AttrId::Alt,
            "async" => AttrId::Async,
            "autocomplete" => AttrId::Autocomplete,
            "autofocus" => AttrId::Autofocus,
            "autoplay" => AttrId::Autoplay,
            "charset" => AttrId::Charset,
            "checked" => AttrId::Checked,
            "cite" => AttrId::Cite,
            "class" => AttrId::Class,
            "cols" => AttrId::Cols,
            "colspan" => AttrId::Colspan,
            "content" => AttrId::Content,
            "contenteditable" => AttrId::Contenteditable,
            "controls" => AttrId::Controls,
            "coords" => AttrId::Coords,
            "crossorigin" => AttrId::Crossorigin,
            "datetime" => AttrId::Datetime,
            "default" => AttrId::Default,
            "defer" => AttrId::Defer,
            "dir" => AttrId::Dir,
            "disabled" => AttrId::Disabled,
            "download" => AttrId::Download,
            "draggable" => AttrId::Draggable,
            "enctype" => AttrId::Enctype,
            "for" => AttrId::For,
            "form" => AttrId::Form,
            "headers" => AttrId::Headers,
            "height" => AttrId::Height,
            "hidden" => AttrId::Hidden,
            "high" => AttrId::High,
            "href" => AttrId::Href,
            "hreflang" => AttrId::Hreflang,
            "http-equiv" => AttrId::HttpEquiv,
            "id" => AttrId::Id,
            "integrity" => AttrId::Integrity,
            "ismap" => AttrId::Ismap,
            "kind" => AttrId::Kind,
            "label" => AttrId::Label,
            "lang" => AttrId::Lang,
            "list" => AttrId::List,
            "loop" => AttrId::Loop,
            "low" => AttrId::Low,
            "max" => AttrId::Max,
            "maxlength" => AttrId::Maxlength,
            "media" => AttrId::Media,
            "method" => AttrId::Method,
            "min" => AttrId::Min,
            "minlength" => AttrId::Minlength,
            "multiple" => AttrId::Multiple,
            "muted" => AttrId::Muted,
            "name" => AttrId::Name,
            "novalidate" => AttrId::Novalidate,
            "open" => AttrId::Open,
            "optimum" => AttrId::Optimum,
            "pattern" => AttrId::Pattern,
            "ping" => AttrId::Ping,
            "placeholder" => AttrId::Placeholder,
            "poster" => AttrId::Poster,
            "preload" => AttrId::Preload,
            "readonly" => AttrId::Readonly,
            "rel" => AttrId::Rel,
            "required" => AttrId::Required,
            "reversed" => AttrId::Reversed,
            "rows" => AttrId::Rows,
            "rowspan" => AttrId::Rowspan,
            "sandbox" => AttrId::Sandbox,
            "scope" => AttrId::Scope,
            "selected" => AttrId::Selected,
            "shape" => AttrId::Shape,
            "size" => AttrId::Size,
            "sizes" => AttrId::Sizes,
            "slot" => AttrId::Slot,
            "span" => AttrId::Span,
            "spellcheck" => AttrId::Spellcheck,
            "src" => AttrId::Src,
            "srcdoc" => AttrId::Srcdoc,
            "srclang" => AttrId::Srclang,
            "srcset" => AttrId::Srcset,
            "start" => AttrId::Start,
            "step" => AttrId::Step,
            "style" => AttrId::Style,
            "tabindex" => AttrId::Tabindex,
            "target" => AttrId::Target,
            "title" => AttrId::Title,
            "translate" => AttrId::Translate,
            "type" => AttrId::Type,
            "usemap" => AttrId::Usemap,
            "value" => AttrId::Value,
            "width" => AttrId::Width,
            "wrap" => AttrId::Wrap,
            "xmlns" => AttrId::Xmlns,
            _ => AttrId::Unknown,
        }
    }
}

/// The namespace of the document, detected from the `xmlns` attribute of an
/// emitted `<html>` start tag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Namespace {
    /// The HTML namespace, `http://www.w3.org/1999/xhtml`. The initial value.
    #[default]
    Html,
    /// The MathML namespace, `http://www.w3.org/1998/Math/MathML`.
    MathMl,
    /// The SVG namespace, `http://www.w3.org/2000/svg`.
    Svg,
}

impl Namespace {
    /// Look up a namespace URI. Returns `None` for unrecognised URIs.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Namespace> {
        match uri {
            "http://www.w3.org/1999/xhtml" => Some(Namespace::Html),
            "http://www.w3.org/1998/Math/MathML" => Some(Namespace::MathMl),
            "http://www.w3.org/2000/svg" => Some(Namespace::Svg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AttrId, Namespace, TagId};

    #[test]
    fn tag_lookup() {
        assert_eq!(TagId::from_name("script"), TagId::Script);
        assert_eq!(TagId::from_name("textarea"), TagId::Textarea);
        assert_eq!(TagId::from_name("blink"), TagId::Unknown);
    }

    #[test]
    fn attr_lookup() {
        assert_eq!(AttrId::from_name("http-equiv"), AttrId::HttpEquiv);
        assert_eq!(AttrId::from_name("xmlns"), AttrId::Xmlns);
        assert_eq!(AttrId::from_name("data-foo"), AttrId::Unknown);
    }

    #[test]
    fn namespace_lookup() {
        assert_eq!(
            Namespace::from_uri("http://www.w3.org/2000/svg"),
            Some(Namespace::Svg)
        );
        assert_eq!(Namespace::from_uri("urn:example"), None);
    }
}
