use html5pull::{
    AttrId, Attribute, Doctype, Namespace, State, Tag, TagId, Token, Tokenizer,
};
use pretty_assertions::assert_eq;

fn tokenize(html: &str) -> Vec<Token> {
    Tokenizer::new(html).infallible().collect()
}

fn data(text: &str, encode_entities: bool) -> Token {
    Token::Data {
        text: text.to_string(),
        encode_entities,
    }
}

fn tag(name: &str, is_end_tag: bool, attributes: &[(&str, Option<&str>)]) -> Token {
    Token::Tag(Tag {
        id: TagId::from_name(name),
        name: name.to_string(),
        is_end_tag,
        is_empty_element: false,
        attributes: attributes
            .iter()
            .map(|&(name, value)| Attribute {
                id: AttrId::from_name(name),
                name: name.to_string(),
                value: value.map(str::to_string),
            })
            .collect(),
    })
}

fn start_tag(name: &str, attributes: &[(&str, Option<&str>)]) -> Token {
    tag(name, false, attributes)
}

fn end_tag(name: &str) -> Token {
    tag(name, true, &[])
}

#[test]
fn tag_with_attribute_and_text() {
    assert_eq!(
        tokenize("<p class=\"x\">hi</p>"),
        vec![
            start_tag("p", &[("class", Some("x"))]),
            data("hi", true),
            end_tag("p"),
        ]
    );
}

#[test]
fn tag_names_and_attribute_names_are_lowercased() {
    assert_eq!(
        tokenize("<DIV Class=Foo></DIV>"),
        vec![
            start_tag("div", &[("class", Some("Foo"))]),
            end_tag("div"),
        ]
    );
}

#[test]
fn attributes_without_values_and_duplicates_pass_through() {
    assert_eq!(
        tokenize("<input disabled x=1 x=2>"),
        vec![start_tag(
            "input",
            &[("disabled", None), ("x", Some("1")), ("x", Some("2"))],
        )]
    );
}

#[test]
fn self_closing_tag() {
    let tokens = tokenize("<br/>");
    match &tokens[..] {
        [Token::Tag(tag)] => {
            assert_eq!(tag.name, "br");
            assert_eq!(tag.id, TagId::Br);
            assert!(tag.is_empty_element);
            assert!(!tag.is_end_tag);
        }
        other => panic!("unexpected tokens: {:?}", other),
    }
}

#[test]
fn end_tags_may_carry_attributes() {
    assert_eq!(
        tokenize("</div class=\"x\">"),
        vec![tag("div", true, &[("class", Some("x"))])]
    );
}

#[test]
fn stray_end_tag_produces_nothing() {
    assert_eq!(tokenize("</>"), vec![]);
    assert_eq!(
        tokenize("a</>b"),
        vec![data("a", true), data("b", true)]
    );
}

#[test]
fn invalid_tag_open_falls_back_to_text() {
    assert_eq!(tokenize("<1>"), vec![data("<1>", true)]);
    // the run before the `<` was already flushed when the tag opened
    assert_eq!(
        tokenize("a</ b>"),
        vec![data("a", true), data("</ b>", true)]
    );
}

#[test]
fn script_data_keeps_comment_like_text() {
    assert_eq!(
        tokenize("<script>a<!--b--></script>"),
        vec![
            start_tag("script", &[]),
            Token::ScriptData("a<!--b-->".to_string()),
            end_tag("script"),
        ]
    );
}

#[test]
fn script_data_double_escape() {
    assert_eq!(
        tokenize("<script><!--<script></script>--></script>"),
        vec![
            start_tag("script", &[]),
            Token::ScriptData("<!--<script></script>-->".to_string()),
            end_tag("script"),
        ]
    );
}

#[test]
fn script_data_is_not_decoded() {
    assert_eq!(
        tokenize("<script>a &amp; b</script>"),
        vec![
            start_tag("script", &[]),
            Token::ScriptData("a &amp; b".to_string()),
            end_tag("script"),
        ]
    );
}

#[test]
fn rcdata_decodes_entities() {
    assert_eq!(
        tokenize("<title>X &amp; Y</title>"),
        vec![
            start_tag("title", &[]),
            data("X & Y", true),
            end_tag("title"),
        ]
    );
}

#[test]
fn rcdata_keeps_mismatched_end_tags_as_text() {
    assert_eq!(
        tokenize("<textarea></tex></textarea>"),
        vec![
            start_tag("textarea", &[]),
            data("</tex>", true),
            end_tag("textarea"),
        ]
    );
}

#[test]
fn rawtext_is_not_decoded() {
    assert_eq!(
        tokenize("<style>p &amp; q</style>"),
        vec![
            start_tag("style", &[]),
            data("p &amp; q", false),
            end_tag("style"),
        ]
    );
}

#[test]
fn rawtext_splits_the_run_at_less_than_signs() {
    assert_eq!(
        tokenize("<style>a < b</style>"),
        vec![
            start_tag("style", &[]),
            data("a ", false),
            data("< b", false),
            end_tag("style"),
        ]
    );
}

#[test]
fn plaintext_swallows_the_rest_of_the_input() {
    assert_eq!(
        tokenize("<plaintext>abc<xyz"),
        vec![start_tag("plaintext", &[]), data("abc<xyz", false)]
    );
}

#[test]
fn doctype_html() {
    assert_eq!(
        tokenize("<!DOCTYPE html>"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "DOCTYPE".to_string(),
            name: Some("html".to_string()),
            ..Doctype::default()
        })]
    );
}

#[test]
fn doctype_keeps_keyword_and_name_spelling() {
    assert_eq!(
        tokenize("<!DocType HTML>"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "DocType".to_string(),
            name: Some("HTML".to_string()),
            ..Doctype::default()
        })]
    );
}

#[test]
fn doctype_with_public_and_system_identifiers() {
    assert_eq!(
        tokenize(
            "<!doctype html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \
             'http://www.w3.org/TR/html4/strict.dtd'>"
        ),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "doctype".to_string(),
            name: Some("html".to_string()),
            public_keyword: Some("PUBLIC".to_string()),
            public_identifier: Some("-//W3C//DTD HTML 4.01//EN".to_string()),
            system_identifier: Some("http://www.w3.org/TR/html4/strict.dtd".to_string()),
            ..Doctype::default()
        })]
    );
}

#[test]
fn doctype_with_system_identifier() {
    assert_eq!(
        tokenize("<!doctype html SyStEm \"about:legacy-compat\">"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "doctype".to_string(),
            name: Some("html".to_string()),
            system_keyword: Some("SyStEm".to_string()),
            system_identifier: Some("about:legacy-compat".to_string()),
            ..Doctype::default()
        })]
    );
}

#[test]
fn malformed_doctypes_force_quirks() {
    assert_eq!(
        tokenize("<!DOCTYPE>"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "DOCTYPE".to_string(),
            force_quirks: true,
            ..Doctype::default()
        })]
    );

    assert_eq!(
        tokenize("<!DOCTYPE html PUB>"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "DOCTYPE".to_string(),
            name: Some("html".to_string()),
            force_quirks: true,
            ..Doctype::default()
        })]
    );

    assert_eq!(
        tokenize("<!DOCTYPE html PUBLIC junk>"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "DOCTYPE".to_string(),
            name: Some("html".to_string()),
            public_keyword: Some("PUBLIC".to_string()),
            force_quirks: true,
            ..Doctype::default()
        })]
    );
}

#[test]
fn doctype_at_end_of_input_forces_quirks() {
    assert_eq!(
        tokenize("<!DOCTYPE html"),
        vec![Token::Doctype(Doctype {
            raw_tag_name: "DOCTYPE".to_string(),
            name: Some("html".to_string()),
            force_quirks: true,
            ..Doctype::default()
        })]
    );
}

#[test]
fn comment_with_inner_dashes() {
    assert_eq!(
        tokenize("<!-- a -- b -->"),
        vec![Token::Comment(" a -- b ".to_string())]
    );
}

#[test]
fn comment_closed_by_bang() {
    assert_eq!(tokenize("<!--x--!>"), vec![Token::Comment("x".to_string())]);
}

#[test]
fn empty_comments() {
    assert_eq!(tokenize("<!-->"), vec![Token::Comment(String::new())]);
    assert_eq!(tokenize("<!--->"), vec![Token::Comment(String::new())]);
    assert_eq!(tokenize("<!---->"), vec![Token::Comment(String::new())]);
}

#[test]
fn bogus_comment_from_question_mark() {
    assert_eq!(
        tokenize("<?php echo ?>"),
        vec![Token::Comment("?php echo ?".to_string())]
    );
}

#[test]
fn bogus_comment_from_partial_keyword() {
    assert_eq!(tokenize("<!DOC>"), vec![Token::Comment("DOC".to_string())]);
    assert_eq!(
        tokenize("<![CDATAx]]>"),
        vec![Token::Comment("[CDATAx]]".to_string())]
    );
}

#[test]
fn cdata_section() {
    assert_eq!(tokenize("<![CDATA[x]]>"), vec![Token::CData("x".to_string())]);
    assert_eq!(
        tokenize("<![CDATA[a]b]]c]]>"),
        vec![Token::CData("a]b]]c".to_string())]
    );
}

#[test]
fn cdata_section_flushes_at_end_of_input() {
    assert_eq!(tokenize("<![CDATA[ab"), vec![Token::CData("ab".to_string())]);
    assert_eq!(
        tokenize("<![CDATA[ab]]"),
        vec![Token::CData("ab]]".to_string())]
    );
}

#[test]
fn entity_in_data() {
    assert_eq!(tokenize("&amp;"), vec![data("&", true)]);
    assert_eq!(tokenize("x &amp; y"), vec![data("x & y", true)]);
}

#[test]
fn entity_without_semicolon_at_end_of_input() {
    assert_eq!(tokenize("&amp"), vec![data("&", true)]);
}

#[test]
fn unknown_entity_stays_raw() {
    assert_eq!(tokenize("&xyzzy;"), vec![data("&xyzzy;", true)]);
}

#[test]
fn entity_backtracks_to_the_longest_match() {
    assert_eq!(tokenize("&notin;"), vec![data("\u{2209}", true)]);
    assert_eq!(tokenize("&notin "), vec![data("\u{ac}in ", true)]);
}

#[test]
fn numeric_entities_in_data() {
    assert_eq!(tokenize("&#65;&#x42;"), vec![data("AB", true)]);
    assert_eq!(tokenize("&#x80;"), vec![data("\u{20ac}", true)]);
}

#[test]
fn entity_in_attribute_value() {
    assert_eq!(
        tokenize("<a href=foo&amp;bar>"),
        vec![start_tag("a", &[("href", Some("foo&bar"))])]
    );
    assert_eq!(
        tokenize("<a b=&notin;>"),
        vec![start_tag("a", &[("b", Some("\u{2209}"))])]
    );
}

#[test]
fn attribute_value_references_are_left_alone_before_equals_or_alphanumerics() {
    assert_eq!(
        tokenize("<a href=\"?x&notin=1\">"),
        vec![start_tag("a", &[("href", Some("?x&notin=1"))])]
    );
    assert_eq!(
        tokenize("<a href=\"?x&notinq\">"),
        vec![start_tag("a", &[("href", Some("?x&notinq"))])]
    );
}

#[test]
fn quote_terminates_a_reference_without_decoding() {
    assert_eq!(
        tokenize("<a href=\"&\">"),
        vec![start_tag("a", &[("href", Some("&"))])]
    );
    assert_eq!(
        tokenize("<a href=&>"),
        vec![start_tag("a", &[("href", Some("&"))])]
    );
}

#[test]
fn attribute_values_decode_even_with_decoding_off() {
    let mut tokenizer = Tokenizer::new("<a href=\"&amp;\">&amp;</a>");
    tokenizer.set_decode_character_references(false);
    let tokens: Vec<Token> = tokenizer.infallible().collect();
    assert_eq!(
        tokens,
        vec![
            start_tag("a", &[("href", Some("&"))]),
            data("&amp;", false),
            end_tag("a"),
        ]
    );
}

#[test]
fn null_characters() {
    // kept as-is in data, replaced everywhere else
    assert_eq!(tokenize("a\0b"), vec![data("a\0b", true)]);
    assert_eq!(
        tokenize("<title>a\0b</title>"),
        vec![
            start_tag("title", &[]),
            data("a\u{fffd}b", true),
            end_tag("title"),
        ]
    );
    assert_eq!(
        tokenize("<!--\0-->"),
        vec![Token::Comment("\u{fffd}".to_string())]
    );
}

#[test]
fn unterminated_constructs_replay_raw_input() {
    assert_eq!(tokenize("<"), vec![data("<", false)]);
    assert_eq!(tokenize("</"), vec![data("</", false)]);
    assert_eq!(tokenize("<a href="), vec![data("<a href=", false)]);
    assert_eq!(tokenize("<a href=\"x"), vec![data("<a href=\"x", false)]);
    assert_eq!(tokenize("<!-- abc"), vec![data("<!-- abc", false)]);
    assert_eq!(tokenize("<!DOCTY"), vec![data("<!DOCTY", false)]);
    assert_eq!(tokenize("<?php"), vec![data("<?php", false)]);
}

#[test]
fn raw_replay_preserves_earlier_text_as_its_own_token() {
    assert_eq!(
        tokenize("hi<a href="),
        vec![data("hi", true), data("<a href=", false)]
    );
}

#[test]
fn content_model_switches_only_on_start_tags() {
    // a self-closing script tag does not enter script data
    assert_eq!(
        tokenize("<script/>x"),
        vec![
            Token::Tag(Tag {
                id: TagId::Script,
                name: "script".to_string(),
                is_end_tag: false,
                is_empty_element: true,
                attributes: vec![],
            }),
            data("x", true),
        ]
    );
}

#[test]
fn html_start_tag_sets_the_namespace() {
    let mut tokenizer = Tokenizer::new("<html xmlns=\"http://www.w3.org/2000/svg\">");
    assert_eq!(tokenizer.namespace(), Namespace::Html);
    while tokenizer.read_next_token().unwrap().is_some() {}
    assert_eq!(tokenizer.namespace(), Namespace::Svg);
}

#[test]
fn unknown_namespace_uri_is_ignored() {
    let mut tokenizer = Tokenizer::new("<html xmlns=\"urn:example\">");
    while tokenizer.read_next_token().unwrap().is_some() {}
    assert_eq!(tokenizer.namespace(), Namespace::Html);
}

#[test]
fn the_last_xmlns_attribute_wins() {
    let mut tokenizer = Tokenizer::new(
        "<html xmlns=\"http://www.w3.org/2000/svg\" \
         xmlns=\"http://www.w3.org/1998/Math/MathML\">",
    );
    while tokenizer.read_next_token().unwrap().is_some() {}
    assert_eq!(tokenizer.namespace(), Namespace::MathMl);
}

#[test]
fn positions_are_observable_between_tokens() {
    let mut tokenizer = Tokenizer::new("a\nbc");
    assert_eq!(tokenizer.line_number(), 1);
    assert_eq!(tokenizer.line_position(), 1);
    while tokenizer.read_next_token().unwrap().is_some() {}
    assert_eq!(tokenizer.line_number(), 2);
    assert_eq!(tokenizer.line_position(), 3);
}

#[test]
fn the_tokenizer_stays_finished() {
    let mut tokenizer = Tokenizer::new("x");
    assert!(tokenizer.read_next_token().unwrap().is_some());
    assert_eq!(tokenizer.read_next_token().unwrap(), None);
    assert_eq!(tokenizer.read_next_token().unwrap(), None);
    assert_eq!(tokenizer.state(), State::EndOfFile);
}

#[test]
fn carriage_returns_pass_through() {
    assert_eq!(tokenize("a\r\nb"), vec![data("a\r\nb", true)]);
}

#[test]
fn tokens_from_a_bufread_source() {
    use std::io::BufReader;

    let tokens: Vec<Token> = Tokenizer::new(BufReader::new(
        "<p class=\"x\">hi</p>".as_bytes(),
    ))
    .map(Result::unwrap)
    .collect();
    assert_eq!(
        tokens,
        vec![
            start_tag("p", &[("class", Some("x"))]),
            data("hi", true),
            end_tag("p"),
        ]
    );
}

#[test]
fn tag_lookup_is_exposed_on_the_token() {
    let tokens = tokenize("<article></article>");
    match &tokens[0] {
        Token::Tag(tag) => assert_eq!(tag.id, TagId::Article),
        other => panic!("unexpected token: {:?}", other),
    }
}

#[test]
fn attribute_lookup_helper() {
    let tokens = tokenize("<a href=\"x\" class=y>");
    match &tokens[0] {
        Token::Tag(tag) => {
            assert_eq!(
                tag.attribute("href").and_then(|a| a.value.as_deref()),
                Some("x")
            );
            assert_eq!(tag.attribute("href").map(|a| a.id), Some(AttrId::Href));
            assert!(tag.attribute("missing").is_none());
        }
        other => panic!("unexpected token: {:?}", other),
    }
}
