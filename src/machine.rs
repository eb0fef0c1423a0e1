use std::mem;

use crate::emitter::{Doctype, Tag};
use crate::utils::{whitespace_pat, ControlToken};
use crate::{Emitter, Reader, State, Tokenizer};

/// Run one step of the state machine: dispatch on the current state, consume
/// zero or more characters, and possibly hand back a finished token.
pub(crate) fn consume<R: Reader, E: Emitter>(
    slf: &mut Tokenizer<R, E>,
) -> Result<ControlToken<E::Token>, R::Error> {
    macro_rules! reconsume_in {
        ($c:expr, $state:expr) => {{
            slf.reader.unread_char($c);
            slf.switch_to($state);
            ControlToken::Continue
        }};
    }

    macro_rules! emit_or_continue {
        ($token:expr) => {
            match $token {
                Some(token) => ControlToken::Emit(token),
                None => ControlToken::Continue,
            }
        };
    }

    match slf.state {
        State::Data => Ok(match slf.reader.read_char()? {
            Some('&') if slf.decode_character_references => {
                slf.switch_to(State::CharacterReferenceInData);
                ControlToken::Continue
            }
            Some('<') => {
                slf.switch_to(State::TagOpen);
                emit_or_continue!(slf.flush_data(slf.decode_character_references))
            }
            Some(c) => {
                // a null character stays a null character here
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_data(slf.decode_character_references))
            }
        }),
        State::CharacterReferenceInData => {
            character_reference(slf, false)?;
            slf.switch_to(State::Data);
            Ok(ControlToken::Continue)
        }
        State::RcData => Ok(match slf.reader.read_char()? {
            Some('&') if slf.decode_character_references => {
                slf.switch_to(State::CharacterReferenceInRcData);
                ControlToken::Continue
            }
            Some('<') => {
                slf.switch_to(State::RcDataLessThanSign);
                emit_or_continue!(slf.flush_data(slf.decode_character_references))
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_data(slf.decode_character_references))
            }
        }),
        State::CharacterReferenceInRcData => {
            character_reference(slf, false)?;
            slf.switch_to(State::RcData);
            Ok(ControlToken::Continue)
        }
        State::RawText => Ok(match slf.reader.read_char()? {
            Some('<') => {
                slf.switch_to(State::RawTextLessThanSign);
                emit_or_continue!(slf.flush_data(false))
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_data(false))
            }
        }),
        State::ScriptData => Ok(match slf.reader.read_char()? {
            Some('<') => {
                // no flush: the whole script body becomes one token
                slf.switch_to(State::ScriptDataLessThanSign);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::PlainText => Ok(match slf.reader.read_char()? {
            Some('\0') => {
                slf.data.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_data(false))
            }
        }),
        State::TagOpen => Ok({
            slf.data.push('<');
            match slf.reader.read_char()? {
                Some('!') => {
                    slf.data.push('!');
                    slf.switch_to(State::MarkupDeclarationOpen);
                    ControlToken::Continue
                }
                Some('/') => {
                    slf.data.push('/');
                    slf.switch_to(State::EndTagOpen);
                    ControlToken::Continue
                }
                Some('?') => {
                    slf.data.push('?');
                    slf.name.clear();
                    slf.name.push('?');
                    slf.switch_to(State::BogusComment);
                    ControlToken::Continue
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    slf.data.push(c);
                    slf.tag = Some(Tag::new(String::new(), false));
                    slf.name.clear();
                    slf.name.push(c.to_ascii_lowercase());
                    slf.switch_to(State::TagName);
                    ControlToken::Continue
                }
                Some(c) => {
                    // the `<` stays in the replay buffer and surfaces as
                    // character data
                    reconsume_in!(Some(c), State::Data)
                }
                None => {
                    slf.switch_to(State::EndOfFile);
                    emit_or_continue!(slf.flush_raw())
                }
            }
        }),
        State::EndTagOpen => Ok(match slf.reader.read_char()? {
            Some('>') => {
                // stray `</>`, dropped without a token
                slf.data.clear();
                slf.switch_to(State::Data);
                ControlToken::Continue
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.tag = Some(Tag::new(String::new(), true));
                slf.name.clear();
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::TagName);
                ControlToken::Continue
            }
            Some(c) => reconsume_in!(Some(c), State::Data),
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::TagName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.seal_tag_name();
                slf.switch_to(State::BeforeAttributeName);
                ControlToken::Continue
            }
            Some('/') => {
                slf.data.push('/');
                slf.seal_tag_name();
                slf.switch_to(State::SelfClosingStartTag);
                ControlToken::Continue
            }
            Some('>') => {
                slf.seal_tag_name();
                ControlToken::Emit(slf.emit_tag())
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::RcDataLessThanSign => Ok({
            slf.data.push('<');
            match slf.reader.read_char()? {
                Some('/') => {
                    slf.data.push('/');
                    slf.name.clear();
                    slf.switch_to(State::RcDataEndTagOpen);
                    ControlToken::Continue
                }
                c => reconsume_in!(c, State::RcData),
            }
        }),
        State::RcDataEndTagOpen => Ok(match slf.reader.read_char()? {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::RcDataEndTagName);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::RcData),
        }),
        State::RcDataEndTagName => Ok(match slf.reader.read_char()? {
            Some(whitespace_pat!()) if slf.name == slf.active_tag_name => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::BeforeAttributeName);
                emit_or_continue!(slf.flush_data(slf.decode_character_references))
            }
            Some('/') if slf.name == slf.active_tag_name => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::SelfClosingStartTag);
                emit_or_continue!(slf.flush_data(slf.decode_character_references))
            }
            Some('>') if slf.name == slf.active_tag_name => {
                slf.begin_raw_end_tag();
                match slf.flush_data(slf.decode_character_references) {
                    Some(text) => {
                        slf.deferred = Some(slf.emit_tag());
                        ControlToken::Emit(text)
                    }
                    None => ControlToken::Emit(slf.emit_tag()),
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::RcData),
        }),
        State::RawTextLessThanSign => Ok({
            slf.data.push('<');
            match slf.reader.read_char()? {
                Some('/') => {
                    slf.data.push('/');
                    slf.name.clear();
                    slf.switch_to(State::RawTextEndTagOpen);
                    ControlToken::Continue
                }
                c => reconsume_in!(c, State::RawText),
            }
        }),
        State::RawTextEndTagOpen => Ok(match slf.reader.read_char()? {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::RawTextEndTagName);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::RawText),
        }),
        State::RawTextEndTagName => Ok(match slf.reader.read_char()? {
            Some(whitespace_pat!()) if slf.name == slf.active_tag_name => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::BeforeAttributeName);
                emit_or_continue!(slf.flush_data(false))
            }
            Some('/') if slf.name == slf.active_tag_name => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::SelfClosingStartTag);
                emit_or_continue!(slf.flush_data(false))
            }
            Some('>') if slf.name == slf.active_tag_name => {
                slf.begin_raw_end_tag();
                match slf.flush_data(false) {
                    Some(text) => {
                        slf.deferred = Some(slf.emit_tag());
                        ControlToken::Emit(text)
                    }
                    None => ControlToken::Emit(slf.emit_tag()),
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::RawText),
        }),
        State::ScriptDataLessThanSign => Ok({
            slf.data.push('<');
            match slf.reader.read_char()? {
                Some('/') => {
                    slf.data.push('/');
                    slf.name.clear();
                    slf.switch_to(State::ScriptDataEndTagOpen);
                    ControlToken::Continue
                }
                Some('!') => {
                    slf.data.push('!');
                    slf.switch_to(State::ScriptDataEscapeStart);
                    ControlToken::Continue
                }
                c => reconsume_in!(c, State::ScriptData),
            }
        }),
        State::ScriptDataEndTagOpen => Ok(match slf.reader.read_char()? {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::ScriptDataEndTagName);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptData),
        }),
        State::ScriptDataEndTagName => Ok(match slf.reader.read_char()? {
            Some(whitespace_pat!()) if slf.name == "script" => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::BeforeAttributeName);
                emit_or_continue!(slf.flush_script_data())
            }
            Some('/') if slf.name == "script" => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::SelfClosingStartTag);
                emit_or_continue!(slf.flush_script_data())
            }
            Some('>') if slf.name == "script" => {
                slf.begin_raw_end_tag();
                match slf.flush_script_data() {
                    Some(script) => {
                        slf.deferred = Some(slf.emit_tag());
                        ControlToken::Emit(script)
                    }
                    None => ControlToken::Emit(slf.emit_tag()),
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptData),
        }),
        State::ScriptDataEscapeStart => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::ScriptDataEscapeStartDash);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptData),
        }),
        State::ScriptDataEscapeStartDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::ScriptDataEscapedDashDash);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptData),
        }),
        State::ScriptDataEscaped => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::ScriptDataEscapedDash);
                ControlToken::Continue
            }
            Some('<') => {
                slf.switch_to(State::ScriptDataEscapedLessThanSign);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::ScriptDataEscapedDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::ScriptDataEscapedDashDash);
                ControlToken::Continue
            }
            Some('<') => {
                slf.switch_to(State::ScriptDataEscapedLessThanSign);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                slf.switch_to(State::ScriptDataEscaped);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.switch_to(State::ScriptDataEscaped);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::ScriptDataEscapedDashDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                ControlToken::Continue
            }
            Some('<') => {
                slf.switch_to(State::ScriptDataEscapedLessThanSign);
                ControlToken::Continue
            }
            Some('>') => {
                slf.data.push('>');
                slf.switch_to(State::ScriptData);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                slf.switch_to(State::ScriptDataEscaped);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.switch_to(State::ScriptDataEscaped);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::ScriptDataEscapedLessThanSign => Ok({
            slf.data.push('<');
            match slf.reader.read_char()? {
                Some('/') => {
                    slf.data.push('/');
                    slf.name.clear();
                    slf.switch_to(State::ScriptDataEscapedEndTagOpen);
                    ControlToken::Continue
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    slf.name.clear();
                    reconsume_in!(Some(c), State::ScriptDataDoubleEscapeStart)
                }
                c => reconsume_in!(c, State::ScriptDataEscaped),
            }
        }),
        State::ScriptDataEscapedEndTagOpen => Ok(match slf.reader.read_char()? {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::ScriptDataEscapedEndTagName);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptDataEscaped),
        }),
        State::ScriptDataEscapedEndTagName => Ok(match slf.reader.read_char()? {
            Some(whitespace_pat!()) if slf.name == "script" => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::BeforeAttributeName);
                emit_or_continue!(slf.flush_script_data())
            }
            Some('/') if slf.name == "script" => {
                slf.begin_raw_end_tag();
                slf.switch_to(State::SelfClosingStartTag);
                emit_or_continue!(slf.flush_script_data())
            }
            Some('>') if slf.name == "script" => {
                slf.begin_raw_end_tag();
                match slf.flush_script_data() {
                    Some(script) => {
                        slf.deferred = Some(slf.emit_tag());
                        ControlToken::Emit(script)
                    }
                    None => ControlToken::Emit(slf.emit_tag()),
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptDataEscaped),
        }),
        State::ScriptDataDoubleEscapeStart => Ok(match slf.reader.read_char()? {
            Some(c @ (whitespace_pat!() | '/' | '>')) => {
                slf.data.push(c);
                if slf.name == "script" {
                    slf.switch_to(State::ScriptDataDoubleEscaped);
                } else {
                    slf.switch_to(State::ScriptDataEscaped);
                }
                ControlToken::Continue
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptDataEscaped),
        }),
        State::ScriptDataDoubleEscaped => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::ScriptDataDoubleEscapedDash);
                ControlToken::Continue
            }
            Some('<') => {
                slf.data.push('<');
                slf.switch_to(State::ScriptDataDoubleEscapedLessThanSign);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::ScriptDataDoubleEscapedDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::ScriptDataDoubleEscapedDashDash);
                ControlToken::Continue
            }
            Some('<') => {
                slf.data.push('<');
                slf.switch_to(State::ScriptDataDoubleEscapedLessThanSign);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                slf.switch_to(State::ScriptDataDoubleEscaped);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.switch_to(State::ScriptDataDoubleEscaped);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::ScriptDataDoubleEscapedDashDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                ControlToken::Continue
            }
            Some('<') => {
                slf.data.push('<');
                slf.switch_to(State::ScriptDataDoubleEscapedLessThanSign);
                ControlToken::Continue
            }
            Some('>') => {
                slf.data.push('>');
                slf.switch_to(State::ScriptData);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\u{fffd}');
                slf.switch_to(State::ScriptDataDoubleEscaped);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.switch_to(State::ScriptDataDoubleEscaped);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_script_data())
            }
        }),
        State::ScriptDataDoubleEscapedLessThanSign => Ok(match slf.reader.read_char()? {
            Some('/') => {
                slf.data.push('/');
                slf.name.clear();
                slf.switch_to(State::ScriptDataDoubleEscapeEnd);
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptDataDoubleEscaped),
        }),
        State::ScriptDataDoubleEscapeEnd => Ok(match slf.reader.read_char()? {
            Some(c @ (whitespace_pat!() | '/' | '>')) => {
                slf.data.push(c);
                if slf.name == "script" {
                    slf.switch_to(State::ScriptDataEscaped);
                } else {
                    slf.switch_to(State::ScriptDataDoubleEscaped);
                }
                ControlToken::Continue
            }
            Some(c) if c.is_ascii_alphabetic() => {
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            c => reconsume_in!(c, State::ScriptDataDoubleEscaped),
        }),
        State::BeforeAttributeName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some('/') => {
                slf.data.push('/');
                slf.switch_to(State::SelfClosingStartTag);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_tag()),
            Some('\0') => {
                slf.data.push('\0');
                slf.name.clear();
                slf.name.push('\u{fffd}');
                slf.switch_to(State::AttributeName);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.clear();
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::AttributeName);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::AttributeName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.seal_attribute();
                slf.switch_to(State::AfterAttributeName);
                ControlToken::Continue
            }
            Some('/') => {
                slf.data.push('/');
                slf.seal_attribute();
                slf.switch_to(State::SelfClosingStartTag);
                ControlToken::Continue
            }
            Some('=') => {
                slf.data.push('=');
                slf.seal_attribute();
                slf.switch_to(State::BeforeAttributeValue);
                ControlToken::Continue
            }
            Some('>') => {
                slf.seal_attribute();
                ControlToken::Emit(slf.emit_tag())
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                // `"`, `'` and `<` are errors here, kept all the same
                slf.data.push(c);
                slf.name.push(c.to_ascii_lowercase());
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::AfterAttributeName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some('/') => {
                slf.data.push('/');
                slf.switch_to(State::SelfClosingStartTag);
                ControlToken::Continue
            }
            Some('=') => {
                slf.data.push('=');
                slf.switch_to(State::BeforeAttributeValue);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_tag()),
            Some('\0') => {
                slf.data.push('\0');
                slf.name.clear();
                slf.name.push('\u{fffd}');
                slf.switch_to(State::AttributeName);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.clear();
                slf.name.push(c.to_ascii_lowercase());
                slf.switch_to(State::AttributeName);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::BeforeAttributeValue => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::AttributeValueQuoted);
                ControlToken::Continue
            }
            Some('&') => {
                slf.quote = '\0';
                slf.name.clear();
                reconsume_in!(Some('&'), State::AttributeValueUnquoted)
            }
            Some('>') => {
                // missing value, the attribute stays value-less
                ControlToken::Emit(slf.emit_tag())
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.quote = '\0';
                slf.name.clear();
                slf.name.push('\u{fffd}');
                slf.switch_to(State::AttributeValueUnquoted);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.quote = '\0';
                slf.name.clear();
                slf.name.push(c);
                slf.switch_to(State::AttributeValueUnquoted);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::AttributeValueQuoted => Ok(match slf.reader.read_char()? {
            Some(c) if c == slf.quote => {
                slf.data.push(c);
                slf.seal_attribute_value();
                slf.switch_to(State::AfterAttributeValueQuoted);
                ControlToken::Continue
            }
            Some('&') => {
                // attribute values decode regardless of configuration
                slf.switch_to(State::CharacterReferenceInAttributeValue);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::AttributeValueUnquoted => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.seal_attribute_value();
                slf.switch_to(State::BeforeAttributeName);
                ControlToken::Continue
            }
            Some('&') => {
                slf.switch_to(State::CharacterReferenceInAttributeValue);
                ControlToken::Continue
            }
            Some('>') => {
                slf.seal_attribute_value();
                ControlToken::Emit(slf.emit_tag())
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                // `'`, `<`, `=` and backticks are errors here, kept all the
                // same
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::CharacterReferenceInAttributeValue => {
            character_reference(slf, true)?;
            let next = if slf.quote == '\0' {
                State::AttributeValueUnquoted
            } else {
                State::AttributeValueQuoted
            };
            slf.switch_to(next);
            Ok(ControlToken::Continue)
        }
        State::AfterAttributeValueQuoted => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.switch_to(State::BeforeAttributeName);
                ControlToken::Continue
            }
            Some('/') => {
                slf.data.push('/');
                slf.switch_to(State::SelfClosingStartTag);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_tag()),
            Some(c) => reconsume_in!(Some(c), State::BeforeAttributeName),
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::SelfClosingStartTag => Ok(match slf.reader.read_char()? {
            Some('>') => {
                slf.tag.as_mut().unwrap().is_empty_element = true;
                ControlToken::Emit(slf.emit_tag())
            }
            Some(c) => reconsume_in!(Some(c), State::BeforeAttributeName),
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::BogusComment => Ok(match slf.reader.read_char()? {
            Some('>') => ControlToken::Emit(slf.emit_comment()),
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::MarkupDeclarationOpen => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                match slf.reader.read_char()? {
                    Some('-') => {
                        slf.data.push('-');
                        slf.name.clear();
                        slf.switch_to(State::CommentStart);
                        ControlToken::Continue
                    }
                    c => {
                        slf.name.clear();
                        slf.name.push('-');
                        reconsume_in!(c, State::BogusComment)
                    }
                }
            }
            Some(c @ ('d' | 'D')) => {
                // spell out the keyword as written; it ends up either in the
                // doctype token or in a bogus comment
                slf.data.push(c);
                slf.name.clear();
                slf.name.push(c);
                let mut expected = "octype".chars();
                let mismatch = loop {
                    let Some(e) = expected.next() else { break None };
                    match slf.reader.read_char()? {
                        Some(x) if x.to_ascii_lowercase() == e => {
                            slf.data.push(x);
                            slf.name.push(x);
                        }
                        other => break Some(other),
                    }
                };
                match mismatch {
                    None => {
                        slf.doctype = Some(Doctype {
                            raw_tag_name: mem::take(&mut slf.name),
                            ..Doctype::default()
                        });
                        slf.switch_to(State::Doctype);
                        ControlToken::Continue
                    }
                    Some(c) => reconsume_in!(c, State::BogusComment),
                }
            }
            Some('[') => {
                slf.data.push('[');
                slf.name.clear();
                slf.name.push('[');
                let mut expected = "CDATA[".chars();
                let mismatch = loop {
                    let Some(e) = expected.next() else { break None };
                    match slf.reader.read_char()? {
                        Some(x) if x == e => {
                            slf.data.push(x);
                            slf.name.push(x);
                        }
                        other => break Some(other),
                    }
                };
                match mismatch {
                    None => {
                        slf.data.clear();
                        slf.name.clear();
                        slf.cdata_index = 0;
                        slf.switch_to(State::CdataSection);
                        ControlToken::Continue
                    }
                    Some(c) => reconsume_in!(c, State::BogusComment),
                }
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.clear();
                slf.name.push(c);
                slf.switch_to(State::BogusComment);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::CommentStart => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::CommentStartDash);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_comment()),
            c => reconsume_in!(c, State::Comment),
        }),
        State::CommentStartDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::CommentEnd);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_comment()),
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
            c => {
                slf.name.push('-');
                reconsume_in!(c, State::Comment)
            }
        }),
        State::Comment => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::CommentEndDash);
                ControlToken::Continue
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
        }),
        State::CommentEndDash => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.switch_to(State::CommentEnd);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
            c => {
                slf.name.push('-');
                reconsume_in!(c, State::Comment)
            }
        }),
        State::CommentEnd => Ok(match slf.reader.read_char()? {
            Some('>') => ControlToken::Emit(slf.emit_comment()),
            Some('!') => {
                slf.data.push('!');
                slf.switch_to(State::CommentEndBang);
                ControlToken::Continue
            }
            Some('-') => {
                slf.data.push('-');
                slf.name.push('-');
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
            c => {
                slf.name.push_str("--");
                reconsume_in!(c, State::Comment)
            }
        }),
        State::CommentEndBang => Ok(match slf.reader.read_char()? {
            Some('-') => {
                slf.data.push('-');
                slf.name.push_str("--!");
                slf.switch_to(State::CommentEndDash);
                ControlToken::Continue
            }
            // `--!>` is an error, but it does close the comment
            Some('>') => ControlToken::Emit(slf.emit_comment()),
            None => {
                slf.switch_to(State::EndOfFile);
                emit_or_continue!(slf.flush_raw())
            }
            c => {
                slf.name.push_str("--!");
                reconsume_in!(c, State::Comment)
            }
        }),
        State::Doctype => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.switch_to(State::BeforeDoctypeName);
                ControlToken::Continue
            }
            Some('>') => reconsume_in!(Some('>'), State::BeforeDoctypeName),
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
            Some(c) => reconsume_in!(Some(c), State::BeforeDoctypeName),
        }),
        State::BeforeDoctypeName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some('>') => {
                // no name at all forces quirks
                ControlToken::Emit(slf.emit_doctype(true))
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.clear();
                slf.name.push('\u{fffd}');
                slf.switch_to(State::DoctypeName);
                ControlToken::Continue
            }
            Some(c) => {
                // the doctype name keeps its casing
                slf.data.push(c);
                slf.name.clear();
                slf.name.push(c);
                slf.switch_to(State::DoctypeName);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::DoctypeName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.doctype.as_mut().unwrap().name = Some(mem::take(&mut slf.name));
                slf.switch_to(State::AfterDoctypeName);
                ControlToken::Continue
            }
            Some('>') => {
                slf.doctype.as_mut().unwrap().name = Some(mem::take(&mut slf.name));
                ControlToken::Emit(slf.emit_doctype(false))
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.doctype.as_mut().unwrap().name = Some(mem::take(&mut slf.name));
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::AfterDoctypeName => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) if slf.name.is_empty() => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some('>') => {
                let quirks = !slf.name.is_empty();
                slf.name.clear();
                ControlToken::Emit(slf.emit_doctype(quirks))
            }
            Some(c) => {
                // six characters of keyword lookahead, keeping the spelling
                slf.data.push(c);
                slf.name.push(c);
                if slf.name.len() < 6 {
                    ControlToken::Continue
                } else if slf.name.eq_ignore_ascii_case("public") {
                    slf.doctype.as_mut().unwrap().public_keyword =
                        Some(mem::take(&mut slf.name));
                    slf.switch_to(State::AfterDoctypePublicKeyword);
                    ControlToken::Continue
                } else if slf.name.eq_ignore_ascii_case("system") {
                    slf.doctype.as_mut().unwrap().system_keyword =
                        Some(mem::take(&mut slf.name));
                    slf.switch_to(State::AfterDoctypeSystemKeyword);
                    ControlToken::Continue
                } else {
                    slf.name.clear();
                    slf.set_force_quirks();
                    slf.switch_to(State::BogusDoctype);
                    ControlToken::Continue
                }
            }
            None => {
                slf.name.clear();
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::AfterDoctypePublicKeyword => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.switch_to(State::BeforeDoctypePublicIdentifier);
                ControlToken::Continue
            }
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::DoctypePublicIdentifierQuoted);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(true)),
            Some(c) => {
                slf.data.push(c);
                slf.set_force_quirks();
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::BeforeDoctypePublicIdentifier => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::DoctypePublicIdentifierQuoted);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(true)),
            Some(c) => {
                slf.data.push(c);
                slf.set_force_quirks();
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::DoctypePublicIdentifierQuoted => Ok(match slf.reader.read_char()? {
            Some(c) if c == slf.quote => {
                slf.data.push(c);
                slf.doctype.as_mut().unwrap().public_identifier =
                    Some(mem::take(&mut slf.name));
                slf.switch_to(State::AfterDoctypePublicIdentifier);
                ControlToken::Continue
            }
            Some('>') => {
                slf.doctype.as_mut().unwrap().public_identifier =
                    Some(mem::take(&mut slf.name));
                ControlToken::Emit(slf.emit_doctype(true))
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.doctype.as_mut().unwrap().public_identifier =
                    Some(mem::take(&mut slf.name));
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::AfterDoctypePublicIdentifier => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.switch_to(State::BetweenDoctypePublicAndSystemIdentifiers);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(false)),
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::DoctypeSystemIdentifierQuoted);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.set_force_quirks();
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::BetweenDoctypePublicAndSystemIdentifiers => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(false)),
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::DoctypeSystemIdentifierQuoted);
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.set_force_quirks();
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::AfterDoctypeSystemKeyword => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                slf.switch_to(State::BeforeDoctypeSystemIdentifier);
                ControlToken::Continue
            }
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::DoctypeSystemIdentifierQuoted);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(true)),
            Some(c) => {
                slf.data.push(c);
                slf.set_force_quirks();
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::BeforeDoctypeSystemIdentifier => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some(c @ ('"' | '\'')) => {
                slf.data.push(c);
                slf.quote = c;
                slf.name.clear();
                slf.switch_to(State::DoctypeSystemIdentifierQuoted);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(true)),
            Some(c) => {
                slf.data.push(c);
                slf.set_force_quirks();
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::DoctypeSystemIdentifierQuoted => Ok(match slf.reader.read_char()? {
            Some(c) if c == slf.quote => {
                slf.data.push(c);
                slf.doctype.as_mut().unwrap().system_identifier =
                    Some(mem::take(&mut slf.name));
                slf.switch_to(State::AfterDoctypeSystemIdentifier);
                ControlToken::Continue
            }
            Some('>') => {
                slf.doctype.as_mut().unwrap().system_identifier =
                    Some(mem::take(&mut slf.name));
                ControlToken::Emit(slf.emit_doctype(true))
            }
            Some('\0') => {
                slf.data.push('\0');
                slf.name.push('\u{fffd}');
                ControlToken::Continue
            }
            Some(c) => {
                slf.data.push(c);
                slf.name.push(c);
                ControlToken::Continue
            }
            None => {
                slf.doctype.as_mut().unwrap().system_identifier =
                    Some(mem::take(&mut slf.name));
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::AfterDoctypeSystemIdentifier => Ok(match slf.reader.read_char()? {
            Some(c @ whitespace_pat!()) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            Some('>') => ControlToken::Emit(slf.emit_doctype(false)),
            Some(c) => {
                // trailing junk is skipped without forcing quirks
                slf.data.push(c);
                slf.switch_to(State::BogusDoctype);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(true))
            }
        }),
        State::BogusDoctype => Ok(match slf.reader.read_char()? {
            Some('>') => ControlToken::Emit(slf.emit_doctype(false)),
            Some(c) => {
                slf.data.push(c);
                ControlToken::Continue
            }
            None => {
                slf.switch_to(State::EndOfFile);
                ControlToken::Emit(slf.emit_doctype(false))
            }
        }),
        State::CdataSection => Ok(match slf.reader.read_char()? {
            Some(c) => {
                if slf.cdata_index >= 3 {
                    slf.data.push(slf.cdata[0]);
                    slf.cdata[0] = slf.cdata[1];
                    slf.cdata[1] = slf.cdata[2];
                    slf.cdata[2] = c;
                } else {
                    slf.cdata[slf.cdata_index] = c;
                    slf.cdata_index += 1;
                }

                if slf.cdata_index == 3 && slf.cdata == [']', ']', '>'] {
                    slf.cdata_index = 0;
                    slf.switch_to(State::Data);
                    ControlToken::Emit(slf.emit_cdata())
                } else {
                    ControlToken::Continue
                }
            }
            None => {
                for i in 0..slf.cdata_index {
                    let c = slf.cdata[i];
                    slf.data.push(c);
                }
                slf.cdata_index = 0;
                slf.switch_to(State::EndOfFile);
                if slf.data.is_empty() {
                    ControlToken::Continue
                } else {
                    ControlToken::Emit(slf.emit_cdata())
                }
            }
        }),
        State::EndOfFile => Ok(ControlToken::Done),
    }
}

/// Resolve one `&` character reference into the buffers it belongs to: the
/// pending character data, and additionally the value lexeme when inside an
/// attribute value.
///
/// The `&` itself was already consumed. Terminating characters stay in the
/// input; a semicolon that closes a reference is consumed as part of it.
fn character_reference<R: Reader, E: Emitter>(
    slf: &mut Tokenizer<R, E>,
    in_attribute: bool,
) -> Result<(), R::Error> {
    // the active quote, or `>` while unquoted, ends the reference without
    // being treated as one
    let additional_allowed = if !in_attribute {
        None
    } else if slf.quote == '\0' {
        Some('>')
    } else {
        Some(slf.quote)
    };

    match slf.reader.read_char()? {
        None => slf.append_reference("&", in_attribute),
        Some(c) if matches!(c, whitespace_pat!() | '<' | '&') || Some(c) == additional_allowed => {
            slf.append_reference("&", in_attribute);
            slf.reader.unread_char(Some(c));
        }
        Some(first) => {
            slf.entity.reset();
            slf.entity.push('&');

            let mut c = first;
            loop {
                if slf.entity.push(c) {
                    match slf.reader.read_char()? {
                        Some(next) => c = next,
                        None => {
                            let value = slf.entity.get_value();
                            slf.append_reference(&value, in_attribute);
                            slf.entity.reset();
                            break;
                        }
                    }
                } else {
                    // inside attribute values, a reference without its
                    // semicolon followed by `=` or an alphanumeric is left
                    // alone so URL query strings survive
                    let leave_alone = in_attribute
                        && !slf.entity.is_semicolon_terminated()
                        && (c == '=' || c.is_ascii_alphanumeric());
                    let text = if leave_alone {
                        slf.entity.get_pushed_input().to_string()
                    } else {
                        slf.entity.get_value()
                    };
                    slf.append_reference(&text, in_attribute);
                    slf.entity.reset();
                    slf.reader.unread_char(Some(c));
                    break;
                }
            }
        }
    }

    Ok(())
}
