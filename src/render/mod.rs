//! Rich-text rendering
//!
//! Table cells carry text authored in a Quill editor. html5ever splits that
//! markup into tag and character tokens and the parser turns the token
//! stream into styled paragraphs, runs and hyperlinks.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{BufferQueue, Tag, TokenSink, Tokenizer, TokenizerOpts};

pub mod parser;

pub use parser::QuillParser;

/// Run `html` through the html5ever tokenizer and hand back the sink
///
/// Entities are decoded and tag names lowercased before they reach the
/// sink. A tag left open at the end of input is dropped.
pub fn tokenize<S: TokenSink>(html: &str, sink: S) -> S {
    let mut input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));

    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink
}

/// Value of the named attribute on a tag
pub fn attr<'t>(tag: &'t Tag, name: &str) -> Option<&'t str> {
    tag.attrs
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| &*attr.value)
}
