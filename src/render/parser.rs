//! Quill rich text -> document paragraphs

use fxhash::FxHashSet;
use html5ever::tokenizer::{TagKind, Token, TokenSink, TokenSinkResult};
use url::Url;

use super::{attr, tokenize};
use crate::data::tags::{InlineTag, ListKind, BLOCK_STYLES, INLINE_TAGS, LIST_BULLET_STYLE};
use crate::docx::model::{BlockContainer, Hyperlink, Inline, Relationships, Run, NORMAL_STYLE};

/// Hyperlink currently open in the tag stream
#[derive(Debug, Clone)]
struct OpenLink {
    rel_id: String,
    target: String,
    /// Whether the current paragraph already holds the hyperlink element
    placed: bool,
}

/// Session state of a single [`QuillParser::feed`] call
#[derive(Debug, Default)]
struct RendererState {
    /// A paragraph created by this feed is the last child of the block
    in_paragraph: bool,
    active: FxHashSet<InlineTag>,
    lists: Vec<ListKind>,
    link: Option<OpenLink>,
}

/// Streaming rich-text renderer
///
/// Each block-level start tag opens a paragraph, each inline start or end tag
/// opens a fresh run, and text lands in the most recent run with the
/// formatting of every inline tag still open. Unsupported markup is ignored.
#[derive(Debug, Default)]
pub struct QuillParser {
    base_url: Option<Url>,
    state: RendererState,
}

impl QuillParser {
    /// Create a parser; relative link targets are joined onto `base_url`
    pub fn new(base_url: Option<&str>) -> Self {
        let base_url = base_url.and_then(|base| match Url::parse(base) {
            Ok(url) => Some(url),
            Err(err) => {
                log::warn!("invalid base url {:?}: {}", base, err);
                None
            }
        });
        QuillParser {
            base_url,
            state: RendererState::default(),
        }
    }

    /// Resolve a link target against the base URL; absolute URLs pass through
    pub fn parse_url(&self, url: &str) -> String {
        let Some(ref base) = self.base_url else {
            return url.to_string();
        };
        match Url::parse(url) {
            Err(url::ParseError::RelativeUrlWithoutBase) => match base.join(url) {
                Ok(joined) => joined.to_string(),
                Err(err) => {
                    log::warn!("could not join {:?} onto {}: {}", url, base, err);
                    url.to_string()
                }
            },
            _ => url.to_string(),
        }
    }

    /// Render `html` into `block`, registering hyperlinks in `rels`
    pub fn feed<'b, B>(
        &mut self,
        html: &str,
        block: &'b mut B,
        rels: &mut Relationships,
    ) -> &'b mut B
    where
        B: BlockContainer + ?Sized,
    {
        self.state = RendererState::default();

        let sink = QuillSink {
            parser: self,
            block,
            rels,
        };
        tokenize(html, sink).block
    }

    fn handle_starttag<B>(
        &mut self,
        tag: &str,
        href: Option<&str>,
        block: &mut B,
        rels: &mut Relationships,
    ) where
        B: BlockContainer + ?Sized,
    {
        if let Some(style) = BLOCK_STYLES.get(tag) {
            self.start_paragraph(block, style);
            return;
        }
        if tag == "li" {
            let style = self
                .state
                .lists
                .last()
                .map(ListKind::item_style)
                .unwrap_or(LIST_BULLET_STYLE);
            self.start_paragraph(block, style);
            return;
        }
        if let Some(kind) = ListKind::from_tag(tag) {
            self.state.lists.push(kind);
            return;
        }

        match INLINE_TAGS.get(tag).copied() {
            Some(inline) => {
                if inline == InlineTag::Anchor {
                    self.open_link(href, rels);
                }
                self.new_run(block);
                self.state.active.insert(inline);
            }
            None => log::trace!("ignoring unsupported tag <{}>", tag),
        }
    }

    fn handle_endtag<B>(&mut self, tag: &str, block: &mut B)
    where
        B: BlockContainer + ?Sized,
    {
        if ListKind::from_tag(tag).is_some() {
            self.state.lists.pop();
            return;
        }

        // paragraphs close implicitly at the next block tag
        if let Some(inline) = INLINE_TAGS.get(tag).copied() {
            self.state.active.remove(&inline);
            if inline == InlineTag::Anchor {
                self.state.link = None;
            }
            if self.state.in_paragraph {
                self.new_run(block);
            }
        }
    }

    fn handle_data<B>(&mut self, data: &str, block: &mut B)
    where
        B: BlockContainer + ?Sized,
    {
        if !self.state.in_paragraph || !block.ends_with_paragraph() {
            if data.trim().is_empty() {
                return;
            }
            self.start_paragraph(block, NORMAL_STYLE);
        }

        let has_run = block
            .last_paragraph_mut()
            .is_some_and(|p| p.last_run_mut().is_some());
        if !has_run {
            self.new_run(block);
        }

        let Some(run) = block.last_paragraph_mut().and_then(|p| p.last_run_mut()) else {
            return;
        };
        run.text.push_str(data);
        for tag in &self.state.active {
            match tag {
                InlineTag::Strong => run.bold = true,
                InlineTag::Em => run.italic = true,
                InlineTag::Underline => run.underline = true,
                // link styling is applied when the run is created
                InlineTag::Anchor => {}
            }
        }
    }

    fn open_link(&mut self, href: Option<&str>, rels: &mut Relationships) {
        let Some(href) = href else {
            log::debug!("<a> without href rendered as plain text");
            self.state.link = None;
            return;
        };
        let target = self.parse_url(href);
        let rel_id = rels.add_hyperlink(&target);
        self.state.link = Some(OpenLink {
            rel_id,
            target,
            placed: false,
        });
    }

    fn start_paragraph<B>(&mut self, block: &mut B, style: &str)
    where
        B: BlockContainer + ?Sized,
    {
        block.add_paragraph(style);
        self.state.in_paragraph = true;
        if let Some(ref mut link) = self.state.link {
            link.placed = false;
        }
        self.new_run(block);
    }

    /// Append an empty run to the current paragraph, inside the open
    /// hyperlink if there is one
    fn new_run<B>(&mut self, block: &mut B)
    where
        B: BlockContainer + ?Sized,
    {
        if !self.state.in_paragraph || !block.ends_with_paragraph() {
            block.add_paragraph(NORMAL_STYLE);
            self.state.in_paragraph = true;
            if let Some(ref mut link) = self.state.link {
                link.placed = false;
            }
        }
        let Some(paragraph) = block.last_paragraph_mut() else {
            return;
        };

        match self.state.link {
            Some(ref mut link) => {
                if !link.placed {
                    paragraph.content.push(Inline::Hyperlink(Hyperlink {
                        rel_id: link.rel_id.clone(),
                        target: link.target.clone(),
                        runs: Vec::new(),
                    }));
                    link.placed = true;
                }
                let mut run = Run::default();
                run.apply_hyperlink_style();
                match paragraph.content.last_mut() {
                    Some(Inline::Hyperlink(hyperlink)) => hyperlink.runs.push(run),
                    _ => paragraph.content.push(Inline::Run(run)),
                }
            }
            None => {
                paragraph.add_run("");
            }
        }
    }
}

/// Routes html5ever tokens into a [`QuillParser`]
struct QuillSink<'p, 'b, B: ?Sized> {
    parser: &'p mut QuillParser,
    block: &'b mut B,
    rels: &'p mut Relationships,
}

impl<B> TokenSink for QuillSink<'_, '_, B>
where
    B: BlockContainer + ?Sized,
{
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(ref tag) => match tag.kind {
                TagKind::StartTag => self.parser.handle_starttag(
                    &tag.name,
                    attr(tag, "href"),
                    &mut *self.block,
                    &mut *self.rels,
                ),
                TagKind::EndTag => self.parser.handle_endtag(&tag.name, &mut *self.block),
            },
            Token::CharacterTokens(ref text) => {
                self.parser.handle_data(text, &mut *self.block)
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}
