//! Help browser.
//!
//! The help is a small set of bundled HTML documents under a root path, with
//! one index document as the entry point. Only a handful of tags matter:
//! `<title>`, headings, paragraphs, list items, line breaks, bold text and
//! links. Everything else is ignored.
//!
//! [`HelpBrowser`] keeps the page being shown plus a back/forward history,
//! much like a web browser.
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

use crate::resources;

/// Root of the bundled help documents.
pub const HELP_ROOT: &str = "help";

/// Entry document of the help.
pub const HELP_INDEX: &str = "index.htm";

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("Invalid title regex"));

static BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("Invalid body regex"));

// Opening or closing tag; group 1 is the slash, 2 the name, 3 the attributes.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("Invalid tag regex")
});

static HREF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*"([^"]*)""#).expect("Invalid href regex")
});

/// Failure to show a help document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HelpError
{
    /// No bundled document has this path
    #[error("Help document not found: {0}")]
    NotFound(String),
}

/// A link on a help page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link
{
    /// Text shown for the link
    pub label: String,
    /// Document the link points to, relative to the help root
    pub target: String,
}

/// Kind of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind
{
    /// `<h1>` to `<h3>`, with its level
    Heading(u8),
    /// `<p>` or loose text
    Paragraph,
    /// `<li>`
    ListItem,
}

/// Piece of text inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline
{
    /// Plain text
    Text(String),
    /// `<b>` or `<strong>` text
    Bold(String),
    /// Index into [`HelpPage::links`]
    Link(usize),
    /// `<br>`, the block goes on on the next line
    LineBreak,
}

/// A heading, paragraph or list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block
{
    /// What the block is
    pub kind: BlockKind,
    /// Its contents, in order
    pub inlines: Vec<Inline>,
}

/// A parsed help document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPage
{
    /// Document name relative to the help root
    pub name: String,
    /// Contents of `<title>`, or the name when there is none
    pub title: String,
    /// Text blocks in document order
    pub blocks: Vec<Block>,
    /// Links in document order
    pub links: Vec<Link>,
}

impl HelpPage
{
    /// Parses an HTML help document.
    #[must_use]
    pub fn parse(name: &str, source: &str) -> Self
    {
        let title = TITLE_REGEX
            .captures(source)
            .map(|caps| collapse_whitespace(&decode_entities(&caps[1])))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| name.to_owned());

        let body = BODY_REGEX
            .captures(source)
            .and_then(|caps| caps.get(1))
            .map_or(source, |body| body.as_str());

        let mut parser = PageParser::default();
        let mut last = 0;
        for caps in TAG_REGEX.captures_iter(body)
        {
            let Some(whole) = caps.get(0)
            else
            {
                continue;
            };
            parser.text(&body[last..whole.start()]);
            last = whole.end();

            let closing = !caps[1].is_empty();
            let tag = caps[2].to_ascii_lowercase();
            parser.tag(&tag, closing, &caps[3]);
        }
        parser.text(&body[last..]);
        parser.finish_block();

        Self {
            name: name.to_owned(),
            title,
            blocks: parser.blocks,
            links: parser.links,
        }
    }

    /// Returns the text of every block, links included, without markup.
    /// Line breaks inside a block come out as `\n`.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String>
    {
        self.blocks
            .iter()
            .map(|block| {
                block
                    .inlines
                    .iter()
                    .map(|inline| match inline
                    {
                        Inline::Text(text) | Inline::Bold(text) => text.as_str(),
                        Inline::Link(index) => self
                            .links
                            .get(*index)
                            .map_or("", |link| link.label.as_str()),
                        Inline::LineBreak => "\n",
                    })
                    .collect()
            })
            .collect()
    }
}

/// State while walking the tags of a document body.
#[derive(Default)]
struct PageParser
{
    /// Finished blocks
    blocks: Vec<Block>,
    /// Links seen so far
    links: Vec<Link>,
    /// Block being filled
    current: Option<Block>,
    /// Target of the open `<a>`, with its label collected so far
    open_link: Option<(String, String)>,
    /// Inside `<b>` or `<strong>`
    bold: bool,
}

impl PageParser
{
    /// Handles the text between two tags.
    fn text(&mut self, raw: &str)
    {
        let decoded = decode_entities(raw);
        let text = collapse_whitespace_keep_edges(&decoded);
        if text.trim().is_empty() && self.current.is_none()
        {
            return;
        }

        if let Some((_, label)) = &mut self.open_link
        {
            label.push_str(&text);
            return;
        }

        let bold = self.bold;
        let block = self.block();
        // Leading blanks of a block or line carry no meaning.
        let line_start = matches!(block.inlines.last(), None | Some(Inline::LineBreak));
        let text = if line_start { text.trim_start().to_owned() } else { text };
        if text.is_empty()
        {
            return;
        }
        block.inlines.push(if bold { Inline::Bold(text) } else { Inline::Text(text) });
    }

    /// Handles one tag.
    fn tag(&mut self, tag: &str, closing: bool, attributes: &str)
    {
        match (tag, closing)
        {
            ("h1" | "h2" | "h3", false) =>
            {
                let level = tag[1..].parse().unwrap_or(1);
                self.start_block(BlockKind::Heading(level));
            }
            ("p", false) => self.start_block(BlockKind::Paragraph),
            ("li", false) => self.start_block(BlockKind::ListItem),
            ("h1" | "h2" | "h3" | "p" | "li" | "ul" | "ol", true) =>
            {
                self.finish_block();
            }
            ("br", _) => self.line_break(),
            ("b" | "strong", closing) => self.bold = !closing,
            ("a", false) =>
            {
                let target = HREF_REGEX
                    .captures(attributes)
                    .map(|caps| caps[1].to_owned())
                    .unwrap_or_default();
                self.open_link = Some((target, String::new()));
            }
            ("a", true) =>
            {
                if let Some((target, label)) = self.open_link.take()
                {
                    let label = label.trim().to_owned();
                    let index = self.links.len();
                    self.links.push(Link { label, target });
                    self.block().inlines.push(Inline::Link(index));
                }
            }
            _ =>
            {}
        }
    }

    /// Returns the block being filled, opening a paragraph if needed.
    fn block(&mut self) -> &mut Block
    {
        self.current.get_or_insert_with(|| Block {
            kind: BlockKind::Paragraph,
            inlines: Vec::new(),
        })
    }

    /// Ends the current line without ending the block.
    fn line_break(&mut self)
    {
        let Some(block) = &mut self.current
        else
        {
            return;
        };
        trim_line_end(&mut block.inlines);
        if !matches!(block.inlines.last(), None | Some(Inline::LineBreak))
        {
            block.inlines.push(Inline::LineBreak);
        }
    }

    fn start_block(&mut self, kind: BlockKind)
    {
        self.finish_block();
        self.current = Some(Block {
            kind,
            inlines: Vec::new(),
        });
    }

    fn finish_block(&mut self)
    {
        let Some(mut block) = self.current.take()
        else
        {
            return;
        };

        while matches!(block.inlines.last(), Some(Inline::LineBreak))
        {
            block.inlines.pop();
        }
        trim_line_end(&mut block.inlines);
        block
            .inlines
            .retain(|inline| !matches!(inline, Inline::Text(text) | Inline::Bold(text) if text.is_empty()));

        if !block.inlines.is_empty()
        {
            self.blocks.push(block);
        }
    }
}

/// Replaces the few entities the help pages use.
fn decode_entities(text: &str) -> String
{
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Collapses runs of whitespace into one space and trims both ends.
fn collapse_whitespace(text: &str) -> String
{
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapses runs of whitespace into one space, keeping a single space at
/// either end if there was whitespace there.
fn collapse_whitespace_keep_edges(text: &str) -> String
{
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars()
    {
        if ch.is_whitespace()
        {
            if !in_space
            {
                out.push(' ');
            }
            in_space = true;
        }
        else
        {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Browser over the bundled help documents.
#[derive(Debug, Clone)]
pub struct HelpBrowser
{
    /// Resource root of the documents
    root: String,
    /// Name of the entry document
    index: String,
    /// Page being shown
    page: HelpPage,
    /// Pages to go back to, most recent last
    back: Vec<String>,
    /// Pages to go forward to, most recent last
    forward: Vec<String>,
    /// Selected link on the current page
    selected_link: Option<usize>,
    /// First visible row
    scroll: usize,
    /// Largest useful `scroll` for the last drawn size of the page
    max_scroll: usize,
}

impl HelpBrowser
{
    /// Opens the help at its index document.
    ///
    /// # Arguments
    ///
    /// * `root` - Resource root of the help documents
    /// * `index` - Name of the entry document under `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the index document is not bundled.
    pub fn new(root: &str, index: &str) -> Result<Self, HelpError>
    {
        let page = load_page(root, index)?;
        let selected_link = first_link(&page);

        Ok(Self {
            root: root.to_owned(),
            index: index.to_owned(),
            page,
            back: Vec::new(),
            forward: Vec::new(),
            selected_link,
            scroll: 0,
            max_scroll: usize::MAX,
        })
    }

    /// Returns the page being shown.
    #[must_use]
    pub const fn page(&self) -> &HelpPage
    {
        &self.page
    }

    /// Returns the index of the selected link, if the page has links.
    #[must_use]
    pub const fn selected_link(&self) -> Option<usize>
    {
        self.selected_link
    }

    /// Returns the first visible row.
    #[must_use]
    pub const fn scroll(&self) -> usize
    {
        self.scroll
    }

    /// Records how far the page can scroll at its drawn size.
    ///
    /// # Arguments
    ///
    /// * `content_rows` - Rows the page takes once wrapped
    /// * `viewport_rows` - Rows available to show it
    pub fn set_view_size(&mut self, content_rows: usize, viewport_rows: usize)
    {
        self.max_scroll = content_rows.saturating_sub(viewport_rows);
        self.scroll = self.scroll.min(self.max_scroll);
    }

    /// Returns `true` if there is a page to go back to.
    #[must_use]
    pub fn can_go_back(&self) -> bool
    {
        !self.back.is_empty()
    }

    /// Returns `true` if there is a page to go forward to.
    #[must_use]
    pub fn can_go_forward(&self) -> bool
    {
        !self.forward.is_empty()
    }

    /// Shows the document `name`, recording the current page in the history.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no such document; the current page
    /// stays.
    pub fn navigate(&mut self, name: &str) -> Result<(), HelpError>
    {
        let page = load_page(&self.root, name)?;
        let previous = std::mem::replace(&mut self.page, page);
        self.back.push(previous.name);
        self.forward.clear();
        self.reset_view();
        debug!("Help: navigated to {name}");
        Ok(())
    }

    /// Follows the selected link.
    ///
    /// # Errors
    ///
    /// Returns an error if the link points to a missing document.
    pub fn follow_selected(&mut self) -> Result<(), HelpError>
    {
        let Some(link) = self
            .selected_link
            .and_then(|index| self.page.links.get(index))
        else
        {
            return Ok(());
        };

        let target = link.target.clone();
        self.navigate(&target).inspect_err(|err| warn!("Help: {err}"))
    }

    /// Goes back one page.
    ///
    /// # Returns
    ///
    /// `false` if there was nothing to go back to.
    pub fn back(&mut self) -> bool
    {
        self.step(true)
    }

    /// Goes forward one page.
    ///
    /// # Returns
    ///
    /// `false` if there was nothing to go forward to.
    pub fn forward(&mut self) -> bool
    {
        self.step(false)
    }

    /// Returns to the index document.
    ///
    /// # Errors
    ///
    /// Returns an error if the index document is missing.
    pub fn home(&mut self) -> Result<(), HelpError>
    {
        if self.page.name == self.index
        {
            self.reset_view();
            return Ok(());
        }
        let index = self.index.clone();
        self.navigate(&index)
    }

    /// Selects the next link, wrapping around.
    pub fn next_link(&mut self)
    {
        let count = self.page.links.len();
        if count == 0
        {
            return;
        }
        self.selected_link = Some(match self.selected_link
        {
            Some(index) => (index + 1) % count,
            None => 0,
        });
    }

    /// Selects the previous link, wrapping around.
    pub fn prev_link(&mut self)
    {
        let count = self.page.links.len();
        if count == 0
        {
            return;
        }
        self.selected_link = Some(match self.selected_link
        {
            Some(0) | None => count - 1,
            Some(index) => index - 1,
        });
    }

    /// Scrolls the page up.
    pub const fn scroll_up(&mut self, amount: usize)
    {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    /// Scrolls the page down, no further than the last row.
    pub fn scroll_down(&mut self, amount: usize)
    {
        self.scroll = self.scroll.saturating_add(amount).min(self.max_scroll);
    }

    /// Moves one step through the history.
    fn step(&mut self, backwards: bool) -> bool
    {
        let (from, to) = if backwards
        {
            (&mut self.back, &mut self.forward)
        }
        else
        {
            (&mut self.forward, &mut self.back)
        };

        let Some(name) = from.pop()
        else
        {
            return false;
        };

        // History entries were loadable when recorded and resources are static.
        match load_page(&self.root, &name)
        {
            Ok(page) =>
            {
                let previous = std::mem::replace(&mut self.page, page);
                to.push(previous.name);
                self.reset_view();
                true
            }
            Err(err) =>
            {
                warn!("Help: {err}");
                false
            }
        }
    }

    fn reset_view(&mut self)
    {
        self.selected_link = first_link(&self.page);
        self.scroll = 0;
        // Unknown until the new page is drawn
        self.max_scroll = usize::MAX;
    }
}

/// Drops trailing whitespace from the last piece of text.
fn trim_line_end(inlines: &mut [Inline])
{
    if let Some(Inline::Text(text) | Inline::Bold(text)) = inlines.last_mut()
    {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
    }
}

/// Loads and parses `root/name`. A `#fragment` in `name` is ignored.
fn load_page(root: &str, name: &str) -> Result<HelpPage, HelpError>
{
    let name = name.split('#').next().unwrap_or(name);
    let path = format!("{root}/{name}");
    let source = resources::lookup(&path).ok_or_else(|| HelpError::NotFound(path.clone()))?;
    Ok(HelpPage::parse(name, source))
}

fn first_link(page: &HelpPage) -> Option<usize>
{
    if page.links.is_empty() { None } else { Some(0) }
}

#[cfg(test)]
mod tests
{
    use super::*;

    const SAMPLE: &str = r#"<html><head><title> Sample
        page </title></head>
        <body>
        <h1>Heading</h1>
        <p>Some <b>bold</b> text and a
           <a href="other.htm">link</a>.</p>
        <ul><li>One &amp; two</li></ul>
        </body></html>"#;

    #[test]
    fn parse_extracts_title_blocks_and_links()
    {
        let page = HelpPage::parse("sample.htm", SAMPLE);

        assert_eq!(page.title, "Sample page");
        assert_eq!(page.blocks.len(), 3);
        assert_eq!(page.blocks[0].kind, BlockKind::Heading(1));
        assert_eq!(page.blocks[2].kind, BlockKind::ListItem);
        assert_eq!(
            page.links,
            vec![Link {
                label: "link".to_owned(),
                target: "other.htm".to_owned()
            }]
        );
        assert_eq!(
            page.plain_lines(),
            vec!["Heading", "Some bold text and a link.", "One & two"]
        );
        assert!(page.blocks[1].inlines.contains(&Inline::Bold("bold".to_owned())));
    }

    #[test]
    fn title_falls_back_to_name()
    {
        let page = HelpPage::parse("bare.htm", "<p>text</p>");
        assert_eq!(page.title, "bare.htm");
        assert_eq!(page.plain_lines(), vec!["text"]);
    }

    #[test]
    fn browser_starts_at_index_with_first_link_selected()
    {
        let browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        assert_eq!(browser.page().name, HELP_INDEX);
        assert_eq!(browser.selected_link(), Some(0));
        assert!(!browser.can_go_back());
    }

    #[test]
    fn missing_index_is_an_error()
    {
        assert!(HelpBrowser::new(HELP_ROOT, "nope.htm").is_err());
    }

    #[test]
    fn every_bundled_link_resolves()
    {
        let mut browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        let topics = browser.page().links.clone();
        assert!(!topics.is_empty());

        for topic in topics
        {
            browser.navigate(&topic.target).expect("topic resolves");
            for link in &browser.page().links
            {
                assert!(load_page(HELP_ROOT, &link.target).is_ok(), "{}", link.target);
            }
            assert!(browser.back());
        }
    }

    #[test]
    fn following_the_selected_link_records_history()
    {
        let mut browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        browser.next_link();
        let target = browser.page().links[1].target.clone();

        browser.follow_selected().expect("link resolves");
        assert_eq!(browser.page().name, target);
        assert!(browser.can_go_back());
    }

    #[test]
    fn history_goes_back_and_forward()
    {
        let mut browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        browser.navigate("files.htm").expect("files");
        browser.navigate("keys.htm").expect("keys");

        assert!(browser.back());
        assert_eq!(browser.page().name, "files.htm");
        assert!(browser.back());
        assert_eq!(browser.page().name, HELP_INDEX);
        assert!(!browser.back());

        assert!(browser.forward());
        assert_eq!(browser.page().name, "files.htm");

        browser.home().expect("home");
        assert_eq!(browser.page().name, HELP_INDEX);
        assert!(!browser.can_go_forward());
    }

    #[test]
    fn broken_link_keeps_current_page()
    {
        let mut browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        assert_eq!(
            browser.navigate("missing.htm"),
            Err(HelpError::NotFound("help/missing.htm".to_owned()))
        );
        assert_eq!(browser.page().name, HELP_INDEX);
        assert!(!browser.can_go_back());
    }

    #[test]
    fn link_selection_wraps()
    {
        let mut browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        let count = browser.page().links.len();
        browser.prev_link();
        assert_eq!(browser.selected_link(), Some(count - 1));
        browser.next_link();
        assert_eq!(browser.selected_link(), Some(0));
    }

    #[test]
    fn line_breaks_stay_inside_their_block()
    {
        let page = HelpPage::parse(
            "br.htm",
            "<ul><li>Ctrl-S <br> saves</li></ul><h2>Two<br/>lines</h2><br><p>after</p>",
        );

        let kinds: Vec<BlockKind> = page.blocks.iter().map(|block| block.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::ListItem, BlockKind::Heading(2), BlockKind::Paragraph]
        );
        assert_eq!(page.plain_lines(), vec!["Ctrl-S\nsaves", "Two\nlines", "after"]);
    }

    #[test]
    fn scrolling_stops_at_the_last_row()
    {
        let mut browser = HelpBrowser::new(HELP_ROOT, HELP_INDEX).expect("index");
        browser.set_view_size(30, 10);

        browser.scroll_down(200);
        assert_eq!(browser.scroll(), 20);

        browser.scroll_up(1);
        assert_eq!(browser.scroll(), 19);

        // A taller viewport pulls the offset back in.
        browser.set_view_size(30, 25);
        assert_eq!(browser.scroll(), 5);
    }
}
