//! Rendering of the help browser.
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::help::{BlockKind, HelpBrowser, HelpPage, Inline};

const BULLET: &str = "• ";

/// Converts a help page into styled lines, one per block plus spacing.
pub fn page_lines(page: &HelpPage, selected_link: Option<usize>, theme: &Theme) -> Vec<Line<'static>>
{
    let mut lines = Vec::new();

    for block in &page.blocks
    {
        let base = match block.kind
        {
            BlockKind::Heading(1) => Style::new().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            BlockKind::Heading(_) => Style::new().add_modifier(Modifier::BOLD),
            BlockKind::Paragraph | BlockKind::ListItem => Style::new(),
        };

        // Continuation lines of a list item line up with its text.
        let list_item = block.kind == BlockKind::ListItem;
        let mut block_lines = Vec::new();
        let mut spans = prefix(list_item.then_some(BULLET.to_owned()));

        for inline in &block.inlines
        {
            let span = match inline
            {
                Inline::Text(text) => Span::styled(text.clone(), base),
                Inline::Bold(text) => Span::styled(text.clone(), base.add_modifier(Modifier::BOLD)),
                Inline::Link(index) =>
                {
                    let label = page
                        .links
                        .get(*index)
                        .map(|link| link.label.clone())
                        .unwrap_or_default();
                    Span::styled(label, theme.link(selected_link == Some(*index)))
                }
                Inline::LineBreak =>
                {
                    let hanging = list_item.then(|| " ".repeat(BULLET.chars().count()));
                    block_lines.push(Line::from(std::mem::replace(&mut spans, prefix(hanging))));
                    continue;
                }
            };
            spans.push(span);
        }
        block_lines.push(Line::from(spans));

        // Headings and paragraphs get air around them, list items stay packed.
        if matches!(block.kind, BlockKind::Heading(_)) && !lines.is_empty()
        {
            lines.push(Line::from(""));
        }
        lines.extend(block_lines);
        if block.kind != BlockKind::ListItem
        {
            lines.push(Line::from(""));
        }
    }

    lines
}

/// Starts a line, with `lead` in front when given.
fn prefix(lead: Option<String>) -> Vec<Span<'static>>
{
    lead.map(Span::raw).into_iter().collect()
}

/// Renders the help browser over `area`.
///
/// The wrapped height of the page is handed back to `browser` so that its
/// scrolling stops at the last row.
pub fn render(frame: &mut Frame, area: Rect, browser: &mut HelpBrowser, theme: &Theme)
{
    let page = browser.page();
    let lines = page_lines(page, browser.selected_link(), theme);

    let mut hints = Vec::new();
    if browser.can_go_back()
    {
        hints.push("Backspace: back");
    }
    if browser.can_go_forward()
    {
        hints.push("→: forward");
    }
    hints.push("Tab: next link");
    hints.push("Esc: close");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dialog_border())
        .title(format!("Help - {}", page.title))
        .title_bottom(hints.join("  "));
    let inner = block.inner(area);

    let text = Paragraph::new(Text::from(lines))
        .style(theme.editor())
        .wrap(Wrap { trim: true });
    browser.set_view_size(text.line_count(inner.width), usize::from(inner.height));

    let scroll = u16::try_from(browser.scroll()).unwrap_or(u16::MAX);
    let paragraph = text.block(block).scroll((scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn list_item_breaks_hang_under_the_bullet()
    {
        let page = HelpPage::parse("t.htm", "<ul><li>first<br>second</li></ul>");
        let lines = page_lines(&page, None, &Theme::default());

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "• first");
        assert_eq!(lines[1].to_string(), "  second");
    }

    #[test]
    fn selected_link_is_highlighted()
    {
        let page = HelpPage::parse(
            "t.htm",
            r#"<h1>T</h1><ul><li><a href="a.htm">A</a></li><li><a href="b.htm">B</a></li></ul>"#,
        );
        let theme = Theme::default();
        let lines = page_lines(&page, Some(1), &theme);

        // heading, blank, two list items
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].spans[0].content, BULLET);
        assert_eq!(lines[3].spans[1].style, theme.link(true));
        assert_eq!(lines[2].spans[1].style, theme.link(false));
    }
}
