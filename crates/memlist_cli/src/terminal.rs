//! Terminal list surface and navigator.

use memlist_core::{
    ListSurface, MemoryListController, MemoryStore, Navigator, Snapshot, SnapshotDiff,
};
use std::io::Write;
use url::Url;

/// Keeps a one-line summary of each applied change; rows are resolved at
/// render time.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    pub applied: usize,
    pub last_change: Option<String>,
}

impl ListSurface for TerminalSurface {
    fn apply(&mut self, snapshot: &Snapshot, diff: &SnapshotDiff, animated: bool) {
        self.applied += 1;
        self.last_change = Some(format!(
            "applied sections={} items={} inserted={} removed={} moved={} animated={}",
            snapshot.section_count(),
            snapshot.len(),
            diff.items.inserted.len(),
            diff.items.removed.len(),
            diff.items.moved.len(),
            animated
        ));
    }
}

/// Prints the applied snapshot, resolving headers and rows lazily.
pub fn render(
    out: &mut impl Write,
    controller: &MemoryListController<TerminalSurface>,
    store: &MemoryStore,
) -> std::io::Result<()> {
    if let Some(change) = &controller.surface().last_change {
        writeln!(out, "# {change}")?;
    }

    let snapshot = controller.applied_snapshot();
    if snapshot.is_empty() {
        writeln!(out, "(no memories)")?;
        return Ok(());
    }

    for (section_index, (section, items)) in snapshot.sections().iter().enumerate() {
        let header = controller.section_header(*section).unwrap_or("");
        writeln!(out, "[{section_index}] {header}")?;
        for (row, item) in items.iter().enumerate() {
            if let Some(content) = controller.row_content(store, *item) {
                writeln!(out, "  {row:>2}  {}  ({})", content.title, content.id)?;
            }
        }
    }
    Ok(())
}

/// Stands in for an embedded browser: prints the navigation it was asked
/// to perform.
pub struct TerminalNavigator<W: Write> {
    out: W,
}

impl<W: Write> TerminalNavigator<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Navigator for TerminalNavigator<W> {
    fn load(&mut self, url: &Url) {
        if let Err(err) = writeln!(self.out, "navigate url={url}") {
            log::error!("event=navigate module=cli status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{render, TerminalNavigator, TerminalSurface};
    use memlist_core::{
        seed_if_needed, DetailViewer, GroupedQuery, MemoryListController, MemoryStore,
        OverflowPolicy, SectionLayout,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn render_prints_headers_and_rows() {
        let mut store = MemoryStore::open_in_memory().unwrap();
        seed_if_needed(&mut store);
        let controller = Rc::new(RefCell::new(MemoryListController::new(
            TerminalSurface::default(),
            SectionLayout::Grouped,
            OverflowPolicy::Drop,
        )));
        store.subscribe(GroupedQuery::all(), controller.clone());

        let mut out = Vec::new();
        render(&mut out, &controller.borrow(), &store).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[0] First half"));
        assert!(text.contains("[1] Second half"));
        assert!(text.contains("(part 11)"));
        assert!(text.starts_with("# applied sections=2 items=11"));
    }

    #[test]
    fn navigator_prints_single_load() {
        let mut out = Vec::new();
        {
            let mut navigator = TerminalNavigator::new(&mut out);
            let url = url::Url::parse("https://youtu.be/ANBGkZwOX68").unwrap();
            let mut viewer = DetailViewer::new(url);
            viewer.activate(&mut navigator);
            viewer.activate(&mut navigator);
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "navigate url=https://youtu.be/ANBGkZwOX68\n"
        );
    }
}
