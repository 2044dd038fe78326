//! Structural state of a document being assembled.
//!
//! The context is a stack of [`ScopeFrame`]s. Each frame owns the
//! [`ElementTree`] that content is currently appended to, plus the stack of
//! elements opened in it. A new frame is pushed for constructs whose content
//! is isolated from the surrounding flow:
//!
//! - notes, comments and text boxes are *inline*: when they close, their
//!   tree is moved into the enclosing frame;
//! - headers, footers and master pages are *detached*: their tree is handed
//!   back to the caller, which stores it in the page span.
//!
//! Closing a scope closes every scope opened after it. Closing a scope that
//! is not open is logged and ignored.

use crate::odf::elements::{Attributes, ElementTree};
use crate::odf::style::{HeaderFooterSlot, Zone};
use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    /// Kinds of open scopes, for membership tests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScopeFlags: u32 {
        const PARAGRAPH = 0x0001;
        const SPAN = 0x0002;
        const LINK = 0x0004;
        const LIST = 0x0008;
        const LIST_ITEM = 0x0010;
        const TABLE = 0x0020;
        const HEADER_ROWS = 0x0040;
        const ROW = 0x0080;
        const CELL = 0x0100;
        const SECTION = 0x0200;
        const FRAME = 0x0400;
        const GROUP = 0x0800;
        const PAGE = 0x1000;
        const NOTES = 0x2000;
        const CHART = 0x4000;
        const CHART_PART = 0x8000;
    }
}

/// An element opened by the assembler and not closed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Paragraph,
    Span,
    Link,
    List { ordered: bool },
    ListItem,
    Table,
    HeaderRows,
    Row,
    Cell,
    Section,
    Frame,
    Group,
    Page,
    Notes,
    Chart,
    ChartPart,
}

impl Scope {
    pub fn flag(&self) -> ScopeFlags {
        match self {
            Self::Paragraph => ScopeFlags::PARAGRAPH,
            Self::Span => ScopeFlags::SPAN,
            Self::Link => ScopeFlags::LINK,
            Self::List { .. } => ScopeFlags::LIST,
            Self::ListItem => ScopeFlags::LIST_ITEM,
            Self::Table => ScopeFlags::TABLE,
            Self::HeaderRows => ScopeFlags::HEADER_ROWS,
            Self::Row => ScopeFlags::ROW,
            Self::Cell => ScopeFlags::CELL,
            Self::Section => ScopeFlags::SECTION,
            Self::Frame => ScopeFlags::FRAME,
            Self::Group => ScopeFlags::GROUP,
            Self::Page => ScopeFlags::PAGE,
            Self::Notes => ScopeFlags::NOTES,
            Self::Chart => ScopeFlags::CHART,
            Self::ChartPart => ScopeFlags::CHART_PART,
        }
    }

    /// Scopes that the event stream never closes explicitly
    #[inline]
    pub fn is_implicit(&self) -> bool {
        matches!(self, Self::ListItem | Self::HeaderRows)
    }

    /// Lists match only a list of the same kind
    fn matches(&self, other: &Scope) -> bool {
        match (self, other) {
            (Self::List { ordered }, Self::List { ordered: other }) => ordered == other,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

#[derive(Debug, Clone)]
struct OpenTag {
    scope: Scope,
    tag: String,
}

/// Why a frame was pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Root,
    Note,
    Comment,
    TextBox,
    HeaderFooter(HeaderFooterSlot),
    MasterPage(usize),
}

impl FrameKind {
    #[inline]
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::HeaderFooter(_) | Self::MasterPage(_))
    }

    fn matches(&self, other: &FrameKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Dense-grid bookkeeping of an open table or sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    pub columns: usize,
    pub next_row: usize,
    pub next_column: usize,
    pub row_open: bool,
    pub cell_open: bool,
    pub in_header_rows: bool,
    pub is_sheet: bool,
}

impl TableState {
    pub fn new(columns: usize, is_sheet: bool) -> Self {
        Self {
            columns,
            is_sheet,
            ..Self::default()
        }
    }
}

/// One level of the frame stack
#[derive(Debug)]
pub struct ScopeFrame {
    kind: FrameKind,
    tree: ElementTree,
    open: SmallVec<[OpenTag; 8]>,
    tables: SmallVec<[TableState; 2]>,
    closers: SmallVec<[String; 2]>,
}

impl ScopeFrame {
    fn new(kind: FrameKind, closers: &[&str]) -> Self {
        Self {
            kind,
            tree: ElementTree::new(),
            open: SmallVec::new(),
            tables: SmallVec::new(),
            closers: closers.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn close_top(&mut self) -> Option<Scope> {
        let open = self.open.pop()?;
        self.tree.push_close(&open.tag);
        match open.scope {
            Scope::Table => {
                self.tables.pop();
            },
            Scope::Row => {
                if let Some(table) = self.tables.last_mut() {
                    table.row_open = false;
                }
            },
            Scope::Cell => {
                if let Some(table) = self.tables.last_mut() {
                    table.cell_open = false;
                }
            },
            Scope::HeaderRows => {
                if let Some(table) = self.tables.last_mut() {
                    table.in_header_rows = false;
                }
            },
            _ => {},
        }
        Some(open.scope)
    }

    fn close_all(&mut self) {
        while let Some(scope) = self.close_top() {
            if !scope.is_implicit() {
                log::warn!("{:?} left open in {:?}, closing it", scope, self.kind);
            }
        }
    }
}

/// Frame stack of the assembler
#[derive(Debug)]
pub struct StructuralContext {
    frames: Vec<ScopeFrame>,
}

impl Default for StructuralContext {
    fn default() -> Self {
        Self {
            frames: vec![ScopeFrame::new(FrameKind::Root, &[])],
        }
    }
}

impl StructuralContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(&self) -> &ScopeFrame {
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut ScopeFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Tree new content is appended to
    #[inline]
    pub fn tree(&mut self) -> &mut ElementTree {
        &mut self.frame_mut().tree
    }

    #[inline]
    pub fn frame_kind(&self) -> FrameKind {
        self.frame().kind
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Zone of automatic styles created at this point
    pub fn style_zone(&self) -> Zone {
        if self.frames.iter().any(|frame| frame.kind.is_detached()) {
            Zone::StyleAutomatic
        } else {
            Zone::ContentAutomatic
        }
    }

    /// `true` if the innermost frame is, or is inside, a frame of `kind`
    pub fn within(&self, kind: FrameKind) -> bool {
        self.frames.iter().any(|frame| frame.kind.matches(&kind))
    }

    /// Open `tag` in the current tree and track it as `scope`
    pub fn open(&mut self, scope: Scope, tag: &str, attributes: Attributes) {
        let frame = self.frame_mut();
        frame.tree.push_open(tag, attributes);
        frame.open.push(OpenTag {
            scope,
            tag: tag.to_string(),
        });
    }

    /// Close `scope` and everything opened after it
    pub fn close(&mut self, scope: Scope) -> bool {
        let frame = self.frame_mut();
        let Some(position) = frame.open.iter().rposition(|open| open.scope.matches(&scope)) else {
            log::warn!("closing {:?} which is not open, ignored", scope);
            return false;
        };
        while frame.open.len() > position + 1 {
            if let Some(inner) = frame.close_top()
                && !inner.is_implicit()
            {
                log::warn!("{:?} closed implicitly by {:?}", inner, scope);
            }
        }
        frame.close_top();
        true
    }

    /// Close `scope` if it is the innermost open scope
    pub fn close_if_innermost(&mut self, scope: Scope) -> bool {
        if self.innermost().is_some_and(|inner| inner.matches(&scope)) {
            self.frame_mut().close_top();
            true
        } else {
            false
        }
    }

    /// Innermost open scope of the current frame
    pub fn innermost(&self) -> Option<Scope> {
        self.frame().open.last().map(|open| open.scope)
    }

    pub fn is_open(&self, scope: Scope) -> bool {
        self.frame().open.iter().any(|open| open.scope.matches(&scope))
    }

    /// `true` if any scope of the current frame intersects `flags`
    pub fn contains(&self, flags: ScopeFlags) -> bool {
        self.flags().intersects(flags)
    }

    /// Union of the open scopes of the current frame
    pub fn flags(&self) -> ScopeFlags {
        self.frame()
            .open
            .iter()
            .fold(ScopeFlags::empty(), |flags, open| flags | open.scope.flag())
    }

    /// Open scopes matching `scope` in the current frame
    pub fn count(&self, scope: Scope) -> usize {
        self.frame()
            .open
            .iter()
            .filter(|open| open.scope.matches(&scope))
            .count()
    }

    /// Nesting depth of lists in the current frame
    #[inline]
    pub fn list_depth(&self) -> usize {
        self.frame()
            .open
            .iter()
            .filter(|open| matches!(open.scope, Scope::List { .. }))
            .count()
    }

    /// `true` if the innermost list has an item open at its level
    pub fn list_item_open(&self) -> bool {
        let open = &self.frame().open;
        let Some(list) = open.iter().rposition(|o| matches!(o.scope, Scope::List { .. })) else {
            return false;
        };
        open[list + 1..].iter().any(|o| o.scope == Scope::ListItem)
    }

    pub fn push_table(&mut self, state: TableState) {
        self.frame_mut().tables.push(state);
    }

    /// Innermost open table or sheet of the current frame
    pub fn table(&self) -> Option<&TableState> {
        self.frame().tables.last()
    }

    pub fn table_mut(&mut self) -> Option<&mut TableState> {
        self.frame_mut().tables.last_mut()
    }

    /// Push an isolated frame; `closers` close the wrapper elements already
    /// opened in the enclosing tree
    pub fn push_frame(&mut self, kind: FrameKind, closers: &[&str]) {
        self.frames.push(ScopeFrame::new(kind, closers));
    }

    /// Pop an inline frame, moving its content into the enclosing tree
    pub fn pop_inline_frame(&mut self, kind: FrameKind) -> bool {
        if self.frames.len() < 2 || !self.frame().kind.matches(&kind) || kind.is_detached() {
            log::warn!("closing {:?} outside of it, ignored", kind);
            return false;
        }
        let Some(mut frame) = self.frames.pop() else {
            return false;
        };
        frame.close_all();
        let parent = self.frame_mut();
        parent.tree.append(&mut frame.tree);
        for closer in frame.closers.iter() {
            parent.tree.push_close(closer);
        }
        true
    }

    /// Pop a detached frame and return its content
    pub fn pop_detached_frame(&mut self, kind: FrameKind) -> Option<ElementTree> {
        if self.frames.len() < 2 || !self.frame().kind.matches(&kind) || !kind.is_detached() {
            log::warn!("closing {:?} outside of it, ignored", kind);
            return None;
        }
        let mut frame = self.frames.pop()?;
        frame.close_all();
        Some(frame.tree)
    }

    /// Close everything still open in the root frame and take the body
    pub fn finish(&mut self) -> ElementTree {
        while self.frames.len() > 1 {
            if let Some(mut frame) = self.frames.pop() {
                log::warn!("{:?} still open at end of document, dropped", frame.kind);
                frame.close_all();
            }
        }
        let root = self.frame_mut();
        root.close_all();
        std::mem::take(&mut root.tree)
    }
}
