//! Abstract element tree the scoring heuristic walks.
//!
//! Documents, shadow roots and frame documents all look the same to the
//! scanner: a [`ScanRoot`] that enumerates its own elements and its nested
//! roots. [`SimRoot`]/[`SimElement`] provide the in-memory implementation
//! used to exercise the heuristic without a live page.

use std::cell::{Cell, RefCell};

/// The subset of computed style the heuristic inspects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputedStyle {
    pub visibility_hidden: bool,
    pub display_none: bool,
    pub opacity_zero: bool,
    /// `cursor: pointer` on the element itself.
    pub cursor_pointer: bool,
    /// `cursor: pointer` on the immediate parent.
    pub parent_cursor_pointer: bool,
}

impl ComputedStyle {
    /// True when the element is styled out of existence despite having
    /// layout.
    pub fn hidden(&self) -> bool {
        self.visibility_hidden || self.display_none || self.opacity_zero
    }
}

/// One element as seen by the scanner.
pub trait ScanElement {
    /// Tag name, any case.
    fn tag(&self) -> &str;
    /// Visible text content.
    fn text(&self) -> &str;
    /// Accessible label, when present.
    fn label(&self) -> Option<&str>;
    /// `title` attribute, when present.
    fn title(&self) -> Option<&str>;
    /// Raw class attribute.
    fn classes(&self) -> &str;
    /// Whether the element currently has on-screen layout.
    fn is_on_screen(&self) -> bool;
    /// Native button element or an explicit button role.
    fn is_native_button(&self) -> bool;
    /// Computed style, or `None` when the read fails (e.g. cross-context
    /// restriction). Unreadable style means non-interactive.
    fn computed_style(&self) -> Option<ComputedStyle>;
    /// Synthesize a click: mousedown, mouseup, then a semantic click.
    fn click(&self);
}

/// A scannable root: a document, a shadow root, or a frame's document.
pub trait ScanRoot {
    /// Elements directly owned by this root (nested roots' elements are
    /// reached through [`ScanRoot::child_roots`]).
    fn elements(&self) -> Vec<&dyn ScanElement>;
    /// Nested roots: attached shadow trees and embedded frame documents.
    fn child_roots(&self) -> Vec<&dyn ScanRoot>;
}

/// In-memory element for driving the heuristic directly.
#[derive(Debug)]
pub struct SimElement {
    tag: String,
    text: String,
    label: Option<String>,
    title: Option<String>,
    classes: String,
    on_screen: bool,
    native_button: bool,
    style: Option<ComputedStyle>,
    style_reads: Cell<usize>,
    events: RefCell<Vec<&'static str>>,
}

impl SimElement {
    /// A visible element with readable (but non-pointer) style.
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            label: None,
            title: None,
            classes: String::new(),
            on_screen: true,
            native_button: false,
            style: Some(ComputedStyle::default()),
            style_reads: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = classes.into();
        self
    }

    /// Marks the element as a native button / explicit button role.
    pub fn native_button(mut self) -> Self {
        self.native_button = true;
        self
    }

    /// Removes the element from layout entirely.
    pub fn off_screen(mut self) -> Self {
        self.on_screen = false;
        self
    }

    /// Gives the element (or its parent) a pointer cursor.
    pub fn pointer_cursor(mut self) -> Self {
        if let Some(style) = self.style.as_mut() {
            style.cursor_pointer = true;
        }
        self
    }

    pub fn parent_pointer_cursor(mut self) -> Self {
        if let Some(style) = self.style.as_mut() {
            style.parent_cursor_pointer = true;
        }
        self
    }

    /// Replaces the full computed style.
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Makes style reads fail, as across a frame boundary.
    pub fn unreadable_style(mut self) -> Self {
        self.style = None;
        self
    }

    /// Number of computed-style reads performed against this element.
    pub fn style_read_count(&self) -> usize {
        self.style_reads.get()
    }

    /// Event names dispatched by [`ScanElement::click`], in order.
    pub fn dispatched_events(&self) -> Vec<&'static str> {
        self.events.borrow().clone()
    }

    pub fn was_clicked(&self) -> bool {
        !self.events.borrow().is_empty()
    }
}

impl ScanElement for SimElement {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn classes(&self) -> &str {
        &self.classes
    }

    fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    fn is_native_button(&self) -> bool {
        self.native_button
    }

    fn computed_style(&self) -> Option<ComputedStyle> {
        self.style_reads.set(self.style_reads.get() + 1);
        self.style
    }

    fn click(&self) {
        let mut events = self.events.borrow_mut();
        events.push("mousedown");
        events.push("mouseup");
        events.push("click");
    }
}

/// In-memory root holding elements and nested roots (shadow trees, frames).
#[derive(Debug, Default)]
pub struct SimRoot {
    elements: Vec<SimElement>,
    children: Vec<SimRoot>,
}

impl SimRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, element: SimElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_child_root(mut self, child: SimRoot) -> Self {
        self.children.push(child);
        self
    }

    /// Element accessor for assertions.
    pub fn element(&self, index: usize) -> &SimElement {
        &self.elements[index]
    }

    /// Nested-root accessor for assertions.
    pub fn child(&self, index: usize) -> &SimRoot {
        &self.children[index]
    }
}

impl ScanRoot for SimRoot {
    fn elements(&self) -> Vec<&dyn ScanElement> {
        self.elements.iter().map(|e| e as &dyn ScanElement).collect()
    }

    fn child_roots(&self) -> Vec<&dyn ScanRoot> {
        self.children.iter().map(|c| c as &dyn ScanRoot).collect()
    }
}
