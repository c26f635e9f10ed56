//! Minimal retained scene graph.
//!
//! A [`Window`] owns a tree of [`Node`]s. Containers own their children
//! outright, so there are no parent links and no cycles. Painting walks the
//! tree depth-first in insertion order, adding each node's origin to the
//! offset inherited from its parent.

use crate::canvas::Painter;
use crate::framebuffer::TriColor;
use crate::text::{measure, Font};
use embedded_graphics::geometry::{Point, Size};

#[derive(Debug, PartialEq)]
pub enum Node {
    Container(Container),
    Text(TextItem),
}

impl Node {
    fn paint(&self, painter: &mut dyn Painter, offset: Point) {
        match self {
            Node::Container(container) => container.paint(painter, offset),
            Node::Text(text) => text.paint(painter, offset),
        }
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

impl From<TextItem> for Node {
    fn from(text: TextItem) -> Self {
        Node::Text(text)
    }
}

/// Groups children under a shared origin.
#[derive(Debug, Default, PartialEq)]
pub struct Container {
    pub origin: Point,
    pub children: Vec<Node>,
}

impl Container {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    fn paint(&self, painter: &mut dyn Painter, offset: Point) {
        let offset = offset + self.origin;
        for child in &self.children {
            child.paint(painter, offset);
        }
    }
}

/// A text leaf positioned by its top-left corner.
#[derive(Debug, PartialEq)]
pub struct TextItem {
    pub origin: Point,
    pub text: String,
    pub font: &'static Font,
    /// Draw the measured bounds around the text.
    pub outline: bool,
}

impl TextItem {
    pub fn new(x: i32, y: i32, text: impl Into<String>, font: &'static Font) -> Self {
        Self {
            origin: Point::new(x, y),
            text: text.into(),
            font,
            outline: false,
        }
    }

    pub fn outlined(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }

    pub fn size(&self) -> Size {
        measure(self.font, &self.text).size
    }

    fn paint(&self, painter: &mut dyn Painter, offset: Point) {
        let bounds = measure(self.font, &self.text);
        let at = offset + self.origin;
        painter.set_font(self.font);
        painter.write(at.x, at.y - bounds.origin.y, &self.text);
        if self.outline {
            painter.draw_rect(at.x, at.y, bounds.size.width, bounds.size.height, TriColor::Black);
        }
    }
}

/// Root of a scene, anchored at the target's origin.
#[derive(Debug, Default, PartialEq)]
pub struct Window {
    pub root: Container,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.root.push(node);
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.root.push(node);
    }

    pub fn paint(&self, painter: &mut dyn Painter) {
        self.root.paint(painter, Point::zero());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FONT_MEDIUM, FONT_SMALL};

    #[derive(Debug, PartialEq)]
    enum Call {
        Font(&'static str),
        Write(i32, i32, String),
        Rect(i32, i32, u32, u32),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl Painter for Recorder {
        fn write(&mut self, x: i32, y: i32, text: &str) {
            self.0.push(Call::Write(x, y, text.to_string()));
        }

        fn set_font(&mut self, font: &'static Font) {
            self.0.push(Call::Font(font.name));
        }

        fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, _color: TriColor) {
            self.0.push(Call::Rect(x, y, width, height));
        }
    }

    #[test]
    fn test_text_leaf_protocol() {
        let window = Window::new()
            .child(TextItem::new(5, 7, "Hi", &FONT_SMALL).outlined(true));
        let mut recorder = Recorder::default();
        window.paint(&mut recorder);

        let bounds = measure(&FONT_SMALL, "Hi");
        assert_eq!(
            recorder.0,
            vec![
                Call::Font("6x10"),
                Call::Write(5, 7 + FONT_SMALL.y_advance as i32, "Hi".into()),
                Call::Rect(5, 7, bounds.size.width, bounds.size.height),
            ]
        );
    }

    #[test]
    fn test_depth_first_with_accumulated_offsets() {
        let window = Window::new()
            .child(TextItem::new(0, 0, "a", &FONT_SMALL))
            .child(
                Container::at(10, 20)
                    .child(TextItem::new(1, 1, "b", &FONT_MEDIUM))
                    .child(Container::at(5, 5).child(TextItem::new(0, 0, "c", &FONT_SMALL))),
            )
            .child(TextItem::new(0, 50, "d", &FONT_SMALL));
        let mut recorder = Recorder::default();
        window.paint(&mut recorder);

        let writes: Vec<_> = recorder
            .0
            .into_iter()
            .filter_map(|call| match call {
                Call::Write(x, y, text) => Some((x, y, text)),
                _ => None,
            })
            .collect();
        let small = FONT_SMALL.y_advance as i32;
        let medium = FONT_MEDIUM.y_advance as i32;
        assert_eq!(
            writes,
            vec![
                (0, small, "a".to_string()),
                (11, 21 + medium, "b".to_string()),
                (15, 25 + small, "c".to_string()),
                (0, 50 + small, "d".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_text_writes_at_origin() {
        let window = Window::new().child(TextItem::new(3, 4, "", &FONT_SMALL));
        let mut recorder = Recorder::default();
        window.paint(&mut recorder);
        assert_eq!(recorder.0[1], Call::Write(3, 4, String::new()));
    }
}
