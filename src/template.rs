//! Minimal string-template engine for the generated XML artifacts.
//!
//! A template is a sequence of literal fragments interleaved with typed
//! slots. Rendering walks the sequence in order, copying literals verbatim
//! and substituting each slot with whatever its formatter produces for the
//! data record. A literal position with no following slot contributes only
//! its literal text.
//!
//! No escaping happens here: callers must escape values before they reach a
//! slot, since the same engine renders XML text, attribute values, and the
//! bare `mimetype` file.

pub struct Template<T> {
    parts: Vec<Part<T>>,
}

enum Part<T> {
    Literal(&'static str),
    Slot(Box<dyn Fn(&T) -> String>),
}

impl<T> Template<T> {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append a literal fragment.
    pub fn text(mut self, literal: &'static str) -> Self {
        self.parts.push(Part::Literal(literal));
        self
    }

    /// Append a slot whose output is computed from the data record.
    pub fn slot<F>(mut self, format: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.parts.push(Part::Slot(Box::new(format)));
        self
    }

    /// Substitute every slot and concatenate, in order.
    pub fn render(&self, data: &T) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(literal) => out.push_str(literal),
                Part::Slot(format) => out.push_str(&format(data)),
            }
        }
        out
    }
}

impl<T> Default for Template<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_render_literal_only() {
        let template: Template<()> = Template::new().text("application/epub+zip");
        assert_eq!(template.render(&()), "application/epub+zip");
    }

    #[test]
    fn can_substitute_slots_in_order() {
        struct Data {
            name: String,
            count: usize,
        }
        let template = Template::new()
            .text("hello ")
            .slot(|d: &Data| d.name.clone())
            .text(", you have ")
            .slot(|d: &Data| d.count.to_string())
            .text(" items");
        let rendered = template.render(&Data {
            name: "world".to_string(),
            count: 3,
        });
        assert_eq!(rendered, "hello world, you have 3 items");
    }

    #[test]
    fn does_not_escape_slot_output() {
        let template = Template::new()
            .text("<title>")
            .slot(|d: &String| d.clone())
            .text("</title>");
        assert_eq!(
            template.render(&"a < b & c".to_string()),
            "<title>a < b & c</title>"
        );
    }

    #[test]
    fn trailing_literal_renders() {
        let template = Template::new().slot(|d: &u32| d.to_string()).text("!");
        assert_eq!(template.render(&7), "7!");
    }
}
