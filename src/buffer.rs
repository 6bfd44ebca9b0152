// buffer.rs

/// The line currently being edited, as seen by the history store.
pub trait LineBuffer {
    fn line_text(&self) -> String;
    fn set_line(&mut self, text: &str);
    /// Edit point as a byte offset into the text.
    fn point(&self) -> usize;
    fn set_point(&mut self, point: usize);

    fn move_to_end(&mut self) {
        let end = self.line_text().len();
        self.set_point(end);
    }

    /// Text between the start of the line and the edit point.
    fn text_before_point(&self) -> String {
        let text = self.line_text();
        let mut end = self.point().min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_owned()
    }
}

/// A plain line of text with an edit point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLine {
    text: String,
    point: usize,
}

impl TextLine {
    pub fn new(text: impl Into<String>, point: usize) -> Self {
        let text = text.into();
        let point = point.min(text.len());
        Self { text, point }
    }

    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let point = text.len();
        Self { text, point }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl LineBuffer for TextLine {
    fn line_text(&self) -> String {
        self.text.clone()
    }

    fn set_line(&mut self, text: &str) {
        self.text = text.to_owned();
        self.point = self.point.min(self.text.len());
    }

    fn point(&self) -> usize {
        self.point
    }

    fn set_point(&mut self, point: usize) {
        self.point = point.min(self.text.len());
    }
}
