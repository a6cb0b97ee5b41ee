//! Minimal PDF 1.4 object writer with the drawing operators the report needs.

use super::Rgb;

pub(crate) const PAGE_WIDTH: f32 = 595.0;
pub(crate) const PAGE_HEIGHT: f32 = 842.0;

/// Resource name of the regular Helvetica font.
pub(crate) const REGULAR: &str = "F1";
/// Resource name of the bold Helvetica font.
pub(crate) const BOLD: &str = "F2";

/// Content stream builder; numbers are written with two decimals.
#[derive(Debug, Default)]
pub(crate) struct Content {
    bytes: Vec<u8>,
}

impl Content {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, raw: &str) {
        self.bytes.extend_from_slice(raw.as_bytes());
        self.bytes.push(b'\n');
    }

    pub(crate) fn fill_color(&mut self, color: Rgb) {
        let (r, g, b) = color.unit();
        self.op(&format!("{r:.3} {g:.3} {b:.3} rg"));
    }

    pub(crate) fn stroke_color(&mut self, color: Rgb) {
        let (r, g, b) = color.unit();
        self.op(&format!("{r:.3} {g:.3} {b:.3} RG"));
    }

    pub(crate) fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.op(&format!("{x:.2} {y:.2} {width:.2} {height:.2} re f"));
    }

    pub(crate) fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32) {
        self.op(&format!(
            "{width:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
            from.0, from.1, to.0, to.1
        ));
    }

    pub(crate) fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.op(&format!("BT /{font} {size:.1} Tf {x:.2} {y:.2} Td"));
        self.bytes.push(b'(');
        self.bytes.extend(encode_text(text));
        self.op(") Tj ET");
    }

    pub(crate) fn place_form(&mut self, name: &str, x: f32, y: f32) {
        self.op(&format!("q 1 0 0 1 {x:.2} {y:.2} cm /{name} Do Q"));
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode to WinAnsi bytes, escaping string delimiters; unsupported characters become `?`.
pub(crate) fn encode_text(text: &str) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                encoded.push(b'\\');
                encoded.push(c as u8);
            }
            ' '..='~' => encoded.push(c as u8),
            '\u{a0}'..='\u{ff}' => encoded.push(c as u32 as u8),
            _ => encoded.push(b'?'),
        }
    }
    encoded
}

/// Rough Helvetica advance width, good enough for centering and wrapping.
pub(crate) fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let factor = if bold { 0.56 } else { 0.5 };
    text.chars().count() as f32 * size * factor
}

/// Object table that serializes into a complete document with a cross-reference section.
#[derive(Debug, Default)]
pub(crate) struct PdfWriter {
    objects: Vec<Vec<u8>>,
}

impl PdfWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserve an object number to be filled in later.
    pub(crate) fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len()
    }

    pub(crate) fn set(&mut self, id: usize, body: Vec<u8>) {
        if let Some(slot) = self.objects.get_mut(id - 1) {
            *slot = body;
        }
    }

    pub(crate) fn add(&mut self, body: Vec<u8>) -> usize {
        self.objects.push(body);
        self.objects.len()
    }

    pub(crate) fn add_dictionary(&mut self, dictionary: &str) -> usize {
        self.add(dictionary.as_bytes().to_vec())
    }

    pub(crate) fn add_stream(&mut self, dictionary_entries: &str, data: &[u8]) -> usize {
        self.add(stream_body(dictionary_entries, data))
    }

    pub(crate) fn finish(self, root: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(self.objects.len());
        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", self.objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                self.objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }
}

fn stream_body(dictionary_entries: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 64);
    body.extend_from_slice(
        format!("<< {dictionary_entries} /Length {} >>\nstream\n", data.len()).as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

pub(crate) fn font_dictionary(base_font: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>")
}
