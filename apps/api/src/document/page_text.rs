//! Positioned page text, recovered from a page's content stream with lopdf.
//!
//! Only what link labelling needs: every shown glyph with its position in
//! user space. Simple-font widths come from `/Widths`; anything else is
//! assumed half an em wide.

use std::collections::HashMap;

use lopdf::content::Operation;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Affine matrix `[a b c d e f]` in PDF row-vector order.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// An axis-aligned rectangle in PDF user space, normalised so `x0 <= x1` and
/// `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        (self.x0..=self.x1).contains(&x) && (self.y0..=self.y1).contains(&y)
    }
}

/// One shown character. `x` is the horizontal centre of its advance, `y` the
/// baseline. `run` numbers the show operation it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x: f32,
    pub y: f32,
    pub run: usize,
}

/// Characters whose centre falls inside `rect`, in content order. Separate
/// show operations are joined with a space.
pub fn text_in_rect(glyphs: &[Glyph], rect: &Rect) -> String {
    let mut text = String::new();
    let mut last_run = None;

    for glyph in glyphs.iter().filter(|g| rect.contains(g.x, g.y)) {
        if last_run.is_some_and(|run| run != glyph.run) {
            text.push(' ');
        }
        text.push(glyph.ch);
        last_run = Some(glyph.run);
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Glyphs shown on one page. A page whose content cannot be decoded has none.
pub fn page_glyphs(document: &Document, page_id: ObjectId) -> Vec<Glyph> {
    let content = match document.get_and_decode_page_content(page_id) {
        Ok(content) => content,
        Err(e) => {
            debug!("No readable content stream on page {:?}: {e}", page_id);
            return Vec::new();
        }
    };

    let mut state = TextState::new(page_fonts(document, page_id));
    for operation in &content.operations {
        state.apply(operation);
    }
    state.glyphs
}

// ────────────────────────────────────────────────────────────────────────────
// Fonts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct FontWidths {
    first_char: i64,
    widths: Vec<f32>,
}

impl FontWidths {
    fn from_dictionary(document: &Document, font: &Dictionary) -> Self {
        let first_char = match font.get(b"FirstChar").map(|o| resolve(document, o)) {
            Ok(Object::Integer(n)) => *n,
            _ => 0,
        };
        let widths = match font.get(b"Widths").map(|o| resolve(document, o)) {
            Ok(Object::Array(items)) => items
                .iter()
                .map(|w| number(resolve(document, w)).unwrap_or(DEFAULT_GLYPH_WIDTH))
                .collect(),
            _ => Vec::new(),
        };
        Self { first_char, widths }
    }

    /// Glyph width in thousandths of an em.
    fn width(&self, code: u8) -> f32 {
        usize::try_from(i64::from(code) - self.first_char)
            .ok()
            .and_then(|i| self.widths.get(i).copied())
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }
}

/// `/Resources /Font` for a page, following inherited resources up `/Parent`.
fn page_fonts(document: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, FontWidths> {
    let mut fonts = HashMap::new();
    let mut node = document.get_dictionary(page_id).ok();

    while let Some(dict) = node {
        let resources = dict.get(b"Resources").map(|o| resolve(document, o));
        if let Ok(Object::Dictionary(resources)) = resources {
            if let Ok(Object::Dictionary(font_map)) =
                resources.get(b"Font").map(|o| resolve(document, o))
            {
                for (name, font) in font_map.iter() {
                    if let Object::Dictionary(font) = resolve(document, font) {
                        fonts.insert(name.clone(), FontWidths::from_dictionary(document, font));
                    }
                }
                return fonts;
            }
        }
        node = match dict.get(b"Parent").map(|o| resolve(document, o)) {
            Ok(Object::Dictionary(parent)) => Some(parent),
            _ => None,
        };
    }
    fonts
}

// ────────────────────────────────────────────────────────────────────────────
// Content stream interpreter
// ────────────────────────────────────────────────────────────────────────────

struct TextState {
    fonts: HashMap<Vec<u8>, FontWidths>,
    fallback_font: FontWidths,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    runs: usize,
    glyphs: Vec<Glyph>,
}

impl TextState {
    fn new(fonts: HashMap<Vec<u8>, FontWidths>) -> Self {
        Self {
            fonts,
            fallback_font: FontWidths::default(),
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            font: None,
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            runs: 0,
            glyphs: Vec::new(),
        }
    }

    fn apply(&mut self, operation: &Operation) {
        let operands = &operation.operands;
        let num = |i: usize| operands.get(i).and_then(number);

        match operation.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => self.ctm = self.ctm_stack.pop().unwrap_or(IDENTITY),
            "cm" => {
                if let Some(m) = matrix(operands) {
                    self.ctm = multiply(&m, &self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = IDENTITY;
                self.line_matrix = IDENTITY;
            }
            "Tf" => {
                self.font = match operands.first() {
                    Some(Object::Name(name)) => Some(name.clone()),
                    _ => None,
                };
                self.font_size = num(1).unwrap_or(self.font_size);
            }
            "TL" => self.leading = num(0).unwrap_or(self.leading),
            "Tc" => self.char_spacing = num(0).unwrap_or(self.char_spacing),
            "Tw" => self.word_spacing = num(0).unwrap_or(self.word_spacing),
            "Td" => self.next_line(num(0).unwrap_or(0.0), num(1).unwrap_or(0.0)),
            "TD" => {
                let ty = num(1).unwrap_or(0.0);
                self.leading = -ty;
                self.next_line(num(0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                if let Some(m) = matrix(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(0.0, -self.leading),
            "Tj" => self.show_operand(operands.first()),
            "'" => {
                self.next_line(0.0, -self.leading);
                self.show_operand(operands.first());
            }
            "\"" => {
                self.word_spacing = num(0).unwrap_or(self.word_spacing);
                self.char_spacing = num(1).unwrap_or(self.char_spacing);
                self.next_line(0.0, -self.leading);
                self.show_operand(operands.get(2));
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = number(other) {
                                    self.advance(-adjust / 1000.0 * self.font_size);
                                }
                            }
                        }
                    }
                    self.runs += 1;
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = multiply(&translation(tx, 0.0), &self.text_matrix);
    }

    fn show_operand(&mut self, operand: Option<&Object>) {
        if let Some(Object::String(bytes, _)) = operand {
            self.show(bytes);
            self.runs += 1;
        }
    }

    fn show(&mut self, bytes: &[u8]) {
        for &code in bytes {
            let font = self
                .font
                .as_ref()
                .and_then(|name| self.fonts.get(name))
                .unwrap_or(&self.fallback_font);

            let mut tx = font.width(code) / 1000.0 * self.font_size + self.char_spacing;
            if code == b' ' {
                tx += self.word_spacing;
            }

            let rendering = multiply(&self.text_matrix, &self.ctm);
            let start_x = rendering[4];
            let end_x = tx * rendering[0] + rendering[4];

            let ch = char::from(code);
            if !ch.is_control() {
                self.glyphs.push(Glyph {
                    ch,
                    x: (start_x + end_x) / 2.0,
                    y: rendering[5],
                    run: self.runs,
                });
            }
            self.advance(tx);
        }
    }
}

fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

fn matrix(operands: &[Object]) -> Option<Matrix> {
    let values: Vec<f32> = operands.iter().filter_map(number).collect();
    <[f32; 6]>::try_from(values).ok()
}

pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Follows a single indirect reference; anything else is returned as-is.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}
