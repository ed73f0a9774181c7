//! Content stream interpreter.
//!
//! Walks the operators of a page (and of the Form XObjects it draws), keeps
//! the graphics and text state, and reports each shown glyph to a
//! [`ContentHandler`]. Only operators that move or show text are acted on;
//! path, color and image operators are skipped.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use unredact_core::{Ctm, ExtractOptions, ExtractWarning, ExtractWarningCode};

use crate::error::BackendError;
use crate::fonts::LoadedFont;
use crate::handler::{CharEvent, ContentHandler};
use crate::interpreter_state::InterpreterState;
use crate::lopdf_backend::{decoded_stream, object_to_f64, resolve};
use crate::text_state::TextObject;

/// Interpret one page's content stream.
///
/// `resources` is the page's resource dictionary; `page_index` is attached to
/// any warnings.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] if the page content cannot be
/// tokenized. Problems inside Form XObjects and unknown fonts are reported as
/// warnings instead.
pub fn interpret_content(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    page_index: usize,
) -> Result<(), BackendError> {
    let operations = decode(content)?;
    let mut interpreter = Interpreter {
        doc,
        handler,
        options,
        page_index,
        fonts: HashMap::new(),
        missing_fonts: HashSet::new(),
    };
    let mut state = InterpreterState::default();
    interpreter.run(&operations, resources, &mut state, 0);
    Ok(())
}

fn decode(content: &[u8]) -> Result<Vec<Operation>, BackendError> {
    Content::decode(content)
        .map(|c| c.operations)
        .map_err(|e| BackendError::Interpreter(format!("cannot decode content stream: {e}")))
}

struct Interpreter<'a> {
    doc: &'a Document,
    handler: &'a mut dyn ContentHandler,
    options: &'a ExtractOptions,
    page_index: usize,
    fonts: HashMap<ObjectId, Rc<LoadedFont>>,
    missing_fonts: HashSet<String>,
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands
        .iter()
        .filter_map(|o| object_to_f64(o).ok())
        .collect()
}

fn matrix(operands: &[Object]) -> Option<Ctm> {
    Ctm::from_slice(&numbers(operands))
}

fn name(obj: &Object) -> Option<String> {
    obj.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

impl Interpreter<'_> {
    fn warn(&mut self, warning: ExtractWarning) {
        if !self.options.collect_warnings {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(page = self.page_index, "{warning}");
        self.handler.on_warning(warning.on_page(self.page_index));
    }

    fn run(
        &mut self,
        operations: &[Operation],
        resources: &Dictionary,
        state: &mut InterpreterState,
        depth: usize,
    ) {
        let mut text = TextObject::begin();
        for op in operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => {
                    state.restore();
                }
                "cm" => {
                    if let Some(m) = matrix(operands) {
                        state.concat(m);
                    }
                }
                "BT" => text = TextObject::begin(),
                "Tf" => {
                    if let [font, size] = operands {
                        let params = state.text_mut();
                        params.font_name = name(font).unwrap_or_default();
                        params.font_size = object_to_f64(size).unwrap_or(params.font_size);
                    }
                }
                "Tc" | "Tw" | "Tz" | "TL" | "Ts" => {
                    if let Some(value) = numbers(operands).first().copied() {
                        let params = state.text_mut();
                        match op.operator.as_str() {
                            "Tc" => params.char_spacing = value,
                            "Tw" => params.word_spacing = value,
                            "Tz" => params.h_scaling = value,
                            "TL" => params.leading = value,
                            _ => params.rise = value,
                        }
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix(operands) {
                        text.set_matrix(m);
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty] = numbers(operands)[..] {
                        if op.operator == "TD" {
                            state.text_mut().leading = -ty;
                        }
                        text.move_line(tx, ty);
                    }
                }
                "T*" => text.next_line(state.text().leading),
                "Tj" => {
                    if let Some(bytes) = operands.first().and_then(|o| o.as_str().ok()) {
                        self.show(bytes, resources, state, &mut text);
                    }
                }
                "'" => {
                    text.next_line(state.text().leading);
                    if let Some(bytes) = operands.first().and_then(|o| o.as_str().ok()) {
                        self.show(bytes, resources, state, &mut text);
                    }
                }
                "\"" => {
                    if let [aw, ac, string] = operands {
                        let params = state.text_mut();
                        params.word_spacing = object_to_f64(aw).unwrap_or(params.word_spacing);
                        params.char_spacing = object_to_f64(ac).unwrap_or(params.char_spacing);
                        text.next_line(state.text().leading);
                        if let Ok(bytes) = string.as_str() {
                            self.show(bytes, resources, state, &mut text);
                        }
                    }
                }
                "TJ" => {
                    let Some(items) = operands.first().and_then(|o| o.as_array().ok()) else {
                        continue;
                    };
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                self.show(bytes, resources, state, &mut text);
                            }
                            other => {
                                if let Ok(amount) = object_to_f64(other) {
                                    text.advance(state.text().tj_adjustment(amount));
                                }
                            }
                        }
                    }
                }
                "Do" => {
                    if let Some(xobject) = operands.first().and_then(name) {
                        self.draw_xobject(&xobject, resources, state, depth);
                    }
                }
                _ => {}
            }
        }
    }

    fn font(&mut self, resources: &Dictionary, resource_name: &str) -> Rc<LoadedFont> {
        let entry = resources
            .get(b"Font")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .and_then(|fonts| fonts.get(resource_name.as_bytes()).ok());
        let Some(entry) = entry else {
            if self.missing_fonts.insert(resource_name.to_string()) {
                self.warn(
                    ExtractWarning::new(
                        ExtractWarningCode::MissingFont,
                        "font not found in resources",
                    )
                    .with_font(resource_name),
                );
            }
            return Rc::new(LoadedFont::fallback(resource_name));
        };

        if let Object::Reference(id) = entry {
            if let Some(font) = self.fonts.get(id) {
                return Rc::clone(font);
            }
        }
        let font = match resolve(self.doc, entry).as_dict() {
            Ok(dict) => LoadedFont::load(self.doc, dict, resource_name),
            Err(_) => {
                self.warn(
                    ExtractWarning::new(
                        ExtractWarningCode::MalformedObject,
                        "font resource is not a dictionary",
                    )
                    .with_font(resource_name),
                );
                LoadedFont::fallback(resource_name)
            }
        };
        let font = Rc::new(font);
        if let Object::Reference(id) = entry {
            self.fonts.insert(*id, Rc::clone(&font));
        }
        font
    }

    fn show(
        &mut self,
        bytes: &[u8],
        resources: &Dictionary,
        state: &InterpreterState,
        text: &mut TextObject,
    ) {
        let params = state.text();
        let font = self.font(resources, &params.font_name);
        for code in font.codes(bytes) {
            let displacement = font.width(code);
            self.handler.on_char(CharEvent {
                char_code: code,
                unicode: font.decode(code),
                font_name: font.name.clone(),
                font_size: params.font_size,
                text_matrix: text.text_matrix(),
                ctm: state.ctm(),
                displacement,
                char_spacing: params.char_spacing,
                word_spacing: params.word_spacing,
                h_scaling: params.h_scale(),
                rise: params.rise,
                ascent: font.ascent(),
                descent: font.descent(),
            });
            let is_space = font.is_single_byte() && code == 32;
            text.advance(params.glyph_advance(displacement, is_space));
        }
    }

    fn draw_xobject(
        &mut self,
        xobject: &str,
        resources: &Dictionary,
        state: &InterpreterState,
        depth: usize,
    ) {
        let Some(stream) = resources
            .get(b"XObject")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .and_then(|x| x.get(xobject.as_bytes()).ok())
            .and_then(|o| resolve(self.doc, o).as_stream().ok())
        else {
            return;
        };
        if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Form".as_slice()) {
            return;
        }
        if depth >= self.options.max_recursion_depth {
            self.warn(ExtractWarning::new(
                ExtractWarningCode::ResourceLimitReached,
                format!(
                    "form /{xobject} skipped: nesting exceeds {}",
                    self.options.max_recursion_depth
                ),
            ));
            return;
        }

        let content = match decoded_stream(stream) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.warn(ExtractWarning::new(
                    ExtractWarningCode::MalformedObject,
                    format!("form /{xobject}: {e}"),
                ));
                return;
            }
        };
        let operations = match decode(&content) {
            Ok(ops) => ops,
            Err(e) => {
                self.warn(ExtractWarning::new(
                    ExtractWarningCode::MalformedObject,
                    format!("form /{xobject}: {e}"),
                ));
                return;
            }
        };
        let form_matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_array().ok())
            .and_then(|items| matrix(items))
            .unwrap_or_default();
        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .unwrap_or(resources);

        #[cfg(feature = "tracing")]
        tracing::trace!(form = xobject, depth, "entering form xobject");

        let mut nested = state.nested(form_matrix);
        self.run(&operations, form_resources, &mut nested, depth + 1);
    }
}
