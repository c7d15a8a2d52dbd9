// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document page model — load a PDF with `lopdf`, expose its pages as an
// ordered view, and materialise new documents from any sequence of
// (source page, rotation) handles.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::{debug, info, instrument, warn};
use werkstatt_core::error::{Result, WerkstattError};

use super::pages::{PageHandle, normalise_rotation};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against cyclic /Parent chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when neither a page nor its ancestors declare a MediaBox.
const DEFAULT_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

/// A loaded (or derived) PDF and the object IDs of its pages, in order.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    document: Document,
    page_ids: Vec<ObjectId>,
    rotations: Vec<i32>,
}

impl DocumentHandle {
    // -- Construction ---------------------------------------------------------

    /// Parse PDF bytes.
    ///
    /// A document with an encryption dictionary, or one lopdf cannot decrypt,
    /// is `PasswordRequired`. Anything else that fails to parse, or parses to
    /// zero pages, is `CorruptDocument`.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn load(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| match err {
            lopdf::Error::Decryption(_) => WerkstattError::PasswordRequired,
            other => WerkstattError::CorruptDocument(format!("failed to load PDF: {other}")),
        })?;

        if document.is_encrypted() {
            return Err(WerkstattError::PasswordRequired);
        }

        let handle = Self::from_document(document)?;
        info!(pages = handle.page_count(), "PDF loaded from bytes");
        Ok(handle)
    }

    fn from_document(document: Document) -> Result<Self> {
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(WerkstattError::CorruptDocument(
                "document has no pages".into(),
            ));
        }

        let rotations = page_ids
            .iter()
            .map(|&id| read_rotation(&document, id))
            .collect();

        Ok(Self {
            document,
            page_ids,
            rotations,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// Every page in document order, each with its current orientation.
    pub fn pages(&self) -> Vec<PageHandle> {
        self.rotations
            .iter()
            .enumerate()
            .map(|(index, &rotation)| PageHandle::new(index as u32, rotation))
            .collect()
    }

    /// Effective /Rotate of the page at `index` (0-based), normalised to
    /// 0, 90, 180 or 270.
    pub fn rotation(&self, index: u32) -> Option<i32> {
        self.rotations.get(index as usize).copied()
    }

    /// Effective MediaBox of the page at `index` as `[x0, y0, x1, y1]`.
    pub fn media_box(&self, index: u32) -> Option<[f64; 4]> {
        let page_id = *self.page_ids.get(index as usize)?;
        let page = self.document.get_dictionary(page_id).ok()?;
        let values = inherited_attribute(&self.document, page, b"MediaBox")?;
        let array = resolve(&self.document, values).as_array().ok()?;
        if array.len() != 4 {
            return None;
        }
        let mut out = [0.0; 4];
        for (slot, value) in out.iter_mut().zip(array) {
            *slot = number(resolve(&self.document, value))?;
        }
        Some(out)
    }

    // -- Derivation -----------------------------------------------------------

    /// Build a new document containing exactly `pages`, in order.
    ///
    /// Each handle's rotation becomes the copied page's absolute /Rotate.
    /// The source document is never modified. A page may appear more than
    /// once.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn derive(&self, pages: &[PageHandle]) -> Result<DocumentHandle> {
        let mut builder = DocumentBuilder::new();
        builder.append(self, pages)?;
        builder.finish()
    }

    /// Concatenate every page of `documents`, in the order given.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn merge(documents: &[&DocumentHandle]) -> Result<DocumentHandle> {
        if documents.is_empty() {
            return Err(WerkstattError::InvalidParameter(
                "merge needs at least one document".into(),
            ));
        }
        let mut builder = DocumentBuilder::new();
        for document in documents {
            builder.append(document, &document.pages())?;
        }
        builder.finish()
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut document = self.document.clone();
        let mut output = Vec::new();
        document
            .save_to(&mut output)
            .map_err(|err| WerkstattError::Encode(format!("failed to serialise PDF: {err}")))?;
        debug!(output_bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}

/// Accumulates copied pages from one or more sources into a fresh document.
struct DocumentBuilder {
    target: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl DocumentBuilder {
    fn new() -> Self {
        let mut target = Document::with_version("1.7");
        let pages_id = target.new_object_id();
        Self {
            target,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Copy `pages` of `source` onto the end of the target.
    fn append(&mut self, source: &DocumentHandle, pages: &[PageHandle]) -> Result<()> {
        let count = source.page_count();
        for handle in pages {
            if handle.source_index >= count {
                return Err(WerkstattError::InvalidParameter(format!(
                    "page index {} out of range (document has {count} pages)",
                    handle.source_index
                )));
            }
            if handle.rotation_degrees % 90 != 0 {
                return Err(WerkstattError::InvalidParameter(format!(
                    "rotation must be a multiple of 90, got {}",
                    handle.rotation_degrees
                )));
            }
        }

        // Object IDs are per source, so each source gets its own copy map.
        // Selected pages are reserved up front so that links between them
        // resolve to the copies instead of dragging in the source page tree.
        let mut copies: HashMap<ObjectId, ObjectId> = HashMap::new();
        let mut reserved = Vec::with_capacity(pages.len());
        for handle in pages {
            let source_id = source.page_ids[handle.source_index as usize];
            let new_id = self.target.new_object_id();
            copies.entry(source_id).or_insert(new_id);
            reserved.push(new_id);
        }

        for (handle, new_id) in pages.iter().zip(reserved) {
            let source_id = source.page_ids[handle.source_index as usize];
            let page = copy_page(
                &source.document,
                source_id,
                self.pages_id,
                normalise_rotation(handle.rotation_degrees),
                &mut copies,
                &mut self.target,
            )?;
            self.target.objects.insert(new_id, Object::Dictionary(page));
            self.kids.push(Object::Reference(new_id));
        }

        debug!(appended = pages.len(), total = self.kids.len(), "Pages copied");
        Ok(())
    }

    fn finish(mut self) -> Result<DocumentHandle> {
        if self.kids.is_empty() {
            return Err(WerkstattError::EmptyPageSelection(
                "a document needs at least one page".into(),
            ));
        }

        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.target
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.target.trailer.set("Root", catalog_id);

        DocumentHandle::from_document(self.target)
    }
}

/// Copy one page dictionary, resolving inherited attributes and pointing
/// /Parent at `parent_id`. Referenced objects are copied into `target`.
fn copy_page(
    source: &Document,
    page_id: ObjectId,
    parent_id: ObjectId,
    rotation: i32,
    copies: &mut HashMap<ObjectId, ObjectId>,
    target: &mut Document,
) -> Result<Dictionary> {
    let page = source.get_dictionary(page_id).map_err(|err| {
        WerkstattError::CorruptDocument(format!("cannot read page object {page_id:?}: {err}"))
    })?;

    let mut copied = copy_dictionary(source, page, copies, target);

    for key in INHERITABLE {
        if copied.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page, key) {
            let value = copy_object(source, value, copies, target);
            copied.set(key.to_vec(), value);
        }
    }
    if !copied.has(b"MediaBox") {
        let media_box: Vec<Object> = DEFAULT_MEDIA_BOX.iter().map(|&v| Object::Integer(v)).collect();
        copied.set("MediaBox", media_box);
    }

    copied.set("Type", Object::Name(b"Page".to_vec()));
    copied.set("Parent", parent_id);
    copied.set("Rotate", rotation as i64);
    Ok(copied)
}

/// Copy a dictionary's entries except /Parent (the caller re-links it).
fn copy_dictionary(
    source: &Document,
    dict: &Dictionary,
    copies: &mut HashMap<ObjectId, ObjectId>,
    target: &mut Document,
) -> Dictionary {
    let mut copied = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        copied.set(key.clone(), copy_object(source, value, copies, target));
    }
    copied
}

/// Copy `object` into `target`, following references.
///
/// Each referenced object is copied once per source; shared fonts and images
/// stay shared. Pages that are not part of the selection become `null`.
fn copy_object(
    source: &Document,
    object: &Object,
    copies: &mut HashMap<ObjectId, ObjectId>,
    target: &mut Document,
) -> Object {
    match object {
        Object::Reference(id) => match copy_reference(source, *id, copies, target) {
            Some(new_id) => Object::Reference(new_id),
            None => Object::Null,
        },
        Object::Dictionary(dict) => Object::Dictionary(copy_dictionary(source, dict, copies, target)),
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| copy_object(source, item, copies, target))
                .collect(),
        ),
        Object::Stream(stream) => {
            let mut copied = stream.clone();
            copied.dict = copy_dictionary(source, &stream.dict, copies, target);
            Object::Stream(copied)
        }
        // All other object types (Boolean, Integer, Real, String, Name, Null)
        // are trivially cloneable.
        other => other.clone(),
    }
}

fn copy_reference(
    source: &Document,
    id: ObjectId,
    copies: &mut HashMap<ObjectId, ObjectId>,
    target: &mut Document,
) -> Option<ObjectId> {
    if let Some(&existing) = copies.get(&id) {
        return Some(existing);
    }

    let referenced = match source.get_object(id) {
        Ok(object) => object,
        Err(err) => {
            warn!(?id, %err, "Cannot resolve reference, using null");
            return None;
        }
    };

    if is_page_tree_node(referenced) {
        debug!(?id, "Dropping reference to unselected page");
        return None;
    }

    let new_id = target.new_object_id();
    copies.insert(id, new_id);
    let copied = copy_object(source, referenced, copies, target);
    target.objects.insert(new_id, copied);
    Some(new_id)
}

fn is_page_tree_node(object: &Object) -> bool {
    match object.as_dict() {
        Ok(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Page") | Ok(b"Pages")
        ),
        Err(_) => false,
    }
}

/// Look `key` up on `page`, then on each ancestor page-tree node.
fn inherited_attribute<'a>(
    document: &'a Document,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = document.get_dictionary(parent_id).ok()?;
    }
    None
}

fn read_rotation(document: &Document, page_id: ObjectId) -> i32 {
    document
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| inherited_attribute(document, page, b"Rotate"))
        .and_then(|value| resolve(document, value).as_i64().ok())
        .map(|degrees| normalise_rotation(degrees as i32))
        .unwrap_or(0)
}

/// Follow a single level of indirection.
fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(*v as f64),
        _ => None,
    }
}
