use crate::error::AssemblyError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guards against malformed page trees whose Parent links form a cycle
const MAX_TREE_DEPTH: usize = 64;

/// Accumulates pages from several PDFs into one document.
///
/// Every appended document is renumbered past the objects already held, its
/// pages are detached from their own page tree and kept in append order, and
/// its remaining objects are carried over unchanged. `finish` builds a single
/// page tree and catalog over the collected pages.
#[derive(Debug)]
pub struct PdfMerger {
    next_id: u32,
    pages: Vec<(ObjectId, Dictionary)>,
    objects: BTreeMap<ObjectId, Object>,
}

impl Default for PdfMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfMerger {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pages: Vec::new(),
            objects: BTreeMap::new(),
        }
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append every page of `bytes`, in its internal order. Returns the number of pages added.
    ///
    /// `source` only labels errors.
    pub fn append(&mut self, source: &str, bytes: &[u8]) -> Result<usize, AssemblyError> {
        let mut doc = Document::load_mem(bytes).map_err(|e| AssemblyError::Load {
            url: source.to_string(),
            source: e,
        })?;

        doc.renumber_objects_with(self.next_id);
        self.next_id = doc.max_id + 1;

        // get_pages is keyed by page number, so values come out in reading order
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            let page = flatten_page(&doc, page_id).map_err(|message| {
                AssemblyError::MalformedPage {
                    url: source.to_string(),
                    message,
                }
            })?;
            self.pages.push((page_id, page));
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or("") {
                "Catalog" | "Pages" | "Page" | "Outlines" | "Outline" => {}
                _ => {
                    self.objects.insert(object_id, object);
                }
            }
        }

        ::log::debug!("Appended {} pages from {}", page_ids.len(), source);
        Ok(page_ids.len())
    }

    /// Build the merged document and serialize it
    pub fn finish(self) -> Result<Vec<u8>, AssemblyError> {
        if self.pages.is_empty() {
            return Err(AssemblyError::Empty);
        }

        let mut document = Document::with_version("1.7");
        document.objects.extend(self.objects);
        document.max_id = self.next_id;

        let pages_id = document.new_object_id();
        let mut kids = Vec::with_capacity(self.pages.len());
        for (page_id, mut page) in self.pages {
            page.set("Parent", Object::Reference(pages_id));
            document.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        let pages = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(page_count)),
        ]);
        document.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));

        document.renumber_objects();
        document.compress();

        let mut output = Vec::new();
        document
            .save_to(&mut output)
            .map_err(|e| AssemblyError::Save(e.to_string()))?;
        Ok(output)
    }
}

/// Count the pages of a serialized PDF
pub fn page_count(bytes: &[u8]) -> Result<usize, lopdf::Error> {
    Ok(Document::load_mem(bytes)?.get_pages().len())
}

/// Copy a page dictionary, pulling inherited attributes down from its ancestors
fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, String> {
    let mut page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| format!("page {page_id:?}: {e}"))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return Err(format!("page tree above {page_id:?} is too deep"));
        }

        let Ok(node) = doc.get_object(parent_id).and_then(Object::as_dict) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.remove(b"Parent");
    Ok(page)
}
