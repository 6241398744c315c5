//! In-memory stand-ins for the browser, shared by unit tests.

use crate::browser::PageRenderer;
use crate::error::RenderError;
use crate::results::{LoadedPage, RenderedPage};
use lopdf::{Dictionary, Document, Object, Stream};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use url::Url;

/// Build a PDF with one page per entry; each page's MediaBox width is the entry
pub fn sample_pdf(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for &width in widths {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), Object::Integer(width), 842.into()]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

/// MediaBox widths of every page, in page order
pub fn media_box_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            match &media_box[2] {
                Object::Integer(width) => *width,
                Object::Real(width) => *width as i64,
                other => panic!("unexpected MediaBox entry {other:?}"),
            }
        })
        .collect()
}

/// What a fake renderer was asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
    Render(String),
    Close,
}

/// A site served from memory. Every rendered URL yields a one-page PDF whose
/// MediaBox width identifies the URL.
#[derive(Debug, Clone, Default)]
pub struct FakeRenderer {
    pages: HashMap<String, String>,
    widths: Arc<Mutex<HashMap<String, i64>>>,
    failing: HashSet<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(normalize(url), html.to_string());
        self
    }

    /// Fail every load and render of `url`
    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(normalize(url));
        self
    }

    /// Width identifying `url` in rendered output; assigned on first use
    pub fn width_of(&self, url: &str) -> i64 {
        let mut widths = self.widths.lock().unwrap();
        let next = 500 + widths.len() as i64;
        *widths.entry(normalize(url)).or_insert(next)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, url: &Url) -> Result<(), RenderError> {
        if self.failing.contains(url.as_str()) {
            return Err(RenderError::NavigationTimeout {
                url: url.to_string(),
                secs: 60,
            });
        }
        Ok(())
    }
}

impl PageRenderer for FakeRenderer {
    async fn load(&mut self, url: &Url) -> Result<LoadedPage, RenderError> {
        self.calls.lock().unwrap().push(Call::Load(url.to_string()));
        self.check(url)?;
        let html = self.pages.get(url.as_str()).cloned().unwrap_or_default();
        Ok(LoadedPage::new(url.clone(), html))
    }

    async fn render(&mut self, url: &Url) -> Result<RenderedPage, RenderError> {
        self.calls.lock().unwrap().push(Call::Render(url.to_string()));
        self.check(url)?;
        let width = self.width_of(url.as_str());
        Ok(RenderedPage::new(sample_pdf(&[width])))
    }

    async fn close(self) {
        self.calls.lock().unwrap().push(Call::Close);
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).unwrap().to_string()
}
