use crate::browser::PageRenderer;
use crate::error::AssemblyError;
use crate::pdf::PdfMerger;
use crate::results::{AssembledDocument, LinkSet};
use std::time::Instant;
use url::Url;

/// Render the seed and its internal links one after another and merge the results.
///
/// Pages appear in render order: the seed first, then the links in discovery
/// order. The first failed render or merge aborts the whole document.
pub async fn assemble<R: PageRenderer>(
    renderer: &mut R,
    seed: &Url,
    links: &LinkSet,
) -> Result<AssembledDocument, AssemblyError> {
    let order = links.render_order(seed);
    let started = Instant::now();
    let mut merger = PdfMerger::new();

    for (index, url) in order.iter().enumerate() {
        ::log::info!("Rendering page {} of {}: {}", index + 1, order.len(), url);

        let page = renderer
            .render(url)
            .await
            .map_err(|source| AssemblyError::Render {
                url: url.to_string(),
                source,
            })?;
        merger.append(url.as_str(), page.as_bytes())?;
    }

    let page_count = merger.page_count();
    let bytes = merger.finish()?;

    ::log::info!(
        "Assembled {} PDF pages from {} URLs in {:.2} seconds",
        page_count,
        order.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(AssembledDocument {
        bytes,
        sources: order,
        page_count,
    })
}
