use crate::assemble::assemble;
use crate::browser::{PageRenderer, WebDriverEngine};
use crate::config::{ConverterConfig, LinkConfig};
use crate::error::ConvertError;
use crate::links::LinkDiscoverer;
use crate::results::Attachment;
use crate::target::normalize_target;
use url::Url;

/// The two ways a site can be turned into a PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the requested page
    SinglePage,
    /// The requested page plus up to nine same-origin pages it links to
    MultiPage,
}

impl Mode {
    /// Name of the downloaded file
    pub fn file_name(self) -> &'static str {
        match self {
            Mode::SinglePage => "single-page.pdf",
            Mode::MultiPage => "multi-page.pdf",
        }
    }

    /// Label used when logging failures
    pub fn tag(self) -> &'static str {
        match self {
            Mode::SinglePage => "free",
            Mode::MultiPage => "pro",
        }
    }
}

/// Convert `input` to a PDF attachment.
///
/// A browser session is launched for this call alone and is shut down before
/// returning, whether the conversion succeeded or not.
pub async fn convert(
    config: &ConverterConfig,
    input: &str,
    mode: Mode,
) -> Result<Attachment, ConvertError> {
    let result = async {
        let seed = normalize_target(input)?;
        ::log::info!("Starting {} conversion of {}", mode.tag(), seed);

        let engine = WebDriverEngine::launch(config).await?;
        run(engine, &seed, mode, &config.links).await
    }
    .await;

    if let Err(e) = &result {
        ::log::error!("{} ERROR: {}", mode.tag().to_uppercase(), e);
    }
    result
}

/// Run one conversion on an already launched renderer, then close it
pub async fn run<R: PageRenderer>(
    mut renderer: R,
    seed: &Url,
    mode: Mode,
    links: &LinkConfig,
) -> Result<Attachment, ConvertError> {
    let outcome = match mode {
        Mode::SinglePage => single_page(&mut renderer, seed).await,
        Mode::MultiPage => multi_page(&mut renderer, seed, links).await,
    };

    renderer.close().await;

    let bytes = outcome?;
    ::log::info!("Finished {} ({} bytes)", mode.file_name(), bytes.len());
    Ok(Attachment::pdf(mode.file_name(), bytes))
}

async fn single_page<R: PageRenderer>(renderer: &mut R, seed: &Url) -> Result<Vec<u8>, ConvertError> {
    let page = renderer.render(seed).await?;
    Ok(page.into_bytes())
}

async fn multi_page<R: PageRenderer>(
    renderer: &mut R,
    seed: &Url,
    config: &LinkConfig,
) -> Result<Vec<u8>, ConvertError> {
    let discoverer = LinkDiscoverer::new(seed, config)?;

    let seed_page = renderer.load(seed).await?;
    let links = discoverer.discover(&seed_page);

    let document = assemble(renderer, seed, &links).await?;
    Ok(document.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssemblyError, RenderError};
    use crate::pdf::page_count;
    use crate::testing::{Call, FakeRenderer, media_box_widths};

    const HOME: &str = "https://example.com/";

    fn seed() -> Url {
        Url::parse(HOME).unwrap()
    }

    fn anchors(hrefs: &[String]) -> String {
        let body: String = hrefs
            .iter()
            .map(|href| format!(r#"<a href="{href}">link</a>"#))
            .collect();
        format!("<html><body>{body}</body></html>")
    }

    fn renders(renderer: &FakeRenderer) -> Vec<String> {
        renderer
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Render(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_single_page_returns_renderer_output() {
        let renderer = FakeRenderer::new();
        let probe = renderer.clone();

        let attachment = run(renderer, &seed(), Mode::SinglePage, &LinkConfig::default())
            .await
            .unwrap();

        assert_eq!(attachment.file_name, "single-page.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(page_count(&attachment.bytes).unwrap(), 1);
        assert_eq!(
            probe.calls(),
            vec![Call::Render(HOME.to_string()), Call::Close]
        );
    }

    #[tokio::test]
    async fn test_end_to_end_three_internal_links() {
        let html = r#"<html><body>
            <a href="/pricing">Pricing</a>
            <a href="https://twitter.com/example">Twitter</a>
            <a href="/docs">Docs</a>
            <a href="/blog">Blog</a>
        </body></html>"#;

        let renderer = FakeRenderer::new().with_page(HOME, html);
        let probe = renderer.clone();
        let single = run(renderer, &seed(), Mode::SinglePage, &LinkConfig::default())
            .await
            .unwrap();
        assert_eq!(page_count(&single.bytes).unwrap(), 1);

        let renderer = FakeRenderer::new().with_page(HOME, html);
        let probe_multi = renderer.clone();
        let multi = run(renderer, &seed(), Mode::MultiPage, &LinkConfig::default())
            .await
            .unwrap();

        assert_eq!(multi.file_name, "multi-page.pdf");
        assert_eq!(page_count(&multi.bytes).unwrap(), 4);

        let expected_order = vec![
            HOME.to_string(),
            "https://example.com/pricing".to_string(),
            "https://example.com/docs".to_string(),
            "https://example.com/blog".to_string(),
        ];
        assert_eq!(renders(&probe_multi), expected_order);
        assert_eq!(
            media_box_widths(&multi.bytes),
            expected_order
                .iter()
                .map(|u| probe_multi.width_of(u))
                .collect::<Vec<_>>()
        );
        assert_eq!(probe.calls().last(), Some(&Call::Close));
        assert_eq!(probe_multi.calls().first(), Some(&Call::Load(HOME.to_string())));
        assert_eq!(probe_multi.calls().last(), Some(&Call::Close));
    }

    #[tokio::test]
    async fn test_twenty_links_render_seed_and_first_nine() {
        let hrefs: Vec<String> = (1..=20).map(|i| format!("/l{i}")).collect();
        let renderer = FakeRenderer::new().with_page(HOME, &anchors(&hrefs));
        let probe = renderer.clone();

        let attachment = run(renderer, &seed(), Mode::MultiPage, &LinkConfig::default())
            .await
            .unwrap();

        let mut expected = vec![HOME.to_string()];
        expected.extend((1..=9).map(|i| format!("https://example.com/l{i}")));
        assert_eq!(renders(&probe), expected);
        assert_eq!(page_count(&attachment.bytes).unwrap(), 10);
    }

    #[tokio::test]
    async fn test_duplicates_fragments_seed_and_external_links() {
        let hrefs: Vec<String> = [
            "/a#x",
            "/a#y",
            "/b",
            "/b",
            "https://example.com/",
            "/#top",
            "https://other.com/c",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let renderer = FakeRenderer::new().with_page(HOME, &anchors(&hrefs));
        let probe = renderer.clone();

        run(renderer, &seed(), Mode::MultiPage, &LinkConfig::default())
            .await
            .unwrap();

        assert_eq!(
            renders(&probe),
            vec![
                HOME.to_string(),
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_constituent_render_fails_request() {
        let hrefs = vec!["/ok".to_string(), "/broken".to_string(), "/later".to_string()];
        let renderer = FakeRenderer::new()
            .with_page(HOME, &anchors(&hrefs))
            .failing_on("https://example.com/broken");
        let probe = renderer.clone();

        let err = run(renderer, &seed(), Mode::MultiPage, &LinkConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Assembly(AssemblyError::Render { .. })
        ));
        assert_eq!(probe.calls().last(), Some(&Call::Close));
    }

    #[tokio::test]
    async fn test_engine_closed_when_seed_fails() {
        for mode in [Mode::SinglePage, Mode::MultiPage] {
            let renderer = FakeRenderer::new().failing_on(HOME);
            let probe = renderer.clone();

            let err = run(renderer, &seed(), mode, &LinkConfig::default())
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                ConvertError::Render(RenderError::NavigationTimeout { .. })
            ));
            let closes = probe
                .calls()
                .iter()
                .filter(|call| **call == Call::Close)
                .count();
            assert_eq!(closes, 1, "{mode:?} must close the engine exactly once");
        }
    }

    #[tokio::test]
    async fn test_invalid_pattern_closes_engine() {
        let renderer = FakeRenderer::new();
        let probe = renderer.clone();
        let config = LinkConfig {
            include_patterns: vec!["[".to_string()],
            ..LinkConfig::default()
        };

        let err = run(renderer, &seed(), Mode::MultiPage, &config)
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::Pattern(_)));
        assert_eq!(probe.calls(), vec![Call::Close]);
    }

    #[tokio::test]
    async fn test_bad_input_never_launches_browser() {
        let config = ConverterConfig {
            webdriver_url: "http://127.0.0.1:9".to_string(),
            ..ConverterConfig::default()
        };

        let err = convert(&config, "   ", Mode::SinglePage).await.unwrap_err();
        assert!(matches!(err, ConvertError::Input(_)));
        assert_eq!(err.to_string(), "No URL was provided");
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::SinglePage.file_name(), "single-page.pdf");
        assert_eq!(Mode::MultiPage.file_name(), "multi-page.pdf");
        assert_eq!(Mode::SinglePage.tag(), "free");
        assert_eq!(Mode::MultiPage.tag(), "pro");
    }
}
