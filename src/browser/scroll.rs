use crate::config::ScrollConfig;
use crate::error::RenderError;

/// A page that can be scrolled from the outside
#[allow(async_fn_in_trait)]
pub trait ScrollTarget {
    /// Current full content height of the document, in CSS pixels
    async fn scroll_height(&mut self) -> Result<u64, RenderError>;

    /// Scroll the viewport down by `px`
    async fn scroll_by(&mut self, px: u64) -> Result<(), RenderError>;
}

/// What an auto-scroll pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub steps: u32,
    pub distance: u64,
    /// The step limit was hit before the distance caught up with the page height
    pub truncated: bool,
}

/// Scroll down in fixed steps until the distance covered reaches the page height.
///
/// The height is re-read before every step, so content that loads while
/// scrolling extends the pass. The pass ends after `max_steps` steps at the
/// latest; that truncation is not an error.
pub async fn auto_scroll<T: ScrollTarget>(
    target: &mut T,
    config: &ScrollConfig,
) -> Result<ScrollOutcome, RenderError> {
    let mut outcome = ScrollOutcome {
        steps: 0,
        distance: 0,
        truncated: false,
    };

    loop {
        let height = target.scroll_height().await?;
        if outcome.distance >= height {
            break;
        }

        if outcome.steps >= config.max_steps {
            ::log::warn!(
                "Auto-scroll stopped after {} steps ({}px of {}px)",
                outcome.steps,
                outcome.distance,
                height
            );
            outcome.truncated = true;
            break;
        }

        target.scroll_by(config.step_px).await?;
        outcome.steps += 1;
        outcome.distance += config.step_px;
        tokio::time::sleep(config.tick()).await;
    }

    ::log::debug!(
        "Auto-scroll finished after {} steps ({}px)",
        outcome.steps,
        outcome.distance
    );
    Ok(outcome)
}
