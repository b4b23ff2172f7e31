//! Slide rendering: HTML templates captured as 1080x1350 PNGs through a
//! shared headless browser.

pub mod browser;
pub mod cover;
pub mod template;

pub use browser::Browser;

use reqwest::Client;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::error::Result;
use crate::types::{RenderedImage, Slide};

/// Renders slide batches against a lazily-created browser.
///
/// The browser is process-lifetime state by design: session startup costs
/// seconds, a tab costs milliseconds. It is created on the first render
/// and released by [`SlideRenderer::shutdown`].
pub struct SlideRenderer {
    chrome_bin: Option<String>,
    browser: OnceCell<Browser>,
}

impl SlideRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            chrome_bin: config.chrome_bin.clone(),
            browser: OnceCell::new(),
        }
    }

    async fn browser(&self) -> Result<&Browser> {
        self.browser
            .get_or_try_init(|| Browser::launch(self.chrome_bin.as_deref()))
            .await
    }

    /// Render the cover plus one image per slide.
    ///
    /// Returns exactly `slides.len() + 1` images, cover first, named with a
    /// zero-padded sequence prefix so lexical sort order equals
    /// presentation order.
    pub async fn render_all(
        &self,
        client: &Client,
        slides: &[Slide],
        title: &str,
        thumbnail_url: &str,
    ) -> Result<Vec<RenderedImage>> {
        let browser = self.browser().await?;
        let total_slides = slides.len() as u32 + 1;
        let mut images = Vec::with_capacity(slides.len() + 1);

        let cover_title = if title.is_empty() { "Carousel" } else { title };
        let cover = cover::cover_markup(client, cover_title, thumbnail_url).await;
        tracing::info!(total_slides, "rendering cover");
        images.push(RenderedImage {
            name: "slide_01_cover.png".to_string(),
            data: browser.render_html(&cover).await?,
        });

        for (i, slide) in slides.iter().enumerate() {
            // Renumber defensively; the renderer owns presentation order
            let slide = Slide {
                number: i as u32 + 2,
                title: slide.title.clone(),
                content: slide.content.clone(),
            };
            tracing::info!(number = slide.number, "rendering slide");
            let html = template::slide_html(&slide, total_slides);
            images.push(RenderedImage {
                name: format!("slide_{:02}.png", slide.number),
                data: browser.render_html(&html).await?,
            });
        }

        Ok(images)
    }

    /// Tear down the browser if it was ever started.
    pub async fn shutdown(&self) {
        if let Some(browser) = self.browser.get() {
            browser.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_names_sort_in_presentation_order() {
        let mut names: Vec<String> = (2..=11).map(|n| format!("slide_{n:02}.png")).collect();
        names.push("slide_01_cover.png".to_string());
        names.sort();
        assert_eq!(names[0], "slide_01_cover.png");
        assert_eq!(names[1], "slide_02.png");
        assert_eq!(names.last().unwrap(), "slide_11.png");
    }
}
