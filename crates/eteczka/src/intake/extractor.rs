use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::config::schema::SimulationConfig;
use crate::document::{FileId, Page};
use crate::error::ExtractError;

/// Turns an uploaded blob into its pages.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(
        &self,
        file_id: &FileId,
        name: &str,
        media_type: &str,
        blob: Arc<[u8]>,
    ) -> Result<Vec<Page>, ExtractError>;
}

/// Stands in for a remote OCR service: waits a random time and returns a
/// random number of pages with placeholder text.
pub struct SimulatedExtractor {
    config: SimulationConfig,
}

impl SimulatedExtractor {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PageExtractor for SimulatedExtractor {
    async fn extract(
        &self,
        file_id: &FileId,
        name: &str,
        _media_type: &str,
        _blob: Arc<[u8]>,
    ) -> Result<Vec<Page>, ExtractError> {
        // ThreadRng is not Send, keep it out of the await below
        let (delay_ms, page_count) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(self.config.min_delay_ms..=self.config.max_delay_ms),
                rng.gen_range(self.config.min_pages..=self.config.max_pages),
            )
        };

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);

        Ok((1..=page_count)
            .map(|n| {
                Page::new(
                    file_id,
                    n,
                    Some(format!("{} strona {} tekst rozpoznany OCR", stem, n)),
                )
            })
            .collect())
    }
}

/// Reads real page counts and embedded text from PDFs. Images count as a
/// single page without text.
#[derive(Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PageExtractor for PdfExtractor {
    async fn extract(
        &self,
        file_id: &FileId,
        _name: &str,
        media_type: &str,
        blob: Arc<[u8]>,
    ) -> Result<Vec<Page>, ExtractError> {
        if media_type.starts_with("image/") {
            return Ok(vec![Page::new(file_id, 1, None)]);
        }

        if media_type != "application/pdf" {
            return Err(ExtractError::UnsupportedMedia(media_type.to_string()));
        }

        let file_id = file_id.clone();
        tokio::task::spawn_blocking(move || extract_pdf_pages(&file_id, &blob))
            .await
            .map_err(|e| ExtractError::PdfProcessing(format!("extraction task failed: {}", e)))?
    }
}

fn extract_pdf_pages(file_id: &FileId, bytes: &[u8]) -> Result<Vec<Page>, ExtractError> {
    let _span = tracing::info_span!("intake.pdf", file_id = %file_id).entered();

    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractError::PdfProcessing(format!("Failed to load PDF: {}", e)))?;

    // get_pages is keyed by 1-based page number in document order
    let pages: Vec<Page> = doc
        .get_pages()
        .into_keys()
        .enumerate()
        .map(|(index, page_num)| {
            let text = doc
                .extract_text(&[page_num])
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            Page::new(file_id, index as u32 + 1, text)
        })
        .collect();

    if pages.is_empty() {
        return Err(ExtractError::PdfProcessing(
            "PDF contains no pages".to_string(),
        ));
    }

    tracing::debug!(pages = pages.len(), "Extracted PDF pages");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document, Object, Stream};

    fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in texts {
            let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_extractor_respects_bounds() {
        let extractor = SimulatedExtractor::new(SimulationConfig {
            min_delay_ms: 10,
            max_delay_ms: 20,
            min_pages: 2,
            max_pages: 4,
        });
        let file_id = FileId::from("f1");

        let pages = extractor
            .extract(&file_id, "umowa.pdf", "application/pdf", Arc::from(&b"x"[..]))
            .await
            .unwrap();

        assert!((2..=4).contains(&pages.len()));
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i as u32 + 1);
            assert_eq!(page.id, format!("f1-p{}", i + 1));
            assert!(page.text.as_deref().unwrap().contains("umowa"));
        }
    }

    #[tokio::test]
    async fn test_pdf_extractor_counts_pages() {
        let bytes = pdf_with_pages(&["Umowa o prace", "Strona druga", "Podpisy"]);
        let file_id = FileId::from("doc");

        let pages = PdfExtractor::new()
            .extract(&file_id, "umowa.pdf", "application/pdf", Arc::from(bytes))
            .await
            .unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(
            pages.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_pdf_extractor_image_is_single_page() {
        let pages = PdfExtractor::new()
            .extract(
                &FileId::from("img"),
                "skan.png",
                "image/png",
                Arc::from(&b"\x89PNG"[..]),
            )
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, None);
    }

    #[tokio::test]
    async fn test_pdf_extractor_rejects_corrupted_pdf() {
        let result = PdfExtractor::new()
            .extract(
                &FileId::from("bad"),
                "bad.pdf",
                "application/pdf",
                Arc::from(&b"not a valid pdf content"[..]),
            )
            .await;

        assert!(matches!(result, Err(ExtractError::PdfProcessing(_))));
    }

    #[tokio::test]
    async fn test_pdf_extractor_rejects_other_media() {
        let result = PdfExtractor::new()
            .extract(
                &FileId::from("t"),
                "a.txt",
                "text/plain",
                Arc::from(&b"abc"[..]),
            )
            .await;

        assert_eq!(
            result,
            Err(ExtractError::UnsupportedMedia("text/plain".to_string()))
        );
    }
}
