use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::application::ports::ExtractionError;

pub(super) const RENDER_DPI: f32 = 150.0;

/// Render each page to a PNG buffer for OCR. Binding to the system pdfium
/// library happens per call and failing to bind is an ordinary extraction
/// error, so a missing library degrades the scanned-PDF fallback instead of
/// poisoning the whole pipeline.
pub(super) fn rasterize_pages(data: &[u8], max_pages: usize) -> Result<Vec<Vec<u8>>, ExtractionError> {
    let pdfium = Pdfium::new(
        Pdfium::bind_to_system_library()
            .map_err(|e| ExtractionError::Failed(format!("pdfium bind failed: {e}")))?,
    );

    let doc = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| ExtractionError::Failed(format!("pdfium open failed: {e}")))?;

    let page_count = doc.pages().len() as usize;
    let pages_to_render = page_count.min(max_pages);

    let mut png_buffers: Vec<Vec<u8>> = Vec::with_capacity(pages_to_render);

    for index in 0..pages_to_render {
        let page = doc.pages().get(index as u16).map_err(|e| {
            ExtractionError::Failed(format!("page {index} access failed: {e}"))
        })?;

        let width = (page.width().value * RENDER_DPI / 72.0) as i32;
        let height = (page.height().value * RENDER_DPI / 72.0) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .map_err(|e| ExtractionError::Failed(format!("render page {index} failed: {e}")))?;

        let mut png_bytes: Vec<u8> = Vec::new();
        bitmap
            .as_image()
            .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| {
                ExtractionError::Failed(format!("PNG encode page {index} failed: {e}"))
            })?;

        png_buffers.push(png_bytes);
    }

    Ok(png_buffers)
}
