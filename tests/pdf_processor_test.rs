use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use tarifa::domain::{FileInfo, ProcessingOptions};
use tarifa::infrastructure::text_processing::{
    is_probably_scanned, PdfProcessor, SCANNED_CHARS_PER_PAGE,
};

fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
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
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

const DENSE_PAGE: &str =
    "Budget proposal for the warehouse renovation including structural work and painting.";

#[tokio::test]
async fn given_native_text_pdf_when_processing_then_full_confidence_without_ocr() {
    let processor = PdfProcessor::new();
    let buffer = build_pdf(&[DENSE_PAGE, DENSE_PAGE, DENSE_PAGE]);
    let file = FileInfo::new("proposal.pdf", "application/pdf", buffer);

    let result = processor
        .process_pdf(&file, &ProcessingOptions::default())
        .await;

    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(result.metadata.confidence, Some(100.0));
    assert_eq!(result.metadata.page_count, Some(3));
    assert!(result.text.contains("warehouse renovation"));
}

#[tokio::test]
async fn given_max_pages_when_processing_then_extraction_is_bounded() {
    let processor = PdfProcessor::new();
    let buffer = build_pdf(&[DENSE_PAGE, DENSE_PAGE, DENSE_PAGE]);
    let file = FileInfo::new("proposal.pdf", "application/pdf", buffer);
    let options = ProcessingOptions {
        max_pages: Some(1),
        ..Default::default()
    };

    let result = processor.process_pdf(&file, &options).await;

    assert!(result.success);
    // Page count reflects the document, not the extraction bound.
    assert_eq!(result.metadata.page_count, Some(3));
}

#[tokio::test]
async fn given_sparse_text_pdf_when_fallback_cannot_improve_then_keeps_native_with_low_confidence()
{
    let processor = PdfProcessor::new();
    let buffer = build_pdf(&["x"]);
    let file = FileInfo::new("scan.pdf", "application/pdf", buffer);

    let result = processor
        .process_pdf(&file, &ProcessingOptions::default())
        .await;

    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(result.metadata.page_count, Some(1));
    let confidence = result.metadata.confidence.unwrap();
    assert!(confidence < 100.0, "got {confidence}");
}

#[tokio::test]
async fn given_unparseable_bytes_when_processing_then_fails_for_that_file() {
    let processor = PdfProcessor::new();
    let file = FileInfo::new("broken.pdf", "application/pdf", b"%PDF-garbage".to_vec());

    let result = processor
        .process_pdf(&file, &ProcessingOptions::default())
        .await;

    assert!(!result.success);
    assert!(result.text.is_empty());
    assert!(result.error.is_some());
}

#[test]
fn given_valid_pdf_when_extracting_metadata_then_reports_pages_and_version() {
    let buffer = build_pdf(&[DENSE_PAGE, DENSE_PAGE]);

    let metadata = PdfProcessor::extract_metadata(&buffer).unwrap();

    assert_eq!(metadata.pages, 2);
    assert_eq!(metadata.version, "1.5");
}

#[test]
fn given_invalid_bytes_when_extracting_metadata_then_returns_none() {
    assert!(PdfProcessor::extract_metadata(b"not a pdf").is_none());
}

#[test]
fn given_text_density_when_classifying_then_threshold_is_respected() {
    let dense = "x".repeat(SCANNED_CHARS_PER_PAGE);
    let sparse = "x".repeat(SCANNED_CHARS_PER_PAGE - 1);

    assert!(!is_probably_scanned(&dense, 1));
    assert!(is_probably_scanned(&sparse, 1));
    assert!(is_probably_scanned("", 3));
}

#[test]
fn given_zero_pages_when_classifying_then_treated_as_scanned() {
    assert!(is_probably_scanned("some text", 0));
}
