use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use veriscan_core::{Document, ExtractedRecord, MaskRegion};
use veriscan_extract::{DocumentPipeline, PipelineConfig};
use veriscan_ocr::{OcrBackend, ScanPipeline};

/// What `extract` and `scan` print.
#[derive(Debug, Serialize)]
pub struct ExtractOutput {
    #[serde(flatten)]
    pub record: ExtractedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masks: Option<Vec<MaskRegion>>,
}

pub fn load_pipeline(config: Option<&Path>) -> Result<DocumentPipeline> {
    let Some(path) = config else {
        return Ok(DocumentPipeline::default());
    };
    let config = PipelineConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?;
    DocumentPipeline::from_config(&config).context("Invalid pipeline configuration")
}

/// One OCR dump: `{"rawText": ..., "lines": [...], "words": [...]}`.
pub fn read_document(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is not a valid OCR document", path.display()))
}

pub fn read_submission(front: &Path, back: Option<&Path>) -> Result<Document> {
    let front = read_document(front)?;
    let back = back.map(read_document).transpose()?;
    Ok(Document::combine_sides(front, back))
}

pub fn extract(pipeline: &DocumentPipeline, doc: &Document, with_masks: bool) -> ExtractOutput {
    let record = pipeline.process(doc);
    let masks = with_masks.then(|| pipeline.record_masks(doc, &record));
    ExtractOutput { record, masks }
}

pub async fn scan<R: OcrBackend>(
    scanner: &ScanPipeline<R>,
    front: &Path,
    back: Option<&Path>,
) -> Result<ExtractOutput> {
    let result = scanner
        .process_files(front, back)
        .await
        .context("Failed to read scan images")?;
    tracing::info!(lines = result.document.lines.len(), words = result.document.words.len(), "scan complete");
    Ok(ExtractOutput { record: result.record, masks: Some(result.masks) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use veriscan_core::DocumentType;
    use veriscan_ocr::MockRecognizer;

    fn json_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn extract_reads_front_and_back_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let front = json_file(
            &dir,
            "front.json",
            r#"{"rawText":"GOVERNMENT OF INDIA\nRAHUL SHARMA\nDOB: 12-04-1990\nMale"}"#,
        );
        let back = json_file(
            &dir,
            "back.json",
            r#"{"lines":[{"text":"Address:"},{"text":"12 MG Road"},{"text":"Pune 411005"},{"text":"1234 5678 9012"}]}"#,
        );

        let doc = read_submission(&front, Some(&back)).unwrap();
        let out = extract(&load_pipeline(None).unwrap(), &doc, false);
        assert_eq!(out.record.doc_type, DocumentType::AadhaarCard);
        assert_eq!(out.record.field("id_number"), Some("1234 5678 9012"));

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], "Aadhaar Card");
        assert_eq!(json["fields"]["address"], "12 MG Road, Pune 411005");
        assert!(json.get("masks").is_none());
    }

    #[test]
    fn masks_are_printed_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let front = json_file(
            &dir,
            "front.json",
            r#"{"rawText":"INCOME TAX DEPARTMENT\nRAHUL SHARMA\nABCDE1234F",
                "words":[{"text":"ABCDE1234F","bbox":{"x0":10,"y0":80,"x1":150,"y1":100},"confidence":91}]}"#,
        );
        let doc = read_submission(&front, None).unwrap();
        let out = extract(&DocumentPipeline::default(), &doc, true);
        assert_eq!(out.masks.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn bad_inputs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let broken = json_file(&dir, "broken.json", "{not json");
        assert!(read_document(&broken).is_err());
        assert!(read_document(&dir.path().join("missing.json")).is_err());
        assert!(load_pipeline(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let config = json_file(&dir, "veriscan.toml", "extra_noise_words = [\"RAHUL\"]\n");
        let pipeline = load_pipeline(Some(&config)).unwrap();
        let doc = Document::from_lines(&["INCOME TAX DEPARTMENT", "RAHUL SHARMA", "SURESH SHARMA", "ABCDE1234F"]);
        assert_eq!(extract(&pipeline, &doc, false).record.field("full_name"), Some("SURESH SHARMA"));
    }

    #[tokio::test]
    async fn scan_runs_the_image_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let image = json_file(&dir, "card.jpg", "not really an image");
        let scanner = ScanPipeline::new(
            MockRecognizer::new("INCOME TAX DEPARTMENT\nRAHUL SHARMA\nABCDE1234F"),
            DocumentPipeline::default(),
        );
        // Undecodable image: both passes degrade, the record is still complete.
        let out = scan(&scanner, &image, None).await.unwrap();
        assert_eq!(out.record.doc_type, DocumentType::GenericDocument);
        assert!(out.masks.is_some());

        assert!(scan(&scanner, &dir.path().join("missing.jpg"), None).await.is_err());
    }
}
