use crate::error::ExtractionError;

/// Extract the text layer from a PDF byte stream
///
/// Pages come back in page order with the extractor's native newline
/// separation. A structurally valid PDF whose pages carry no text layer
/// (e.g. pure image scans) is reported as [`ExtractionError::NoTextLayer`]
/// rather than an empty string, so the caller can distinguish "empty
/// document" from "nothing extractable".
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::InvalidPdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractionError::NoTextLayer);
    }

    tracing::info!("Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}
