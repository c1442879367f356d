use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref COMMA_SPACING: Regex = Regex::new(r",\s*").unwrap();
}

/// Extracts the text layer of a PDF.
///
/// Unreadable PDFs are logged and produce an empty string so one bad file
/// does not abort the rest of the batch. The parser runs on a blocking thread;
/// a panic inside it is treated like any other parse failure.
pub async fn extract_pdf_text(file_name: &str, data: Bytes) -> String {
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match extracted {
        Ok(Ok(text)) => {
            debug!("Extracted {} chars from {file_name}", text.len());
            text
        }
        Ok(Err(e)) => {
            warn!("Could not read PDF {file_name}: {e}");
            String::new()
        }
        Err(e) => {
            warn!("PDF parser aborted on {file_name}: {e}");
            String::new()
        }
    }
}

/// Collapses whitespace runs to single spaces and normalises comma spacing.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let spaced = COMMA_SPACING.replace_all(&collapsed, ", ");
    spaced.trim().to_string()
}
