//! Upload policy and display helpers for supporting documents.

use mime::Mime;

/// Per-file ceiling enforced before anything reaches the store.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const WORD_LEGACY: &str = "application/msword";
const WORD_OPENXML: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A candidate file as received from the client, prior to any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

fn content_type_allowed(content_type: &str) -> bool {
    if content_type == WORD_LEGACY || content_type == WORD_OPENXML {
        return true;
    }

    let Ok(parsed) = content_type.parse::<Mime>() else {
        return false;
    };

    matches!(
        (parsed.type_(), parsed.subtype()),
        (mime::IMAGE, mime::JPEG)
            | (mime::IMAGE, mime::PNG)
            | (mime::IMAGE, mime::GIF)
            | (mime::APPLICATION, mime::PDF)
            | (mime::TEXT, mime::PLAIN)
    )
}

/// Check one candidate against the size and content-type policy. The reason
/// strings are shown to the user next to the rejected file.
pub fn validate_upload(file: &UploadFile) -> Result<(), String> {
    if file.size() > MAX_FILE_SIZE {
        return Err("File size must be less than 10MB".to_string());
    }

    if !content_type_allowed(&file.content_type) {
        return Err(
            "File type not allowed. Please upload images, PDFs, or documents.".to_string(),
        );
    }

    Ok(())
}

/// Icon key used by the attachment list views.
pub fn file_type_icon(file_type: &str) -> &'static str {
    if file_type.starts_with("image/") {
        return "image";
    }
    if file_type == "application/pdf"
        || file_type == "text/plain"
        || file_type.contains("word")
        || file_type.contains("document")
    {
        return "file-text";
    }
    "file"
}

/// Human-readable byte count, 1024-based, trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut rendered = format!("{scaled:.2}");
    if rendered.contains('.') {
        rendered = rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }

    format!("{rendered} {}", UNITS[exponent])
}
