//! Best-effort MIME type guessing from a file name.

use std::path::Path;

/// Fallback for unknown or missing extensions.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess a MIME type from the extension of `file_name`.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME_TYPE,
    };

    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "htm" | "html" => "text/html",
        "css" => "text/css",
        "md" => "text/markdown",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "apk" => "application/vnd.android.package-archive",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(guess_mime_type("cat.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("notes.txt"), "text/plain");
        assert_eq!(guess_mime_type("archive.tar.gz"), "application/gzip");
        assert_eq!(guess_mime_type("/tmp/dir.d/report.pdf"), "application/pdf");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(guess_mime_type("README"), DEFAULT_MIME_TYPE);
        assert_eq!(guess_mime_type("file.unknownext"), DEFAULT_MIME_TYPE);
        assert_eq!(guess_mime_type(""), DEFAULT_MIME_TYPE);
    }
}
