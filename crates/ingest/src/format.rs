//! Upload format dispatch.
//!
//! Dispatch is by declared MIME type first, file extension second.
//! Anything not recognized as PDF or Word falls back to the plain-text
//! path — a permissive default, not a hard error. Markdown and CSV are
//! deliberately just text here.

/// How to extract text from an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// UTF-8 text: plain text, Markdown, CSV, and every unknown format.
    PlainText,
    Pdf,
    /// A `.docx` word-processing document.
    Word,
}

impl DocumentFormat {
    /// Determine the format from the declared MIME type and file name.
    pub fn detect(mime: Option<&str>, file_name: &str) -> Self {
        if let Some(mime) = mime {
            let mime = mime.to_lowercase();
            if mime == "application/pdf" {
                return Self::Pdf;
            }
            if mime.contains("officedocument.wordprocessingml") || mime.contains("msword") {
                return Self::Word;
            }
            // text/*, application/octet-stream and friends fall through
            // to the extension check.
        }

        match extension_of(file_name).map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") | Some("doc") => Self::Word,
            _ => Self::PlainText,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "word"),
        }
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    let dot = file_name.rfind('.')?;
    let ext = &file_name[dot + 1..];
    if ext.is_empty() { None } else { Some(ext) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_wins_over_extension() {
        let fmt = DocumentFormat::detect(Some("application/pdf"), "report.bin");
        assert_eq!(fmt, DocumentFormat::Pdf);
    }

    #[test]
    fn word_mime_variants() {
        let modern = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        assert_eq!(
            DocumentFormat::detect(Some(modern), "notes"),
            DocumentFormat::Word
        );
        assert_eq!(
            DocumentFormat::detect(Some("application/msword"), "notes"),
            DocumentFormat::Word
        );
    }

    #[test]
    fn extension_used_when_mime_is_generic() {
        assert_eq!(
            DocumentFormat::detect(Some("application/octet-stream"), "paper.pdf"),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::detect(None, "essay.docx"),
            DocumentFormat::Word
        );
    }

    #[test]
    fn everything_else_is_plain_text() {
        for name in ["notes.txt", "README.md", "data.csv", "noext", "weird.xyz"] {
            assert_eq!(
                DocumentFormat::detect(None, name),
                DocumentFormat::PlainText,
                "{name}"
            );
        }
        assert_eq!(
            DocumentFormat::detect(Some("text/markdown"), "guide.md"),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn trailing_dot_has_no_extension() {
        assert_eq!(
            DocumentFormat::detect(None, "strange."),
            DocumentFormat::PlainText
        );
    }
}
