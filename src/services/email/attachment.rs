use crate::services::email::sanitize::sanitize_filename;
use mail_parser::{Message, MimeHeaders};

/// A PDF attachment lifted out of a parsed message. The filename is
/// already sanitized and the payload is decoded from its transfer
/// encoding, borrowing from the message buffer.
#[derive(Debug, Clone)]
pub struct PdfAttachment<'a> {
    pub filename: String,
    pub data: &'a [u8],
}

pub struct AttachmentHandler;

impl AttachmentHandler {
    /// Walks the message's parts in document order and yields every PDF
    /// attachment. A part qualifies when it is not a multipart container,
    /// carries a Content-Disposition header, and declares a filename
    /// ending in ".pdf" (case-insensitive). Everything else is skipped.
    pub fn pdf_attachments<'a>(
        parsed: &'a Message<'a>,
    ) -> impl Iterator<Item = PdfAttachment<'a>> {
        parsed.parts.iter().filter_map(|part| {
            if part.is_multipart() {
                return None;
            }
            part.content_disposition()?;

            let filename = part.attachment_name()?;
            if !filename.to_lowercase().ends_with(".pdf") {
                return None;
            }

            Some(PdfAttachment {
                filename: sanitize_filename(filename),
                data: part.contents(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail_parser::MessageParser;

    fn parse(raw: &[u8]) -> Message<'_> {
        MessageParser::default()
            .parse(raw)
            .expect("fixture should parse")
    }

    // The PDF sits inside an inner container, with a non-PDF attachment
    // as a sibling of that container.
    const NESTED: &[u8] = b"From: sender@example.com\r\n\
Subject: reports\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: multipart/mixed; boundary=\"inner\"\r\n\
\r\n\
--inner\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: attachment; filename=\"x.PDF\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
JVBERi0x\r\n\
--inner--\r\n\
--outer\r\n\
Content-Type: text/plain\r\n\
Content-Disposition: attachment; filename=\"x.txt\"\r\n\
\r\n\
plain text\r\n\
--outer--\r\n";

    #[test]
    fn test_extracts_pdf_from_nested_container() {
        let parsed = parse(NESTED);
        let attachments: Vec<_> = AttachmentHandler::pdf_attachments(&parsed).collect();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "x_PDF");
        assert_eq!(attachments[0].data, b"%PDF-1");
    }

    #[test]
    fn test_part_without_disposition_is_skipped() {
        let raw = b"From: sender@example.com\r\n\
Subject: no disposition\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: application/pdf; name=\"y.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
JVBERi0x\r\n\
--b--\r\n";
        let parsed = parse(raw);
        assert_eq!(AttachmentHandler::pdf_attachments(&parsed).count(), 0);
    }

    #[test]
    fn test_inline_disposition_qualifies() {
        let raw = b"From: sender@example.com\r\n\
Subject: inline\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: inline; filename=\"z.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
JVBERi0x\r\n\
--b--\r\n";
        let parsed = parse(raw);
        let attachments: Vec<_> = AttachmentHandler::pdf_attachments(&parsed).collect();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "z_pdf");
        assert_eq!(attachments[0].data, b"%PDF-1");
    }

    #[test]
    fn test_yields_in_document_order() {
        let raw = b"From: sender@example.com\r\n\
Subject: two pdfs\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: attachment; filename=\"first.pdf\"\r\n\
\r\n\
one\r\n\
--b\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: attachment; filename=\"second.pdf\"\r\n\
\r\n\
two\r\n\
--b--\r\n";
        let parsed = parse(raw);
        let names: Vec<_> = AttachmentHandler::pdf_attachments(&parsed)
            .map(|a| a.filename)
            .collect();

        assert_eq!(names, vec!["first_pdf", "second_pdf"]);
    }

    #[test]
    fn test_empty_payload_yields_empty_bytes() {
        let raw = b"From: sender@example.com\r\n\
Subject: empty attachment\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: attachment; filename=\"empty.pdf\"\r\n\
\r\n\
\r\n\
--b--\r\n";
        let parsed = parse(raw);
        let attachments: Vec<_> = AttachmentHandler::pdf_attachments(&parsed).collect();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "empty_pdf");
        assert!(attachments[0].data.is_empty());
    }

    #[test]
    fn test_message_without_attachments_yields_nothing() {
        let raw = b"From: sender@example.com\r\n\
Subject: just text\r\n\
\r\n\
hello\r\n";
        let parsed = parse(raw);
        assert_eq!(AttachmentHandler::pdf_attachments(&parsed).count(), 0);
    }
}
