//! Composition of the email relayed to the site owner.

use super::submission::ValidSubmission;

/// Outbound message, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub from: String,
    pub to: String,
    /// The submitter, so a reply from the inbox reaches them directly.
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl ContactEmail {
    /// Compose a self-addressed email for `account` carrying the submission.
    pub fn compose(account: &str, submission: &ValidSubmission) -> Self {
        let name = submission.name();
        let email = submission.email();
        let message = submission.message();

        let text_body = format!("Name: {name}\nEmail: {email}\nMessage:\n{message}\n");

        let html_body = format!(
            "<h3>New Contact Form Submission</h3>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n",
            escape_html(name),
            escape_html(email),
            line_breaks_to_html(&escape_html(message)),
        );

        Self {
            from: account.to_string(),
            to: account.to_string(),
            reply_to: email.to_string(),
            subject: subject_for(name),
            text_body,
            html_body,
        }
    }
}

/// Subject line derived from the submitter's name.
pub fn subject_for(name: &str) -> String {
    // Header folding is lettre's job, but a raw newline would still split the subject.
    let name: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    format!("New Connection Request from {name}")
}

/// Escape text for inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replace each line break (`\n`, `\r\n` or lone `\r`) with `<br>`.
pub fn line_breaks_to_html(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', "<br>")
}
