//! Message templates, one per channel.
//!
//! Pure functions over a `Lead`: no I/O, so presentation can be tested
//! without a mail relay or a bot token. Lead fields are user input and are
//! HTML-escaped wherever the output is HTML.

use leadpost_core::types::Lead;

/// Footer shown under every email notification.
pub const EMAIL_FOOTER: &str = "Log in to the dashboard to process this application.";

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ─────────────────────────────────────────────
// Email
// ─────────────────────────────────────────────

/// `"New application #<id> - <service>"`
pub fn email_subject(lead: &Lead) -> String {
    format!("New application #{} - {}", lead.id(), lead.service())
}

/// HTML body of the email notification.
pub fn email_html(lead: &Lead) -> String {
    let name = escape_html(lead.name());
    let phone = escape_html(lead.phone());
    let email = escape_html(lead.email());
    let service = escape_html(lead.service());

    let message_block = lead
        .message()
        .map(|m| {
            format!(
                r#"<p style="margin: 10px 0;"><strong>Message:</strong><br>{}</p>"#,
                escape_html(m).replace('\n', "<br>")
            )
        })
        .unwrap_or_default();

    format!(
        r##"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f9f9f9;">
      <h2 style="color: #FF6600; border-bottom: 3px solid #FF6600; padding-bottom: 10px;">New application #{id}</h2>
      <div style="background-color: white; padding: 20px; border-radius: 8px; margin-top: 20px;">
        <p style="margin: 10px 0;"><strong>Service:</strong> {service}</p>
        <p style="margin: 10px 0;"><strong>Customer:</strong> {name}</p>
        <p style="margin: 10px 0;"><strong>Phone:</strong> <a href="tel:{phone}">{phone}</a></p>
        <p style="margin: 10px 0;"><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
        {message_block}
      </div>
      <div style="margin-top: 20px; padding: 15px; background-color: #fff3e6; border-left: 4px solid #FF6600; border-radius: 4px;">
        <p style="margin: 0;">{footer}</p>
      </div>
    </div>
  </body>
</html>"##,
        id = lead.id(),
        footer = EMAIL_FOOTER,
    )
}

// ─────────────────────────────────────────────
// SMS
// ─────────────────────────────────────────────

/// Flat SMS text: id, name, phone, service.
pub fn sms_text(lead: &Lead) -> String {
    format!(
        "New application #{}. Customer: {}, phone: {}, service: {}",
        lead.id(), lead.name(), lead.phone(), lead.service()
    )
}

// ─────────────────────────────────────────────
// Telegram
// ─────────────────────────────────────────────

/// Telegram message in `parse_mode=HTML`.
pub fn telegram_html(lead: &Lead) -> String {
    let mut text = format!(
        "🏠 <b>New application #{}</b>\n\n\
         👤 <b>Customer:</b> {}\n\
         🛠 <b>Service:</b> {}\n\
         📞 <b>Phone:</b> {}\n\
         ✉️ <b>Email:</b> {}",
        lead.id(),
        escape_html(lead.name()),
        escape_html(lead.service()),
        escape_html(lead.phone()),
        escape_html(lead.email()),
    );

    if let Some(message) = lead.message() {
        text.push_str("\n\n💬 <b>Message:</b>\n");
        text.push_str(&escape_html(message));
    }

    text
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
