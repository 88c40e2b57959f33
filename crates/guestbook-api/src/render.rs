use chrono::DateTime;
use guestbook_db::sanitize::escape_html;
use guestbook_types::Entry;
use guestbook_types::models::EntryPage;

use crate::error::GuestbookError;

pub const DEFAULT_NAME_TEXT: &str = "Your name";
pub const DEFAULT_MESSAGE_TEXT: &str = "Your message";

/// RFC 850 date, always rendered in UTC.
const RFC850: &str = "%A, %d-%b-%y %H:%M:%S UTC";

const RECAPTCHA_SERVER: &str = "http://www.google.com/recaptcha/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Notice,
    Error,
}

impl Banner {
    pub fn posted() -> Self {
        Self {
            kind: BannerKind::Notice,
            text: "Message posted!",
        }
    }

    pub fn from_error(err: &GuestbookError) -> Self {
        Self {
            kind: BannerKind::Error,
            text: err.user_message(),
        }
    }
}

/// Everything needed to draw the page.
pub struct PageView<'a> {
    /// `None` when the store could not be read; the listing is skipped.
    pub page: Option<&'a EntryPage>,
    /// Raw (unescaped) form values.
    pub name_text: &'a str,
    pub message_text: &'a str,
    pub banners: Vec<Banner>,
    pub recaptcha_public_key: Option<&'a str>,
}

impl Default for PageView<'_> {
    fn default() -> Self {
        Self {
            page: None,
            name_text: DEFAULT_NAME_TEXT,
            message_text: DEFAULT_MESSAGE_TEXT,
            banners: Vec::new(),
            recaptcha_public_key: None,
        }
    }
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Guestbook</title>\n</head>\n<body>\n",
    );

    for banner in &view.banners {
        let class = match banner.kind {
            BannerKind::Notice => "notice",
            BannerKind::Error => "error",
        };
        html.push_str(&format!("<p class=\"{}\">{}</p>\n", class, banner.text));
    }

    if let Some(page) = view.page {
        render_entries(&mut html, page);
    }

    render_form(&mut html, view);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_entries(html: &mut String, page: &EntryPage) {
    html.push_str("<div id=\"entries\">\n");

    // Name and message were escaped when stored.
    for entry in &page.entries {
        html.push_str(&format!(
            "<p><strong>{}</strong> {}<br>\n{}</p>\n",
            entry.name,
            format_time(entry),
            entry.message
        ));
    }

    if page.is_empty() {
        if page.offset == 0 {
            html.push_str("<p>No messages.</p>\n");
        } else {
            html.push_str("<p>No more messages!</p>\n");
        }
    } else {
        let step = u64::from(page.page_size);
        html.push_str("<nav>\n");
        if page.offset >= step {
            html.push_str(&format!(
                "<a class=\"newer\" href=\"?offset={}\">&lt; Newer</a>\n",
                page.offset - step
            ));
        }
        if page.has_older {
            html.push_str(&format!(
                "<a class=\"older\" href=\"?offset={}\">Older &gt;</a>\n",
                page.offset.saturating_add(step)
            ));
        }
        html.push_str("</nav>\n");
    }

    html.push_str("</div>\n");
}

fn render_form(html: &mut String, view: &PageView<'_>) {
    html.push_str(&format!(
        "<form id=\"newEntryForm\" method=\"post\">\n\
         <input type=\"text\" id=\"name\" name=\"name\" maxlength=\"30\" size=\"30\" value=\"{}\"><br>\n\
         <textarea id=\"message\" name=\"message\" rows=\"5\" cols=\"50\">{}</textarea><br>\n",
        escape_html(view.name_text),
        escape_html(view.message_text)
    ));

    if let Some(key) = view.recaptcha_public_key {
        let key = escape_html(key);
        html.push_str(&format!(
            "<script type=\"text/javascript\" src=\"{RECAPTCHA_SERVER}/challenge?k={key}\"></script>\n\
             <noscript>\n\
             <iframe src=\"{RECAPTCHA_SERVER}/noscript?k={key}\" height=\"300\" width=\"500\" frameborder=\"0\"></iframe><br>\n\
             <textarea name=\"recaptcha_challenge_field\" rows=\"3\" cols=\"40\"></textarea>\n\
             <input type=\"hidden\" name=\"recaptcha_response_field\" value=\"manual_challenge\">\n\
             </noscript>\n"
        ));
    }

    html.push_str(
        "<input type=\"submit\" name=\"postEntry\" id=\"postEntry\" value=\"Post Message\">\n</form>\n",
    );
}

fn format_time(entry: &Entry) -> String {
    DateTime::from_timestamp(entry.time, 0)
        .map(|t| t.format(RFC850).to_string())
        .unwrap_or_default()
}
