use foundation::escape_html;

pub const CHAT_APOLOGY: &str = "Sorry, I'm having trouble right now. Please try again!";

pub fn user_message(text: &str) -> String {
    format!(r#"<div class="user-message">{}</div>"#, escape_html(text))
}

pub fn bot_message(text: &str) -> String {
    format!(r#"<div class="bot-message">{}</div>"#, escape_html(text))
}
