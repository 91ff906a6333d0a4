//! WhatsApp deep links.

/// Country calling code for Mexico.
pub const MEXICO_COUNTRY_CODE: &str = "52";

/// Message prefilled when a visitor opens the chat from the site.
pub const DEFAULT_MESSAGE: &str = "Hola, me interesa cotizar refacciones para mi gimnasio.";

/// Build a `https://wa.me/<digits>?text=<message>` link.
///
/// Non-digit characters are stripped from `number`. Ten-digit national
/// numbers get the Mexican country code prepended.
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let digits = if digits.len() == 10 {
        format!("{MEXICO_COUNTRY_CODE}{digits}")
    } else {
        digits
    };

    if message.trim().is_empty() {
        format!("https://wa.me/{digits}")
    } else {
        format!("https://wa.me/{digits}?text={}", urlencoding::encode(message))
    }
}
