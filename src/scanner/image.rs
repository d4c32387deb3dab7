//! Image reference construction for emote tokens.

use serde::{Deserialize, Serialize};

use crate::scanner::EmoteToken;

/// CDN prefix that serves emote images by id.
pub const EMOTE_CDN_BASE: &str = "https://cdn.discordapp.com/emojis";

/// Requested image edge in pixels. Also the overlay box size.
pub const EMOTE_SIZE_PX: u32 = 16;

/// Image encoding served for an emote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Gif,
    Png,
}

impl ImageFormat {
    pub fn for_token(token: &EmoteToken) -> Self {
        if token.animated {
            ImageFormat::Gif
        } else {
            ImageFormat::Png
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Gif => "gif",
            ImageFormat::Png => "png",
        }
    }
}

/// Build the image URL for a token.
///
/// `https://cdn.discordapp.com/emojis/{id}.{gif|png}?size=16`
pub fn image_url(token: &EmoteToken) -> String {
    format!(
        "{}/{}.{}?size={}",
        EMOTE_CDN_BASE,
        token.id,
        ImageFormat::for_token(token).extension(),
        EMOTE_SIZE_PX
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::EmoteCortex;

    fn token(text: &str) -> EmoteToken {
        EmoteCortex::new()
            .extract(text)
            .into_iter()
            .next()
            .expect("fixture should contain an emote")
    }

    #[test]
    fn test_static_emote_is_png() {
        let url = image_url(&token("<:name:12345678901234567>"));
        assert_eq!(url, "https://cdn.discordapp.com/emojis/12345678901234567.png?size=16");
    }

    #[test]
    fn test_animated_emote_is_gif() {
        let url = image_url(&token("<a:name:12345678901234567>"));
        assert_eq!(url, "https://cdn.discordapp.com/emojis/12345678901234567.gif?size=16");
    }

    #[test]
    fn test_url_is_deterministic() {
        let text = "<a:party:98765432109876543>";
        assert_eq!(image_url(&token(text)), image_url(&token(text)));
    }

    #[test]
    fn test_name_does_not_affect_url() {
        let a = image_url(&token("<:one:12345678901234567>"));
        let b = image_url(&token("<:two:12345678901234567>"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_follows_animated_flag() {
        assert_eq!(ImageFormat::for_token(&token("<:x:12345678901234567>")), ImageFormat::Png);
        assert_eq!(ImageFormat::for_token(&token("<a:x:12345678901234567>")), ImageFormat::Gif);
    }
}
