mod lifecycle_tests;

use crate::host::MemoryHost;
use crate::scanner::OverlayAnnotation;

pub(crate) const WAVE: &str = "hi <:wave:12345678901234567> bye";
pub(crate) const DANCE: &str = "<a:dance:76543210987654321>";

pub(crate) fn png(id: &str) -> String {
    format!("https://cdn.discordapp.com/emojis/{}.png?size=16", id)
}

pub(crate) fn gif(id: &str) -> String {
    format!("https://cdn.discordapp.com/emojis/{}.gif?size=16", id)
}

pub(crate) fn urls(overlays: &[OverlayAnnotation]) -> Vec<String> {
    overlays.iter().map(|overlay| overlay.image_url.clone()).collect()
}

pub(crate) fn focused_host(text: &str) -> (MemoryHost, crate::host::MemoryView) {
    let host = MemoryHost::new();
    let view = host.open(text);
    host.focus(Some(&view));
    (host, view)
}
