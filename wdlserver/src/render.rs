//! Rendu HTML de la liste des dossiers
//!
//! Fonction pure : aucune E/S, tout le texte venant du serveur UPnP est
//! échappé avant d'être inséré dans le document.

use std::fmt;
use std::time::Duration;

use quick_xml::escape::escape;
use wdlcontrol::Folder;
use wdldidl::{FieldValue, Item};

const STYLE: &str = "body{font-family:sans-serif;margin:1em 2em}\
nav ul{columns:3}\
section{border-top:1px solid #ccc;padding:.5em 0}\
section img{float:right;max-height:8em}\
.meta{color:#666;font-size:smaller}";

/// Produit la page HTML complète listant `folders`, dans l'ordre reçu.
///
/// `base_url` est l'adresse du serveur UPnP amont, affichée en en-tête.
pub fn render_page(base_url: &str, folders: &[Folder]) -> String {
    Page { base_url, folders }.to_string()
}

struct Page<'a> {
    base_url: &'a str,
    folders: &'a [Folder],
}

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = escape(self.base_url);

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html><head><meta charset=\"utf-8\">")?;
        writeln!(f, "<title>WebDLNA - {base}</title>")?;
        writeln!(f, "<style>{STYLE}</style></head><body>")?;
        writeln!(f, "<h1>Folders of <a href=\"{base}\">{base}</a></h1>")?;

        if self.folders.is_empty() {
            writeln!(f, "<p>No folders.</p>")?;
            return writeln!(f, "</body></html>");
        }

        writeln!(f, "<nav><ul>")?;
        for (idx, folder) in self.folders.iter().enumerate() {
            writeln!(
                f,
                "<li><a href=\"#f{idx}\">{}</a> ({})</li>",
                escape(folder.title()),
                folder.items.len()
            )?;
        }
        writeln!(f, "</ul></nav>")?;

        for (idx, folder) in self.folders.iter().enumerate() {
            write_folder(f, idx, folder)?;
        }

        writeln!(f, "</body></html>")
    }
}

fn write_folder(f: &mut fmt::Formatter<'_>, idx: usize, folder: &Folder) -> fmt::Result {
    writeln!(f, "<section id=\"f{idx}\">")?;

    if let Some(art) = folder.items.iter().find_map(Item::album_art_url) {
        writeln!(f, "<img src=\"{}\" alt=\"\">", escape(art))?;
    }

    write!(f, "<h2>{}", escape(folder.title()))?;
    let total = folder.total_size();
    if total > 0 {
        write!(f, " <span class=\"meta\">{}</span>", human_size(total))?;
    }
    writeln!(f, "</h2>")?;

    writeln!(f, "<ol>")?;
    for item in &folder.items {
        write_item(f, item)?;
    }
    writeln!(f, "</ol></section>")
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &Item) -> fmt::Result {
    let title = escape(&item.title);
    let Some(res) = item.primary_resource() else {
        return writeln!(f, "<li>{title}</li>");
    };

    if res.url.trim().is_empty() {
        write!(f, "<li>{title}")?;
    } else {
        write!(f, "<li><a href=\"{}\">{title}</a>", escape(res.url.trim()))?;
    }

    let mut meta = Vec::new();
    if let Some(creator) = item.creator.as_deref().filter(|c| !c.is_empty()) {
        meta.push(escape(creator).into_owned());
    }
    match res.size() {
        Some(FieldValue::Typed(size)) => meta.push(human_size(size)),
        Some(FieldValue::Raw(raw)) => meta.push(escape(&raw).into_owned()),
        None => {}
    }
    match res.duration() {
        Some(FieldValue::Typed(duration)) => meta.push(format_duration(duration)),
        Some(FieldValue::Raw(raw)) => meta.push(escape(&raw).into_owned()),
        None => {}
    }
    match res.resolution() {
        Some(FieldValue::Typed((w, h))) => meta.push(format!("{w}x{h}")),
        Some(FieldValue::Raw(raw)) => meta.push(escape(&raw).into_owned()),
        None => {}
    }

    if !meta.is_empty() {
        write!(f, " <span class=\"meta\">{}</span>", meta.join(" · "))?;
    }
    writeln!(f, "</li>")
}

/// Taille lisible, en unités binaires
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// `H:MM:SS`, ou `M:SS` sous l'heure
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wdldidl::{Container, Resource};

    fn folder(title: &str, items: Vec<Item>) -> Folder {
        Folder {
            container: Container {
                id: "1$1".to_string(),
                parent_id: "1".to_string(),
                restricted: None,
                searchable: None,
                child_count: None,
                title: title.to_string(),
                class: "object.container.storageFolder".to_string(),
                storage_used: None,
            },
            items,
        }
    }

    fn item(title: &str, res: Resource) -> Item {
        Item {
            id: "1$1$0".to_string(),
            parent_id: "1$1".to_string(),
            restricted: None,
            title: title.to_string(),
            class: "object.item.videoItem".to_string(),
            creator: None,
            date: None,
            album_art: None,
            resources: vec![res],
        }
    }

    #[test]
    fn test_render_lists_items_with_metadata() {
        let res = Resource {
            protocol_info: "http-get:*:video/mp4:*".to_string(),
            size: Some("1572864".to_string()),
            duration: Some("1:02:03.500".to_string()),
            resolution: Some("1920x1080".to_string()),
            url: "http://nas:8200/MediaItems/7.mp4".to_string(),
            ..Resource::default()
        };
        let html = render_page(
            "http://nas:8200",
            &[folder("Holidays", vec![item("Beach", res)])],
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<a href=\"http://nas:8200/MediaItems/7.mp4\">Beach</a>"));
        assert!(html.contains("1.5 MiB"));
        assert!(html.contains("1:02:03"));
        assert!(html.contains("1920x1080"));
        assert!(html.contains("<h2>Holidays"));
    }

    #[test]
    fn test_render_escapes_remote_text() {
        let res = Resource {
            size: Some("big".to_string()),
            url: "http://nas/a?x=1&y=\"2\"".to_string(),
            ..Resource::default()
        };
        let html = render_page(
            "http://nas:8200",
            &[folder("<script>alert(1)</script>", vec![item("Tom & Jerry", res)])],
        );

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("href=\"http://nas/a?x=1&amp;y=&quot;2&quot;\""));
        // non numeric size is shown as is
        assert!(html.contains(">big</span>"));
    }

    #[test]
    fn test_render_album_art_is_stripped() {
        let mut track = item("Intro", Resource::default());
        track.album_art = Some("http://nas:8200/AlbumArt/12-34.jpg?width=160".to_string());

        let html = render_page("http://nas:8200", &[folder("Album", vec![track])]);
        assert!(html.contains("<img src=\"http://nas:8200/AlbumArt/12-34.jpg\""));
    }

    #[test]
    fn test_render_empty_listing() {
        let html = render_page("http://nas:8200", &[]);
        assert!(html.contains("No folders."));
        assert!(!html.contains("<nav>"));
    }

    #[test]
    fn test_human_size_and_duration() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GiB");
        assert_eq!(format_duration(Duration::from_secs(65)), "1:05");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1:02:05");
    }
}
