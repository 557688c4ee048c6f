//! Export service: barcode and badge files on disk.
//!
//! Book labels carry the ISBN as EAN-13; client badges carry the short code
//! as Code 128 plus the library name, the client's name and the issue date.
//! Files land in the configured export directory and the handler returns
//! the path so the desktop client can open or print them.

use std::path::PathBuf;

use chrono::Local;
use uuid::Uuid;

use crate::{
    barcode::{self, code128, ean13},
    config::ExportConfig,
    error::AppResult,
    ident,
    repository::Repository,
};

#[derive(Clone)]
pub struct ExportsService {
    repository: Repository,
    dir: PathBuf,
}

impl ExportsService {
    pub fn new(repository: Repository, config: ExportConfig) -> Self {
        Self {
            repository,
            dir: PathBuf::from(config.dir),
        }
    }

    async fn write_file(&self, name: &str, contents: &str) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    /// Write an EAN-13 barcode SVG for a book's ISBN; the book must exist
    pub async fn book_barcode(&self, isbn: &str) -> AppResult<PathBuf> {
        let book = self.repository.books.get(isbn).await?;

        let modules = ean13::encode(&book.isbn)?;
        let svg = barcode::render_svg(&modules, &book.isbn);

        let path = self
            .write_file(&format!("barcode-{}.svg", book.isbn), &svg)
            .await?;
        tracing::info!("Wrote barcode for {} to {}", book.isbn, path.display());
        Ok(path)
    }

    /// Write a badge SVG for a client: library name, client name, issue date
    /// and the short identifier as Code 128.
    pub async fn client_badge(&self, id: Uuid, library_name: &str) -> AppResult<PathBuf> {
        let client = self.repository.clients.get(id).await?;

        let short = ident::encode(client.id);
        let modules = code128::encode(&short)?;
        let full_name = format!("{} {}", client.first_name, client.last_name);
        let issued = Local::now().date_naive();
        let svg = render_badge(&modules, library_name, &full_name, &issued.to_string(), &short);

        let path = self.write_file(&format!("badge-{}.svg", short), &svg).await?;
        tracing::info!("Wrote badge for client {} to {}", client.id, path.display());
        Ok(path)
    }
}

/// Badge layout: three text lines above the bars, short code underneath
fn render_badge(
    modules: &[bool],
    library_name: &str,
    client_name: &str,
    issued: &str,
    short_code: &str,
) -> String {
    let bar_height = 80u32;
    let header_height = 96u32;
    let caption_height = 24u32;
    let margin = 20u32;
    let bars_width = modules.len() as u32 * 2;
    let width = bars_width + 2 * margin;
    let height = header_height + bar_height + caption_height;

    let rects = barcode::modules_to_rects(modules, margin, header_height, bar_height);

    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" ",
            "viewBox=\"0 0 {w} {h}\">",
            "<rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>",
            "<text x=\"{cx}\" y=\"28\" text-anchor=\"middle\" ",
            "font-family=\"sans-serif\" font-size=\"20\" font-weight=\"bold\">{library}</text>",
            "<text x=\"{cx}\" y=\"56\" text-anchor=\"middle\" ",
            "font-family=\"sans-serif\" font-size=\"16\">{name}</text>",
            "<text x=\"{cx}\" y=\"80\" text-anchor=\"middle\" ",
            "font-family=\"sans-serif\" font-size=\"12\">{issued}</text>",
            "<g fill=\"black\">{rects}</g>",
            "<text x=\"{cx}\" y=\"{code_y}\" text-anchor=\"middle\" ",
            "font-family=\"monospace\" font-size=\"12\">{code}</text>",
            "</svg>"
        ),
        w = width,
        h = height,
        cx = width / 2,
        library = xml_escape(library_name),
        name = xml_escape(client_name),
        issued = issued,
        rects = rects,
        code_y = header_height + bar_height + 16,
        code = short_code,
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_contains_all_text_fields() {
        let svg = render_badge(&[true, false, true], "Librarie", "Ada Popescu", "2026-08-25", "ABC");
        assert!(svg.contains(">Librarie</text>"));
        assert!(svg.contains(">Ada Popescu</text>"));
        assert!(svg.contains(">2026-08-25</text>"));
        assert!(svg.contains(">ABC</text>"));
    }

    #[test]
    fn badge_escapes_markup_in_names() {
        let svg = render_badge(&[true], "A & B", "<x>", "2026-01-01", "C");
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("&lt;x&gt;"));
    }
}
