//! `.docx` package writer
//!
//! ```text
//! Document -> document.xml / rels / core props (quick-xml) -> zip package
//! ```

use std::io::{Cursor, Write};

use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::model::{
    BodyItem, Document, Hyperlink, Inline, NativeCell, NativeTable, Paragraph, Run, VMerge,
    NORMAL_STYLE,
};
use super::styles::{
    style_id, text_width, CONTENT_TYPES_XML, NS_PKG_RELS, NS_R, NS_W, NUMBERING_XML,
    PACKAGE_RELS_XML, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH, REL_HYPERLINK, REL_NUMBERING,
    REL_STYLES, STYLES_XML,
};
use crate::utils::error::TableResult;

/// Thin event helper over a quick-xml writer
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> TableResult<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;
        Ok(XmlOut { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> TableResult<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(elem))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> TableResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> TableResult<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> TableResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Serialize a document into `.docx` bytes
pub fn write_docx(doc: &Document) -> TableResult<Vec<u8>> {
    let document_xml = document_xml(doc)?;
    let rels_xml = document_rels_xml(doc)?;
    let core_xml = core_properties_xml(doc)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("docProps/core.xml", &core_xml),
        ("word/document.xml", &document_xml),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/numbering.xml", NUMBERING_XML.as_bytes()),
        ("word/_rels/document.xml.rels", &rels_xml),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }

    let cursor = zip.finish()?;
    log::debug!(
        "wrote docx package: {} table(s), {} hyperlink(s)",
        doc.tables().count(),
        doc.relationships.len()
    );
    Ok(cursor.into_inner())
}

/// Build `word/document.xml`
pub fn document_xml(doc: &Document) -> TableResult<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.start("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
    out.start("w:body", &[])?;

    for item in &doc.body.items {
        match item {
            BodyItem::Paragraph(p) => write_paragraph(&mut out, p)?,
            BodyItem::Table(t) => write_table(&mut out, t, doc.landscape)?,
        }
    }
    // Word expects a paragraph between a trailing table and the section
    if matches!(doc.body.items.last(), Some(BodyItem::Table(_))) {
        out.empty("w:p", &[])?;
    }

    write_section(&mut out, doc.landscape)?;
    out.end("w:body")?;
    out.end("w:document")?;
    Ok(out.finish())
}

fn write_section(out: &mut XmlOut, landscape: bool) -> TableResult<()> {
    let (width, height) = if landscape {
        (PAGE_HEIGHT, PAGE_WIDTH)
    } else {
        (PAGE_WIDTH, PAGE_HEIGHT)
    };
    let width = width.to_string();
    let height = height.to_string();
    let margin = PAGE_MARGIN.to_string();

    out.start("w:sectPr", &[])?;
    let mut size = vec![("w:w", width.as_str()), ("w:h", height.as_str())];
    if landscape {
        size.push(("w:orient", "landscape"));
    }
    out.empty("w:pgSz", &size)?;
    out.empty(
        "w:pgMar",
        &[
            ("w:top", margin.as_str()),
            ("w:right", margin.as_str()),
            ("w:bottom", margin.as_str()),
            ("w:left", margin.as_str()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    out.end("w:sectPr")
}

fn write_paragraph(out: &mut XmlOut, p: &Paragraph) -> TableResult<()> {
    out.start("w:p", &[])?;

    let styled = p.style != NORMAL_STYLE;
    if styled || p.alignment.is_some() {
        out.start("w:pPr", &[])?;
        if styled {
            let id = style_id(&p.style);
            out.empty("w:pStyle", &[("w:val", id.as_str())])?;
        }
        if let Some(align) = p.alignment {
            out.empty("w:jc", &[("w:val", align.to_ooxml())])?;
        }
        out.end("w:pPr")?;
    }

    for inline in &p.content {
        match inline {
            Inline::Run(run) => write_run(out, run)?,
            Inline::Hyperlink(link) => write_hyperlink(out, link)?,
        }
    }

    out.end("w:p")
}

fn write_hyperlink(out: &mut XmlOut, link: &Hyperlink) -> TableResult<()> {
    out.start(
        "w:hyperlink",
        &[("r:id", link.rel_id.as_str()), ("w:history", "1")],
    )?;
    for run in &link.runs {
        write_run(out, run)?;
    }
    out.end("w:hyperlink")
}

fn write_run(out: &mut XmlOut, run: &Run) -> TableResult<()> {
    out.start("w:r", &[])?;

    // Child order follows the CT_RPr sequence: b, i, color, u
    if !run.is_plain() {
        out.start("w:rPr", &[])?;
        if run.bold {
            out.empty("w:b", &[])?;
        }
        if run.italic {
            out.empty("w:i", &[])?;
        }
        if let Some(ref color) = run.color {
            let mut attrs = vec![("w:val", color.hex.as_str())];
            if let Some(theme) = color.theme {
                attrs.push(("w:themeColor", theme));
            }
            out.empty("w:color", &attrs)?;
        }
        if run.underline {
            out.empty("w:u", &[("w:val", "single")])?;
        }
        out.end("w:rPr")?;
    }

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            out.empty("w:br", &[])?;
        }
        if !line.is_empty() {
            out.start("w:t", &[("xml:space", "preserve")])?;
            out.text(line)?;
            out.end("w:t")?;
        }
    }

    out.end("w:r")
}

/// Resolve grid column widths, spreading the text width evenly when the
/// table does not specify any
fn grid_widths(table: &NativeTable, landscape: bool) -> Vec<u32> {
    match table.column_widths {
        Some(ref widths) if widths.len() == table.columns => widths.clone(),
        _ => {
            let columns = table.columns.max(1) as u32;
            vec![text_width(landscape) / columns; table.columns]
        }
    }
}

fn write_table(out: &mut XmlOut, table: &NativeTable, landscape: bool) -> TableResult<()> {
    let widths = grid_widths(table, landscape);

    out.start("w:tbl", &[])?;
    out.start("w:tblPr", &[])?;
    let style = style_id(&table.style);
    out.empty("w:tblStyle", &[("w:val", style.as_str())])?;
    out.empty("w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    out.empty("w:tblLayout", &[("w:type", "fixed")])?;
    out.empty("w:tblLook", &[("w:val", "04A0")])?;
    out.end("w:tblPr")?;

    out.start("w:tblGrid", &[])?;
    for width in &widths {
        let width = width.to_string();
        out.empty("w:gridCol", &[("w:w", width.as_str())])?;
    }
    out.end("w:tblGrid")?;

    for row in &table.rows {
        out.start("w:tr", &[])?;
        for (column, cell) in row.iter().enumerate() {
            if cell.covered {
                continue;
            }
            let end = (column + cell.grid_span).min(widths.len());
            let width: u32 = widths[column.min(end)..end].iter().sum();
            write_cell(out, cell, width)?;
        }
        out.end("w:tr")?;
    }

    out.end("w:tbl")
}

fn write_cell(out: &mut XmlOut, cell: &NativeCell, width: u32) -> TableResult<()> {
    out.start("w:tc", &[])?;

    // Child order follows the CT_TcPr sequence: tcW, gridSpan, vMerge, shd
    out.start("w:tcPr", &[])?;
    let width = width.to_string();
    out.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
    if cell.grid_span > 1 {
        let span = cell.grid_span.to_string();
        out.empty("w:gridSpan", &[("w:val", span.as_str())])?;
    }
    match cell.v_merge {
        Some(VMerge::Restart) => out.empty("w:vMerge", &[("w:val", "restart")])?,
        Some(VMerge::Continue) => out.empty("w:vMerge", &[])?,
        None => {}
    }
    if let Some(ref shade) = cell.shade {
        out.empty(
            "w:shd",
            &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", shade.as_str())],
        )?;
    }
    out.end("w:tcPr")?;

    // Every cell must hold at least one paragraph
    if cell.paragraphs.is_empty() {
        out.empty("w:p", &[])?;
    }
    for p in &cell.paragraphs {
        write_paragraph(out, p)?;
    }

    out.end("w:tc")
}

/// Build `word/_rels/document.xml.rels`
pub fn document_rels_xml(doc: &Document) -> TableResult<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    out.empty(
        "Relationship",
        &[("Id", "rId1"), ("Type", REL_STYLES), ("Target", "styles.xml")],
    )?;
    out.empty(
        "Relationship",
        &[
            ("Id", "rId2"),
            ("Type", REL_NUMBERING),
            ("Target", "numbering.xml"),
        ],
    )?;
    for (id, target) in doc.relationships.hyperlinks() {
        out.empty(
            "Relationship",
            &[
                ("Id", id),
                ("Type", REL_HYPERLINK),
                ("Target", target),
                ("TargetMode", "External"),
            ],
        )?;
    }
    out.end("Relationships")?;
    Ok(out.finish())
}

/// Build `docProps/core.xml`
fn core_properties_xml(doc: &Document) -> TableResult<Vec<u8>> {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let mut out = XmlOut::new()?;
    out.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(ref title) = doc.title {
        out.start("dc:title", &[])?;
        out.text(title)?;
        out.end("dc:title")?;
    }
    out.start("dc:creator", &[])?;
    out.text("HAWC")?;
    out.end("dc:creator")?;
    for name in ["dcterms:created", "dcterms:modified"] {
        out.start(name, &[("xsi:type", "dcterms:W3CDTF")])?;
        out.text(&now)?;
        out.end(name)?;
    }
    out.end("cp:coreProperties")?;
    Ok(out.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::model::{Alignment, BlockContainer};
    use std::io::Read;

    fn xml(doc: &Document) -> String {
        String::from_utf8(document_xml(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_paragraph_styles_and_runs() {
        let mut doc = Document::new();
        doc.add_paragraph("Title", "Heading 1");
        let p = doc.add_paragraph("", NORMAL_STYLE);
        p.alignment = Some(Alignment::Center);
        let run = p.add_run("bold & italic");
        run.bold = true;
        run.italic = true;

        let out = xml(&doc);
        assert!(out.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(out.contains("<w:jc w:val=\"center\"/>"));
        assert!(out.contains("<w:rPr><w:b/><w:i/></w:rPr>"));
        assert!(out.contains("bold &amp; italic"));
        assert!(!out.contains("w:orient"));
    }

    #[test]
    fn test_merged_table_cells() {
        let mut doc = Document::new();
        let table = doc.body.add_table(2, 2);
        table.merge((0, 0), (0, 1)).unwrap().shade = Some("EEEEEE".to_string());
        table
            .merge((1, 0), (1, 0))
            .unwrap()
            .add_paragraph(NORMAL_STYLE)
            .add_run("x");

        let out = xml(&doc);
        assert!(out.contains("<w:gridSpan w:val=\"2\"/>"));
        assert!(out.contains("w:fill=\"EEEEEE\""));
        assert_eq!(out.matches("<w:tc>").count(), 3);
        // trailing paragraph after the table
        assert!(out.contains("</w:tbl><w:p/><w:sectPr>"));
    }

    #[test]
    fn test_vertical_merge_markers() {
        let mut doc = Document::new();
        let table = doc.body.add_table(2, 1);
        table.merge((0, 0), (1, 0));
        let out = xml(&doc);
        assert!(out.contains("<w:vMerge w:val=\"restart\"/>"));
        assert!(out.contains("<w:vMerge/>"));
    }

    #[test]
    fn test_landscape_section() {
        let mut doc = Document::new();
        doc.landscape = true;
        let out = xml(&doc);
        assert!(out.contains("w:orient=\"landscape\""));
        assert!(out.contains("w:w=\"15840\""));
    }

    #[test]
    fn test_hyperlink_relationships() {
        let mut doc = Document::new();
        let id = doc.relationships.add_hyperlink("https://a.com/?x=1&y=2");
        let rels = String::from_utf8(document_rels_xml(&doc).unwrap()).unwrap();
        assert_eq!(id, "rId3");
        assert!(rels.contains("Id=\"rId3\""));
        assert!(rels.contains("TargetMode=\"External\""));
        assert!(rels.contains("x=1&amp;y=2"));
    }

    #[test]
    fn test_package_contains_all_parts() {
        let mut doc = Document::new();
        doc.title = Some("Report".to_string());
        doc.add_paragraph("hello", NORMAL_STYLE);
        let bytes = doc.to_bytes().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }

        let mut body = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert!(body.contains(">hello</w:t>"));

        let mut core = String::new();
        archive
            .by_name("docProps/core.xml")
            .unwrap()
            .read_to_string(&mut core)
            .unwrap();
        assert!(core.contains("<dc:title>Report</dc:title>"));
    }
}
