//! OPC package assembly.
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use chrono::Utc;
use rayon::prelude::*;
use tempfile::NamedTempFile;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::common::pt_to_emu;
use crate::design::ColorPalette;
use crate::error::{Error, Result};

use super::slide::SlidePart;
use super::template;

/// Decks with fewer slides serialise sequentially.
const PARALLEL_THRESHOLD: usize = 4;

/// Everything needed to write one `.pptx` file.
pub(crate) struct Package<'a> {
    pub title: &'a str,
    pub theme_name: &'a str,
    pub width: f64,
    pub height: f64,
    pub palette: &'a ColorPalette,
    pub slides: &'a [SlidePart],
}

impl Package<'_> {
    /// Write the package to `path`. A failed write leaves `path` as it was.
    pub(crate) fn write_to(&self, path: &Path) -> Result<()> {
        write_atomically(path, |file| self.write(file).map(drop))
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let slide_xml = self.serialize_slides()?;
        let count = slide_xml.len();
        let notes: Vec<usize> = self
            .slides
            .iter()
            .enumerate()
            .filter(|(_, slide)| slide.notes().is_some())
            .map(|(i, _)| i + 1)
            .collect();
        let with_notes = !notes.is_empty();

        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        add_part(&mut zip, "[Content_Types].xml", &template::content_types_xml(count, &notes)?, options)?;
        add_part(&mut zip, "_rels/.rels", &template::root_rels_xml()?, options)?;
        add_part(
            &mut zip,
            "docProps/core.xml",
            &template::core_props_xml(self.title, Utc::now())?,
            options,
        )?;
        add_part(&mut zip, "docProps/app.xml", &template::app_props_xml(count)?, options)?;
        add_part(
            &mut zip,
            "ppt/presentation.xml",
            &template::presentation_xml(count, with_notes, pt_to_emu(self.width), pt_to_emu(self.height))?,
            options,
        )?;
        add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &template::presentation_rels_xml(count, with_notes)?,
            options,
        )?;
        add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &template::slide_master_xml()?, options)?;
        add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &template::master_rels_xml()?,
            options,
        )?;
        add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &template::blank_layout_xml()?, options)?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &template::layout_rels_xml()?,
            options,
        )?;
        add_part(
            &mut zip,
            "ppt/theme/theme1.xml",
            &template::theme_xml(self.theme_name, self.palette)?,
            options,
        )?;

        if with_notes {
            add_part(&mut zip, "ppt/notesMasters/notesMaster1.xml", &template::notes_master_xml()?, options)?;
            add_part(
                &mut zip,
                "ppt/notesMasters/_rels/notesMaster1.xml.rels",
                &template::notes_master_rels_xml()?,
                options,
            )?;
            add_part(
                &mut zip,
                "ppt/theme/theme2.xml",
                &template::theme_xml(self.theme_name, self.palette)?,
                options,
            )?;
        }

        for (i, (xml, slide)) in slide_xml.iter().zip(self.slides).enumerate() {
            let n = i + 1;
            add_part(&mut zip, &format!("ppt/slides/slide{n}.xml"), xml, options)?;
            let rels = template::slide_rels_xml(slide.notes().map(|_| n))?;
            add_part(&mut zip, &format!("ppt/slides/_rels/slide{n}.xml.rels"), &rels, options)?;
            if let Some(text) = slide.notes() {
                add_part(
                    &mut zip,
                    &format!("ppt/notesSlides/notesSlide{n}.xml"),
                    &template::notes_slide_xml(text)?,
                    options,
                )?;
                add_part(
                    &mut zip,
                    &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                    &template::notes_slide_rels_xml(n)?,
                    options,
                )?;
            }
        }

        zip.finish().map_err(|e| Error::Zip(e.to_string()))
    }

    fn serialize_slides(&self) -> Result<Vec<String>> {
        if self.slides.len() >= PARALLEL_THRESHOLD {
            self.slides.par_iter().map(SlidePart::to_xml).collect()
        } else {
            self.slides.iter().map(SlidePart::to_xml).collect()
        }
    }
}

/// Fill a temporary file next to `path`, then move it over `path`.
///
/// The temporary file is removed when `fill` fails.
fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    fill(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

fn add_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::Zip(format!("failed to start {name}: {e}")))?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    use crate::design::{DesignTheme, RgbColor, palette_for};
    use crate::render::{Fill, SlideFrame};

    fn read(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    fn names(bytes: Vec<u8>) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_package_parts() {
        let palette = palette_for(DesignTheme::CorporateModern).unwrap();
        let slides: Vec<SlidePart> = (0..5)
            .map(|_| SlidePart::from_frame(&SlideFrame::new(Fill::Solid(RgbColor::WHITE))))
            .collect();
        let package = Package {
            title: "Deck",
            theme_name: "Corporate Modern",
            width: 960.0,
            height: 540.0,
            palette: &palette,
            slides: &slides,
        };
        let cursor = package.write(Cursor::new(Vec::new())).unwrap();
        let names = names(cursor.into_inner());

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide5.xml",
            "ppt/slides/_rels/slide5.xml.rels",
        ] {
            assert!(names.iter().any(|n| n == part), "missing {part}");
        }
        assert_eq!(names.iter().filter(|n| n.ends_with(".xml") && n.starts_with("ppt/slides/slide")).count(), 5);
    }

    #[test]
    fn test_slide_size_in_emu() {
        let palette = palette_for(DesignTheme::CorporateModern).unwrap();
        let package = Package {
            title: "Deck",
            theme_name: "Corporate Modern",
            width: 960.0,
            height: 540.0,
            palette: &palette,
            slides: &[],
        };
        let cursor = package.write(Cursor::new(Vec::new())).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/presentation.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    }

    #[test]
    fn test_notes_parts_only_for_annotated_slides() {
        let palette = palette_for(DesignTheme::CorporateModern).unwrap();
        let mut annotated = SlideFrame::new(Fill::Solid(RgbColor::WHITE));
        annotated.notes = Some("Introduce the team\nHand over to Q&A".to_string());
        let slides = vec![
            SlidePart::from_frame(&SlideFrame::new(Fill::Solid(RgbColor::WHITE))),
            SlidePart::from_frame(&annotated),
        ];
        let package = Package {
            title: "Deck",
            theme_name: "Corporate Modern",
            width: 960.0,
            height: 540.0,
            palette: &palette,
            slides: &slides,
        };
        let bytes = package.write(Cursor::new(Vec::new())).unwrap().into_inner();
        let names = names(bytes.clone());

        assert!(names.iter().any(|n| n == "ppt/notesMasters/notesMaster1.xml"));
        assert!(names.iter().any(|n| n == "ppt/theme/theme2.xml"));
        assert!(names.iter().any(|n| n == "ppt/notesSlides/notesSlide2.xml"));
        assert!(!names.iter().any(|n| n == "ppt/notesSlides/notesSlide1.xml"));

        let notes = read(&bytes, "ppt/notesSlides/notesSlide2.xml");
        assert!(notes.contains("<a:t>Introduce the team</a:t>"));
        assert!(notes.contains("<a:t>Hand over to Q&amp;A</a:t>"));
        assert!(read(&bytes, "ppt/slides/_rels/slide2.xml.rels").contains("../notesSlides/notesSlide2.xml"));
        assert!(!read(&bytes, "ppt/slides/_rels/slide1.xml.rels").contains("notesSlide"));
        assert!(read(&bytes, "ppt/presentation.xml").contains("<p:notesMasterIdLst>"));
    }

    #[test]
    fn test_no_notes_master_without_notes() {
        let palette = palette_for(DesignTheme::CorporateModern).unwrap();
        let slides = vec![SlidePart::from_frame(&SlideFrame::new(Fill::Solid(RgbColor::WHITE)))];
        let package = Package {
            title: "Deck",
            theme_name: "Corporate Modern",
            width: 960.0,
            height: 540.0,
            palette: &palette,
            slides: &slides,
        };
        let names = names(package.write(Cursor::new(Vec::new())).unwrap().into_inner());
        assert!(!names.iter().any(|n| n.contains("notes")));
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let err = write_atomically(&path, |file| {
            file.write_all(b"PK partial")?;
            Err(Error::Zip("disk full".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Zip(_)));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"previous deck").unwrap();
        write_atomically(&path, |_| Err(Error::Zip("disk full".to_string()))).unwrap_err();
        assert_eq!(std::fs::read(&path).unwrap(), b"previous deck");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        write_atomically(&path, |file| Ok(file.write_all(b"new deck")?)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new deck");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
