#![allow(dead_code)]

use deck_core::BuildConfig;
use deck_pptx::fixtures::{LayoutSpec, TemplateBuilder};
use deck_pptx::package::Package;
use deck_xlsx::fixtures::WorkbookBuilder;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory with a template, a workbook and photos.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Template with a title layout and the student layout
    /// (photo 10, name 11, usn 12, footer 13).
    pub fn template(&self) -> PathBuf {
        let path = self.path("template.pptx");
        student_template().write_to(&path).unwrap();
        path
    }

    /// The student template with layout part `slideLayout{number}.xml`
    /// replaced by XML whose shape tree is never closed.
    pub fn template_with_broken_layout(&self, number: usize, name: &str) -> PathBuf {
        let mut package = Package::from_reader(Cursor::new(student_template().build())).unwrap();
        package.set_part(
            format!("ppt/slideLayouts/slideLayout{}.xml", number),
            format!(
                r#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="{}"><p:spTree><p:sp></p:cSld></p:sldLayout>"#,
                name
            )
            .into_bytes(),
        );
        let path = self.path("template.pptx");
        std::fs::write(&path, package.to_bytes().unwrap()).unwrap();
        path
    }

    /// Workbook with the given header and rows.
    pub fn workbook(&self, headers: &[&str], rows: &[&[&str]]) -> PathBuf {
        let path = self.path("students.xlsx");
        rows.iter()
            .fold(WorkbookBuilder::new(headers), |builder, row| builder.row(row))
            .write_to(&path)
            .unwrap();
        path
    }

    /// Write a solid-colour PNG photo.
    pub fn photo(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(name);
        image::RgbImage::from_pixel(width, height, image::Rgb([40, 90, 200]))
            .save(&path)
            .unwrap();
        path
    }

    /// Configuration pointing at this workspace, with the stock indices.
    pub fn config(&self, template: &Path, spreadsheet: &Path) -> BuildConfig {
        BuildConfig {
            template_path: template.to_path_buf(),
            spreadsheet_path: spreadsheet.to_path_buf(),
            output_path: self.path("out.pptx"),
            ..BuildConfig::default()
        }
    }
}

pub fn student_template() -> TemplateBuilder {
    TemplateBuilder::new()
        .layout(LayoutSpec::new("Title Slide").title().body(1, "Subtitle 2"))
        .layout(
            LayoutSpec::new("StudentLayout")
                .picture(10, "Photo Placeholder", 3_000_000, 4_000_000)
                .body(11, "Name Placeholder")
                .body(12, "USN Placeholder")
                .footer(13),
        )
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
