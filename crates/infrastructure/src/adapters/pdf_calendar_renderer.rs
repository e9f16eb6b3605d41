//! PDF calendar renderer - Implements CalendarRendererPort using printpdf
//!
//! Produces a single US Letter page: a title, the icon legend and a
//! Sunday-first month grid. Each day cell shows the day number and, stacked
//! below it, a fire icon when heating was on and a snowflake icon when
//! cooling was on.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::CalendarRendererPort;
use domain::{CalendarCell, CalendarGrid, ClassificationTable, DAYS_PER_WEEK, DayClassification};
use image::{DynamicImage, Rgb, RgbImage};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, instrument};

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;

const TITLE_SIZE_PT: f32 = 18.0;
const BODY_SIZE_PT: f32 = 12.0;
const DAY_NUMBER_SIZE_PT: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 7.0;

const HEADER_ROW_HEIGHT_MM: f32 = 8.0;
const DAY_ROW_HEIGHT_MM: f32 = 26.0;
const CELL_PADDING_MM: f32 = 1.5;
/// Icons are drawn at 30% of the column width
const ICON_WIDTH_RATIO: f32 = 0.3;
const GRID_LINE_THICKNESS_PT: f32 = 0.75;

const PT_TO_MM: f32 = 0.352_778;
/// Average Times glyph width as a fraction of the font size
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

const FIRE_LEGEND: &str = "The fire symbol indicates the heater was turned on at least once during the day.";
const SNOWFLAKE_LEGEND: &str =
    "The snowflake symbol indicates the air conditioning was turned on at least once during the day.";

/// Errors raised while producing the calendar document
#[derive(Debug, Error)]
pub enum RenderError {
    /// An icon could not be read or decoded
    #[error("Failed to load icon {}: {source}", .path.display())]
    Asset {
        /// Path of the icon
        path: PathBuf,
        /// Decoder or I/O failure
        #[source]
        source: image::ImageError,
    },

    /// The output file or its directory could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The PDF library rejected the document
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl From<RenderError> for ApplicationError {
    fn from(err: RenderError) -> Self {
        Self::Render(err.to_string())
    }
}

/// Document settings for the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRenderConfig {
    /// Where the PDF is written
    pub output_path: PathBuf,
    /// Title metadata and heading prefix
    pub title: String,
    /// Subject metadata
    pub subject: String,
    /// Author metadata
    pub author: String,
    /// Creator metadata
    pub creator: String,
    /// Icon for heating days
    pub fire_icon: PathBuf,
    /// Icon for cooling days
    pub snowflake_icon: PathBuf,
}

/// Writes the heating and cooling calendar as a one-page PDF
#[derive(Debug, Clone)]
pub struct PdfCalendarRenderer {
    config: CalendarRenderConfig,
}

/// Icons decoded for one render
struct Icons {
    fire: DynamicImage,
    snowflake: DynamicImage,
}

/// Fonts registered with one document
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfCalendarRenderer {
    /// Create a renderer with the given settings
    #[must_use]
    pub const fn new(config: CalendarRenderConfig) -> Self {
        Self { config }
    }

    /// Render `table` and write it to the configured path
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if an icon cannot be loaded, the document cannot
    /// be built, or the file cannot be written.
    #[instrument(skip(self, table), fields(output = %self.config.output_path.display()))]
    pub fn write_calendar(&self, table: &ClassificationTable) -> Result<PathBuf, RenderError> {
        let icons = Icons {
            fire: load_icon(&self.config.fire_icon)?,
            snowflake: load_icon(&self.config.snowflake_icon)?,
        };
        let grid = CalendarGrid::from_table(table);

        let (doc, page, layer) = PdfDocument::new(
            self.config.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Calendar",
        );
        let doc = doc
            .with_subject(self.config.subject.as_str())
            .with_author(self.config.author.as_str())
            .with_creator(self.config.creator.as_str());

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::TimesRoman)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::TimesBold)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
        };
        let layer = doc.get_page(page).get_layer(layer);

        let grid_top = self.draw_heading(&layer, &fonts, grid.title());
        draw_grid(&layer, &fonts, &icons, &grid, grid_top);

        let path = &self.config.output_path;
        save_replacing(doc, path)?;

        info!(
            rows = grid.row_count(),
            heating_days = table.heating_days(),
            cooling_days = table.cooling_days(),
            "Calendar written"
        );
        Ok(path.clone())
    }

    /// Title, legend and spacing; returns the y position of the grid top
    fn draw_heading(&self, layer: &PdfLayerReference, fonts: &Fonts, label: &str) -> f32 {
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - TITLE_SIZE_PT * PT_TO_MM;
        layer.use_text(
            format!("{} {label}", self.config.title),
            TITLE_SIZE_PT,
            Mm(MARGIN_MM),
            Mm(y),
            &fonts.bold,
        );

        // Two blank lines before the legend
        y -= LINE_HEIGHT_MM * 3.0;
        layer.use_text("Legend", BODY_SIZE_PT, Mm(MARGIN_MM), Mm(y), &fonts.bold);
        for line in [FIRE_LEGEND, SNOWFLAKE_LEGEND] {
            y -= LINE_HEIGHT_MM;
            layer.use_text(line, BODY_SIZE_PT, Mm(MARGIN_MM), Mm(y), &fonts.regular);
        }

        // One blank line before the grid
        y - LINE_HEIGHT_MM * 2.0
    }
}

impl CalendarRendererPort for PdfCalendarRenderer {
    fn render(&self, table: &ClassificationTable) -> Result<PathBuf, ApplicationError> {
        Ok(self.write_calendar(table)?)
    }
}

/// Save `doc` next to `path` and move it into place once complete
///
/// An existing file at `path` is only replaced by a fully written document.
fn save_replacing(doc: PdfDocumentReference, path: &Path) -> Result<(), RenderError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| RenderError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
            parent
        },
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|source| RenderError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(staged.as_file_mut());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    writer.into_inner().map_err(|e| RenderError::Write {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;

    staged.persist(path).map_err(|e| RenderError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    debug!(path = %path.display(), "Replaced output file");
    Ok(())
}

/// Column width when the grid spans the printable width
fn column_width() -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let columns = DAYS_PER_WEEK as f32;
    (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / columns
}

/// Rough width of `text` in millimetres, used for centering
#[allow(clippy::cast_precision_loss)]
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVERAGE_GLYPH_WIDTH * PT_TO_MM
}

#[allow(clippy::cast_precision_loss)]
fn draw_grid(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    icons: &Icons,
    grid: &CalendarGrid,
    top: f32,
) {
    let col_width = column_width();
    let left = MARGIN_MM;
    let right = left + col_width * DAYS_PER_WEEK as f32;
    let body_top = top - HEADER_ROW_HEIGHT_MM;
    let bottom = body_top - DAY_ROW_HEIGHT_MM * grid.row_count() as f32;

    layer.set_outline_thickness(GRID_LINE_THICKNESS_PT);

    // Horizontal rules: grid top, below the header, then below each week
    let mut rules = vec![top, body_top];
    rules.extend((1..=grid.row_count()).map(|row| body_top - DAY_ROW_HEIGHT_MM * row as f32));
    for y in rules {
        layer.add_line(segment((left, y), (right, y)));
    }
    for col in 0..=DAYS_PER_WEEK {
        let x = left + col_width * col as f32;
        layer.add_line(segment((x, top), (x, bottom)));
    }

    for (col, header) in grid.headers().iter().enumerate() {
        let center = left + col_width * (col as f32 + 0.5);
        layer.use_text(
            *header,
            BODY_SIZE_PT,
            Mm(center - text_width_mm(header, BODY_SIZE_PT) / 2.0),
            Mm(top - HEADER_ROW_HEIGHT_MM + 2.5),
            &fonts.bold,
        );
    }

    for (row, week) in grid.rows().enumerate() {
        let cell_top = body_top - DAY_ROW_HEIGHT_MM * row as f32;
        for (col, cell) in week.iter().enumerate() {
            if let CalendarCell::Day {
                day,
                classification,
            } = cell
            {
                let cell_left = left + col_width * col as f32;
                draw_day(
                    layer,
                    fonts,
                    icons,
                    (cell_left, cell_top),
                    *day,
                    *classification,
                );
            }
        }
    }
}

fn draw_day(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    icons: &Icons,
    (cell_left, cell_top): (f32, f32),
    day: u32,
    classification: DayClassification,
) {
    let x = cell_left + CELL_PADDING_MM;
    let mut y = cell_top - CELL_PADDING_MM - DAY_NUMBER_SIZE_PT * PT_TO_MM;
    layer.use_text(
        day.to_string(),
        DAY_NUMBER_SIZE_PT,
        Mm(x),
        Mm(y),
        &fonts.regular,
    );

    let icon_width = column_width() * ICON_WIDTH_RATIO;
    y -= CELL_PADDING_MM;
    let active = [
        (classification.heat_on, &icons.fire),
        (classification.cooling_on, &icons.snowflake),
    ];
    for (_, icon) in active.into_iter().filter(|(on, _)| *on) {
        let height = icon_height_mm(icon, icon_width);
        y -= height;
        place_icon(layer, icon, x, y, icon_width);
        y -= CELL_PADDING_MM;
    }
}

/// Height an icon takes up when scaled to `width_mm`
#[allow(clippy::cast_precision_loss)]
fn icon_height_mm(icon: &DynamicImage, width_mm: f32) -> f32 {
    if icon.width() == 0 {
        return 0.0;
    }
    width_mm * icon.height() as f32 / icon.width() as f32
}

/// Draw `icon` with its bottom-left corner at (`x`, `y`), `width_mm` wide
#[allow(clippy::cast_precision_loss)]
fn place_icon(layer: &PdfLayerReference, icon: &DynamicImage, x: f32, y: f32, width_mm: f32) {
    let dpi = icon.width() as f32 * 25.4 / width_mm;
    Image::from_dynamic_image(icon).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

/// Read and decode an icon, flattening transparency onto white
fn load_icon(path: &Path) -> Result<DynamicImage, RenderError> {
    let image = image::open(path).map_err(|source| RenderError::Asset {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded icon"
    );
    Ok(flatten_onto_white(&image))
}

fn flatten_onto_white(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        #[allow(clippy::cast_possible_truncation)]
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    DynamicImage::ImageRgb8(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::DateRange;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_icon(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(8, 8, Rgba([200, 40, 10, 128]))
            .save(&path)
            .unwrap();
        path
    }

    fn config(dir: &Path) -> CalendarRenderConfig {
        CalendarRenderConfig {
            output_path: dir.join("reports").join("Heating-Cooling.pdf"),
            title: "Heating and Cooling Data".to_string(),
            subject: "Work Sample Test".to_string(),
            author: "HeatCal".to_string(),
            creator: "HeatCal".to_string(),
            fire_icon: write_icon(dir, "fire.png"),
            snowflake_icon: write_icon(dir, "snowflake.png"),
        }
    }

    /// Number of image XObjects in a saved document
    fn image_count(bytes: &[u8]) -> usize {
        const SUBTYPE: &[u8] = b"/Subtype";
        (0..bytes.len())
            .filter(|&i| bytes[i..].starts_with(SUBTYPE))
            .filter(|&i| {
                let rest = &bytes[i + SUBTYPE.len()..];
                let skip = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
                rest[skip..].starts_with(b"/Image")
            })
            .count()
    }

    fn contains(bytes: &[u8], needle: &str) -> bool {
        bytes.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    fn june_table() -> ClassificationTable {
        let days = (1..=30)
            .map(|day| DayClassification {
                heat_on: day % 2 == 0,
                cooling_on: day % 3 == 0,
            })
            .collect();
        ClassificationTable::from_days(DateRange::june_2016(), days).unwrap()
    }

    #[test]
    fn writes_pdf_and_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let renderer = PdfCalendarRenderer::new(config(dir.path()));

        let path = renderer.write_calendar(&june_table()).unwrap();

        assert_eq!(path, dir.path().join("reports").join("Heating-Cooling.pdf"));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(config.output_path.parent().unwrap()).unwrap();
        fs::write(&config.output_path, b"stale").unwrap();

        let renderer = PdfCalendarRenderer::new(config);
        let path = renderer.write_calendar(&june_table()).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn renders_range_starting_on_sunday() {
        let dir = TempDir::new().unwrap();
        let renderer = PdfCalendarRenderer::new(config(dir.path()));
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2016, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2016, 5, 7).unwrap(),
        )
        .unwrap();
        let table =
            ClassificationTable::from_days(range, vec![DayClassification::INACTIVE; 7]).unwrap();

        let path = renderer.write_calendar(&table).unwrap();

        // Inactive days show only their number
        assert_eq!(image_count(&fs::read(path).unwrap()), 0);
    }

    #[test]
    fn draws_one_icon_per_active_system() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.subject = "June cooling audit".to_string();
        config.author = "Facilities".to_string();
        let renderer = PdfCalendarRenderer::new(config);

        let mut days = vec![DayClassification::INACTIVE; 30];
        days[0] = DayClassification {
            heat_on: false,
            cooling_on: true,
        };
        days[1] = DayClassification {
            heat_on: true,
            cooling_on: true,
        };
        let table = ClassificationTable::from_days(DateRange::june_2016(), days).unwrap();

        let bytes = fs::read(renderer.write_calendar(&table).unwrap()).unwrap();

        // Snowflake on the 1st, fire and snowflake on the 2nd
        assert_eq!(table.heating_days() + table.cooling_days(), 3);
        assert_eq!(image_count(&bytes), 3);
        assert!(contains(&bytes, "June cooling audit"));
        assert!(contains(&bytes, "Facilities"));
    }

    #[test]
    fn icon_count_follows_classification() {
        let dir = TempDir::new().unwrap();
        let renderer = PdfCalendarRenderer::new(config(dir.path()));
        let table = june_table();

        let bytes = fs::read(renderer.write_calendar(&table).unwrap()).unwrap();

        assert_eq!(
            image_count(&bytes),
            table.heating_days() + table.cooling_days()
        );
        assert!(contains(&bytes, "Work Sample Test"));
    }

    #[test]
    fn failed_replace_leaves_no_staged_file() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        // A non-empty directory cannot be replaced by the finished document
        fs::create_dir_all(&config.output_path).unwrap();
        fs::write(config.output_path.join("keep.txt"), b"keep").unwrap();
        let reports = config.output_path.parent().unwrap().to_path_buf();
        let renderer = PdfCalendarRenderer::new(config);

        let result = renderer.write_calendar(&june_table());

        assert!(matches!(result, Err(RenderError::Write { .. })));
        let entries: Vec<_> = fs::read_dir(&reports)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("Heating-Cooling.pdf")]);
    }

    #[test]
    fn missing_icon_is_asset_error() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.fire_icon = dir.path().join("missing.png");
        let renderer = PdfCalendarRenderer::new(config);

        let result = renderer.write_calendar(&june_table());
        assert!(matches!(result, Err(RenderError::Asset { .. })));
    }

    #[test]
    fn undecodable_icon_is_asset_error() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        let bogus = dir.path().join("bogus.png");
        fs::write(&bogus, b"not an image").unwrap();
        config.snowflake_icon = bogus;
        let renderer = PdfCalendarRenderer::new(config);

        let result = renderer.write_calendar(&june_table());
        assert!(matches!(result, Err(RenderError::Asset { .. })));
    }

    #[test]
    fn directory_as_output_is_write_error() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.output_path = dir.path().to_path_buf();
        let renderer = PdfCalendarRenderer::new(config);

        let result = renderer.write_calendar(&june_table());
        assert!(matches!(result, Err(RenderError::Write { .. })));
    }

    #[test]
    fn port_maps_errors_to_render() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.fire_icon = dir.path().join("missing.png");
        let renderer = PdfCalendarRenderer::new(config);

        let result = CalendarRendererPort::render(&renderer, &june_table());
        assert!(matches!(result, Err(ApplicationError::Render(msg)) if msg.contains("missing.png")));
    }

    #[test]
    fn flatten_blends_alpha_with_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        let opaque = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255])));

        assert_eq!(
            flatten_onto_white(&transparent).to_rgb8().get_pixel(0, 0).0,
            [255, 255, 255]
        );
        assert_eq!(
            flatten_onto_white(&opaque).to_rgb8().get_pixel(0, 0).0,
            [10, 20, 30]
        );
    }

    #[test]
    fn grid_fits_on_page() {
        // Six weeks is the tallest possible month
        let heading = LINE_HEIGHT_MM * 6.0 + TITLE_SIZE_PT * PT_TO_MM;
        let grid = HEADER_ROW_HEIGHT_MM + DAY_ROW_HEIGHT_MM * 6.0;
        assert!(MARGIN_MM * 2.0 + heading + grid < PAGE_HEIGHT_MM);
    }

    #[test]
    fn two_icons_fit_in_a_day_cell() {
        let icon = column_width() * ICON_WIDTH_RATIO;
        let used = CELL_PADDING_MM * 4.0 + DAY_NUMBER_SIZE_PT * PT_TO_MM + icon * 2.0;
        assert!(used < DAY_ROW_HEIGHT_MM);
    }
}
